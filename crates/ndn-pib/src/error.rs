//! Error types for ndn-pib

use ndn_types::{ErrorKind, Name};
use thiserror::Error;

/// Errors that can occur in PIB operations
#[derive(Error, Debug)]
pub enum Error {
    /// Error from ndn-types
    #[error("Types error: {0}")]
    Types(#[from] ndn_types::Error),

    /// Error from ndn-crypto
    #[error("Crypto error: {0}")]
    Crypto(#[from] ndn_crypto::Error),

    /// Identity does not exist
    #[error("Identity `{0}` not found")]
    IdentityNotFound(Name),

    /// Key does not exist
    #[error("Key `{0}` not found")]
    KeyNotFound(Name),

    /// Certificate does not exist
    #[error("Certificate `{0}` not found")]
    CertificateNotFound(Name),

    /// No default identity is set
    #[error("No default identity")]
    NoDefaultIdentity,

    /// Identity has no default key
    #[error("No default key for identity `{0}`")]
    NoDefaultKey(Name),

    /// Key has no default certificate
    #[error("No default certificate for key `{0}`")]
    NoDefaultCertificate(Name),

    /// Name does not follow the key naming convention
    #[error("Invalid key name: {0}")]
    InvalidKeyName(Name),

    /// Name does not follow the certificate naming convention
    #[error("Invalid certificate name: {0}")]
    InvalidCertificateName(Name),

    /// Entity does not belong to the receiver
    #[error("`{name}` does not belong to `{owner}`")]
    WrongOwner { name: Name, owner: Name },

    /// Stored public key bytes could not be decoded
    #[error("Invalid key bits for `{0}`")]
    InvalidKeyBits(Name),

    /// Certificate packet is malformed
    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),

    /// Operation on a default-constructed handle
    #[error("Operation on an invalid {0} handle")]
    InvalidHandle(&'static str),

    /// Storage lock poisoned
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Get the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Types(e) => e.kind(),
            Error::Crypto(e) => e.kind(),
            Error::IdentityNotFound(_)
            | Error::KeyNotFound(_)
            | Error::CertificateNotFound(_)
            | Error::NoDefaultIdentity
            | Error::NoDefaultKey(_)
            | Error::NoDefaultCertificate(_) => ErrorKind::NotFound,
            _ => ErrorKind::Structural,
        }
    }
}

/// Result type for PIB operations
pub type Result<T> = std::result::Result<T, Error>;
