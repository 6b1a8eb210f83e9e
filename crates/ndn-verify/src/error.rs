//! Error types for ndn-verify

use ndn_types::{ErrorKind, SignatureType};
use thiserror::Error;

/// Errors that can occur during verification
///
/// A signature that does not match is not an error; the verification
/// functions return `Ok(false)` for it.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from ndn-types
    #[error("Types error: {0}")]
    Types(#[from] ndn_types::Error),

    /// Error from ndn-crypto
    #[error("Crypto error: {0}")]
    Crypto(#[from] ndn_crypto::Error),

    /// Error from ndn-pib
    #[error("PIB error: {0}")]
    Pib(#[from] ndn_pib::Error),

    /// Error from ndn-tpm
    #[error("Signing module error: {0}")]
    Tpm(#[from] ndn_tpm::Error),

    /// Packet carries signature info but no signature value
    #[error("Packet has no signature value")]
    MissingSignatureValue,

    /// Signature type that cannot be checked without a certificate
    #[error("A {0} signature cannot be verified without a certificate")]
    NotSelfVerifying(SignatureType),

    /// Certificate-less digest fallback is turned off
    #[error("No certificate given and the digest fallback is disabled")]
    FallbackDisabled,

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Types(e) => e.kind(),
            Error::Crypto(e) => e.kind(),
            Error::Pib(e) => e.kind(),
            Error::Tpm(e) => e.kind(),
            Error::NotSelfVerifying(_) | Error::FallbackDisabled => ErrorKind::Unsupported,
            Error::MissingSignatureValue | Error::Json(_) | Error::Io(_) => ErrorKind::Structural,
        }
    }
}

/// Result type for verification
pub type Result<T> = std::result::Result<T, Error>;
