//! Error types for ndn-tpm

use ndn_types::{ErrorKind, Name};
use thiserror::Error;

/// Errors that can occur in signing module operations
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

    /// No key with this name in the module
    #[error("Key `{0}` not found in signing module")]
    KeyNotFound(Name),

    /// A key with this name already exists
    #[error("Key `{0}` already exists in signing module")]
    KeyExists(Name),

    /// Name does not follow the key naming convention
    #[error("Invalid key name: {0}")]
    InvalidKeyName(Name),

    /// Random key id generation failed
    #[error("Random number generation failed")]
    Random,

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
            Error::Pib(e) => e.kind(),
            Error::KeyNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Structural,
        }
    }
}

/// Result type for signing module operations
pub type Result<T> = std::result::Result<T, Error>;
