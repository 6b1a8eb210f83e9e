//! Error types for ndn-crypto

use ndn_types::{DigestAlgorithm, ErrorKind, KeyType};
use thiserror::Error;

/// Errors that can occur in cryptographic operations
#[derive(Error, Debug)]
pub enum Error {
    /// Error from ndn-types
    #[error("Types error: {0}")]
    Types(#[from] ndn_types::Error),

    /// Operation on a public key object that holds no key
    #[error("No public key is loaded")]
    NoKey,

    /// Malformed key encoding
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// Malformed signature encoding or wrong signature length
    #[error("Invalid signature encoding: {0}")]
    InvalidSignature(String),

    /// DER encoding/decoding error
    #[error("DER error: {0}")]
    Der(String),

    /// Base64 error
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A byte stream transferred fewer bytes than requested
    #[error("Short transfer: {0}")]
    ShortTransfer(String),

    /// Digest algorithm not available in this build
    #[error("Unsupported digest algorithm: {0}")]
    UnsupportedDigest(DigestAlgorithm),

    /// Key type not usable for the requested operation
    #[error("Unsupported key type {key_type} for {operation}")]
    UnsupportedKeyType {
        key_type: KeyType,
        operation: &'static str,
    },

    /// Algorithm combination not available
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Key generation error
    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    /// Signing error
    #[error("Signing error: {0}")]
    Signing(String),

    /// Encryption error
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// AWS-LC-RS error
    #[error("Crypto error: {0}")]
    AwsLc(String),
}

impl Error {
    /// Get the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Types(e) => e.kind(),
            Error::UnsupportedDigest(_)
            | Error::UnsupportedKeyType { .. }
            | Error::UnsupportedAlgorithm(_) => ErrorKind::Unsupported,
            _ => ErrorKind::Structural,
        }
    }
}

impl From<der::Error> for Error {
    fn from(e: der::Error) -> Self {
        Error::Der(e.to_string())
    }
}

impl From<aws_lc_rs::error::Unspecified> for Error {
    fn from(_: aws_lc_rs::error::Unspecified) -> Self {
        Error::AwsLc("unspecified error".to_string())
    }
}

impl From<aws_lc_rs::error::KeyRejected> for Error {
    fn from(e: aws_lc_rs::error::KeyRejected) -> Self {
        Error::InvalidKeyFormat(e.to_string())
    }
}

/// Result type for cryptographic operations
pub type Result<T> = std::result::Result<T, Error>;
