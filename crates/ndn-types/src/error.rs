//! Error types for ndn-types

use thiserror::Error;

/// Classification shared by every error in the security layer
///
/// A failed signature check is never an error; it is reported as `false`
/// by the verification functions. Errors only describe calls that could not
/// be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input, wrong length, or a provider resource failure
    Structural,
    /// A named identity, key, or certificate does not exist
    NotFound,
    /// The algorithm or operation is not available for this key or build
    Unsupported,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Structural => write!(f, "structural"),
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Errors that can occur in ndn-types
#[derive(Error, Debug)]
pub enum Error {
    /// Name URI could not be parsed
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Packet is missing an element required for the operation
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Unknown or unassigned signature type code
    #[error("Unknown signature type: {0}")]
    UnknownSignatureType(u64),

    /// Unknown digest algorithm name
    #[error("Unknown digest algorithm: {0}")]
    UnknownDigestAlgorithm(String),

    /// Validity period with `not_before` after `not_after`
    #[error("Invalid validity period: {0}")]
    InvalidValidityPeriod(String),
}

impl Error {
    /// Get the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownSignatureType(_) | Error::UnknownDigestAlgorithm(_) => {
                ErrorKind::Unsupported
            }
            _ => ErrorKind::Structural,
        }
    }
}

/// Result type for ndn-types operations
pub type Result<T> = std::result::Result<T, Error>;
