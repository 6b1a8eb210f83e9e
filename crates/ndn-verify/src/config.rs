//! Verifier configuration

use ndn_types::DigestAlgorithm;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings for a [`Verifier`](crate::Verifier)
///
/// ```
/// use ndn_verify::VerifierConfig;
/// use ndn_types::DigestAlgorithm;
///
/// let config = VerifierConfig::from_json(r#"{ "signature_digest": "SHA384" }"#).unwrap();
/// assert_eq!(config.signature_digest, DigestAlgorithm::Sha384);
/// assert!(config.self_verifying_fallback);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Digest for public-key signatures over raw buffers
    ///
    /// Packets name their digest through the signature type, and EC-ALT
    /// keys always use SM3.
    pub signature_digest: DigestAlgorithm,

    /// Whether a check without a certificate may fall back to comparing the
    /// signature value with a digest of the signed bytes
    pub self_verifying_fallback: bool,

    /// Digest used by that fallback for raw buffers
    pub fallback_digest: DigestAlgorithm,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            signature_digest: DigestAlgorithm::Sha256,
            self_verifying_fallback: true,
            fallback_digest: DigestAlgorithm::Sha256,
        }
    }
}

impl VerifierConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn with_signature_digest(mut self, digest: DigestAlgorithm) -> Self {
        self.signature_digest = digest;
        self
    }

    pub fn with_fallback_digest(mut self, digest: DigestAlgorithm) -> Self {
        self.fallback_digest = digest;
        self
    }

    /// Reject certificate-less checks instead of falling back to a digest
    pub fn disable_self_verifying_fallback(mut self) -> Self {
        self.self_verifying_fallback = false;
        self
    }
}
