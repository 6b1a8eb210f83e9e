//! Digest, key and signature algorithm identifiers

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Digest algorithms known to the security layer
///
/// Whether an algorithm can actually be computed depends on the crypto
/// provider and on the features it was built with; `None` is never
/// computable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// No digest
    #[serde(rename = "NONE")]
    None,
    /// SHA-224
    #[serde(rename = "SHA224")]
    Sha224,
    /// SHA-256
    #[default]
    #[serde(rename = "SHA256")]
    Sha256,
    /// SHA-384
    #[serde(rename = "SHA384")]
    Sha384,
    /// SHA-512
    #[serde(rename = "SHA512")]
    Sha512,
    /// BLAKE2b with a 512-bit output
    #[serde(rename = "BLAKE2B-512")]
    Blake2b512,
    /// BLAKE2s with a 256-bit output
    #[serde(rename = "BLAKE2S-256")]
    Blake2s256,
    /// SHA3-224
    #[serde(rename = "SHA3-224")]
    Sha3_224,
    /// SHA3-256
    #[serde(rename = "SHA3-256")]
    Sha3_256,
    /// SHA3-384
    #[serde(rename = "SHA3-384")]
    Sha3_384,
    /// SHA3-512
    #[serde(rename = "SHA3-512")]
    Sha3_512,
    /// SM3 (GM/T 0004-2012)
    #[serde(rename = "SM3")]
    Sm3,
}

impl DigestAlgorithm {
    /// All algorithms, in declaration order
    pub const ALL: [DigestAlgorithm; 12] = [
        DigestAlgorithm::None,
        DigestAlgorithm::Sha224,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
        DigestAlgorithm::Blake2b512,
        DigestAlgorithm::Blake2s256,
        DigestAlgorithm::Sha3_224,
        DigestAlgorithm::Sha3_256,
        DigestAlgorithm::Sha3_384,
        DigestAlgorithm::Sha3_512,
        DigestAlgorithm::Sm3,
    ];

    /// Get the digest size in bytes, or 0 for `None`
    pub fn output_len(&self) -> usize {
        match self {
            DigestAlgorithm::None => 0,
            DigestAlgorithm::Sha224 | DigestAlgorithm::Sha3_224 => 28,
            DigestAlgorithm::Sha256
            | DigestAlgorithm::Blake2s256
            | DigestAlgorithm::Sha3_256
            | DigestAlgorithm::Sm3 => 32,
            DigestAlgorithm::Sha384 | DigestAlgorithm::Sha3_384 => 48,
            DigestAlgorithm::Sha512 | DigestAlgorithm::Blake2b512 | DigestAlgorithm::Sha3_512 => {
                64
            }
        }
    }

    /// Get the canonical name of this algorithm
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlgorithm::None => "NONE",
            DigestAlgorithm::Sha224 => "SHA224",
            DigestAlgorithm::Sha256 => "SHA256",
            DigestAlgorithm::Sha384 => "SHA384",
            DigestAlgorithm::Sha512 => "SHA512",
            DigestAlgorithm::Blake2b512 => "BLAKE2B-512",
            DigestAlgorithm::Blake2s256 => "BLAKE2S-256",
            DigestAlgorithm::Sha3_224 => "SHA3-224",
            DigestAlgorithm::Sha3_256 => "SHA3-256",
            DigestAlgorithm::Sha3_384 => "SHA3-384",
            DigestAlgorithm::Sha3_512 => "SHA3-512",
            DigestAlgorithm::Sm3 => "SM3",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DigestAlgorithm::ALL
            .iter()
            .copied()
            .find(|algo| algo.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownDigestAlgorithm(s.to_string()))
    }
}

/// Key families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KeyType {
    /// Unknown or not yet determined
    #[default]
    #[serde(rename = "NONE")]
    None,
    /// RSA
    #[serde(rename = "RSA")]
    Rsa,
    /// Elliptic curve over a NIST prime curve
    #[serde(rename = "EC")]
    Ec,
    /// Elliptic curve over the SM2 curve
    ///
    /// Providers report these keys as EC; the curve tells them apart.
    #[serde(rename = "EC-ALT")]
    EcAlt,
    /// HMAC secret key
    #[serde(rename = "HMAC")]
    Hmac,
    /// AES secret key
    #[serde(rename = "AES")]
    Aes,
}

impl KeyType {
    /// Whether keys of this family are asymmetric
    pub fn is_asymmetric(&self) -> bool {
        matches!(self, KeyType::Rsa | KeyType::Ec | KeyType::EcAlt)
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            KeyType::None => "NONE",
            KeyType::Rsa => "RSA",
            KeyType::Ec => "EC",
            KeyType::EcAlt => "EC-ALT",
            KeyType::Hmac => "HMAC",
            KeyType::Aes => "AES",
        };
        f.write_str(s)
    }
}

/// Signature type codes carried in SignatureInfo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureType {
    /// Plain SHA-256 digest, no key involved
    DigestSha256,
    /// RSASSA-PKCS1-v1_5 with SHA-256
    Sha256WithRsa,
    /// ECDSA with SHA-256
    Sha256WithEcdsa,
    /// HMAC-SHA-256
    HmacWithSha256,
    /// SM2 with SM3
    Sm2WithSm3,
}

impl SignatureType {
    /// Get the TLV code of this signature type
    pub fn code(&self) -> u64 {
        match self {
            SignatureType::DigestSha256 => 0,
            SignatureType::Sha256WithRsa => 1,
            SignatureType::Sha256WithEcdsa => 3,
            SignatureType::HmacWithSha256 => 4,
            SignatureType::Sm2WithSm3 => 200,
        }
    }

    /// Get the digest algorithm this signature type is computed over
    pub fn digest_algorithm(&self) -> DigestAlgorithm {
        match self {
            SignatureType::Sm2WithSm3 => DigestAlgorithm::Sm3,
            _ => DigestAlgorithm::Sha256,
        }
    }

    /// Get the key family that produces this signature type
    pub fn key_type(&self) -> KeyType {
        match self {
            SignatureType::DigestSha256 => KeyType::None,
            SignatureType::Sha256WithRsa => KeyType::Rsa,
            SignatureType::Sha256WithEcdsa => KeyType::Ec,
            SignatureType::HmacWithSha256 => KeyType::Hmac,
            SignatureType::Sm2WithSm3 => KeyType::EcAlt,
        }
    }

    /// Pick the signature type for a key family
    pub fn for_key_type(key_type: KeyType) -> Option<Self> {
        match key_type {
            KeyType::Rsa => Some(SignatureType::Sha256WithRsa),
            KeyType::Ec => Some(SignatureType::Sha256WithEcdsa),
            KeyType::EcAlt => Some(SignatureType::Sm2WithSm3),
            KeyType::Hmac => Some(SignatureType::HmacWithSha256),
            KeyType::None | KeyType::Aes => None,
        }
    }
}

impl TryFrom<u64> for SignatureType {
    type Error = Error;

    fn try_from(code: u64) -> Result<Self> {
        match code {
            0 => Ok(SignatureType::DigestSha256),
            1 => Ok(SignatureType::Sha256WithRsa),
            3 => Ok(SignatureType::Sha256WithEcdsa),
            4 => Ok(SignatureType::HmacWithSha256),
            200 => Ok(SignatureType::Sm2WithSm3),
            other => Err(Error::UnknownSignatureType(other)),
        }
    }
}

impl std::fmt::Display for SignatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SignatureType::DigestSha256 => "DigestSha256",
            SignatureType::Sha256WithRsa => "SignatureSha256WithRsa",
            SignatureType::Sha256WithEcdsa => "SignatureSha256WithEcdsa",
            SignatureType::HmacWithSha256 => "SignatureHmacWithSha256",
            SignatureType::Sm2WithSm3 => "SignatureSm2WithSm3",
        };
        f.write_str(s)
    }
}
