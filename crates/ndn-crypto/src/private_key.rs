//! Private keys held by software signing modules

use crate::encoding::{ec_spki_der, rsa_spki_der};
use crate::error::{Error, Result};
use crate::key_info::EcCurve;
use aws_lc_rs::{
    hmac,
    rand::{SecureRandom, SystemRandom},
    signature::{
        EcdsaKeyPair, EcdsaSigningAlgorithm, KeyPair as _, RsaKeyPair, ECDSA_P256_SHA256_ASN1_SIGNING,
        ECDSA_P384_SHA384_ASN1_SIGNING, ECDSA_P384_SHA3_384_ASN1_SIGNING,
        ECDSA_P521_SHA224_ASN1_SIGNING, ECDSA_P521_SHA256_ASN1_SIGNING,
        ECDSA_P521_SHA384_ASN1_SIGNING, ECDSA_P521_SHA3_512_ASN1_SIGNING,
        ECDSA_P521_SHA512_ASN1_SIGNING, RSA_PKCS1_SHA256, RSA_PKCS1_SHA384, RSA_PKCS1_SHA512,
    },
};
use ndn_types::{DigestAlgorithm, KeyType};
use p384::ecdsa::signature::hazmat::PrehashSigner;
use p384::pkcs8::DecodePrivateKey;

/// Parameters for generating a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyParams {
    /// RSA with the given modulus size
    Rsa { bits: usize },
    /// ECDSA on the given curve
    Ec { curve: EcCurve },
    /// HMAC-SHA256 with a secret of the given size
    Hmac { bits: usize },
}

impl KeyParams {
    pub fn key_type(&self) -> KeyType {
        match self {
            KeyParams::Rsa { .. } => KeyType::Rsa,
            KeyParams::Ec { curve: EcCurve::Sm2 } => KeyType::EcAlt,
            KeyParams::Ec { .. } => KeyType::Ec,
            KeyParams::Hmac { .. } => KeyType::Hmac,
        }
    }
}

/// Digest an EC key of `curve` is generated and imported with
fn native_digest(curve: EcCurve) -> Option<DigestAlgorithm> {
    match curve {
        EcCurve::P256 | EcCurve::P521 => Some(DigestAlgorithm::Sha256),
        EcCurve::P384 => Some(DigestAlgorithm::Sha384),
        EcCurve::Sm2 => None,
    }
}

/// Provider signing algorithm for a curve and digest pair
fn ecdsa_signing_algorithm(
    curve: EcCurve,
    digest: DigestAlgorithm,
) -> Option<&'static EcdsaSigningAlgorithm> {
    match (curve, digest) {
        (EcCurve::P256, DigestAlgorithm::Sha256) => Some(&ECDSA_P256_SHA256_ASN1_SIGNING),
        (EcCurve::P384, DigestAlgorithm::Sha384) => Some(&ECDSA_P384_SHA384_ASN1_SIGNING),
        (EcCurve::P384, DigestAlgorithm::Sha3_384) => Some(&ECDSA_P384_SHA3_384_ASN1_SIGNING),
        (EcCurve::P521, DigestAlgorithm::Sha224) => Some(&ECDSA_P521_SHA224_ASN1_SIGNING),
        (EcCurve::P521, DigestAlgorithm::Sha256) => Some(&ECDSA_P521_SHA256_ASN1_SIGNING),
        (EcCurve::P521, DigestAlgorithm::Sha384) => Some(&ECDSA_P521_SHA384_ASN1_SIGNING),
        (EcCurve::P521, DigestAlgorithm::Sha512) => Some(&ECDSA_P521_SHA512_ASN1_SIGNING),
        (EcCurve::P521, DigestAlgorithm::Sha3_512) => Some(&ECDSA_P521_SHA3_512_ASN1_SIGNING),
        _ => None,
    }
}

fn native_signing_algorithm(curve: EcCurve) -> Option<&'static EcdsaSigningAlgorithm> {
    native_digest(curve).and_then(|digest| ecdsa_signing_algorithm(curve, digest))
}

/// ECDSA over P-384 with a SHA-256 prehash, which the provider cannot sign
fn sign_p384_sha256(pair: &EcdsaKeyPair, data: &[u8]) -> Result<Vec<u8>> {
    let pkcs8 = pair.to_pkcs8v1()?;
    let key = p384::ecdsa::SigningKey::from_pkcs8_der(pkcs8.as_ref())
        .map_err(|e| Error::InvalidKeyFormat(format!("P-384 key: {}", e)))?;
    let prehash = aws_lc_rs::digest::digest(&aws_lc_rs::digest::SHA256, data);
    let sig: p384::ecdsa::Signature = key
        .sign_prehash(prehash.as_ref())
        .map_err(|e| Error::Signing(format!("ECDSA signing failed: {}", e)))?;
    Ok(sig.to_der().as_bytes().to_vec())
}

/// A private (or secret) key
pub enum PrivateKey {
    /// RSA key pair
    Rsa(RsaKeyPair),
    /// ECDSA key pair on a NIST curve
    Ec { pair: EcdsaKeyPair, curve: EcCurve },
    /// HMAC-SHA256 secret
    Hmac(hmac::Key),
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("key_type", &self.key_type())
            .finish_non_exhaustive()
    }
}

impl PrivateKey {
    /// Load an RSA or EC key from unencrypted PKCS#8
    pub fn from_pkcs8(pkcs8: &[u8]) -> Result<Self> {
        if let Ok(pair) = RsaKeyPair::from_pkcs8(pkcs8) {
            return Ok(PrivateKey::Rsa(pair));
        }
        for curve in [EcCurve::P256, EcCurve::P384, EcCurve::P521] {
            if let Some(alg) = native_signing_algorithm(curve) {
                if let Ok(pair) = EcdsaKeyPair::from_pkcs8(alg, pkcs8) {
                    return Ok(PrivateKey::Ec { pair, curve });
                }
            }
        }
        Err(Error::InvalidKeyFormat(
            "not an RSA or NIST-curve EC PKCS#8 key".to_string(),
        ))
    }

    /// Wrap raw HMAC secret bytes
    pub fn hmac_from_secret(secret: &[u8]) -> Self {
        PrivateKey::Hmac(hmac::Key::new(hmac::HMAC_SHA256, secret))
    }

    pub(crate) fn generate(params: &KeyParams) -> Result<Self> {
        match *params {
            KeyParams::Rsa { bits } => {
                use aws_lc_rs::rsa::KeySize;
                let size = match bits {
                    2048 => KeySize::Rsa2048,
                    3072 => KeySize::Rsa3072,
                    4096 => KeySize::Rsa4096,
                    other => {
                        return Err(Error::UnsupportedAlgorithm(format!(
                            "RSA key size {} bits",
                            other
                        )))
                    }
                };
                let pair = RsaKeyPair::generate(size)
                    .map_err(|_| Error::KeyGeneration(format!("failed to generate RSA-{} key", bits)))?;
                Ok(PrivateKey::Rsa(pair))
            }
            KeyParams::Ec { curve } => {
                let alg = native_signing_algorithm(curve).ok_or_else(|| {
                    Error::UnsupportedAlgorithm(format!("key generation on {:?}", curve))
                })?;
                let rng = SystemRandom::new();
                let pkcs8 = EcdsaKeyPair::generate_pkcs8(alg, &rng).map_err(|_| {
                    Error::KeyGeneration(format!("failed to generate {:?} key", curve))
                })?;
                let pair = EcdsaKeyPair::from_pkcs8(alg, pkcs8.as_ref())?;
                Ok(PrivateKey::Ec { pair, curve })
            }
            KeyParams::Hmac { bits } => {
                if bits == 0 || bits % 8 != 0 {
                    return Err(Error::KeyGeneration(format!(
                        "HMAC key size must be a positive multiple of 8, got {}",
                        bits
                    )));
                }
                let mut secret = vec![0u8; bits / 8];
                SystemRandom::new()
                    .fill(&mut secret)
                    .map_err(|_| Error::KeyGeneration("failed to generate HMAC secret".to_string()))?;
                Ok(Self::hmac_from_secret(&secret))
            }
        }
    }

    pub fn key_type(&self) -> KeyType {
        match self {
            PrivateKey::Rsa(_) => KeyType::Rsa,
            PrivateKey::Ec { .. } => KeyType::Ec,
            PrivateKey::Hmac(_) => KeyType::Hmac,
        }
    }

    /// Public half as DER SubjectPublicKeyInfo
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        match self {
            PrivateKey::Rsa(pair) => rsa_spki_der(pair.public_key().as_ref()),
            PrivateKey::Ec { pair, curve } => ec_spki_der(*curve, pair.public_key().as_ref()),
            PrivateKey::Hmac(_) => Err(Error::UnsupportedKeyType {
                key_type: KeyType::Hmac,
                operation: "public key export",
            }),
        }
    }

    /// Sign `data` hashed with `digest`
    ///
    /// RSA signs with PKCS#1 v1.5, EC produces an ASN.1 DER ECDSA signature,
    /// HMAC returns the MAC tag.
    pub fn sign(&self, digest: DigestAlgorithm, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            PrivateKey::Rsa(pair) => {
                let padding = match digest {
                    DigestAlgorithm::Sha256 => &RSA_PKCS1_SHA256,
                    DigestAlgorithm::Sha384 => &RSA_PKCS1_SHA384,
                    DigestAlgorithm::Sha512 => &RSA_PKCS1_SHA512,
                    other => {
                        return Err(Error::UnsupportedAlgorithm(format!(
                            "RSA signing with {}",
                            other
                        )))
                    }
                };
                let rng = SystemRandom::new();
                let mut sig = vec![0u8; pair.public_modulus_len()];
                pair.sign(padding, &rng, data, &mut sig)
                    .map_err(|_| Error::Signing("RSA signing failed".to_string()))?;
                Ok(sig)
            }
            PrivateKey::Ec { pair, curve } => {
                let rng = SystemRandom::new();
                let sig = if native_digest(*curve) == Some(digest) {
                    pair.sign(&rng, data)
                } else if let Some(alg) = ecdsa_signing_algorithm(*curve, digest) {
                    let pkcs8 = pair.to_pkcs8v1()?;
                    EcdsaKeyPair::from_pkcs8(alg, pkcs8.as_ref())?.sign(&rng, data)
                } else if (*curve, digest) == (EcCurve::P384, DigestAlgorithm::Sha256) {
                    return sign_p384_sha256(pair, data);
                } else {
                    return Err(Error::UnsupportedAlgorithm(format!(
                        "{:?} key cannot sign with {}",
                        curve, digest
                    )));
                };
                let sig = sig.map_err(|_| Error::Signing("ECDSA signing failed".to_string()))?;
                Ok(sig.as_ref().to_vec())
            }
            PrivateKey::Hmac(key) => {
                if digest != DigestAlgorithm::Sha256 {
                    return Err(Error::UnsupportedAlgorithm(format!("HMAC with {}", digest)));
                }
                Ok(hmac::sign(key, data).as_ref().to_vec())
            }
        }
    }

    /// Check an HMAC tag; other key types verify through their public key
    pub fn verify_mac(&self, digest: DigestAlgorithm, data: &[u8], tag: &[u8]) -> Result<bool> {
        match self {
            PrivateKey::Hmac(key) => {
                if digest != DigestAlgorithm::Sha256 {
                    return Err(Error::UnsupportedAlgorithm(format!("HMAC with {}", digest)));
                }
                Ok(hmac::verify(key, data, tag).is_ok())
            }
            other => Err(Error::UnsupportedKeyType {
                key_type: other.key_type(),
                operation: "MAC verification",
            }),
        }
    }
}
