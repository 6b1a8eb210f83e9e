//! Scoped wrappers around provider primitives
//!
//! Each wrapper owns exactly one provider resource for its whole lifetime.
//! Construction either yields a usable handle or an error; dropping the
//! handle releases the resource.

use crate::digest::{provider_digest, unsupported, ProviderDigest};
use crate::error::{Error, Result};
use crate::key_info::{EcCurve, KeyInfo};
use crate::private_key::{KeyParams, PrivateKey};
use aws_lc_rs::digest;
use aws_lc_rs::signature::{
    EcdsaVerificationAlgorithm, RsaParameters, UnparsedPublicKey, ECDSA_P256_SHA256_ASN1,
    ECDSA_P256_SHA384_ASN1, ECDSA_P256_SHA512_ASN1, ECDSA_P384_SHA256_ASN1,
    ECDSA_P384_SHA384_ASN1, ECDSA_P384_SHA3_384_ASN1, ECDSA_P384_SHA512_ASN1,
    ECDSA_P521_SHA224_ASN1, ECDSA_P521_SHA256_ASN1, ECDSA_P521_SHA384_ASN1,
    ECDSA_P521_SHA3_512_ASN1, ECDSA_P521_SHA512_ASN1,
    RSA_PKCS1_1024_8192_SHA256_FOR_LEGACY_USE_ONLY, RSA_PKCS1_1024_8192_SHA512_FOR_LEGACY_USE_ONLY,
    RSA_PKCS1_2048_8192_SHA256, RSA_PKCS1_2048_8192_SHA384, RSA_PKCS1_2048_8192_SHA512,
};
use der::asn1::UintRef;
use der::{Decode, Sequence};
use ndn_types::{DigestAlgorithm, KeyType};
use std::io::{Read, Write};

enum DigestState {
    AwsLc(digest::Context),
    #[cfg(feature = "blake2")]
    Blake2b512(blake2::Blake2b512),
    #[cfg(feature = "blake2")]
    Blake2s256(blake2::Blake2s256),
    #[cfg(feature = "sha3")]
    Sha3_224(sha3::Sha3_224),
    #[cfg(feature = "sm3")]
    Sm3(sm3::Sm3),
}

/// An in-progress message digest
pub struct DigestContext {
    algorithm: DigestAlgorithm,
    state: DigestState,
}

impl DigestContext {
    /// Start a digest; fails if this build cannot compute `algorithm`
    pub fn new(algorithm: DigestAlgorithm) -> Result<Self> {
        let provider = provider_digest(algorithm).ok_or_else(|| unsupported(algorithm))?;
        let state = match provider {
            ProviderDigest::AwsLc(alg) => DigestState::AwsLc(digest::Context::new(alg)),
            #[cfg(feature = "blake2")]
            ProviderDigest::Blake2b512 => DigestState::Blake2b512(Default::default()),
            #[cfg(feature = "blake2")]
            ProviderDigest::Blake2s256 => DigestState::Blake2s256(Default::default()),
            #[cfg(feature = "sha3")]
            ProviderDigest::Sha3_224 => DigestState::Sha3_224(Default::default()),
            #[cfg(feature = "sm3")]
            ProviderDigest::Sm3 => DigestState::Sm3(Default::default()),
        };
        Ok(Self { algorithm, state })
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Feed more input
    pub fn update(&mut self, data: &[u8]) {
        match &mut self.state {
            DigestState::AwsLc(ctx) => ctx.update(data),
            #[cfg(feature = "blake2")]
            DigestState::Blake2b512(h) => blake2::Digest::update(h, data),
            #[cfg(feature = "blake2")]
            DigestState::Blake2s256(h) => blake2::Digest::update(h, data),
            #[cfg(feature = "sha3")]
            DigestState::Sha3_224(h) => sha3::Digest::update(h, data),
            #[cfg(feature = "sm3")]
            DigestState::Sm3(h) => sm3::Digest::update(h, data),
        }
    }

    /// Finish and return the digest
    pub fn finish(self) -> Vec<u8> {
        match self.state {
            DigestState::AwsLc(ctx) => ctx.finish().as_ref().to_vec(),
            #[cfg(feature = "blake2")]
            DigestState::Blake2b512(h) => blake2::Digest::finalize(h).to_vec(),
            #[cfg(feature = "blake2")]
            DigestState::Blake2s256(h) => blake2::Digest::finalize(h).to_vec(),
            #[cfg(feature = "sha3")]
            DigestState::Sha3_224(h) => sha3::Digest::finalize(h).to_vec(),
            #[cfg(feature = "sm3")]
            DigestState::Sm3(h) => sm3::Digest::finalize(h).to_vec(),
        }
    }
}

#[derive(Sequence)]
struct EcdsaSignature<'a> {
    r: UintRef<'a>,
    s: UintRef<'a>,
}

/// An asymmetric-key operation context
///
/// Built either over a loaded public key (verify, encrypt) or over a bare
/// key family (key generation).
pub struct KeyContext<'a> {
    key_type: KeyType,
    key: Option<&'a KeyInfo>,
}

impl<'a> KeyContext<'a> {
    /// Open a context over a loaded public key
    pub fn from_key(key: &'a KeyInfo) -> Result<Self> {
        if !key.key_type().is_asymmetric() {
            return Err(Error::UnsupportedKeyType {
                key_type: key.key_type(),
                operation: "public key operations",
            });
        }
        Ok(Self {
            key_type: key.key_type(),
            key: Some(key),
        })
    }

    /// Open a key generation context for a key family
    pub fn from_key_type(key_type: KeyType) -> Result<Self> {
        match key_type {
            KeyType::Rsa | KeyType::Ec | KeyType::Hmac => Ok(Self {
                key_type,
                key: None,
            }),
            other => Err(Error::UnsupportedKeyType {
                key_type: other,
                operation: "key generation",
            }),
        }
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    fn loaded_key(&self) -> Result<&'a KeyInfo> {
        self.key.ok_or(Error::NoKey)
    }

    /// Check `signature` over `message` hashed with `digest`
    ///
    /// A well-formed signature that does not match yields `Ok(false)`.
    pub fn verify(&self, digest: DigestAlgorithm, message: &[u8], signature: &[u8]) -> Result<bool> {
        let key = self.loaded_key()?;
        match self.key_type {
            KeyType::Rsa => verify_rsa(key, digest, message, signature),
            KeyType::Ec => verify_ecdsa(key, digest, message, signature),
            other => Err(Error::UnsupportedKeyType {
                key_type: other,
                operation: "signature verification",
            }),
        }
    }

    /// Encrypt with RSA-OAEP (SHA-1, MGF1-SHA-1)
    pub fn encrypt(&self, plain: &[u8]) -> Result<Vec<u8>> {
        use aws_lc_rs::rsa::{OaepPublicEncryptingKey, PublicEncryptingKey, OAEP_SHA1_MGF1SHA1};

        let key = self.loaded_key()?;
        if self.key_type != KeyType::Rsa {
            return Err(Error::UnsupportedKeyType {
                key_type: self.key_type,
                operation: "encryption",
            });
        }
        let public = PublicEncryptingKey::from_der(key.der())?;
        let oaep = OaepPublicEncryptingKey::new(public)?;
        let mut out = vec![0u8; oaep.ciphertext_size()];
        let cipher = oaep
            .encrypt(&OAEP_SHA1_MGF1SHA1, plain, &mut out, None)
            .map_err(|_| {
                Error::Encryption(format!(
                    "RSA-OAEP encryption of {} bytes failed",
                    plain.len()
                ))
            })?;
        Ok(cipher.to_vec())
    }

    /// Generate a new key of this context's family
    pub fn generate(&self, params: &KeyParams) -> Result<PrivateKey> {
        if self.key.is_some() || params.key_type() != self.key_type {
            return Err(Error::KeyGeneration(format!(
                "{:?} do not fit a {} generation context",
                params, self.key_type
            )));
        }
        PrivateKey::generate(params)
    }
}

/// Smallest RSA modulus accepted for verification
const MIN_RSA_VERIFY_BITS: usize = 1024;

fn rsa_parameters(bits: usize, digest: DigestAlgorithm) -> Result<&'static RsaParameters> {
    if bits < MIN_RSA_VERIFY_BITS {
        return Err(Error::UnsupportedAlgorithm(format!("{}-bit RSA key", bits)));
    }
    let legacy = bits < 2048;
    match (digest, legacy) {
        (DigestAlgorithm::Sha256, false) => Ok(&RSA_PKCS1_2048_8192_SHA256),
        (DigestAlgorithm::Sha384, false) => Ok(&RSA_PKCS1_2048_8192_SHA384),
        (DigestAlgorithm::Sha512, false) => Ok(&RSA_PKCS1_2048_8192_SHA512),
        (DigestAlgorithm::Sha256, true) => Ok(&RSA_PKCS1_1024_8192_SHA256_FOR_LEGACY_USE_ONLY),
        (DigestAlgorithm::Sha512, true) => Ok(&RSA_PKCS1_1024_8192_SHA512_FOR_LEGACY_USE_ONLY),
        (other, _) => Err(Error::UnsupportedAlgorithm(format!(
            "{}-bit RSA signatures with {}",
            bits, other
        ))),
    }
}

fn verify_rsa(key: &KeyInfo, digest: DigestAlgorithm, message: &[u8], signature: &[u8]) -> Result<bool> {
    let params = rsa_parameters(key.bits(), digest)?;
    let modulus_len = key.bits().div_ceil(8);
    if signature.len() != modulus_len {
        return Err(Error::InvalidSignature(format!(
            "RSA signature is {} bytes, expected {}",
            signature.len(),
            modulus_len
        )));
    }
    let public = UnparsedPublicKey::new(params, key.public_bytes());
    Ok(public.verify(message, signature).is_ok())
}

fn verify_ecdsa(key: &KeyInfo, digest: DigestAlgorithm, message: &[u8], signature: &[u8]) -> Result<bool> {
    EcdsaSignature::from_der(signature)
        .map_err(|e| Error::InvalidSignature(format!("ECDSA signature is not DER: {}", e)))?;
    let curve = key.curve().ok_or_else(|| Error::InvalidKeyFormat("EC key without a curve".to_string()))?;
    let alg: &'static EcdsaVerificationAlgorithm = match (curve, digest) {
        (EcCurve::P256, DigestAlgorithm::Sha256) => &ECDSA_P256_SHA256_ASN1,
        (EcCurve::P256, DigestAlgorithm::Sha384) => &ECDSA_P256_SHA384_ASN1,
        (EcCurve::P256, DigestAlgorithm::Sha512) => &ECDSA_P256_SHA512_ASN1,
        (EcCurve::P384, DigestAlgorithm::Sha256) => &ECDSA_P384_SHA256_ASN1,
        (EcCurve::P384, DigestAlgorithm::Sha384) => &ECDSA_P384_SHA384_ASN1,
        (EcCurve::P384, DigestAlgorithm::Sha512) => &ECDSA_P384_SHA512_ASN1,
        (EcCurve::P384, DigestAlgorithm::Sha3_384) => &ECDSA_P384_SHA3_384_ASN1,
        (EcCurve::P521, DigestAlgorithm::Sha224) => &ECDSA_P521_SHA224_ASN1,
        (EcCurve::P521, DigestAlgorithm::Sha256) => &ECDSA_P521_SHA256_ASN1,
        (EcCurve::P521, DigestAlgorithm::Sha384) => &ECDSA_P521_SHA384_ASN1,
        (EcCurve::P521, DigestAlgorithm::Sha512) => &ECDSA_P521_SHA512_ASN1,
        (EcCurve::P521, DigestAlgorithm::Sha3_512) => &ECDSA_P521_SHA3_512_ASN1,
        (curve, digest) => {
            return Err(Error::UnsupportedAlgorithm(format!(
                "ECDSA on {:?} with {}",
                curve, digest
            )))
        }
    };
    let public = UnparsedPublicKey::new(alg, key.public_bytes());
    Ok(public.verify(message, signature).is_ok())
}

/// A byte source or sink where a short transfer counts as failure
pub struct ByteStream<T> {
    inner: T,
}

impl<T> ByteStream<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read> ByteStream<T> {
    /// Fill `buf` completely
    pub fn read(&mut self, buf: &mut [u8]) -> bool {
        self.inner.read_exact(buf).is_ok()
    }

    /// Append everything left in the source to `out`
    pub fn read_to_end(&mut self, out: &mut Vec<u8>) -> bool {
        self.inner.read_to_end(out).is_ok()
    }
}

impl<T: Write> ByteStream<T> {
    /// Write all of `buf` and flush
    pub fn write(&mut self, buf: &[u8]) -> bool {
        self.inner.write_all(buf).is_ok() && self.inner.flush().is_ok()
    }
}
