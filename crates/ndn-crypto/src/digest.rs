//! Digest algorithm mapping and one-shot digests
//!
//! SHA-2 and SHA3-256/384/512 come from aws-lc-rs. BLAKE2, SHA3-224 and SM3
//! come from RustCrypto crates behind the `blake2`, `sha3` and `sm3`
//! features; with a feature disabled its algorithms map to nothing.

use crate::error::{Error, Result};
use crate::handle::DigestContext;
use aws_lc_rs::digest;
use ndn_types::{DigestAlgorithm, InputBuffers};

/// Provider-side digest selected for a [`DigestAlgorithm`]
#[derive(Debug, Clone, Copy)]
pub(crate) enum ProviderDigest {
    AwsLc(&'static digest::Algorithm),
    #[cfg(feature = "blake2")]
    Blake2b512,
    #[cfg(feature = "blake2")]
    Blake2s256,
    #[cfg(feature = "sha3")]
    Sha3_224,
    #[cfg(feature = "sm3")]
    Sm3,
}

/// Map an algorithm to the provider digest that computes it
///
/// Total over [`DigestAlgorithm`]: `None` and algorithms whose feature is
/// disabled map to `None`.
pub(crate) fn provider_digest(algorithm: DigestAlgorithm) -> Option<ProviderDigest> {
    match algorithm {
        DigestAlgorithm::None => None,
        DigestAlgorithm::Sha224 => Some(ProviderDigest::AwsLc(&digest::SHA224)),
        DigestAlgorithm::Sha256 => Some(ProviderDigest::AwsLc(&digest::SHA256)),
        DigestAlgorithm::Sha384 => Some(ProviderDigest::AwsLc(&digest::SHA384)),
        DigestAlgorithm::Sha512 => Some(ProviderDigest::AwsLc(&digest::SHA512)),
        DigestAlgorithm::Sha3_256 => Some(ProviderDigest::AwsLc(&digest::SHA3_256)),
        DigestAlgorithm::Sha3_384 => Some(ProviderDigest::AwsLc(&digest::SHA3_384)),
        DigestAlgorithm::Sha3_512 => Some(ProviderDigest::AwsLc(&digest::SHA3_512)),
        #[cfg(feature = "blake2")]
        DigestAlgorithm::Blake2b512 => Some(ProviderDigest::Blake2b512),
        #[cfg(feature = "blake2")]
        DigestAlgorithm::Blake2s256 => Some(ProviderDigest::Blake2s256),
        #[cfg(feature = "sha3")]
        DigestAlgorithm::Sha3_224 => Some(ProviderDigest::Sha3_224),
        #[cfg(feature = "sm3")]
        DigestAlgorithm::Sm3 => Some(ProviderDigest::Sm3),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

/// Check whether this build can compute `algorithm`
pub fn is_supported(algorithm: DigestAlgorithm) -> bool {
    provider_digest(algorithm).is_some()
}

/// Digest the logical concatenation of `input`
pub fn compute_digest<'a>(
    input: impl Into<InputBuffers<'a>>,
    algorithm: DigestAlgorithm,
) -> Result<Vec<u8>> {
    let input: InputBuffers<'a> = input.into();
    let mut ctx = DigestContext::new(algorithm)?;
    for part in input.iter() {
        ctx.update(part);
    }
    Ok(ctx.finish())
}

/// SHA-256 of a single buffer
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let d = digest::digest(&digest::SHA256, data);
    let mut out = [0u8; 32];
    out.copy_from_slice(d.as_ref());
    out
}

pub(crate) fn unsupported(algorithm: DigestAlgorithm) -> Error {
    Error::UnsupportedDigest(algorithm)
}
