//! The signing module interface

use ndn_crypto::KeyParams;
use ndn_types::{DigestAlgorithm, InputBuffers, KeyType, Name};
use tracing::debug;

use crate::error::{Error, Result};

/// A store of named private keys
///
/// Private key material never leaves the module: callers refer to keys by
/// name and get signatures, verification results and public keys back.
pub trait SigningModule: Send + Sync {
    /// Locator string identifying the module, e.g. `tpm-memory:`
    fn locator(&self) -> &str;

    fn has_key(&self, key_name: &Name) -> Result<bool>;

    fn key_type(&self, key_name: &Name) -> Result<KeyType>;

    /// Public half of a key as DER SubjectPublicKeyInfo
    fn public_key(&self, key_name: &Name) -> Result<Vec<u8>>;

    /// Sign the concatenation of `input` hashed with `digest`
    fn sign(&self, input: InputBuffers<'_>, key_name: &Name, digest: DigestAlgorithm)
        -> Result<Vec<u8>>;

    /// Check a signature made by a key of this module
    ///
    /// Returns `Ok(false)` for a well-formed signature that does not match.
    fn verify(
        &self,
        input: InputBuffers<'_>,
        signature: &[u8],
        key_name: &Name,
        digest: DigestAlgorithm,
    ) -> Result<bool>;

    /// Generate a key for `identity` and return its name
    fn create_key(&self, identity: &Name, params: &KeyParams) -> Result<Name>;

    fn delete_key(&self, key_name: &Name) -> Result<()>;

    /// Import an unencrypted PKCS#8 RSA or EC private key
    fn import_key(&self, key_name: &Name, pkcs8: &[u8]) -> Result<()>;
}

/// Verify a signature with a named key held by a signing module
///
/// Fails with [`Error::KeyNotFound`] when the module has no such key and with
/// an unsupported error when the key cannot be used with `digest`.
pub fn verify_with_module<'a>(
    module: &dyn SigningModule,
    key_name: &Name,
    digest: DigestAlgorithm,
    signed: impl Into<InputBuffers<'a>>,
    signature: &[u8],
) -> Result<bool> {
    if !module.has_key(key_name)? {
        return Err(Error::KeyNotFound(key_name.clone()));
    }
    debug!(module = module.locator(), %key_name, %digest, "verifying with signing module");
    module.verify(signed.into(), signature, key_name, digest)
}
