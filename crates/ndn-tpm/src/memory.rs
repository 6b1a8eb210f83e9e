//! In-memory software signing module

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use aws_lc_rs::rand::{SecureRandom, SystemRandom};
use ndn_crypto::{KeyContext, KeyParams, PrivateKey, PublicKey};
use ndn_pib::{construct_key_name, extract_identity_from_key_name};
use ndn_types::{DigestAlgorithm, InputBuffers, KeyType, Name};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::module::SigningModule;

/// Locator of the in-memory module
pub const MEMORY_LOCATOR: &str = "tpm-memory:";

const KEY_ID_LEN: usize = 8;

/// Signing module keeping private keys in process memory
///
/// Keys are lost when the module is dropped.
#[derive(Default)]
pub struct MemoryModule {
    keys: RwLock<HashMap<Name, Arc<PrivateKey>>>,
}

impl std::fmt::Debug for MemoryModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.keys.read().map(|keys| keys.len()).unwrap_or_default();
        f.debug_struct("MemoryModule")
            .field("keys", &count)
            .finish()
    }
}

impl MemoryModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import a raw HMAC-SHA256 secret under `key_name`
    pub fn import_secret(&self, key_name: &Name, secret: &[u8]) -> Result<()> {
        self.insert(key_name, PrivateKey::hmac_from_secret(secret))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Name, Arc<PrivateKey>>>> {
        self.keys
            .read()
            .map_err(|_| Error::Storage("Failed to acquire read lock".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Name, Arc<PrivateKey>>>> {
        self.keys
            .write()
            .map_err(|_| Error::Storage("Failed to acquire write lock".to_string()))
    }

    fn key(&self, key_name: &Name) -> Result<Arc<PrivateKey>> {
        self.read()?
            .get(key_name)
            .cloned()
            .ok_or_else(|| Error::KeyNotFound(key_name.clone()))
    }

    fn insert(&self, key_name: &Name, key: PrivateKey) -> Result<()> {
        extract_identity_from_key_name(key_name)
            .map_err(|_| Error::InvalidKeyName(key_name.clone()))?;
        let mut keys = self.write()?;
        if keys.contains_key(key_name) {
            return Err(Error::KeyExists(key_name.clone()));
        }
        debug!(%key_name, key_type = %key.key_type(), "imported key");
        keys.insert(key_name.clone(), Arc::new(key));
        Ok(())
    }
}

fn random_key_id() -> Result<String> {
    let mut id = [0u8; KEY_ID_LEN];
    SystemRandom::new().fill(&mut id).map_err(|_| Error::Random)?;
    Ok(hex::encode(id))
}

impl SigningModule for MemoryModule {
    fn locator(&self) -> &str {
        MEMORY_LOCATOR
    }

    fn has_key(&self, key_name: &Name) -> Result<bool> {
        Ok(self.read()?.contains_key(key_name))
    }

    fn key_type(&self, key_name: &Name) -> Result<KeyType> {
        Ok(self.key(key_name)?.key_type())
    }

    fn public_key(&self, key_name: &Name) -> Result<Vec<u8>> {
        Ok(self.key(key_name)?.public_key_der()?)
    }

    fn sign(
        &self,
        input: InputBuffers<'_>,
        key_name: &Name,
        digest: DigestAlgorithm,
    ) -> Result<Vec<u8>> {
        let key = self.key(key_name)?;
        Ok(key.sign(digest, &input.to_vec())?)
    }

    fn verify(
        &self,
        input: InputBuffers<'_>,
        signature: &[u8],
        key_name: &Name,
        digest: DigestAlgorithm,
    ) -> Result<bool> {
        let key = self.key(key_name)?;
        match key.key_type() {
            KeyType::Hmac => Ok(key.verify_mac(digest, &input.to_vec(), signature)?),
            _ => {
                let public = PublicKey::from_der(&key.public_key_der()?)?;
                Ok(public.verify_with_digest(input, signature, digest)?)
            }
        }
    }

    fn create_key(&self, identity: &Name, params: &KeyParams) -> Result<Name> {
        let key = KeyContext::from_key_type(params.key_type())?.generate(params)?;
        let mut keys = self.write()?;
        let key_name = loop {
            let candidate = construct_key_name(identity, random_key_id()?);
            if !keys.contains_key(&candidate) {
                break candidate;
            }
        };
        info!(%key_name, ?params, "created key");
        keys.insert(key_name.clone(), Arc::new(key));
        Ok(key_name)
    }

    fn delete_key(&self, key_name: &Name) -> Result<()> {
        if self.write()?.remove(key_name).is_none() {
            return Err(Error::KeyNotFound(key_name.clone()));
        }
        debug!(%key_name, "deleted key");
        Ok(())
    }

    fn import_key(&self, key_name: &Name, pkcs8: &[u8]) -> Result<()> {
        self.insert(key_name, PrivateKey::from_pkcs8(pkcs8)?)
    }
}
