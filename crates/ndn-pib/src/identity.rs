//! Identity handles

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use ndn_types::{KeyType, Name};
use tracing::debug;

use crate::error::{Error, Result};
use crate::key::{Key, KeyImpl};
use crate::naming::extract_identity_from_key_name;
use crate::pib_impl::PibImpl;

#[derive(Debug)]
pub(crate) struct IdentityImpl {
    name: Name,
    pib: Arc<dyn PibImpl>,
    // Handed-out key objects, so that repeated lookups yield equal handles.
    keys: Mutex<HashMap<Name, Arc<KeyImpl>>>,
}

impl IdentityImpl {
    /// Store an identity and return its implementation object
    pub(crate) fn create(name: &Name, pib: Arc<dyn PibImpl>) -> Result<Self> {
        pib.add_identity(name)?;
        Ok(Self::with_storage(name, pib))
    }

    /// Open a stored identity
    pub(crate) fn open(name: &Name, pib: Arc<dyn PibImpl>) -> Result<Self> {
        if !pib.has_identity(name)? {
            return Err(Error::IdentityNotFound(name.clone()));
        }
        Ok(Self::with_storage(name, pib))
    }

    fn with_storage(name: &Name, pib: Arc<dyn PibImpl>) -> Self {
        Self {
            name: name.clone(),
            pib,
            keys: Mutex::new(HashMap::new()),
        }
    }

    fn keys(&self) -> Result<MutexGuard<'_, HashMap<Name, Arc<KeyImpl>>>> {
        self.keys
            .lock()
            .map_err(|_| Error::Storage("Failed to acquire key cache lock".to_string()))
    }

    fn check_owner(&self, key_name: &Name) -> Result<()> {
        let owner = extract_identity_from_key_name(key_name)?;
        if owner != self.name {
            return Err(Error::WrongOwner {
                name: key_name.clone(),
                owner: self.name.clone(),
            });
        }
        Ok(())
    }

    fn add_key(&self, bits: &[u8], key_name: &Name, key_type: KeyType) -> Result<Key> {
        self.check_owner(key_name)?;
        let mut keys = self.keys()?;
        let created = KeyImpl::create(key_name, bits, key_type, self.pib.clone())?;
        let inner = keys
            .entry(key_name.clone())
            .or_insert_with(|| Arc::new(created))
            .clone();
        Ok(Key::from_impl(inner))
    }

    fn remove_key(&self, key_name: &Name) -> Result<()> {
        self.check_owner(key_name)?;
        let mut keys = self.keys()?;
        self.pib.remove_key(key_name)?;
        keys.remove(key_name);
        debug!(%key_name, "removed key");
        Ok(())
    }

    fn key(&self, key_name: &Name) -> Result<Key> {
        self.check_owner(key_name)?;
        let mut keys = self.keys()?;
        if !self.pib.has_key(key_name)? {
            keys.remove(key_name);
            return Err(Error::KeyNotFound(key_name.clone()));
        }
        let inner = match keys.get(key_name) {
            Some(inner) => inner.clone(),
            None => {
                let inner = Arc::new(KeyImpl::open(key_name, self.pib.clone())?);
                keys.insert(key_name.clone(), inner.clone());
                inner
            }
        };
        Ok(Key::from_impl(inner))
    }
}

/// Handle to an identity stored in a PIB
///
/// Handles obtained from the same [`Pib`](crate::Pib) for the same name
/// share one implementation object: they compare equal and observe each
/// other's changes. `Identity::default()` is the invalid handle.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    inner: Option<Arc<IdentityImpl>>,
}

impl Identity {
    pub(crate) fn from_impl(inner: Arc<IdentityImpl>) -> Self {
        Self { inner: Some(inner) }
    }

    fn inner(&self) -> Result<&IdentityImpl> {
        self.inner.as_deref().ok_or(Error::InvalidHandle("identity"))
    }

    pub fn is_valid(&self) -> bool {
        self.inner.is_some()
    }

    pub fn name(&self) -> Result<&Name> {
        Ok(&self.inner()?.name)
    }

    /// Add a key, replacing a key with the same name
    ///
    /// `key_type` may be [`KeyType::None`] to take the type from the
    /// encoded key.
    pub fn add_key(&self, bits: &[u8], key_name: &Name, key_type: KeyType) -> Result<Key> {
        self.inner()?.add_key(bits, key_name, key_type)
    }

    /// Remove a key together with its certificates
    pub fn remove_key(&self, key_name: &Name) -> Result<()> {
        self.inner()?.remove_key(key_name)
    }

    pub fn key(&self, key_name: &Name) -> Result<Key> {
        self.inner()?.key(key_name)
    }

    /// Names of all keys of this identity
    pub fn key_names(&self) -> Result<Vec<Name>> {
        let inner = self.inner()?;
        inner.pib.keys_of_identity(&inner.name)
    }

    pub fn keys(&self) -> Result<Vec<Key>> {
        let inner = self.inner()?;
        self.key_names()?
            .iter()
            .map(|name| inner.key(name))
            .collect()
    }

    /// Mark an existing key as default
    pub fn set_default_key(&self, key_name: &Name) -> Result<Key> {
        let inner = self.inner()?;
        let key = inner.key(key_name)?;
        inner.pib.set_default_key_of_identity(&inner.name, key_name)?;
        debug!(identity = %inner.name, %key_name, "set default key");
        Ok(key)
    }

    /// Add a key if needed and mark it as default
    pub fn set_default_key_with(&self, bits: &[u8], key_name: &Name, key_type: KeyType) -> Result<Key> {
        let inner = self.inner()?;
        let key = inner.add_key(bits, key_name, key_type)?;
        inner.pib.set_default_key_of_identity(&inner.name, key_name)?;
        Ok(key)
    }

    pub fn default_key(&self) -> Result<Key> {
        let inner = self.inner()?;
        let key_name = inner.pib.default_key_of_identity(&inner.name)?;
        inner.key(&key_name)
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Eq for Identity {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::PibMemory;
    use ndn_types::ErrorKind;

    const EC_SPKI: &str = "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEPcX9XbordnLSHC1As45V+oPCqIa0\
                           9Ieofcx+0/5/Ke0Kf8jIYUD+uYX0whJJ0K4FLKcWuN3dJC11+AYP68iHIg==";

    fn ec_bits() -> Vec<u8> {
        ndn_crypto::decode_base64_text(EC_SPKI.as_bytes()).unwrap()
    }

    fn name(uri: &str) -> Name {
        uri.parse().unwrap()
    }

    fn identity() -> Identity {
        let pib: Arc<dyn PibImpl> = Arc::new(PibMemory::new());
        Identity::from_impl(Arc::new(IdentityImpl::create(&name("/alice"), pib).unwrap()))
    }

    #[test]
    fn test_invalid_identity() {
        let id = Identity::default();
        assert_eq!(id, Identity::default());
        assert_ne!(id, identity());
        assert!(matches!(id.name(), Err(Error::InvalidHandle("identity"))));
    }

    #[test]
    fn test_first_key_is_default() {
        let id = identity();
        assert_eq!(id.default_key().unwrap_err().kind(), ErrorKind::NotFound);
        let k1 = id.add_key(&ec_bits(), &name("/alice/KEY/1"), KeyType::None).unwrap();
        let k2 = id.add_key(&ec_bits(), &name("/alice/KEY/2"), KeyType::None).unwrap();
        assert_eq!(id.default_key().unwrap(), k1);
        assert_eq!(id.set_default_key(&name("/alice/KEY/2")).unwrap(), k2);
        assert_eq!(id.default_key().unwrap(), k2);
        assert_eq!(id.keys().unwrap(), vec![k1, k2]);
    }

    #[test]
    fn test_lookup_returns_equal_handles() {
        let id = identity();
        let added = id.add_key(&ec_bits(), &name("/alice/KEY/1"), KeyType::Ec).unwrap();
        assert_eq!(id.key(&name("/alice/KEY/1")).unwrap(), added);
        let again = id.add_key(&ec_bits(), &name("/alice/KEY/1"), KeyType::Ec).unwrap();
        assert_eq!(again, added);
    }

    #[test]
    fn test_remove_default_key_leaves_no_default() {
        let id = identity();
        let key_name = name("/alice/KEY/1");
        let key = id.set_default_key_with(&ec_bits(), &key_name, KeyType::Ec).unwrap();
        id.remove_key(&key_name).unwrap();
        assert_eq!(id.key(&key_name).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(key.public_key().unwrap_err().kind(), ErrorKind::NotFound);
        assert!(matches!(id.default_key(), Err(Error::NoDefaultKey(_))));
        assert!(matches!(
            id.set_default_key(&key_name),
            Err(Error::KeyNotFound(_))
        ));
    }

    #[test]
    fn test_wrong_owner() {
        let id = identity();
        let result = id.add_key(&ec_bits(), &name("/bob/KEY/1"), KeyType::Ec);
        assert!(matches!(result, Err(Error::WrongOwner { .. })));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Structural);
        assert!(matches!(
            id.key(&name("/alice/1")),
            Err(Error::InvalidKeyName(_))
        ));
    }
}
