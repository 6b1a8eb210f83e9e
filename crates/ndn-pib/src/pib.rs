//! The public information base

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use ndn_types::Name;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::identity::{Identity, IdentityImpl};
use crate::memory::PibMemory;
use crate::pib_impl::PibImpl;

/// Locator of the in-memory backend
pub const MEMORY_LOCATOR: &str = "pib-memory:";

/// Store of identities, keys and certificates
///
/// The storage backend is shared with every handle the PIB gives out.
#[derive(Debug)]
pub struct Pib {
    locator: String,
    storage: Arc<dyn PibImpl>,
    identities: Mutex<HashMap<Name, Arc<IdentityImpl>>>,
}

impl Pib {
    /// Wrap a storage backend
    pub fn new(locator: impl Into<String>, storage: Arc<dyn PibImpl>) -> Self {
        Self {
            locator: locator.into(),
            storage,
            identities: Mutex::new(HashMap::new()),
        }
    }

    /// A PIB backed by a fresh [`PibMemory`]
    pub fn in_memory() -> Self {
        Self::new(MEMORY_LOCATOR, Arc::new(PibMemory::new()))
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// The storage backend
    pub fn storage(&self) -> &Arc<dyn PibImpl> {
        &self.storage
    }

    fn cache(&self) -> Result<MutexGuard<'_, HashMap<Name, Arc<IdentityImpl>>>> {
        self.identities
            .lock()
            .map_err(|_| Error::Storage("Failed to acquire identity cache lock".to_string()))
    }

    pub fn tpm_locator(&self) -> Result<Option<String>> {
        self.storage.tpm_locator()
    }

    /// Pair the PIB with a signing module
    ///
    /// Switching to a different module drops every identity, since their
    /// keys live in the old module.
    pub fn set_tpm_locator(&self, locator: &str) -> Result<()> {
        if self.storage.tpm_locator()?.as_deref() == Some(locator) {
            return Ok(());
        }
        self.reset()?;
        self.storage.set_tpm_locator(Some(locator))?;
        info!(tpm_locator = locator, "paired PIB with signing module");
        Ok(())
    }

    /// Remove all identities and forget the signing module locator
    pub fn reset(&self) -> Result<()> {
        let mut cache = self.cache()?;
        self.storage.clear_identities()?;
        self.storage.set_tpm_locator(None)?;
        cache.clear();
        debug!(pib = %self.locator, "reset PIB");
        Ok(())
    }

    /// Add an identity, or return the existing one
    pub fn add_identity(&self, name: &Name) -> Result<Identity> {
        let mut cache = self.cache()?;
        let created = IdentityImpl::create(name, self.storage.clone())?;
        debug!(identity = %name, "added identity");
        let inner = cache
            .entry(name.clone())
            .or_insert_with(|| Arc::new(created))
            .clone();
        Ok(Identity::from_impl(inner))
    }

    /// Remove an identity together with its keys and certificates
    pub fn remove_identity(&self, name: &Name) -> Result<()> {
        let mut cache = self.cache()?;
        self.storage.remove_identity(name)?;
        cache.remove(name);
        debug!(identity = %name, "removed identity");
        Ok(())
    }

    pub fn identity(&self, name: &Name) -> Result<Identity> {
        let mut cache = self.cache()?;
        if !self.storage.has_identity(name)? {
            cache.remove(name);
            return Err(Error::IdentityNotFound(name.clone()));
        }
        let inner = match cache.get(name) {
            Some(inner) => inner.clone(),
            None => {
                let inner = Arc::new(IdentityImpl::open(name, self.storage.clone())?);
                cache.insert(name.clone(), inner.clone());
                inner
            }
        };
        Ok(Identity::from_impl(inner))
    }

    pub fn identity_names(&self) -> Result<Vec<Name>> {
        self.storage.identities()
    }

    pub fn identities(&self) -> Result<Vec<Identity>> {
        self.identity_names()?
            .iter()
            .map(|name| self.identity(name))
            .collect()
    }

    /// Mark an identity as default, adding it if absent
    pub fn set_default_identity(&self, name: &Name) -> Result<Identity> {
        let identity = self.add_identity(name)?;
        self.storage.set_default_identity(name)?;
        Ok(identity)
    }

    pub fn default_identity(&self) -> Result<Identity> {
        let name = self.storage.default_identity()?;
        self.identity(&name)
    }
}
