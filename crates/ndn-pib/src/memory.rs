use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use ndn_types::{KeyType, Name};
use tracing::{debug, warn};

use crate::certificate::Certificate;
use crate::error::{Error, Result};
use crate::key::checked_key_type;
use crate::pib_impl::PibImpl;

#[derive(Debug, Clone)]
struct KeyRecord {
    identity: Name,
    bits: Vec<u8>,
    key_type: KeyType,
}

#[derive(Debug, Default)]
struct State {
    tpm_locator: Option<String>,
    identities: BTreeSet<Name>,
    default_identity: Option<Name>,
    keys: BTreeMap<Name, KeyRecord>,
    default_keys: HashMap<Name, Name>,
    certificates: BTreeMap<Name, Certificate>,
    default_certificates: HashMap<Name, Name>,
}

impl State {
    fn add_identity(&mut self, identity: &Name) {
        if self.identities.insert(identity.clone()) {
            debug!(%identity, "added identity");
        }
        if self.default_identity.is_none() {
            self.default_identity = Some(identity.clone());
        }
    }

    fn remove_identity(&mut self, identity: &Name) {
        self.identities.remove(identity);
        if self.default_identity.as_ref() == Some(identity) {
            warn!(%identity, "removed the default identity");
            self.default_identity = None;
        }
        let keys: Vec<Name> = self
            .keys
            .iter()
            .filter(|(_, record)| record.identity == *identity)
            .map(|(name, _)| name.clone())
            .collect();
        for key_name in &keys {
            self.remove_key(key_name);
        }
        self.default_keys.remove(identity);
    }

    fn add_key(&mut self, identity: &Name, key_name: &Name, bits: &[u8], key_type: KeyType) {
        self.add_identity(identity);
        self.keys.insert(
            key_name.clone(),
            KeyRecord {
                identity: identity.clone(),
                bits: bits.to_vec(),
                key_type,
            },
        );
        debug!(%key_name, %key_type, "stored key");
        self.default_keys
            .entry(identity.clone())
            .or_insert_with(|| key_name.clone());
    }

    fn remove_key(&mut self, key_name: &Name) {
        if let Some(record) = self.keys.remove(key_name) {
            if self.default_keys.get(&record.identity) == Some(key_name) {
                warn!(%key_name, "removed the default key");
                self.default_keys.remove(&record.identity);
            }
        }
        self.certificates
            .retain(|_, cert| cert.key_name() != *key_name);
        self.default_certificates.remove(key_name);
    }
}

/// In-memory PIB backend
///
/// All state sits behind one lock, so cascading updates are atomic with
/// respect to other threads.
#[derive(Debug, Default)]
pub struct PibMemory {
    state: RwLock<State>,
}

impl PibMemory {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| Error::Storage("Failed to acquire read lock".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| Error::Storage("Failed to acquire write lock".to_string()))
    }
}

impl PibImpl for PibMemory {
    fn tpm_locator(&self) -> Result<Option<String>> {
        Ok(self.read()?.tpm_locator.clone())
    }

    fn set_tpm_locator(&self, locator: Option<&str>) -> Result<()> {
        self.write()?.tpm_locator = locator.map(str::to_string);
        Ok(())
    }

    fn has_identity(&self, identity: &Name) -> Result<bool> {
        Ok(self.read()?.identities.contains(identity))
    }

    fn add_identity(&self, identity: &Name) -> Result<()> {
        self.write()?.add_identity(identity);
        Ok(())
    }

    fn remove_identity(&self, identity: &Name) -> Result<()> {
        self.write()?.remove_identity(identity);
        Ok(())
    }

    fn clear_identities(&self) -> Result<()> {
        let mut state = self.write()?;
        state.identities.clear();
        state.default_identity = None;
        state.keys.clear();
        state.default_keys.clear();
        state.certificates.clear();
        state.default_certificates.clear();
        debug!("cleared all identities");
        Ok(())
    }

    fn identities(&self) -> Result<Vec<Name>> {
        Ok(self.read()?.identities.iter().cloned().collect())
    }

    fn set_default_identity(&self, identity: &Name) -> Result<()> {
        let mut state = self.write()?;
        state.add_identity(identity);
        state.default_identity = Some(identity.clone());
        debug!(%identity, "set default identity");
        Ok(())
    }

    fn default_identity(&self) -> Result<Name> {
        self.read()?
            .default_identity
            .clone()
            .ok_or(Error::NoDefaultIdentity)
    }

    fn has_key(&self, key_name: &Name) -> Result<bool> {
        Ok(self.read()?.keys.contains_key(key_name))
    }

    fn add_key(
        &self,
        identity: &Name,
        key_name: &Name,
        key_bits: &[u8],
        key_type: KeyType,
    ) -> Result<()> {
        self.write()?.add_key(identity, key_name, key_bits, key_type);
        Ok(())
    }

    fn remove_key(&self, key_name: &Name) -> Result<()> {
        self.write()?.remove_key(key_name);
        Ok(())
    }

    fn key_bits(&self, key_name: &Name) -> Result<Vec<u8>> {
        self.read()?
            .keys
            .get(key_name)
            .map(|record| record.bits.clone())
            .ok_or_else(|| Error::KeyNotFound(key_name.clone()))
    }

    fn key_type(&self, key_name: &Name) -> Result<KeyType> {
        self.read()?
            .keys
            .get(key_name)
            .map(|record| record.key_type)
            .ok_or_else(|| Error::KeyNotFound(key_name.clone()))
    }

    fn keys_of_identity(&self, identity: &Name) -> Result<Vec<Name>> {
        Ok(self
            .read()?
            .keys
            .iter()
            .filter(|(_, record)| record.identity == *identity)
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn set_default_key_of_identity(&self, identity: &Name, key_name: &Name) -> Result<()> {
        let mut state = self.write()?;
        if !state.keys.contains_key(key_name) {
            return Err(Error::KeyNotFound(key_name.clone()));
        }
        state
            .default_keys
            .insert(identity.clone(), key_name.clone());
        debug!(%identity, %key_name, "set default key");
        Ok(())
    }

    fn default_key_of_identity(&self, identity: &Name) -> Result<Name> {
        let state = self.read()?;
        if !state.identities.contains(identity) {
            return Err(Error::IdentityNotFound(identity.clone()));
        }
        state
            .default_keys
            .get(identity)
            .cloned()
            .ok_or_else(|| Error::NoDefaultKey(identity.clone()))
    }

    fn has_certificate(&self, cert_name: &Name) -> Result<bool> {
        Ok(self.read()?.certificates.contains_key(cert_name))
    }

    fn add_certificate(&self, certificate: &Certificate) -> Result<()> {
        let key_name = certificate.key_name();
        let identity = certificate.identity();
        let mut state = self.write()?;
        if !state.keys.contains_key(&key_name) {
            let key_type = checked_key_type(&key_name, certificate.public_key(), KeyType::None)?;
            state.add_key(&identity, &key_name, certificate.public_key(), key_type);
        }
        let cert_name = certificate.name().clone();
        state
            .certificates
            .insert(cert_name.clone(), certificate.clone());
        debug!(%cert_name, "stored certificate");
        state.default_certificates.entry(key_name).or_insert(cert_name);
        Ok(())
    }

    fn remove_certificate(&self, cert_name: &Name) -> Result<()> {
        let mut state = self.write()?;
        state.certificates.remove(cert_name);
        let key_name = cert_name.prefix(-2);
        if state.default_certificates.get(&key_name) == Some(cert_name) {
            warn!(%cert_name, "removed the default certificate");
            state.default_certificates.remove(&key_name);
        }
        Ok(())
    }

    fn certificate(&self, cert_name: &Name) -> Result<Certificate> {
        self.read()?
            .certificates
            .get(cert_name)
            .cloned()
            .ok_or_else(|| Error::CertificateNotFound(cert_name.clone()))
    }

    fn certificates_of_key(&self, key_name: &Name) -> Result<Vec<Name>> {
        Ok(self
            .read()?
            .certificates
            .values()
            .filter(|cert| cert.key_name() == *key_name)
            .map(|cert| cert.name().clone())
            .collect())
    }

    fn set_default_certificate_of_key(&self, key_name: &Name, cert_name: &Name) -> Result<()> {
        let mut state = self.write()?;
        if !state.certificates.contains_key(cert_name) {
            return Err(Error::CertificateNotFound(cert_name.clone()));
        }
        state
            .default_certificates
            .insert(key_name.clone(), cert_name.clone());
        debug!(%key_name, %cert_name, "set default certificate");
        Ok(())
    }

    fn default_certificate_of_key(&self, key_name: &Name) -> Result<Certificate> {
        let state = self.read()?;
        if !state.keys.contains_key(key_name) {
            return Err(Error::KeyNotFound(key_name.clone()));
        }
        let cert_name = state
            .default_certificates
            .get(key_name)
            .ok_or_else(|| Error::NoDefaultCertificate(key_name.clone()))?;
        state
            .certificates
            .get(cert_name)
            .cloned()
            .ok_or_else(|| Error::CertificateNotFound(cert_name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::construct_key_name;
    use ndn_types::ErrorKind;

    const EC_SPKI: &str = "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEPcX9XbordnLSHC1As45V+oPCqIa0\
                           9Ieofcx+0/5/Ke0Kf8jIYUD+uYX0whJJ0K4FLKcWuN3dJC11+AYP68iHIg==";

    fn name(uri: &str) -> Name {
        uri.parse().unwrap()
    }

    fn spki() -> Vec<u8> {
        ndn_crypto::decode_base64_text(EC_SPKI.as_bytes()).unwrap()
    }

    #[test]
    fn test_first_identity_becomes_default() {
        let pib = PibMemory::new();
        assert_eq!(pib.default_identity().unwrap_err().kind(), ErrorKind::NotFound);
        pib.add_identity(&name("/a")).unwrap();
        pib.add_identity(&name("/b")).unwrap();
        assert_eq!(pib.default_identity().unwrap(), name("/a"));
        pib.set_default_identity(&name("/c")).unwrap();
        assert!(pib.has_identity(&name("/c")).unwrap());
        assert_eq!(pib.identities().unwrap().len(), 3);
    }

    #[test]
    fn test_add_key_adds_identity_and_default() {
        let pib = PibMemory::new();
        let id = name("/a");
        let k1 = construct_key_name(&id, "1");
        let k2 = construct_key_name(&id, "2");
        pib.add_key(&id, &k1, &spki(), KeyType::Ec).unwrap();
        pib.add_key(&id, &k2, &spki(), KeyType::Ec).unwrap();
        assert!(pib.has_identity(&id).unwrap());
        assert_eq!(pib.default_key_of_identity(&id).unwrap(), k1);
        assert_eq!(pib.keys_of_identity(&id).unwrap(), vec![k1.clone(), k2.clone()]);

        pib.set_default_key_of_identity(&id, &k2).unwrap();
        pib.remove_key(&k2).unwrap();
        assert!(matches!(
            pib.default_key_of_identity(&id),
            Err(Error::NoDefaultKey(_))
        ));
        assert!(matches!(
            pib.set_default_key_of_identity(&id, &k2),
            Err(Error::KeyNotFound(_))
        ));
    }

    #[test]
    fn test_upsert_overwrites_key() {
        let pib = PibMemory::new();
        let id = name("/a");
        let key = construct_key_name(&id, "1");
        pib.add_key(&id, &key, b"old", KeyType::Rsa).unwrap();
        pib.add_key(&id, &key, &spki(), KeyType::Ec).unwrap();
        assert_eq!(pib.key_bits(&key).unwrap(), spki());
        assert_eq!(pib.key_type(&key).unwrap(), KeyType::Ec);
        assert_eq!(pib.keys_of_identity(&id).unwrap().len(), 1);
    }

    #[test]
    fn test_remove_identity_cascades() {
        let pib = PibMemory::new();
        let id = name("/a");
        let key = construct_key_name(&id, "1");
        pib.add_key(&id, &key, &spki(), KeyType::Ec).unwrap();
        pib.remove_identity(&id).unwrap();
        assert!(!pib.has_identity(&id).unwrap());
        assert!(!pib.has_key(&key).unwrap());
        assert!(matches!(pib.default_identity(), Err(Error::NoDefaultIdentity)));
        assert!(matches!(
            pib.default_key_of_identity(&id),
            Err(Error::IdentityNotFound(_))
        ));
    }

    #[test]
    fn test_tpm_locator() {
        let pib = PibMemory::new();
        assert_eq!(pib.tpm_locator().unwrap(), None);
        pib.set_tpm_locator(Some("tpm-memory:")).unwrap();
        assert_eq!(pib.tpm_locator().unwrap().as_deref(), Some("tpm-memory:"));
    }
}
