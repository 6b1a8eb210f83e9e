//! Storage backend interface for the PIB

use crate::certificate::Certificate;
use crate::error::Result;
use ndn_types::{KeyType, Name};

/// Storage backend for identities, keys and certificates
///
/// The backend is the single source of truth: entity handles hold names
/// only and query it on every access. Implementations keep these rules:
///
/// - the first identity, key of an identity, or certificate of a key that
///   is added becomes the default at its level;
/// - adding a key adds its identity, adding a certificate adds its key and
///   identity;
/// - adding an existing entry overwrites it in place;
/// - removal cascades downwards and clears a default that pointed at the
///   removed entry.
pub trait PibImpl: Send + Sync + std::fmt::Debug {
    /// Locator of the signing module paired with this store
    fn tpm_locator(&self) -> Result<Option<String>>;

    fn set_tpm_locator(&self, locator: Option<&str>) -> Result<()>;

    fn has_identity(&self, identity: &Name) -> Result<bool>;

    fn add_identity(&self, identity: &Name) -> Result<()>;

    fn remove_identity(&self, identity: &Name) -> Result<()>;

    /// Remove every identity together with its keys and certificates
    fn clear_identities(&self) -> Result<()>;

    fn identities(&self) -> Result<Vec<Name>>;

    /// Mark an identity as default, adding it if absent
    fn set_default_identity(&self, identity: &Name) -> Result<()>;

    fn default_identity(&self) -> Result<Name>;

    fn has_key(&self, key_name: &Name) -> Result<bool>;

    fn add_key(&self, identity: &Name, key_name: &Name, key_bits: &[u8], key_type: KeyType)
        -> Result<()>;

    fn remove_key(&self, key_name: &Name) -> Result<()>;

    /// Encoded public key of a stored key
    fn key_bits(&self, key_name: &Name) -> Result<Vec<u8>>;

    fn key_type(&self, key_name: &Name) -> Result<KeyType>;

    fn keys_of_identity(&self, identity: &Name) -> Result<Vec<Name>>;

    /// Mark an existing key as the identity's default
    fn set_default_key_of_identity(&self, identity: &Name, key_name: &Name) -> Result<()>;

    fn default_key_of_identity(&self, identity: &Name) -> Result<Name>;

    fn has_certificate(&self, cert_name: &Name) -> Result<bool>;

    fn add_certificate(&self, certificate: &Certificate) -> Result<()>;

    fn remove_certificate(&self, cert_name: &Name) -> Result<()>;

    fn certificate(&self, cert_name: &Name) -> Result<Certificate>;

    fn certificates_of_key(&self, key_name: &Name) -> Result<Vec<Name>>;

    /// Mark an existing certificate as the key's default
    fn set_default_certificate_of_key(&self, key_name: &Name, cert_name: &Name) -> Result<()>;

    fn default_certificate_of_key(&self, key_name: &Name) -> Result<Certificate>;
}
