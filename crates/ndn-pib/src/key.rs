//! Key handles

use std::sync::Arc;

use ndn_crypto::PublicKey;
use ndn_types::{KeyType, Name};
use tracing::debug;

use crate::certificate::Certificate;
use crate::error::{Error, Result};
use crate::naming::{extract_identity_from_key_name, extract_key_name_from_cert_name};
use crate::pib_impl::PibImpl;

/// Decide the stored type of a key from its encoded bits and a caller hint
///
/// The bits must decode as a SubjectPublicKeyInfo. An EC-ALT hint upgrades
/// an EC key, a NONE hint takes the decoded type, and a hint that contradicts
/// the decoded family is rejected.
pub(crate) fn checked_key_type(key_name: &Name, bits: &[u8], hint: KeyType) -> Result<KeyType> {
    let decoded = PublicKey::from_der(bits)
        .map_err(|_| Error::InvalidKeyBits(key_name.clone()))?
        .key_type();
    match (hint, decoded) {
        (KeyType::None, decoded) => Ok(decoded),
        (hint, KeyType::None) => Ok(hint),
        (KeyType::EcAlt, KeyType::Ec) | (KeyType::Ec, KeyType::EcAlt) => Ok(KeyType::EcAlt),
        (hint, decoded) if hint == decoded => Ok(hint),
        _ => Err(Error::InvalidKeyBits(key_name.clone())),
    }
}

#[derive(Debug)]
pub(crate) struct KeyImpl {
    identity: Name,
    key_name: Name,
    pib: Arc<dyn PibImpl>,
}

impl KeyImpl {
    /// Store a key and return its implementation object
    pub(crate) fn create(
        key_name: &Name,
        bits: &[u8],
        key_type: KeyType,
        pib: Arc<dyn PibImpl>,
    ) -> Result<Self> {
        let identity = extract_identity_from_key_name(key_name)?;
        let key_type = checked_key_type(key_name, bits, key_type)?;
        pib.add_key(&identity, key_name, bits, key_type)?;
        debug!(%key_name, %key_type, "added key");
        Ok(Self {
            identity,
            key_name: key_name.clone(),
            pib,
        })
    }

    /// Open a stored key
    pub(crate) fn open(key_name: &Name, pib: Arc<dyn PibImpl>) -> Result<Self> {
        let identity = extract_identity_from_key_name(key_name)?;
        if !pib.has_key(key_name)? {
            return Err(Error::KeyNotFound(key_name.clone()));
        }
        Ok(Self {
            identity,
            key_name: key_name.clone(),
            pib,
        })
    }

    fn check_owner(&self, cert_name: &Name) -> Result<()> {
        let owner = extract_key_name_from_cert_name(cert_name)?;
        if owner != self.key_name {
            return Err(Error::WrongOwner {
                name: cert_name.clone(),
                owner: self.key_name.clone(),
            });
        }
        Ok(())
    }

    fn add_certificate(&self, certificate: &Certificate) -> Result<()> {
        self.check_owner(certificate.name())?;
        self.pib.add_certificate(certificate)?;
        debug!(cert_name = %certificate.name(), "added certificate");
        Ok(())
    }

    fn remove_certificate(&self, cert_name: &Name) -> Result<()> {
        self.check_owner(cert_name)?;
        self.pib.remove_certificate(cert_name)?;
        debug!(%cert_name, "removed certificate");
        Ok(())
    }

    fn certificate(&self, cert_name: &Name) -> Result<Certificate> {
        self.check_owner(cert_name)?;
        self.pib.certificate(cert_name)
    }

    fn set_default_certificate(&self, cert_name: &Name) -> Result<Certificate> {
        self.check_owner(cert_name)?;
        self.pib
            .set_default_certificate_of_key(&self.key_name, cert_name)?;
        self.pib.certificate(cert_name)
    }
}

/// Handle to a key stored in a PIB
///
/// Handles sharing one implementation object compare equal. A
/// default-constructed handle is invalid: it equals only other invalid
/// handles and every operation on it fails.
#[derive(Debug, Clone, Default)]
pub struct Key {
    inner: Option<Arc<KeyImpl>>,
}

impl Key {
    pub(crate) fn from_impl(inner: Arc<KeyImpl>) -> Self {
        Self { inner: Some(inner) }
    }

    fn inner(&self) -> Result<&KeyImpl> {
        self.inner.as_deref().ok_or(Error::InvalidHandle("key"))
    }

    /// Whether the handle refers to a key
    pub fn is_valid(&self) -> bool {
        self.inner.is_some()
    }

    pub fn name(&self) -> Result<&Name> {
        Ok(&self.inner()?.key_name)
    }

    /// Name of the owning identity
    pub fn identity(&self) -> Result<&Name> {
        Ok(&self.inner()?.identity)
    }

    pub fn key_type(&self) -> Result<KeyType> {
        let inner = self.inner()?;
        inner.pib.key_type(&inner.key_name)
    }

    /// DER SubjectPublicKeyInfo of the key
    pub fn public_key(&self) -> Result<Vec<u8>> {
        let inner = self.inner()?;
        inner.pib.key_bits(&inner.key_name)
    }

    /// Decode the stored public key
    pub fn public_key_object(&self) -> Result<PublicKey> {
        Ok(PublicKey::from_der(&self.public_key()?)?)
    }

    /// Add a certificate of this key, replacing one with the same name
    pub fn add_certificate(&self, certificate: &Certificate) -> Result<()> {
        self.inner()?.add_certificate(certificate)
    }

    pub fn remove_certificate(&self, cert_name: &Name) -> Result<()> {
        self.inner()?.remove_certificate(cert_name)
    }

    pub fn certificate(&self, cert_name: &Name) -> Result<Certificate> {
        self.inner()?.certificate(cert_name)
    }

    /// Names of all certificates of this key
    pub fn certificate_names(&self) -> Result<Vec<Name>> {
        let inner = self.inner()?;
        inner.pib.certificates_of_key(&inner.key_name)
    }

    pub fn certificates(&self) -> Result<Vec<Certificate>> {
        let inner = self.inner()?;
        self.certificate_names()?
            .iter()
            .map(|name| inner.pib.certificate(name))
            .collect()
    }

    /// Mark an existing certificate as default
    pub fn set_default_certificate(&self, cert_name: &Name) -> Result<Certificate> {
        self.inner()?.set_default_certificate(cert_name)
    }

    /// Add a certificate if needed and mark it as default
    pub fn set_default_certificate_with(&self, certificate: &Certificate) -> Result<Certificate> {
        let inner = self.inner()?;
        inner.add_certificate(certificate)?;
        inner.set_default_certificate(certificate.name())
    }

    pub fn default_certificate(&self) -> Result<Certificate> {
        let inner = self.inner()?;
        inner.pib.default_certificate_of_key(&inner.key_name)
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Eq for Key {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::PibMemory;
    use ndn_types::ErrorKind;
    use rstest::rstest;

    const EC_SPKI: &str = "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEPcX9XbordnLSHC1As45V+oPCqIa0\
                           9Ieofcx+0/5/Ke0Kf8jIYUD+uYX0whJJ0K4FLKcWuN3dJC11+AYP68iHIg==";

    fn ec_bits() -> Vec<u8> {
        ndn_crypto::decode_base64_text(EC_SPKI.as_bytes()).unwrap()
    }

    fn key_name() -> Name {
        "/alice/KEY/k1".parse().unwrap()
    }

    #[rstest]
    #[case(KeyType::None, Some(KeyType::Ec))]
    #[case(KeyType::Ec, Some(KeyType::Ec))]
    #[case(KeyType::EcAlt, Some(KeyType::EcAlt))]
    #[case(KeyType::Rsa, None)]
    fn test_checked_key_type(#[case] hint: KeyType, #[case] expected: Option<KeyType>) {
        let result = checked_key_type(&key_name(), &ec_bits(), hint);
        assert_eq!(result.ok(), expected);
    }

    #[test]
    fn test_checked_key_type_rejects_garbage() {
        assert!(matches!(
            checked_key_type(&key_name(), b"not a key", KeyType::None),
            Err(Error::InvalidKeyBits(_))
        ));
    }

    #[test]
    fn test_invalid_handle() {
        let key = Key::default();
        assert!(!key.is_valid());
        assert_eq!(key, Key::default());
        assert!(matches!(key.name(), Err(Error::InvalidHandle("key"))));
        assert_eq!(key.public_key().unwrap_err().kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_create_and_read_back() {
        let pib: Arc<dyn PibImpl> = Arc::new(PibMemory::new());
        let key = Key::from_impl(Arc::new(
            KeyImpl::create(&key_name(), &ec_bits(), KeyType::None, pib.clone()).unwrap(),
        ));
        assert_eq!(key.identity().unwrap().to_uri(), "/alice");
        assert_eq!(key.key_type().unwrap(), KeyType::Ec);
        assert_eq!(key.public_key().unwrap(), ec_bits());
        assert!(pib.has_identity(&"/alice".parse().unwrap()).unwrap());
        assert!(matches!(
            key.default_certificate(),
            Err(Error::NoDefaultCertificate(_))
        ));

        let other = Key::from_impl(Arc::new(KeyImpl::open(&key_name(), pib.clone()).unwrap()));
        assert_ne!(key, other);

        pib.remove_key(&key_name()).unwrap();
        assert_eq!(key.public_key().unwrap_err().kind(), ErrorKind::NotFound);
        assert!(matches!(
            KeyImpl::open(&key_name(), pib),
            Err(Error::KeyNotFound(_))
        ));
    }

    #[test]
    fn test_rejects_foreign_certificate_name() {
        let pib: Arc<dyn PibImpl> = Arc::new(PibMemory::new());
        let key = Key::from_impl(Arc::new(
            KeyImpl::create(&key_name(), &ec_bits(), KeyType::Ec, pib).unwrap(),
        ));
        let foreign: Name = "/bob/KEY/k1/self/v".parse().unwrap();
        assert!(matches!(
            key.certificate(&foreign),
            Err(Error::WrongOwner { .. })
        ));
        assert!(matches!(
            key.remove_certificate(&"/alice/KEY/k1".parse().unwrap()),
            Err(Error::InvalidCertificateName(_))
        ));
    }
}
