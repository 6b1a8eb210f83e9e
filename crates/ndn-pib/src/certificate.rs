//! Certificates
//!
//! A certificate is a Data packet whose name follows the certificate naming
//! convention, whose content type is KEY and whose content is the DER
//! SubjectPublicKeyInfo of the certified key. The validity period travels
//! in the SignatureInfo.

use crate::error::{Error, Result};
use crate::naming::{
    construct_certificate_name, extract_identity_from_cert_name, extract_key_name_from_cert_name,
    is_valid_certificate_name, is_valid_key_name,
};
use chrono::{DateTime, Utc};
use ndn_crypto::PublicKey;
use ndn_types::{
    Component, ContentType, Data, Name, SignatureInfo, SignedPacket, SignedRanges, ValidityPeriod,
};

/// A signed binding of a key name to a public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    data: Data,
    validity: ValidityPeriod,
}

impl Certificate {
    /// Prepare the unsigned Data packet of a new certificate
    ///
    /// The caller signs it and passes the result to [`Certificate::from_data`].
    /// `signature_info` must carry a validity period.
    pub fn unsigned(
        key_name: &Name,
        issuer_id: impl Into<Component>,
        version: u64,
        public_key: &[u8],
        signature_info: SignatureInfo,
    ) -> Result<Data> {
        if !is_valid_key_name(key_name) {
            return Err(Error::InvalidKeyName(key_name.clone()));
        }
        if signature_info.validity_period().is_none() {
            return Err(Error::InvalidCertificate(
                "signature info has no validity period".to_string(),
            ));
        }
        let name = construct_certificate_name(key_name, issuer_id, version);
        let mut data = Data::new(name)
            .with_content_type(ContentType::Key)
            .with_content(public_key.to_vec());
        data.set_signature_info(signature_info);
        Ok(data)
    }

    /// Wrap a signed Data packet, checking that it is a certificate
    pub fn from_data(data: Data) -> Result<Self> {
        if !is_valid_certificate_name(data.name()) {
            return Err(Error::InvalidCertificateName(data.name().clone()));
        }
        if data.content_type() != ContentType::Key {
            return Err(Error::InvalidCertificate(format!(
                "content type of `{}` is not KEY",
                data.name()
            )));
        }
        if data.content().is_empty() {
            return Err(Error::InvalidCertificate(format!(
                "`{}` carries no public key",
                data.name()
            )));
        }
        let info = data.signature_info().ok_or_else(|| {
            Error::InvalidCertificate(format!("`{}` is not signed", data.name()))
        })?;
        let validity = *info.validity_period().ok_or_else(|| {
            Error::InvalidCertificate(format!("`{}` has no validity period", data.name()))
        })?;
        if data.signature_value().is_none() {
            return Err(Error::InvalidCertificate(format!(
                "`{}` has no signature value",
                data.name()
            )));
        }
        Ok(Self { data, validity })
    }

    pub fn name(&self) -> &Name {
        self.data.name()
    }

    /// Name of the certified key
    pub fn key_name(&self) -> Name {
        // the name was checked on construction
        self.name().prefix(-2)
    }

    /// Identity owning the certified key
    pub fn identity(&self) -> Name {
        self.name().prefix(-4)
    }

    pub fn key_id(&self) -> &Component {
        &self.name().components()[self.name().len() - 3]
    }

    pub fn issuer_id(&self) -> &Component {
        &self.name().components()[self.name().len() - 2]
    }

    /// Version number, if the last component is a version component
    pub fn version(&self) -> Option<u64> {
        self.name().get(-1).and_then(Component::as_version)
    }

    /// DER SubjectPublicKeyInfo of the certified key
    pub fn public_key(&self) -> &[u8] {
        self.data.content()
    }

    /// Decode the certified key
    pub fn public_key_object(&self) -> Result<PublicKey> {
        Ok(PublicKey::from_der(self.public_key())?)
    }

    pub fn validity_period(&self) -> &ValidityPeriod {
        &self.validity
    }

    /// Whether `time` falls inside the validity period
    pub fn is_valid_at(&self, time: DateTime<Utc>) -> bool {
        self.validity_period().is_valid_at(time)
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    /// Key name encoded in an arbitrary certificate name
    pub fn key_name_of(cert_name: &Name) -> Result<Name> {
        extract_key_name_from_cert_name(cert_name)
    }

    /// Identity encoded in an arbitrary certificate name
    pub fn identity_of(cert_name: &Name) -> Result<Name> {
        extract_identity_from_cert_name(cert_name)
    }
}

impl SignedPacket for Certificate {
    fn signature_info(&self) -> Option<&SignatureInfo> {
        self.data.signature_info()
    }

    fn signature_value(&self) -> Option<&[u8]> {
        self.data.signature_value()
    }

    fn signed_ranges(&self) -> ndn_types::Result<SignedRanges> {
        self.data.signed_ranges()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use ndn_types::{KeyLocator, SignatureType};

    fn signed_info() -> SignatureInfo {
        SignatureInfo::new(SignatureType::Sha256WithEcdsa)
            .with_key_locator(KeyLocator::Name("/issuer/KEY/1".parse().unwrap()))
            .with_validity_period(ValidityPeriod::from_now(Duration::days(1)).unwrap())
    }

    fn make_cert() -> Certificate {
        let key_name: Name = "/alice/KEY/k1".parse().unwrap();
        let mut data = Certificate::unsigned(&key_name, "self", 3, b"spki", signed_info()).unwrap();
        data.set_signature_value(vec![0xAA; 8]);
        Certificate::from_data(data).unwrap()
    }

    #[test]
    fn test_accessors() {
        let cert = make_cert();
        assert_eq!(cert.key_name().to_uri(), "/alice/KEY/k1");
        assert_eq!(cert.identity().to_uri(), "/alice");
        assert_eq!(cert.key_id().as_bytes(), b"k1");
        assert_eq!(cert.issuer_id().as_bytes(), b"self");
        assert_eq!(cert.version(), Some(3));
        assert_eq!(cert.public_key(), b"spki");
        assert!(cert.is_valid_at(Utc::now()));
        assert!(!cert.is_valid_at(Utc::now() + Duration::days(2)));
        assert_eq!(
            Certificate::key_name_of(cert.name()).unwrap(),
            cert.key_name()
        );
        assert_eq!(Certificate::identity_of(cert.name()).unwrap(), cert.identity());
    }

    #[test]
    fn test_unsigned_requires_validity() {
        let key_name: Name = "/alice/KEY/k1".parse().unwrap();
        let info = SignatureInfo::new(SignatureType::Sha256WithEcdsa);
        assert!(Certificate::unsigned(&key_name, "self", 1, b"spki", info).is_err());
        let bad_key: Name = "/alice/k1".parse().unwrap();
        assert!(Certificate::unsigned(&bad_key, "self", 1, b"spki", signed_info()).is_err());
    }

    #[test]
    fn test_from_data_checks() {
        let key_name: Name = "/alice/KEY/k1".parse().unwrap();
        let unsigned = Certificate::unsigned(&key_name, "self", 1, b"spki", signed_info()).unwrap();
        assert!(Certificate::from_data(unsigned).is_err());

        let mut blob = Data::new("/alice/KEY/k1/self/v".parse().unwrap()).with_content(b"spki".to_vec());
        blob.set_signature_info(signed_info());
        blob.set_signature_value(vec![1]);
        assert!(matches!(
            Certificate::from_data(blob),
            Err(Error::InvalidCertificate(_))
        ));

        let mut misnamed = Data::new("/alice/k1".parse().unwrap())
            .with_content_type(ContentType::Key)
            .with_content(b"spki".to_vec());
        misnamed.set_signature_info(signed_info());
        misnamed.set_signature_value(vec![1]);
        assert!(matches!(
            Certificate::from_data(misnamed),
            Err(Error::InvalidCertificateName(_))
        ));
    }

    #[test]
    fn test_signed_ranges_match_data() {
        let cert = make_cert();
        assert_eq!(
            cert.signed_ranges().unwrap(),
            cert.data().signed_ranges().unwrap()
        );
    }
}
