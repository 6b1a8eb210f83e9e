//! Signing packets and issuing certificates with module-held keys

use chrono::Utc;
use ndn_pib::Certificate;
use ndn_types::{
    Component, Data, Interest, KeyLocator, Name, SignatureInfo, SignatureType, SignedPacket,
    ValidityPeriod,
};
use tracing::debug;

use crate::error::{Error, Result};
use crate::module::SigningModule;

/// Issuer id of self-signed certificates
pub const SELF_ISSUER: &str = "self";

/// Signature info naming `key_name` with the signature type its family uses
pub fn signature_info_for(module: &dyn SigningModule, key_name: &Name) -> Result<SignatureInfo> {
    let key_type = module.key_type(key_name)?;
    let signature_type = SignatureType::for_key_type(key_type).ok_or(Error::Crypto(
        ndn_crypto::Error::UnsupportedKeyType {
            key_type,
            operation: "packet signing",
        },
    ))?;
    Ok(SignatureInfo::new(signature_type).with_key_locator(KeyLocator::Name(key_name.clone())))
}

/// Sign a Data packet with `info`, replacing any previous signature
pub fn sign_data(
    module: &dyn SigningModule,
    data: &mut Data,
    key_name: &Name,
    info: SignatureInfo,
) -> Result<()> {
    let digest = info.signature_type().digest_algorithm();
    data.set_signature_info(info);
    let ranges = data.signed_ranges()?;
    let signature = module.sign(ranges.buffers(), key_name, digest)?;
    data.set_signature_value(signature);
    debug!(name = %data.name(), %key_name, "signed data");
    Ok(())
}

/// Sign an Interest with `info`, replacing any previous signature
pub fn sign_interest(
    module: &dyn SigningModule,
    interest: &mut Interest,
    key_name: &Name,
    info: SignatureInfo,
) -> Result<()> {
    let digest = info.signature_type().digest_algorithm();
    interest.set_signature_info(info);
    let ranges = interest.signed_ranges()?;
    let signature = module.sign(ranges.buffers(), key_name, digest)?;
    interest.set_signature_value(signature);
    debug!(name = %interest.name(), %key_name, "signed interest");
    Ok(())
}

/// Issue a certificate for `subject_key`, signed by `issuer_key`
///
/// Both keys must live in `module`. The version is the issuance time in
/// milliseconds since the Unix epoch.
pub fn issue_certificate(
    module: &dyn SigningModule,
    subject_key: &Name,
    issuer_key: &Name,
    issuer_id: impl Into<Component>,
    validity: ValidityPeriod,
) -> Result<Certificate> {
    let public_key = module.public_key(subject_key)?;
    let info = signature_info_for(module, issuer_key)?.with_validity_period(validity);
    let version = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let mut data = Certificate::unsigned(subject_key, issuer_id, version, &public_key, info.clone())?;
    sign_data(module, &mut data, issuer_key, info)?;
    Ok(Certificate::from_data(data)?)
}

/// Issue a self-signed certificate for `key_name`
pub fn self_sign(
    module: &dyn SigningModule,
    key_name: &Name,
    validity: ValidityPeriod,
) -> Result<Certificate> {
    issue_certificate(module, key_name, key_name, SELF_ISSUER, validity)
}
