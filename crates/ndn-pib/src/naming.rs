//! Key and certificate naming conventions
//!
//! Key names look like `/<identity>/KEY/<key-id>` and certificate names like
//! `/<identity>/KEY/<key-id>/<issuer-id>/<version>`.

use crate::error::{Error, Result};
use ndn_types::{Component, Name};

/// The component separating an identity from its key id
pub const KEY_COMPONENT: &str = "KEY";

const MIN_KEY_NAME_LEN: usize = 2;
const MIN_CERT_NAME_LEN: usize = 4;

fn is_key_component(component: Option<&Component>) -> bool {
    component.is_some_and(|c| c.as_bytes() == KEY_COMPONENT.as_bytes())
}

/// Build `/<identity>/KEY/<key-id>`
pub fn construct_key_name(identity: &Name, key_id: impl Into<Component>) -> Name {
    identity.clone().append(KEY_COMPONENT).append(key_id)
}

/// Build `/<key-name>/<issuer-id>/<version>`
pub fn construct_certificate_name(key_name: &Name, issuer_id: impl Into<Component>, version: u64) -> Name {
    key_name
        .clone()
        .append(issuer_id)
        .append(Component::from_version(version))
}

pub fn is_valid_key_name(name: &Name) -> bool {
    name.len() >= MIN_KEY_NAME_LEN && is_key_component(name.get(-2))
}

pub fn is_valid_certificate_name(name: &Name) -> bool {
    name.len() >= MIN_CERT_NAME_LEN && is_key_component(name.get(-4))
}

/// Identity part of a key name
pub fn extract_identity_from_key_name(key_name: &Name) -> Result<Name> {
    if !is_valid_key_name(key_name) {
        return Err(Error::InvalidKeyName(key_name.clone()));
    }
    Ok(key_name.prefix(-2))
}

/// Key name part of a certificate name
pub fn extract_key_name_from_cert_name(cert_name: &Name) -> Result<Name> {
    if !is_valid_certificate_name(cert_name) {
        return Err(Error::InvalidCertificateName(cert_name.clone()));
    }
    Ok(cert_name.prefix(-2))
}

/// Identity part of a certificate name
pub fn extract_identity_from_cert_name(cert_name: &Name) -> Result<Name> {
    if !is_valid_certificate_name(cert_name) {
        return Err(Error::InvalidCertificateName(cert_name.clone()));
    }
    Ok(cert_name.prefix(-4))
}
