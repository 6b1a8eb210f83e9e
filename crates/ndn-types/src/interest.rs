//! Interest packets

use crate::error::{Error, Result};
use crate::name::Name;
use crate::packet::{SignedPacket, SignedRanges};
use crate::signature_info::SignatureInfo;
use crate::tlv::{self, types};
use std::time::Duration;

/// A request for named Data
///
/// A signed Interest covers its name components and everything from
/// ApplicationParameters through InterestSignatureInfo, so it always
/// carries an ApplicationParameters element (possibly empty) once signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interest {
    name: Name,
    can_be_prefix: bool,
    must_be_fresh: bool,
    lifetime: Option<Duration>,
    application_parameters: Option<Vec<u8>>,
    signature_info: Option<SignatureInfo>,
    signature_value: Option<Vec<u8>>,
}

impl Interest {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            can_be_prefix: false,
            must_be_fresh: false,
            lifetime: None,
            application_parameters: None,
            signature_info: None,
            signature_value: None,
        }
    }

    pub fn with_can_be_prefix(mut self, can_be_prefix: bool) -> Self {
        self.can_be_prefix = can_be_prefix;
        self
    }

    pub fn with_must_be_fresh(mut self, must_be_fresh: bool) -> Self {
        self.must_be_fresh = must_be_fresh;
        self
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    pub fn with_application_parameters(mut self, parameters: impl Into<Vec<u8>>) -> Self {
        self.application_parameters = Some(parameters.into());
        self
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn can_be_prefix(&self) -> bool {
        self.can_be_prefix
    }

    pub fn must_be_fresh(&self) -> bool {
        self.must_be_fresh
    }

    pub fn lifetime(&self) -> Option<Duration> {
        self.lifetime
    }

    pub fn application_parameters(&self) -> Option<&[u8]> {
        self.application_parameters.as_deref()
    }

    /// Attach signature info, adding empty ApplicationParameters if absent
    pub fn set_signature_info(&mut self, info: SignatureInfo) {
        if self.application_parameters.is_none() {
            self.application_parameters = Some(Vec::new());
        }
        self.signature_info = Some(info);
        self.signature_value = None;
    }

    pub fn set_signature_value(&mut self, value: Vec<u8>) {
        self.signature_value = Some(value);
    }

    /// ApplicationParameters followed by InterestSignatureInfo
    fn encode_parameters_and_info(&self) -> Result<Vec<u8>> {
        let info = self
            .signature_info
            .as_ref()
            .ok_or_else(|| Error::MissingField("InterestSignatureInfo".to_string()))?;
        let params = self.application_parameters.as_deref().unwrap_or_default();
        let mut buf = tlv::block(types::APPLICATION_PARAMETERS, params);
        buf.extend_from_slice(&info.encode(types::INTEREST_SIGNATURE_INFO));
        Ok(buf)
    }

    /// Encode the complete Interest TLV
    pub fn wire_encode(&self) -> Vec<u8> {
        let mut inner = self.name.encode();
        if self.can_be_prefix {
            tlv::write_block(&mut inner, types::CAN_BE_PREFIX, &[]);
        }
        if self.must_be_fresh {
            tlv::write_block(&mut inner, types::MUST_BE_FRESH, &[]);
        }
        if let Some(lifetime) = self.lifetime {
            inner.extend_from_slice(&tlv::nonneg_integer_block(
                types::INTEREST_LIFETIME,
                lifetime.as_millis() as u64,
            ));
        }
        match self.encode_parameters_and_info() {
            Ok(signed) => {
                inner.extend_from_slice(&signed);
                if let Some(value) = &self.signature_value {
                    tlv::write_block(&mut inner, types::INTEREST_SIGNATURE_VALUE, value);
                }
            }
            Err(_) => {
                if let Some(params) = &self.application_parameters {
                    tlv::write_block(&mut inner, types::APPLICATION_PARAMETERS, params);
                }
            }
        }
        tlv::block(types::INTEREST, &inner)
    }
}

impl SignedPacket for Interest {
    fn signature_info(&self) -> Option<&SignatureInfo> {
        self.signature_info.as_ref()
    }

    fn signature_value(&self) -> Option<&[u8]> {
        self.signature_value.as_deref()
    }

    fn signed_ranges(&self) -> Result<SignedRanges> {
        let tail = self.encode_parameters_and_info()?;
        Ok(SignedRanges::new(vec![self.name.encode_components(), tail]))
    }
}
