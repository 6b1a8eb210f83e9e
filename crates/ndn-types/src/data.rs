//! Data packets

use crate::error::{Error, Result};
use crate::name::Name;
use crate::packet::{SignedPacket, SignedRanges};
use crate::signature_info::SignatureInfo;
use crate::tlv::{self, types};
use std::time::Duration;

/// Kind of payload carried by a Data packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
    /// Opaque application payload
    #[default]
    Blob,
    /// Link object
    Link,
    /// Public key (certificates)
    Key,
    /// Application-level negative acknowledgement
    Nack,
}

impl ContentType {
    /// Get the TLV code of this content type
    pub fn code(&self) -> u64 {
        match self {
            ContentType::Blob => 0,
            ContentType::Link => 1,
            ContentType::Key => 2,
            ContentType::Nack => 3,
        }
    }
}

/// A named, signed, immutable piece of content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data {
    name: Name,
    content_type: ContentType,
    freshness_period: Option<Duration>,
    content: Vec<u8>,
    signature_info: Option<SignatureInfo>,
    signature_value: Option<Vec<u8>>,
}

impl Data {
    /// Create an unsigned Data packet with empty content
    pub fn new(name: Name) -> Self {
        Self {
            name,
            content_type: ContentType::Blob,
            freshness_period: None,
            content: Vec::new(),
            signature_info: None,
            signature_value: None,
        }
    }

    /// Set the content
    pub fn with_content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the content type
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// Set the freshness period
    pub fn with_freshness_period(mut self, period: Duration) -> Self {
        self.freshness_period = Some(period);
        self
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn freshness_period(&self) -> Option<Duration> {
        self.freshness_period
    }

    /// Replace the signature info
    ///
    /// Any previous signature value no longer matches the signed portion and
    /// is dropped.
    pub fn set_signature_info(&mut self, info: SignatureInfo) {
        self.signature_info = Some(info);
        self.signature_value = None;
    }

    /// Set the signature value
    pub fn set_signature_value(&mut self, value: Vec<u8>) {
        self.signature_value = Some(value);
    }

    fn encode_meta_info(&self) -> Vec<u8> {
        let mut value = Vec::new();
        if self.content_type != ContentType::Blob {
            value.extend_from_slice(&tlv::nonneg_integer_block(
                types::CONTENT_TYPE,
                self.content_type.code(),
            ));
        }
        if let Some(period) = self.freshness_period {
            value.extend_from_slice(&tlv::nonneg_integer_block(
                types::FRESHNESS_PERIOD,
                period.as_millis() as u64,
            ));
        }
        tlv::block(types::META_INFO, &value)
    }

    fn encode_signed_portion(&self) -> Result<Vec<u8>> {
        let info = self
            .signature_info
            .as_ref()
            .ok_or_else(|| Error::MissingField("SignatureInfo".to_string()))?;
        let mut buf = self.name.encode();
        buf.extend_from_slice(&self.encode_meta_info());
        buf.extend_from_slice(&tlv::block(types::CONTENT, &self.content));
        buf.extend_from_slice(&info.encode(types::SIGNATURE_INFO));
        Ok(buf)
    }

    /// Encode the complete Data TLV
    pub fn wire_encode(&self) -> Result<Vec<u8>> {
        let value = self
            .signature_value
            .as_ref()
            .ok_or_else(|| Error::MissingField("SignatureValue".to_string()))?;
        let mut inner = self.encode_signed_portion()?;
        tlv::write_block(&mut inner, types::SIGNATURE_VALUE, value);
        Ok(tlv::block(types::DATA, &inner))
    }
}

impl SignedPacket for Data {
    fn signature_info(&self) -> Option<&SignatureInfo> {
        self.signature_info.as_ref()
    }

    fn signature_value(&self) -> Option<&[u8]> {
        self.signature_value.as_deref()
    }

    fn signed_ranges(&self) -> Result<SignedRanges> {
        Ok(SignedRanges::new(vec![self.encode_signed_portion()?]))
    }
}
