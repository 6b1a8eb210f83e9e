//! Signature metadata: signature type, key locator and validity period

use crate::algorithm::SignatureType;
use crate::error::{Error, Result};
use crate::name::Name;
use crate::tlv::{self, types};
use chrono::{DateTime, Duration, SubsecRound, Utc};

/// Timestamp format used by NotBefore/NotAfter
const VALIDITY_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Pointer to the key that produced a signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyLocator {
    /// Name of the key or certificate
    Name(Name),
    /// SHA-256 digest of the key
    KeyDigest(Vec<u8>),
}

impl KeyLocator {
    /// Encode as a KeyLocator TLV
    pub fn encode(&self) -> Vec<u8> {
        let inner = match self {
            KeyLocator::Name(name) => name.encode(),
            KeyLocator::KeyDigest(digest) => tlv::block(types::KEY_DIGEST, digest),
        };
        tlv::block(types::KEY_LOCATOR, &inner)
    }
}

/// Time interval during which a certificate is valid
///
/// Both ends are inclusive and stored with one-second precision, matching
/// the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityPeriod {
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
}

impl ValidityPeriod {
    /// Create a validity period
    pub fn new(not_before: DateTime<Utc>, not_after: DateTime<Utc>) -> Result<Self> {
        let not_before = not_before.trunc_subsecs(0);
        let not_after = not_after.trunc_subsecs(0);
        if not_before > not_after {
            return Err(Error::InvalidValidityPeriod(format!(
                "not_before {} is after not_after {}",
                not_before, not_after
            )));
        }
        Ok(Self {
            not_before,
            not_after,
        })
    }

    /// Create a period starting now and lasting `duration`
    pub fn from_now(duration: Duration) -> Result<Self> {
        let now = Utc::now();
        Self::new(now, now + duration)
    }

    /// Start of the period
    pub fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    /// End of the period
    pub fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }

    /// Check whether `time` falls inside the period
    pub fn is_valid_at(&self, time: DateTime<Utc>) -> bool {
        self.not_before <= time && time <= self.not_after
    }

    /// Encode as a ValidityPeriod TLV
    pub fn encode(&self) -> Vec<u8> {
        let mut value = Vec::new();
        tlv::write_block(
            &mut value,
            types::NOT_BEFORE,
            self.not_before
                .format(VALIDITY_TIME_FORMAT)
                .to_string()
                .as_bytes(),
        );
        tlv::write_block(
            &mut value,
            types::NOT_AFTER,
            self.not_after
                .format(VALIDITY_TIME_FORMAT)
                .to_string()
                .as_bytes(),
        );
        tlv::block(types::VALIDITY_PERIOD, &value)
    }
}

/// Signature metadata attached to a signed packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureInfo {
    signature_type: SignatureType,
    key_locator: Option<KeyLocator>,
    validity_period: Option<ValidityPeriod>,
}

impl SignatureInfo {
    /// Create signature info with only a signature type
    pub fn new(signature_type: SignatureType) -> Self {
        Self {
            signature_type,
            key_locator: None,
            validity_period: None,
        }
    }

    /// Set the key locator
    pub fn with_key_locator(mut self, key_locator: KeyLocator) -> Self {
        self.key_locator = Some(key_locator);
        self
    }

    /// Set the validity period
    pub fn with_validity_period(mut self, validity_period: ValidityPeriod) -> Self {
        self.validity_period = Some(validity_period);
        self
    }

    pub fn signature_type(&self) -> SignatureType {
        self.signature_type
    }

    pub fn key_locator(&self) -> Option<&KeyLocator> {
        self.key_locator.as_ref()
    }

    pub fn validity_period(&self) -> Option<&ValidityPeriod> {
        self.validity_period.as_ref()
    }

    /// Encode with the given outer type (SignatureInfo or InterestSignatureInfo)
    pub fn encode(&self, outer_type: u64) -> Vec<u8> {
        let mut value = tlv::nonneg_integer_block(types::SIGNATURE_TYPE, self.signature_type.code());
        if let Some(locator) = &self.key_locator {
            value.extend_from_slice(&locator.encode());
        }
        if let Some(period) = &self.validity_period {
            value.extend_from_slice(&period.encode());
        }
        tlv::block(outer_type, &value)
    }
}
