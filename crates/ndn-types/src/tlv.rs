//! NDN-TLV encoding primitives
//!
//! Only the encoder side lives here: the security layer produces the
//! signed portion of packets it builds, but never parses foreign wire
//! encodings.

/// TLV type numbers used by the security layer
pub mod types {
    pub const INTEREST: u64 = 5;
    pub const DATA: u64 = 6;
    pub const NAME: u64 = 7;
    pub const GENERIC_NAME_COMPONENT: u64 = 8;
    pub const CAN_BE_PREFIX: u64 = 33;
    pub const MUST_BE_FRESH: u64 = 18;
    pub const INTEREST_LIFETIME: u64 = 12;
    pub const META_INFO: u64 = 20;
    pub const CONTENT: u64 = 21;
    pub const SIGNATURE_INFO: u64 = 22;
    pub const SIGNATURE_VALUE: u64 = 23;
    pub const CONTENT_TYPE: u64 = 24;
    pub const FRESHNESS_PERIOD: u64 = 25;
    pub const SIGNATURE_TYPE: u64 = 27;
    pub const KEY_LOCATOR: u64 = 28;
    pub const KEY_DIGEST: u64 = 29;
    pub const APPLICATION_PARAMETERS: u64 = 36;
    pub const INTEREST_SIGNATURE_INFO: u64 = 44;
    pub const INTEREST_SIGNATURE_VALUE: u64 = 46;
    pub const VALIDITY_PERIOD: u64 = 253;
    pub const NOT_BEFORE: u64 = 254;
    pub const NOT_AFTER: u64 = 255;
}

/// Append a TLV VAR-NUMBER
pub fn write_var_number(buf: &mut Vec<u8>, n: u64) {
    if n < 253 {
        buf.push(n as u8);
    } else if n <= u64::from(u16::MAX) {
        buf.push(253);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= u64::from(u32::MAX) {
        buf.push(254);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(255);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a NonNegativeInteger in its shortest form (1, 2, 4 or 8 bytes)
pub fn nonneg_integer(n: u64) -> Vec<u8> {
    if n <= u64::from(u8::MAX) {
        vec![n as u8]
    } else if n <= u64::from(u16::MAX) {
        (n as u16).to_be_bytes().to_vec()
    } else if n <= u64::from(u32::MAX) {
        (n as u32).to_be_bytes().to_vec()
    } else {
        n.to_be_bytes().to_vec()
    }
}

/// Append a complete TLV element
pub fn write_block(buf: &mut Vec<u8>, tlv_type: u64, value: &[u8]) {
    write_var_number(buf, tlv_type);
    write_var_number(buf, value.len() as u64);
    buf.extend_from_slice(value);
}

/// Encode a complete TLV element
pub fn block(tlv_type: u64, value: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(value.len() + 4);
    write_block(&mut buf, tlv_type, value);
    buf
}

/// Encode a TLV element holding a NonNegativeInteger
pub fn nonneg_integer_block(tlv_type: u64, n: u64) -> Vec<u8> {
    block(tlv_type, &nonneg_integer(n))
}
