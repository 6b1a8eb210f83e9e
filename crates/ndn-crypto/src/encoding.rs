//! Public key encodings
//!
//! Keys are exchanged as DER SubjectPublicKeyInfo or as its base64 text.
//! The text form is wrapped at 64 characters with every line, including
//! the last, ending in a newline.

use crate::error::{Error, Result};
use crate::key_info::EcCurve;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use const_oid::db::rfc5912::{ID_EC_PUBLIC_KEY, RSA_ENCRYPTION};
use der::asn1::{BitString, Null};
use der::{Any, Encode};
use spki::{AlgorithmIdentifier, SubjectPublicKeyInfo};

const BASE64_LINE_LEN: usize = 64;

/// Encoding of a public key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEncoding {
    /// DER SubjectPublicKeyInfo
    #[default]
    Der,
    /// Base64 text of the DER form
    Base64,
}

/// Encode bytes as line-wrapped base64 text
pub fn encode_base64_text(bytes: &[u8]) -> String {
    let encoded = STANDARD.encode(bytes);
    let mut out = String::with_capacity(encoded.len() + encoded.len() / BASE64_LINE_LEN + 1);
    for line in encoded.as_bytes().chunks(BASE64_LINE_LEN) {
        // base64 output is ASCII
        out.push_str(&String::from_utf8_lossy(line));
        out.push('\n');
    }
    out
}

/// Decode base64 text, ignoring whitespace
pub fn decode_base64_text(text: &[u8]) -> Result<Vec<u8>> {
    let compact: Vec<u8> = text
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    Ok(STANDARD.decode(compact)?)
}

/// Build a SubjectPublicKeyInfo for an RSA key from its PKCS#1 encoding
pub fn rsa_spki_der(pkcs1: &[u8]) -> Result<Vec<u8>> {
    let alg_id = AlgorithmIdentifier {
        oid: RSA_ENCRYPTION,
        parameters: Some(Any::encode_from(&Null)?),
    };
    encode_spki(alg_id, pkcs1)
}

/// Build a SubjectPublicKeyInfo for an EC key on a named curve
pub fn ec_spki_der(curve: EcCurve, point: &[u8]) -> Result<Vec<u8>> {
    let alg_id = AlgorithmIdentifier {
        oid: ID_EC_PUBLIC_KEY,
        parameters: Some(Any::encode_from(&curve.oid())?),
    };
    encode_spki(alg_id, point)
}

fn encode_spki(algorithm: AlgorithmIdentifier<Any>, key: &[u8]) -> Result<Vec<u8>> {
    let spki = SubjectPublicKeyInfo {
        algorithm,
        subject_public_key: BitString::from_bytes(key)?,
    };
    spki.to_der().map_err(|e| Error::Der(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_info::KeyInfo;
    use ndn_types::KeyType;

    #[test]
    fn test_base64_text_wraps_every_line() {
        let text = encode_base64_text(&[0u8; 60]);
        let lines: Vec<&str> = text.split_terminator('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 64);
        assert!(text.ends_with('\n'));
        assert_eq!(decode_base64_text(text.as_bytes()).unwrap(), vec![0u8; 60]);
    }

    #[test]
    fn test_decode_ignores_whitespace() {
        assert_eq!(decode_base64_text(b" aGVs\r\nbG8=\n").unwrap(), b"hello");
        assert!(decode_base64_text(b"***").is_err());
    }

    #[test]
    fn test_ec_spki_round_trip() {
        let mut point = vec![0x04u8];
        point.extend_from_slice(&[7u8; 64]);
        let der = ec_spki_der(EcCurve::P256, &point).unwrap();
        let info = KeyInfo::from_der(&der).unwrap();
        assert_eq!(info.key_type(), KeyType::Ec);
        assert_eq!(info.curve(), Some(EcCurve::P256));
        assert_eq!(info.public_bytes(), &point[..]);

        let der = ec_spki_der(EcCurve::Sm2, &point).unwrap();
        assert_eq!(KeyInfo::from_der(&der).unwrap().key_type(), KeyType::EcAlt);
    }
}
