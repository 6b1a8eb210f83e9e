//! Public key objects

use crate::encoding::{decode_base64_text, encode_base64_text, KeyEncoding};
use crate::error::{Error, Result};
use crate::handle::{ByteStream, KeyContext};
use crate::key_info::{EcCurve, KeyInfo};
use ndn_types::{DigestAlgorithm, InputBuffers, KeyType};
use std::io::{Read, Write};
use tracing::debug;

/// Upper bound on a DER key read from a stream
const MAX_KEY_DER_LEN: usize = 64 * 1024;

/// A decoded public key
///
/// A new object holds no key; verify, encrypt and save fail until a load
/// succeeds. Loading replaces any key already held, and a failed load
/// leaves the object empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicKey {
    key: Option<KeyInfo>,
}

impl PublicKey {
    /// Create an empty public key object
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a public key from DER SubjectPublicKeyInfo
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let mut key = Self::new();
        key.load(der, KeyEncoding::Der)?;
        Ok(key)
    }

    /// Load a key from a buffer
    pub fn load(&mut self, input: &[u8], encoding: KeyEncoding) -> Result<()> {
        self.key = None;
        let info = match encoding {
            KeyEncoding::Der => KeyInfo::from_der(input)?,
            KeyEncoding::Base64 => KeyInfo::from_der(&decode_base64_text(input)?)?,
        };
        debug!(
            key_type = %info.key_type(),
            bits = info.bits(),
            "loaded public key"
        );
        self.key = Some(info);
        Ok(())
    }

    /// Load DER SubjectPublicKeyInfo
    pub fn load_pkcs8(&mut self, der: &[u8]) -> Result<()> {
        self.load(der, KeyEncoding::Der)
    }

    /// Load base64 text of a DER SubjectPublicKeyInfo
    pub fn load_pkcs8_base64(&mut self, text: &[u8]) -> Result<()> {
        self.load(text, KeyEncoding::Base64)
    }

    /// Load a key from a stream
    ///
    /// In DER form exactly one element is consumed; base64 text is read to
    /// the end of the stream.
    pub fn load_from_reader<R: Read>(&mut self, reader: R, encoding: KeyEncoding) -> Result<()> {
        self.key = None;
        let mut stream = ByteStream::new(reader);
        let bytes = match encoding {
            KeyEncoding::Der => read_der_element(&mut stream)?,
            KeyEncoding::Base64 => {
                let mut text = Vec::new();
                if !stream.read_to_end(&mut text) {
                    return Err(Error::ShortTransfer("reading base64 key text".to_string()));
                }
                text
            }
        };
        self.load(&bytes, encoding)
    }

    /// Encode the key
    ///
    /// The DER form is the exact encoding the key was loaded from.
    pub fn save(&self, encoding: KeyEncoding) -> Result<Vec<u8>> {
        let key = self.key_info()?;
        Ok(match encoding {
            KeyEncoding::Der => key.der().to_vec(),
            KeyEncoding::Base64 => encode_base64_text(key.der()).into_bytes(),
        })
    }

    /// Encode as DER SubjectPublicKeyInfo
    pub fn save_pkcs8(&self) -> Result<Vec<u8>> {
        self.save(KeyEncoding::Der)
    }

    /// Encode as line-wrapped base64 text
    pub fn save_pkcs8_base64(&self) -> Result<String> {
        Ok(encode_base64_text(self.key_info()?.der()))
    }

    /// Write the encoded key to a sink
    pub fn save_to_writer<W: Write>(&self, writer: W, encoding: KeyEncoding) -> Result<()> {
        let bytes = self.save(encoding)?;
        let mut stream = ByteStream::new(writer);
        if stream.write(&bytes) {
            Ok(())
        } else {
            Err(Error::ShortTransfer(format!(
                "writing {} bytes of encoded key",
                bytes.len()
            )))
        }
    }

    /// Whether a key is loaded
    pub fn is_loaded(&self) -> bool {
        self.key.is_some()
    }

    /// Key family, or [`KeyType::None`] when empty or unrecognized
    pub fn key_type(&self) -> KeyType {
        self.key.as_ref().map_or(KeyType::None, KeyInfo::key_type)
    }

    /// Key size in bits, 0 when empty or unrecognized
    pub fn key_size(&self) -> usize {
        self.key.as_ref().map_or(0, KeyInfo::bits)
    }

    /// Curve of an EC or EC-ALT key
    pub fn curve(&self) -> Option<EcCurve> {
        self.key.as_ref().and_then(KeyInfo::curve)
    }

    /// The decoded key
    pub fn key_info(&self) -> Result<&KeyInfo> {
        self.key.as_ref().ok_or(Error::NoKey)
    }

    /// Verify a signature over the concatenation of `input`
    ///
    /// The digest is SHA-256, or SM3 for EC-ALT keys.
    pub fn verify<'a>(&self, input: impl Into<InputBuffers<'a>>, signature: &[u8]) -> Result<bool> {
        let digest = match self.key_type() {
            KeyType::EcAlt => DigestAlgorithm::Sm3,
            _ => DigestAlgorithm::Sha256,
        };
        self.verify_with_digest(input, signature, digest)
    }

    /// Verify a signature computed with an explicit digest algorithm
    pub fn verify_with_digest<'a>(
        &self,
        input: impl Into<InputBuffers<'a>>,
        signature: &[u8],
        digest: DigestAlgorithm,
    ) -> Result<bool> {
        let ctx = KeyContext::from_key(self.key_info()?)?;
        let input: InputBuffers<'a> = input.into();
        ctx.verify(digest, &input.to_vec(), signature)
    }

    /// Encrypt `plain` for the holder of the private key
    ///
    /// Only RSA keys can encrypt. `key_type_hint` tells EC-ALT apart from EC
    /// when the caller knows better than the encoding.
    pub fn encrypt(&self, plain: &[u8], key_type_hint: KeyType) -> Result<Vec<u8>> {
        let key = self.key_info()?;
        let key_type = match (key.key_type(), key_type_hint) {
            (KeyType::Ec, KeyType::EcAlt) => KeyType::EcAlt,
            (actual, _) => actual,
        };
        match key_type {
            KeyType::Rsa => KeyContext::from_key(key)?.encrypt(plain),
            other => Err(Error::UnsupportedKeyType {
                key_type: other,
                operation: "encryption",
            }),
        }
    }
}

/// Read one complete DER TLV element
fn read_der_element<R: Read>(stream: &mut ByteStream<R>) -> Result<Vec<u8>> {
    let mut header = [0u8; 2];
    if !stream.read(&mut header) {
        return Err(Error::ShortTransfer("reading DER header".to_string()));
    }
    let mut element = header.to_vec();
    let content_len = match header[1] {
        short if short < 0x80 => usize::from(short),
        0x80 => {
            return Err(Error::InvalidKeyFormat(
                "indefinite-length DER is not allowed".to_string(),
            ))
        }
        long => {
            let count = usize::from(long & 0x7f);
            if count > 4 {
                return Err(Error::InvalidKeyFormat(format!(
                    "DER length of {} bytes is too large",
                    count
                )));
            }
            let mut len_bytes = vec![0u8; count];
            if !stream.read(&mut len_bytes) {
                return Err(Error::ShortTransfer("reading DER length".to_string()));
            }
            element.extend_from_slice(&len_bytes);
            len_bytes
                .iter()
                .fold(0usize, |acc, &b| (acc << 8) | usize::from(b))
        }
    };
    if content_len > MAX_KEY_DER_LEN {
        return Err(Error::InvalidKeyFormat(format!(
            "DER element of {} bytes exceeds the key size limit",
            content_len
        )));
    }
    let start = element.len();
    element.resize(start + content_len, 0);
    if !stream.read(&mut element[start..]) {
        return Err(Error::ShortTransfer(format!(
            "reading {} bytes of DER content",
            content_len
        )));
    }
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndn_types::ErrorKind;

    const EC_SPKI: &str = "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEPcX9XbordnLSHC1As45V+oPCqIa0\n\
                           9Ieofcx+0/5/Ke0Kf8jIYUD+uYX0whJJ0K4FLKcWuN3dJC11+AYP68iHIg==\n";

    #[test]
    fn test_empty_key_fails_everything() {
        let key = PublicKey::new();
        assert!(!key.is_loaded());
        assert_eq!(key.key_type(), KeyType::None);
        assert_eq!(key.key_size(), 0);
        assert!(matches!(key.save_pkcs8(), Err(Error::NoKey)));
        assert!(matches!(key.verify(b"msg", b"sig"), Err(Error::NoKey)));
        assert!(matches!(key.encrypt(b"msg", KeyType::Rsa), Err(Error::NoKey)));
        assert_eq!(key.verify(b"msg", b"sig").unwrap_err().kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_failed_load_leaves_key_empty() {
        let mut key = PublicKey::new();
        key.load_pkcs8_base64(EC_SPKI.as_bytes()).unwrap();
        assert!(key.is_loaded());
        assert!(key.load_pkcs8(b"\x30\x03\x02\x01\x00").is_err());
        assert!(!key.is_loaded());
    }

    #[test]
    fn test_read_der_element_stops_at_element_end() {
        let der = decode_base64_text(EC_SPKI.as_bytes()).unwrap();
        let mut input = der.clone();
        input.extend_from_slice(b"trailing");
        let mut reader = &input[..];
        let mut key = PublicKey::new();
        key.load_from_reader(&mut reader, KeyEncoding::Der).unwrap();
        assert_eq!(key.save_pkcs8().unwrap(), der);
        assert_eq!(reader, b"trailing");
    }

    #[test]
    fn test_read_der_element_truncated() {
        let der = decode_base64_text(EC_SPKI.as_bytes()).unwrap();
        let mut key = PublicKey::new();
        let err = key
            .load_from_reader(&der[..der.len() - 1], KeyEncoding::Der)
            .unwrap_err();
        assert!(matches!(err, Error::ShortTransfer(_)));
    }
}
