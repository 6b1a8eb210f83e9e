//! SubjectPublicKeyInfo parsing and key type resolution

use crate::error::{Error, Result};
use const_oid::db::rfc5912::{ID_EC_PUBLIC_KEY, RSA_ENCRYPTION, SECP_256_R_1, SECP_384_R_1, SECP_521_R_1};
use const_oid::ObjectIdentifier;
use der::asn1::UintRef;
use der::{Decode, Sequence, Tag, Tagged};
use ndn_types::KeyType;
use spki::SubjectPublicKeyInfoRef;

/// Curve OID of the SM2 elliptic curve
pub const SM2_CURVE: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.156.10197.1.301");

/// Elliptic curves recognized in public keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcCurve {
    P256,
    P384,
    P521,
    Sm2,
}

impl EcCurve {
    /// Field size in bits
    pub fn bits(&self) -> usize {
        match self {
            EcCurve::P256 | EcCurve::Sm2 => 256,
            EcCurve::P384 => 384,
            EcCurve::P521 => 521,
        }
    }

    /// Named-curve OID
    pub fn oid(&self) -> ObjectIdentifier {
        match self {
            EcCurve::P256 => SECP_256_R_1,
            EcCurve::P384 => SECP_384_R_1,
            EcCurve::P521 => SECP_521_R_1,
            EcCurve::Sm2 => SM2_CURVE,
        }
    }

    /// Look up a named curve by OID
    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        [EcCurve::P256, EcCurve::P384, EcCurve::P521, EcCurve::Sm2]
            .into_iter()
            .find(|curve| curve.oid() == *oid)
    }

    /// Infer a NIST curve from an encoded point (compressed or uncompressed)
    ///
    /// Used for keys that spell out their domain parameters instead of
    /// naming the curve.
    pub fn from_point_len(len: usize) -> Option<Self> {
        match len {
            33 | 65 => Some(EcCurve::P256),
            49 | 97 => Some(EcCurve::P384),
            67 | 133 => Some(EcCurve::P521),
            _ => None,
        }
    }
}

/// Merge the coarse family id and the fine algorithm id of a key
///
/// The provider reports SM2 keys as plain EC; only the curve tells them
/// apart.
pub fn resolve_key_type(coarse: &ObjectIdentifier, fine: Option<&ObjectIdentifier>) -> KeyType {
    if *coarse == RSA_ENCRYPTION {
        KeyType::Rsa
    } else if *coarse == ID_EC_PUBLIC_KEY {
        if fine == Some(&SM2_CURVE) {
            KeyType::EcAlt
        } else {
            KeyType::Ec
        }
    } else {
        KeyType::None
    }
}

#[derive(Sequence)]
struct RsaPublicKey<'a> {
    modulus: UintRef<'a>,
    #[allow(dead_code)]
    public_exponent: UintRef<'a>,
}

/// A decoded SubjectPublicKeyInfo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    der: Vec<u8>,
    key_type: KeyType,
    curve: Option<EcCurve>,
    public_bytes: Vec<u8>,
    bits: usize,
}

impl KeyInfo {
    /// Parse a DER-encoded SubjectPublicKeyInfo
    ///
    /// Keys of unknown families load with [`KeyType::None`] and a size of 0.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let spki = SubjectPublicKeyInfoRef::from_der(der)
            .map_err(|e| Error::InvalidKeyFormat(format!("not a SubjectPublicKeyInfo: {}", e)))?;
        let public_bytes = spki
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| Error::InvalidKeyFormat("public key has unused bits".to_string()))?
            .to_vec();

        let coarse = spki.algorithm.oid;
        let params = spki.algorithm.parameters;
        let fine = match params {
            Some(any) if any.tag() == Tag::ObjectIdentifier => {
                Some(any.decode_as::<ObjectIdentifier>()?)
            }
            _ => None,
        };
        let key_type = resolve_key_type(&coarse, fine.as_ref());

        let (curve, bits) = match key_type {
            KeyType::Rsa => (None, rsa_modulus_bits(&public_bytes)?),
            KeyType::Ec | KeyType::EcAlt => {
                let curve = match &fine {
                    Some(oid) => EcCurve::from_oid(oid).ok_or_else(|| {
                        Error::UnsupportedAlgorithm(format!("unknown EC curve {}", oid))
                    })?,
                    // explicit domain parameters
                    None => EcCurve::from_point_len(public_bytes.len()).ok_or_else(|| {
                        Error::InvalidKeyFormat(format!(
                            "cannot infer curve from a {}-byte point",
                            public_bytes.len()
                        ))
                    })?,
                };
                (Some(curve), curve.bits())
            }
            _ => (None, 0),
        };

        Ok(Self {
            der: der.to_vec(),
            key_type,
            curve,
            public_bytes,
            bits,
        })
    }

    /// The encoded SubjectPublicKeyInfo this key was loaded from
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn curve(&self) -> Option<EcCurve> {
        self.curve
    }

    /// Contents of the subjectPublicKey BIT STRING
    ///
    /// PKCS#1 RSAPublicKey for RSA, the encoded point for EC.
    pub fn public_bytes(&self) -> &[u8] {
        &self.public_bytes
    }

    /// Key size in bits
    pub fn bits(&self) -> usize {
        self.bits
    }
}

fn rsa_modulus_bits(pkcs1: &[u8]) -> Result<usize> {
    let key = RsaPublicKey::from_der(pkcs1)
        .map_err(|e| Error::InvalidKeyFormat(format!("bad RSA public key: {}", e)))?;
    let modulus = key.modulus.as_bytes();
    match modulus.first() {
        Some(&top) => Ok(modulus.len() * 8 - top.leading_zeros() as usize),
        None => Err(Error::InvalidKeyFormat("RSA modulus is zero".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_key_type() {
        assert_eq!(resolve_key_type(&RSA_ENCRYPTION, None), KeyType::Rsa);
        assert_eq!(
            resolve_key_type(&ID_EC_PUBLIC_KEY, Some(&SECP_256_R_1)),
            KeyType::Ec
        );
        assert_eq!(
            resolve_key_type(&ID_EC_PUBLIC_KEY, Some(&SM2_CURVE)),
            KeyType::EcAlt
        );
        assert_eq!(resolve_key_type(&ID_EC_PUBLIC_KEY, None), KeyType::Ec);
        // fine id alone never makes a key EC-ALT
        assert_eq!(resolve_key_type(&RSA_ENCRYPTION, Some(&SM2_CURVE)), KeyType::Rsa);
        assert_eq!(resolve_key_type(&SECP_256_R_1, None), KeyType::None);
    }

    #[test]
    fn test_curve_lookup() {
        assert_eq!(EcCurve::from_oid(&SECP_384_R_1), Some(EcCurve::P384));
        assert_eq!(EcCurve::from_oid(&SM2_CURVE), Some(EcCurve::Sm2));
        assert_eq!(EcCurve::from_oid(&RSA_ENCRYPTION), None);
        assert_eq!(EcCurve::from_point_len(65), Some(EcCurve::P256));
        assert_eq!(EcCurve::from_point_len(64), None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(KeyInfo::from_der(b"not a key").is_err());
        assert!(KeyInfo::from_der(&[]).is_err());
    }
}
