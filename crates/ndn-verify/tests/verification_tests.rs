//! Verification over every key reference shape

use chrono::Duration;
use ndn_crypto::{decode_base64_text, EcCurve, KeyParams, PublicKey};
use ndn_pib::{Certificate, Key, Pib};
use ndn_tpm::{self_sign, sign_data, sign_interest, signature_info_for, MemoryModule, SigningModule};
use ndn_types::{
    Data, DigestAlgorithm, ErrorKind, InputBuffers, Interest, KeyLocator, KeyType, Name,
    SignatureInfo, SignatureType, SignedPacket, ValidityPeriod,
};
use ndn_verify::{
    verify_data, verify_data_digest, verify_digest, verify_interest, verify_interest_digest,
    verify_signature, Error, KeyRef, Verifier, VerifierConfig,
};
use rstest::{fixture, rstest};

const MESSAGE: &[u8] = b"hello ndn";

const RSA_PRIVATE: &str = "MIIEvQIBADANBgkqhkiG9w0BAQEFAASCBKcwggSjAgEAAoIBAQDAyciExr/arvoA\
kLHYk/wO/qPK2fkg3y/32OxGSfi7Y7z8nCDbWJm8DaQzI9oku4EAAdyZP0Pk7tk4\
SckzSSqRbeiQD6cQmeZ0OPWI0TTwPZfV/Wo1d9ltRwrvN4pVe1terEjzY5x+GC0p\
qyxpWAaSFZrLaqT0gTK5PGImLqhQdfRVo3U+qH0siLBFMBKzp4jcIJhixRPKTg+z\
SRRZ0ZeQiNBYTklL6vabAUKrN3n6paNyVyQEvSGFz5wjL/g2yXwKrJUYXPTEWxpx\
OIjivikMOQnGYn5LFDFNKVUsyFFQ/uLGadE4wpRR/9cAaAmEdmDwmlcp+EgznAld\
bJAcRAydAgMBAAECggEACLxsEXY3Jef1bLah1HxaOOy5i9zmQOLUN+E0zbeW5Zju\
rKy/gWkJqF+e3/FhNnZnsVIkRq56+2IGZlpTm3cWjnoCRprq+WHb80rMd4txYGyO\
F5SQ7kTUzbKhMHdeFaMOICNi9+J86irayw9WZxylyZNgjRSzTmAXZhTyJqRJHMIz\
WhF98ujZifxFfdG11hV+mGZDFJ31WuyhtqwcT03wGic43UKDLwNzeuKh/pSvgYH+\
emiWzc9LIHbss3pzMgIR1G4zKyLgRbpDIfFcKT9OKVq9bOqvz1x224rFHzm+A6Lb\
hza7q93oFtiqxsjXp8f4F2XGXinG8Y2jNaoLf3pCMQKBgQD08qeW3ejKbH/qrE7+\
rdtUQS3lHluBvt55NpcCNMd6LwotDk6nmbidj5jfDojDG+F7oQR5/aOmW+Y0K7hn\
994i7cpKRcZ69B5T/pXOOn6mTsvXLIGp4MfSfZ1Db9q+slGJk7bh7k/9Q55C1d/t\
HhPEe/FZ8l4SGAXQ23xIDRZD8QKBgQDJfKSAO0+pMiPBWAmZ/8cwtreyQ8i4DG2o\
byJD2QfWpM/9b9ojbb2AN1b8j17GitkanZLz9IO1rEnlRTryttjqK46wVxlLyzwT\
eUCZoeS/ThU5swSmHs3p9m9fCl8EIzP7jev9Obe07NOHJ1p+ULzVRlD0Fcbl7rYd\
U+fy7q4PbQKBgQDEWiv7pSFx+u3DeaLNRyK1dJZMvzwNUqrWMet1SkfJayHWIkzs\
zy4Np8mcrPL2rEfhKZ8EB02DEtIDajSlqy13hHSPe0Vy1HPnUwJVUdCqkimW8Ed0\
nQqxch55q5WHHjx8c1u72qRmWijoXLfnRSAFdnFvb/j2uikXVopW257IkQKBgGiT\
X9IKdrMrifFM31blsZ3wB/HnSqN0F+pHHDK4z1+xlR5GUqL2z1df4a8ePqOv5zTw\
OhiSfVXqwUPVJd5Z1sXbq6iM3F1Bc8HrugLDSzWbslqLNst9y4Q2WuGqQVylZNKY\
e7anoVivXq6UV1yeTRQo9dVqBBzNRAp+xTGKfh8VAoGAOL8zniUyu5jX7vQygDJ5\
YdquzPccxLysiczkejLurl0RoujEc+pDppcLJ8m82CD8XyKj8YQTIthOcyTc7v5H\
48J5y6pei+2r8ww8L/WcKzWmNfHcV6tYOA8iuxqutiCXHDGa2h0elk172YKchRgE\
XUulSVhm/za3uzqH3zMir/g=";

const RSA_PUBLIC: &str = "MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAwMnIhMa/2q76AJCx2JP8\
Dv6jytn5IN8v99jsRkn4u2O8/Jwg21iZvA2kMyPaJLuBAAHcmT9D5O7ZOEnJM0kq\
kW3okA+nEJnmdDj1iNE08D2X1f1qNXfZbUcK7zeKVXtbXqxI82OcfhgtKassaVgG\
khWay2qk9IEyuTxiJi6oUHX0VaN1Pqh9LIiwRTASs6eI3CCYYsUTyk4Ps0kUWdGX\
kIjQWE5JS+r2mwFCqzd5+qWjclckBL0hhc+cIy/4Nsl8CqyVGFz0xFsacTiI4r4p\
DDkJxmJ+SxQxTSlVLMhRUP7ixmnROMKUUf/XAGgJhHZg8JpXKfhIM5wJXWyQHEQM\
nQIDAQAB";

// RSASSA-PKCS1-v1_5 / SHA-256 over MESSAGE
const RSA_SIGNATURE: &str = "BXO9jGivji24XBcIVhzStszgV7rQGi5vxV1TwX0BbtvIzi0ALXeYs90TtSnba2J7\
d/TiuL43lzCQAHbi7LVhQT3jhrtgmOM/L/2VIYTJMXxByKn2aJPqSiAJ7v86hbO5\
ZF1cj31KiKmqxxrCbWJFTzWJbhi+3x0/1m9NWkoYnoP6r2DcoIxkiZr+MIKGHT/W\
0a7Uf1HZ/6hV7w8GXnIsI4aJRFDdpPNyeiwF26N+56pgrGxVl07YWVa/jTpcvq+G\
8fPYsVLhQ44xdwabwDfq6dggmlGYz4Wl8cd3tTfXhVfrd5WhD6efTEqDtm8WuuUK\
kfq7QDTK5AT/TTfCxo6qbQ==";

const SM2_PUBLIC: &str = "MFkwEwYHKoZIzj0CAQYIKoEcz1UBgi0DQgAEdPCfhWsXiy3id/S3EWbAfcMq2iv1\
gDm4BR1PJJY4zvieINdzQ3fCOqf1iFHlCD1OCsJRa6dQVlIY9/Eg0VEivQ==";

const ED25519_PUBLIC: &str = "MCowBQYDK2VwAyEAZceJ/xL+cSBEKEqtNoY1BUROZZVJi8gszhOol9KTjD8=";

fn bytes(text: &str) -> Vec<u8> {
    decode_base64_text(text.as_bytes()).unwrap()
}

fn name(uri: &str) -> Name {
    uri.parse().unwrap()
}

fn validity() -> ValidityPeriod {
    ValidityPeriod::from_now(Duration::days(30)).unwrap()
}

/// One RSA key reachable through every kind of key reference
struct RsaKeys {
    key_name: Name,
    spki: Vec<u8>,
    public: PublicKey,
    pib: Pib,
    certificate: Certificate,
    module: MemoryModule,
}

impl RsaKeys {
    fn pib_key(&self) -> Key {
        self.pib
            .identity(&name("/alice"))
            .unwrap()
            .key(&self.key_name)
            .unwrap()
    }
}

#[fixture]
fn rsa() -> RsaKeys {
    let key_name = name("/alice/KEY/rsa");
    let spki = bytes(RSA_PUBLIC);
    let public = PublicKey::from_der(&spki).unwrap();

    let pib = Pib::in_memory();
    pib.add_identity(&name("/alice"))
        .unwrap()
        .add_key(&spki, &key_name, KeyType::None)
        .unwrap();

    let info = SignatureInfo::new(SignatureType::Sha256WithRsa)
        .with_key_locator(KeyLocator::Name(key_name.clone()))
        .with_validity_period(validity());
    let mut data = Certificate::unsigned(&key_name, "self", 1, &spki, info).unwrap();
    data.set_signature_value(vec![0; 256]);
    let certificate = Certificate::from_data(data).unwrap();

    let module = MemoryModule::new();
    module.import_key(&key_name, &bytes(RSA_PRIVATE)).unwrap();

    RsaKeys {
        key_name,
        spki,
        public,
        pib,
        certificate,
        module,
    }
}

#[rstest]
fn test_every_key_shape_accepts_valid_and_rejects_corrupted(rsa: RsaKeys) {
    let signature = bytes(RSA_SIGNATURE);
    let mut corrupted = signature.clone();
    corrupted[100] ^= 0x80;
    let pib_key = rsa.pib_key();
    let shapes = [
        KeyRef::Raw(&rsa.spki),
        KeyRef::from(&rsa.public),
        KeyRef::from(&pib_key),
        KeyRef::from(&rsa.certificate),
        KeyRef::module(&rsa.module, &rsa.key_name, DigestAlgorithm::Sha256),
    ];
    for key in shapes {
        assert!(
            verify_signature(MESSAGE, &signature, key).unwrap(),
            "valid signature rejected via {:?}",
            key
        );
        assert!(
            !verify_signature(MESSAGE, &corrupted, key).unwrap(),
            "corrupted signature accepted via {:?}",
            key
        );
        assert!(!verify_signature(&b"hello ndm"[..], &signature, key).unwrap());
    }
}

#[rstest]
fn test_split_buffers(rsa: RsaKeys) {
    let signature = bytes(RSA_SIGNATURE);
    let input: InputBuffers<'_> = MESSAGE.chunks(2).collect();
    assert!(verify_signature(input, &signature, KeyRef::from(&rsa.public)).unwrap());
}

#[rstest]
fn test_wrong_length_rsa_signature_is_structural(rsa: RsaKeys) {
    let mut signature = bytes(RSA_SIGNATURE);
    signature.pop();
    let err = verify_signature(MESSAGE, &signature, KeyRef::from(&rsa.public)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[rstest]
fn test_configured_signature_digest(rsa: RsaKeys) {
    let signature = bytes(RSA_SIGNATURE);
    let sha512 = Verifier::new(VerifierConfig::default().with_signature_digest(DigestAlgorithm::Sha512));
    assert!(!sha512
        .verify_signature(MESSAGE, &signature, KeyRef::from(&rsa.public))
        .unwrap());
    let sm3 = Verifier::new(VerifierConfig::default().with_signature_digest(DigestAlgorithm::Sm3));
    let err = sm3
        .verify_signature(MESSAGE, &signature, KeyRef::from(&rsa.public))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
}

#[rstest]
fn test_removed_pib_key_is_not_found(rsa: RsaKeys) {
    let pib_key = rsa.pib_key();
    rsa.pib
        .identity(&name("/alice"))
        .unwrap()
        .remove_key(&rsa.key_name)
        .unwrap();
    let err = verify_signature(MESSAGE, &bytes(RSA_SIGNATURE), KeyRef::from(&pib_key)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[rstest]
#[case(DigestAlgorithm::Sha224)]
#[case(DigestAlgorithm::None)]
fn test_module_digest_errors(rsa: RsaKeys, #[case] digest: DigestAlgorithm) {
    let key = KeyRef::module(&rsa.module, &rsa.key_name, digest);
    let err = verify_signature(MESSAGE, &bytes(RSA_SIGNATURE), key).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
}

#[rstest]
fn test_module_missing_key(rsa: RsaKeys) {
    let missing = name("/alice/KEY/none");
    let key = KeyRef::module(&rsa.module, &missing, DigestAlgorithm::Sha256);
    let err = verify_signature(MESSAGE, &bytes(RSA_SIGNATURE), key).unwrap_err();
    assert!(matches!(err, Error::Tpm(ndn_tpm::Error::KeyNotFound(_))));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[rstest]
#[case(SM2_PUBLIC)]
#[case(ED25519_PUBLIC)]
fn test_unsupported_key_types(#[case] spki: &str) {
    let spki = bytes(spki);
    let err = verify_signature(MESSAGE, &[0x30, 0x00], KeyRef::Raw(&spki)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
}

#[test]
fn test_garbage_raw_key_is_structural() {
    let err = verify_signature(MESSAGE, b"sig", KeyRef::Raw(b"not a key")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn test_stored_ec_alt_hint_selects_sm3() {
    let module = MemoryModule::new();
    let key_name = module
        .create_key(&name("/dave"), &KeyParams::Ec { curve: EcCurve::P256 })
        .unwrap();
    let spki = module.public_key(&key_name).unwrap();
    let signature = module
        .sign(InputBuffers::single(MESSAGE), &key_name, DigestAlgorithm::Sha256)
        .unwrap();

    let pib = Pib::in_memory();
    let key = pib
        .add_identity(&name("/dave"))
        .unwrap()
        .add_key(&spki, &key_name, KeyType::EcAlt)
        .unwrap();
    assert_eq!(key.key_type().unwrap(), KeyType::EcAlt);

    assert!(verify_signature(MESSAGE, &signature, KeyRef::Raw(&spki)).unwrap());
    let err = verify_signature(MESSAGE, &signature, KeyRef::Pib(&key)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
}

#[test]
fn test_signed_data_verifies_through_every_shape() {
    let module = MemoryModule::new();
    let key_name = module
        .create_key(&name("/bob"), &KeyParams::Ec { curve: EcCurve::P256 })
        .unwrap();
    let cert = self_sign(&module, &key_name, validity()).unwrap();

    let pib = Pib::in_memory();
    let key = pib
        .add_identity(&name("/bob"))
        .unwrap()
        .add_key(cert.public_key(), &key_name, KeyType::None)
        .unwrap();
    key.add_certificate(&cert).unwrap();

    let mut data = Data::new(name("/bob/blog/1")).with_content(b"first post".to_vec());
    let info = signature_info_for(&module, &key_name).unwrap();
    sign_data(&module, &mut data, &key_name, info).unwrap();

    let public = key.public_key_object().unwrap();
    let spki = key.public_key().unwrap();
    let default_cert = key.default_certificate().unwrap();
    for shape in [
        KeyRef::Raw(&spki),
        KeyRef::from(&public),
        KeyRef::from(&key),
        KeyRef::from(&default_cert),
        KeyRef::module(&module, &key_name, DigestAlgorithm::Sha256),
    ] {
        assert!(verify_data(&data, shape).unwrap(), "rejected via {:?}", shape);
    }

    // the certificate is itself a signed Data packet
    assert!(verify_data(cert.data(), KeyRef::from(&cert)).unwrap());

    let mut tampered = Data::new(name("/bob/blog/1")).with_content(b"edited post".to_vec());
    tampered.set_signature_info(data.signature_info().unwrap().clone());
    tampered.set_signature_value(data.signature_value().unwrap().to_vec());
    assert!(!verify_data(&tampered, KeyRef::from(&cert)).unwrap());
}

#[test]
fn test_signed_interest() {
    let module = MemoryModule::new();
    let key_name = module
        .create_key(&name("/bob"), &KeyParams::Ec { curve: EcCurve::P256 })
        .unwrap();
    let spki = module.public_key(&key_name).unwrap();

    let mut interest = Interest::new(name("/bob/cmd/reboot")).with_must_be_fresh(true);
    let info = signature_info_for(&module, &key_name).unwrap();
    sign_interest(&module, &mut interest, &key_name, info).unwrap();
    assert!(verify_interest(&interest, KeyRef::Raw(&spki)).unwrap());

    let other = module
        .create_key(&name("/bob"), &KeyParams::Ec { curve: EcCurve::P256 })
        .unwrap();
    let other_spki = module.public_key(&other).unwrap();
    assert!(!verify_interest(&interest, KeyRef::Raw(&other_spki)).unwrap());
}

#[test]
fn test_hmac_signed_interest_through_module() {
    let module = MemoryModule::new();
    let key_name = name("/bob/KEY/shared");
    module.import_secret(&key_name, b"shared secret").unwrap();

    let mut interest = Interest::new(name("/bob/cmd"));
    let info = signature_info_for(&module, &key_name).unwrap();
    sign_interest(&module, &mut interest, &key_name, info).unwrap();
    let key = KeyRef::module(&module, &key_name, DigestAlgorithm::Sha256);
    assert!(verify_interest(&interest, key).unwrap());
}

#[test]
fn test_digest_signed_packets() {
    let mut data = Data::new(name("/bob/blog/2")).with_content(b"hi".to_vec());
    data.set_signature_info(SignatureInfo::new(SignatureType::DigestSha256));
    let ranges = ndn_types::SignedPacket::signed_ranges(&data).unwrap();
    let value = ndn_crypto::compute_digest(ranges.buffers(), DigestAlgorithm::Sha256).unwrap();
    data.set_signature_value(value);
    assert!(verify_data(&data, KeyRef::Certificate(None)).unwrap());
    assert!(verify_data_digest(&data, DigestAlgorithm::Sha256).unwrap());
    assert!(!verify_data_digest(&data, DigestAlgorithm::Sha512).unwrap());

    let mut interest = Interest::new(name("/bob/cmd"));
    interest.set_signature_info(SignatureInfo::new(SignatureType::DigestSha256));
    let ranges = ndn_types::SignedPacket::signed_ranges(&interest).unwrap();
    let value = ndn_crypto::compute_digest(ranges.buffers(), DigestAlgorithm::Sha256).unwrap();
    interest.set_signature_value(value);
    assert!(verify_interest(&interest, KeyRef::Certificate(None)).unwrap());
    assert!(verify_interest_digest(&interest, DigestAlgorithm::Sha256).unwrap());
}

#[rstest]
#[case(DigestAlgorithm::Sha256, "")]
#[case(DigestAlgorithm::Sha256, "abc")]
#[case(DigestAlgorithm::Sha512, "abc")]
#[case(DigestAlgorithm::Sha3_256, "abc")]
fn test_verify_digest_known_answers(#[case] algorithm: DigestAlgorithm, #[case] input: &str) {
    let expected = match (algorithm, input) {
        (DigestAlgorithm::Sha256, "") => {
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        }
        (DigestAlgorithm::Sha256, _) => {
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        }
        (DigestAlgorithm::Sha512, _) => {
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        }
        _ => "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532",
    };
    let digest = hex::decode(expected).unwrap();
    assert!(verify_digest(input.as_bytes(), &digest, algorithm).unwrap());
    assert!(!verify_digest(input.as_bytes(), &digest[1..], algorithm).unwrap());
}
