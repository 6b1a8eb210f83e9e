//! The kinds of key a signature can be checked against

use ndn_crypto::PublicKey;
use ndn_pib::{Certificate, Key};
use ndn_tpm::SigningModule;
use ndn_types::{DigestAlgorithm, Name};

/// Reference to the key that should have made a signature
#[derive(Clone, Copy)]
pub enum KeyRef<'a> {
    /// DER SubjectPublicKeyInfo bytes
    Raw(&'a [u8]),
    /// A loaded public key
    PublicKey(&'a PublicKey),
    /// A key stored in a PIB
    Pib(&'a Key),
    /// The signer's certificate; `None` treats the signature as a digest of
    /// the signed bytes
    Certificate(Option<&'a Certificate>),
    /// A key held by a signing module, used with the given digest
    Module {
        module: &'a dyn SigningModule,
        key_name: &'a Name,
        digest: DigestAlgorithm,
    },
}

impl<'a> KeyRef<'a> {
    /// Refer to a key held by a signing module
    pub fn module(module: &'a dyn SigningModule, key_name: &'a Name, digest: DigestAlgorithm) -> Self {
        KeyRef::Module {
            module,
            key_name,
            digest,
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            KeyRef::Raw(_) => "raw",
            KeyRef::PublicKey(_) => "public-key",
            KeyRef::Pib(_) => "pib",
            KeyRef::Certificate(Some(_)) => "certificate",
            KeyRef::Certificate(None) => "digest",
            KeyRef::Module { .. } => "module",
        }
    }
}

impl std::fmt::Debug for KeyRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyRef::Raw(bytes) => f.debug_tuple("Raw").field(&bytes.len()).finish(),
            KeyRef::PublicKey(key) => f.debug_tuple("PublicKey").field(&key.key_type()).finish(),
            KeyRef::Pib(key) => f.debug_tuple("Pib").field(&key.name().ok()).finish(),
            KeyRef::Certificate(cert) => f
                .debug_tuple("Certificate")
                .field(&cert.map(Certificate::name))
                .finish(),
            KeyRef::Module {
                module,
                key_name,
                digest,
            } => f
                .debug_struct("Module")
                .field("module", &module.locator())
                .field("key_name", key_name)
                .field("digest", digest)
                .finish(),
        }
    }
}

impl<'a> From<&'a [u8]> for KeyRef<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        KeyRef::Raw(bytes)
    }
}

impl<'a> From<&'a PublicKey> for KeyRef<'a> {
    fn from(key: &'a PublicKey) -> Self {
        KeyRef::PublicKey(key)
    }
}

impl<'a> From<&'a Key> for KeyRef<'a> {
    fn from(key: &'a Key) -> Self {
        KeyRef::Pib(key)
    }
}

impl<'a> From<&'a Certificate> for KeyRef<'a> {
    fn from(cert: &'a Certificate) -> Self {
        KeyRef::Certificate(Some(cert))
    }
}

impl<'a> From<Option<&'a Certificate>> for KeyRef<'a> {
    fn from(cert: Option<&'a Certificate>) -> Self {
        KeyRef::Certificate(cert)
    }
}
