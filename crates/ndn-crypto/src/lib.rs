//! Cryptographic primitives for the NDN security layer
//!
//! This crate wraps the crypto provider (aws-lc-rs, plus RustCrypto digests
//! behind cargo features) so that the rest of the security layer never
//! touches provider types directly. It provides digest computation, public
//! key objects that load, save, verify and encrypt, and the private keys
//! used by software signing modules.

pub mod digest;
pub mod encoding;
pub mod error;
pub mod handle;
pub mod key_info;
pub mod private_key;
pub mod public_key;

pub use digest::{compute_digest, is_supported, sha256};
pub use encoding::{decode_base64_text, encode_base64_text, KeyEncoding};
pub use error::{Error, Result};
pub use handle::{ByteStream, DigestContext, KeyContext};
pub use key_info::{resolve_key_type, EcCurve, KeyInfo};
pub use private_key::{KeyParams, PrivateKey};
pub use public_key::PublicKey;
