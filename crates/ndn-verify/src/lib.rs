//! Signature verification for NDN packets
//!
//! One dispatch engine checks signatures over raw buffers, Data packets and
//! signed Interests against any kind of key reference:
//!
//! - raw DER SubjectPublicKeyInfo bytes,
//! - a loaded [`PublicKey`](ndn_crypto::PublicKey),
//! - a key stored in a PIB,
//! - a certificate, or no certificate at all (digest fallback),
//! - a named key inside a signing module.
//!
//! A signature that does not match is reported as `Ok(false)`. Errors mean
//! the check could not be made; [`Error::kind`] classifies them.
//!
//! # Example
//!
//! ```no_run
//! use ndn_verify::{verify_data, KeyRef};
//! use ndn_pib::Certificate;
//! use ndn_types::Data;
//!
//! # fn example(data: &Data, cert: &Certificate) -> ndn_verify::Result<()> {
//! if verify_data(data, KeyRef::from(cert))? {
//!     println!("signature is valid");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod key_ref;
pub mod verify;

pub use config::VerifierConfig;
pub use error::{Error, Result};
pub use key_ref::KeyRef;
pub use verify::{
    verify_data, verify_data_digest, verify_digest, verify_interest, verify_interest_digest,
    verify_signature, Verifier,
};
