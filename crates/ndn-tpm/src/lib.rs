//! Signing modules for the NDN security layer
//!
//! A signing module holds private keys under their key names and performs
//! signing and verification on request, so that key material stays inside
//! the module. [`MemoryModule`] is a software module backed by aws-lc-rs;
//! [`verify_with_module`] resolves a key by name and checks a signature
//! with it.

pub mod error;
pub mod memory;
pub mod module;
pub mod signer;

pub use error::{Error, Result};
pub use memory::{MemoryModule, MEMORY_LOCATOR};
pub use module::{verify_with_module, SigningModule};
pub use signer::{
    issue_certificate, self_sign, sign_data, sign_interest, signature_info_for, SELF_ISSUER,
};
