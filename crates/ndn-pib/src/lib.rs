//! Public information base (PIB) for the NDN security layer
//!
//! The PIB records which identities exist, which keys each identity owns and
//! which certificates vouch for each key. Storage is pluggable through
//! [`PibImpl`]; [`PibMemory`] keeps everything in memory.
//!
//! [`Identity`] and [`Key`] are handles over shared implementation objects.
//! They hold names only and read through to storage on every access, so a
//! change made through one handle is seen by all others.
//!
//! # Example
//!
//! ```no_run
//! use ndn_pib::Pib;
//! use ndn_types::KeyType;
//!
//! # fn example(spki: &[u8]) -> ndn_pib::Result<()> {
//! let pib = Pib::in_memory();
//! let alice = pib.add_identity(&"/alice".parse()?)?;
//! let key = alice.add_key(spki, &"/alice/KEY/k1".parse()?, KeyType::None)?;
//! assert_eq!(alice.default_key()?, key);
//! # Ok(())
//! # }
//! ```

pub mod certificate;
pub mod error;
pub mod identity;
pub mod key;
pub mod memory;
pub mod naming;
pub mod pib;
pub mod pib_impl;

pub use certificate::Certificate;
pub use error::{Error, Result};
pub use identity::Identity;
pub use key::Key;
pub use memory::PibMemory;
pub use naming::{
    construct_certificate_name, construct_key_name, extract_identity_from_cert_name,
    extract_identity_from_key_name, extract_key_name_from_cert_name, is_valid_certificate_name,
    is_valid_key_name, KEY_COMPONENT,
};
pub use pib::{Pib, MEMORY_LOCATOR};
pub use pib_impl::PibImpl;
