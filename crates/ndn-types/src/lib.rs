//! Core types for the NDN security layer
//!
//! This crate provides the data structures shared by the key store, the
//! signing module and the verification engine: hierarchical names, the
//! digest/key/signature algorithm enumerations, signature metadata and the
//! two signed packet kinds (Data and signed Interest).
//!
//! Packet support is limited to what signature verification needs: each
//! packet can produce the ordered byte ranges that its signature covers.

pub mod algorithm;
pub mod buffers;
pub mod data;
pub mod error;
pub mod interest;
pub mod name;
pub mod packet;
pub mod signature_info;
pub mod tlv;

pub use algorithm::{DigestAlgorithm, KeyType, SignatureType};
pub use buffers::InputBuffers;
pub use data::{ContentType, Data};
pub use error::{Error, ErrorKind, Result};
pub use interest::Interest;
pub use name::{Component, Name};
pub use packet::{SignedPacket, SignedRanges};
pub use signature_info::{KeyLocator, SignatureInfo, ValidityPeriod};
