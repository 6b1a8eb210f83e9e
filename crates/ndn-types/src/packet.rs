//! Boundary between packets and the verification engine

use crate::buffers::InputBuffers;
use crate::error::Result;
use crate::signature_info::SignatureInfo;

/// Encoded byte ranges covered by a packet signature, in signing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedRanges(Vec<Vec<u8>>);

impl SignedRanges {
    /// Create from encoded ranges
    pub fn new(ranges: Vec<Vec<u8>>) -> Self {
        Self(ranges)
    }

    /// Borrow the ranges as input buffers
    pub fn buffers(&self) -> InputBuffers<'_> {
        self.0.iter().map(Vec::as_slice).collect()
    }

    /// Number of ranges
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A packet that carries a signature over part of its encoding
pub trait SignedPacket {
    /// Signature metadata, if the packet is signed
    fn signature_info(&self) -> Option<&SignatureInfo>;

    /// Raw signature bytes, if the packet is signed
    fn signature_value(&self) -> Option<&[u8]>;

    /// Encode the portion of the packet covered by the signature
    ///
    /// Fails when the packet lacks the elements that make up that portion.
    fn signed_ranges(&self) -> Result<SignedRanges>;
}
