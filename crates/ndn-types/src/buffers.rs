//! Non-contiguous input for digest and signature operations

/// An ordered sequence of byte slices treated as one logical message
///
/// Packet signatures cover several disjoint ranges of the encoding. Passing
/// them as `InputBuffers` lets the crypto layer process them in order without
/// the caller copying them together first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffers<'a> {
    parts: Vec<&'a [u8]>,
}

impl<'a> InputBuffers<'a> {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Create a sequence holding a single buffer
    pub fn single(buf: &'a [u8]) -> Self {
        Self { parts: vec![buf] }
    }

    /// Append a buffer
    pub fn push(&mut self, buf: &'a [u8]) {
        self.parts.push(buf);
    }

    /// Iterate over the buffers in order
    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        self.parts.iter().copied()
    }

    /// Number of buffers
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check if there are no buffers
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Total number of bytes across all buffers
    pub fn total_len(&self) -> usize {
        self.parts.iter().map(|p| p.len()).sum()
    }

    /// Copy the buffers into one contiguous vector
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.total_len());
        for part in &self.parts {
            out.extend_from_slice(part);
        }
        out
    }
}

impl<'a> From<&'a [u8]> for InputBuffers<'a> {
    fn from(buf: &'a [u8]) -> Self {
        Self::single(buf)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for InputBuffers<'a> {
    fn from(buf: &'a [u8; N]) -> Self {
        Self::single(buf.as_slice())
    }
}

impl<'a> From<&'a Vec<u8>> for InputBuffers<'a> {
    fn from(buf: &'a Vec<u8>) -> Self {
        Self::single(buf.as_slice())
    }
}

impl<'a> FromIterator<&'a [u8]> for InputBuffers<'a> {
    fn from_iter<I: IntoIterator<Item = &'a [u8]>>(iter: I) -> Self {
        Self {
            parts: iter.into_iter().collect(),
        }
    }
}
