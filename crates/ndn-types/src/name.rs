//! Hierarchical names
//!
//! Names are sequences of opaque byte components. Their URI form escapes
//! every byte outside the unreserved set as `%XX`; a component made only of
//! periods carries three extra periods, so the empty component is `...`.

use crate::error::{Error, Result};
use crate::tlv;
use std::cmp::Ordering;
use std::str::FromStr;

const VERSION_MARKER: u8 = 0xFD;

/// A single generic name component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Component(Vec<u8>);

impl Component {
    /// Create a component from raw bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parse a component from its escaped URI form
    pub fn from_escaped(s: &str) -> Result<Self> {
        if s.bytes().all(|b| b == b'.') {
            if s.len() < 3 {
                return Err(Error::InvalidName(format!(
                    "component '{}' is reserved (needs at least three periods)",
                    s
                )));
            }
            return Ok(Self(vec![b'.'; s.len() - 3]));
        }

        let bytes = s.as_bytes();
        let mut out = Vec::with_capacity(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'%' {
                let hex_digits = bytes.get(i + 1..i + 3).ok_or_else(|| {
                    Error::InvalidName(format!("truncated percent escape in '{}'", s))
                })?;
                let decoded = hex::decode(hex_digits).map_err(|e| {
                    Error::InvalidName(format!("bad percent escape in '{}': {}", s, e))
                })?;
                out.extend_from_slice(&decoded);
                i += 3;
            } else {
                out.push(bytes[i]);
                i += 1;
            }
        }
        Ok(Self(out))
    }

    /// Create a version component (marker 0xFD followed by the number)
    pub fn from_version(version: u64) -> Self {
        let mut bytes = vec![VERSION_MARKER];
        bytes.extend_from_slice(&tlv::nonneg_integer(version));
        Self(bytes)
    }

    /// Decode a version component
    pub fn as_version(&self) -> Option<u64> {
        let (&marker, number) = self.0.split_first()?;
        if marker != VERSION_MARKER || !matches!(number.len(), 1 | 2 | 4 | 8) {
            return None;
        }
        Some(number.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
    }

    /// Get the raw bytes of this component
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Get the component as UTF-8 text, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Length of the component value in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the component value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encode as a GenericNameComponent TLV
    pub fn encode(&self) -> Vec<u8> {
        tlv::block(tlv::types::GENERIC_NAME_COMPONENT, &self.0)
    }

    /// Get the escaped URI form of this component
    pub fn to_escaped_string(&self) -> String {
        if self.0.iter().all(|&b| b == b'.') {
            return ".".repeat(self.0.len() + 3);
        }
        let mut out = String::with_capacity(self.0.len());
        for &b in &self.0 {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
                out.push(b as char);
            } else {
                out.push_str(&format!("%{:02X}", b));
            }
        }
        out
    }
}

// Canonical order: shorter components sort first, then bytewise.
impl Ord for Component {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Component {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_escaped_string())
    }
}

impl From<&str> for Component {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for Component {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<&[u8]> for Component {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Component {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// A hierarchical name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Name {
    components: Vec<Component>,
}

impl Name {
    /// Create an empty name
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a name from its URI form, e.g. `/example/KEY/%01%02`
    pub fn from_uri(uri: &str) -> Result<Self> {
        let mut s = uri.trim();
        if let Some(rest) = s.strip_prefix("ndn:") {
            s = rest;
        }
        if let Some(rest) = s.strip_prefix("//") {
            // authority part is ignored
            s = rest.find('/').map_or("", |pos| &rest[pos..]);
        }
        let s = s.strip_prefix('/').unwrap_or(s);
        let s = s.strip_suffix('/').unwrap_or(s);

        let mut name = Name::new();
        if s.is_empty() {
            return Ok(name);
        }
        for segment in s.split('/') {
            if segment.is_empty() {
                return Err(Error::InvalidName(format!(
                    "empty component in '{}' (use '...' for an empty component)",
                    uri
                )));
            }
            name.components.push(Component::from_escaped(segment)?);
        }
        Ok(name)
    }

    /// Append a component in place
    pub fn push(&mut self, component: impl Into<Component>) {
        self.components.push(component.into());
    }

    /// Append a component, returning the extended name
    pub fn append(mut self, component: impl Into<Component>) -> Self {
        self.push(component);
        self
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the name has no components
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Get a component; negative indexes count from the end
    pub fn get(&self, index: isize) -> Option<&Component> {
        let idx = if index < 0 {
            self.components.len().checked_sub(index.unsigned_abs())?
        } else {
            index as usize
        };
        self.components.get(idx)
    }

    /// Get all components
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Get the first `n` components; negative `n` drops components from the end
    pub fn prefix(&self, n: isize) -> Name {
        let len = if n < 0 {
            self.components.len().saturating_sub(n.unsigned_abs())
        } else {
            (n as usize).min(self.components.len())
        };
        Name {
            components: self.components[..len].to_vec(),
        }
    }

    /// Check whether this name is a prefix of (or equal to) `other`
    pub fn is_prefix_of(&self, other: &Name) -> bool {
        self.components.len() <= other.components.len()
            && self
                .components
                .iter()
                .zip(other.components.iter())
                .all(|(a, b)| a == b)
    }

    /// Encode the components without the outer Name TLV
    pub fn encode_components(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for component in &self.components {
            tlv::write_block(
                &mut buf,
                tlv::types::GENERIC_NAME_COMPONENT,
                component.as_bytes(),
            );
        }
        buf
    }

    /// Encode as a Name TLV
    pub fn encode(&self) -> Vec<u8> {
        tlv::block(tlv::types::NAME, &self.encode_components())
    }

    /// Get the URI form of this name
    pub fn to_uri(&self) -> String {
        if self.components.is_empty() {
            return "/".to_string();
        }
        let mut out = String::new();
        for component in &self.components {
            out.push('/');
            out.push_str(&component.to_escaped_string());
        }
        out
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_uri())
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Name::from_uri(s)
    }
}

impl FromIterator<Component> for Name {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        Name {
            components: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/", 0)]
    #[case("", 0)]
    #[case("/a/b/c", 3)]
    #[case("ndn:/a/b", 2)]
    #[case("/a/b/", 2)]
    #[case("//authority/a", 1)]
    fn test_from_uri_lengths(#[case] uri: &str, #[case] len: usize) {
        assert_eq!(Name::from_uri(uri).unwrap().len(), len);
    }

    #[test]
    fn test_uri_round_trip_with_escapes() {
        let name = Name::new()
            .append("hello world")
            .append(vec![0x00u8, 0xff])
            .append(Vec::<u8>::new())
            .append("..");
        let uri = name.to_uri();
        assert_eq!(uri, "/hello%20world/%00%FF/.../.....");
        assert_eq!(Name::from_uri(&uri).unwrap(), name);
    }

    #[rstest]
    #[case("/a//b")]
    #[case("/a/..")]
    #[case("/a/%4")]
    #[case("/a/%zz")]
    fn test_from_uri_invalid(#[case] uri: &str) {
        assert!(Name::from_uri(uri).is_err());
    }

    #[test]
    fn test_prefix_and_get() {
        let name: Name = "/a/b/c/d".parse().unwrap();
        assert_eq!(name.prefix(2).to_uri(), "/a/b");
        assert_eq!(name.prefix(-1).to_uri(), "/a/b/c");
        assert_eq!(name.prefix(-10).len(), 0);
        assert_eq!(name.prefix(10), name);
        assert_eq!(name.get(-1).unwrap().as_bytes(), b"d");
        assert_eq!(name.get(0).unwrap().as_bytes(), b"a");
        assert!(name.get(4).is_none());
        assert!(name.get(-5).is_none());
    }

    #[test]
    fn test_is_prefix_of() {
        let a: Name = "/a/b".parse().unwrap();
        let abc: Name = "/a/b/c".parse().unwrap();
        assert!(a.is_prefix_of(&abc));
        assert!(a.is_prefix_of(&a));
        assert!(!abc.is_prefix_of(&a));
        assert!(Name::new().is_prefix_of(&a));
    }

    #[test]
    fn test_canonical_order() {
        let short: Name = "/z".parse().unwrap();
        let long: Name = "/aa".parse().unwrap();
        // shorter component sorts first regardless of bytes
        assert!(short < long);
        let parent: Name = "/a".parse().unwrap();
        let child: Name = "/a/b".parse().unwrap();
        assert!(parent < child);
    }

    #[rstest]
    #[case(0)]
    #[case(300)]
    #[case(1_700_000_000_000)]
    fn test_version_component(#[case] version: u64) {
        let component = Component::from_version(version);
        assert_eq!(component.as_bytes()[0], 0xFD);
        assert_eq!(component.as_version(), Some(version));
    }

    #[test]
    fn test_non_version_component() {
        assert_eq!(Component::from("v1").as_version(), None);
        assert_eq!(Component::new(vec![0xFDu8, 1, 2, 3]).as_version(), None);
        assert_eq!(Component::new(Vec::<u8>::new()).as_version(), None);
    }

    #[test]
    fn test_encode() {
        let name: Name = "/a/bc".parse().unwrap();
        assert_eq!(name.encode(), vec![7, 7, 8, 1, b'a', 8, 2, b'b', b'c']);
        assert_eq!(Name::new().encode(), vec![7, 0]);
    }
}
