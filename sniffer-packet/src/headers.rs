//! Name-keyed header tables
//!
//! Every frame can be viewed as an insertion-ordered table of named headers.
//! Values are either raw header bytes (sliced from the frame's raw span) or
//! the nested frame of the next layer. The typed fields on each frame are the
//! primary representation; tables are built from them on demand.

use bytes::Bytes;
use sniffer_core::{Error, Result};

use crate::byteview::to_hex_bytes;
use crate::frame::{AnyFrame, Frame};

/// Value stored under a header name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue<'a> {
    /// Raw header bytes
    Bytes(Bytes),
    /// Nested frame of the next layer
    Frame(AnyFrame<'a>),
}

impl<'a> HeaderValue<'a> {
    /// Raw bytes, if this value is not a nested frame
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            HeaderValue::Bytes(bytes) => Some(bytes),
            HeaderValue::Frame(_) => None,
        }
    }

    /// Nested frame, if this value holds one
    pub fn as_frame(&self) -> Option<AnyFrame<'a>> {
        match self {
            HeaderValue::Frame(frame) => Some(*frame),
            HeaderValue::Bytes(_) => None,
        }
    }

    /// Short human-readable rendering (hex bytes, or the nested protocol name)
    pub fn str_repr(&self) -> String {
        match self {
            HeaderValue::Bytes(bytes) => to_hex_bytes(bytes, Some(Headers::REPR_LIMIT)),
            HeaderValue::Frame(frame) => format!("<{} frame>", frame.protocol()),
        }
    }
}

/// Insertion-ordered table of named headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers<'a> {
    entries: Vec<(&'static str, HeaderValue<'a>)>,
}

impl<'a> Headers<'a> {
    /// Number of octets shown by [`HeaderValue::str_repr`] before truncating
    pub const REPR_LIMIT: usize = 25;

    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add raw header bytes, replacing any previous value of that name
    pub fn with_bytes(self, name: &'static str, bytes: Bytes) -> Self {
        self.with(name, HeaderValue::Bytes(bytes))
    }

    /// Add a nested frame, replacing any previous value of that name
    pub fn with_frame(self, name: &'static str, frame: AnyFrame<'a>) -> Self {
        self.with(name, HeaderValue::Frame(frame))
    }

    fn with(mut self, name: &'static str, value: HeaderValue<'a>) -> Self {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    /// Look up a header by name
    pub fn get(&self, name: &str) -> Result<&HeaderValue<'a>> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| value)
            .ok_or_else(|| Error::NoSuchHeader(name.to_string()))
    }

    /// Header names in insertion order
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(name, _)| *name).collect()
    }

    /// Iterate over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &HeaderValue<'a>)> {
        self.entries.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_and_replace() {
        let headers = Headers::new()
            .with_bytes("b", Bytes::from_static(&[1]))
            .with_bytes("a", Bytes::from_static(&[2]))
            .with_bytes("b", Bytes::from_static(&[3]));

        assert_eq!(headers.names(), vec!["b", "a"]);
        assert_eq!(headers.len(), 2);
        assert_eq!(
            headers.get("b").unwrap().as_bytes().unwrap().as_ref(),
            &[3]
        );
    }

    #[test]
    fn test_missing_header() {
        let headers = Headers::new();
        assert!(headers.is_empty());
        match headers.get("ttl") {
            Err(Error::NoSuchHeader(name)) => assert_eq!(name, "ttl"),
            other => panic!("Expected NoSuchHeader, got {:?}", other),
        }
    }

    #[test]
    fn test_str_repr_truncates() {
        let value = HeaderValue::Bytes(Bytes::from(vec![0xAB; 30]));
        let repr = value.str_repr();
        assert!(repr.ends_with("..."));
        assert_eq!(repr.matches("AB").count(), Headers::REPR_LIMIT);
    }
}
