//! UDP datagram decoding

use bytes::Bytes;
use sniffer_core::Protocol;
use std::fmt;

use crate::byteview::to_hex_dump;
use crate::frame::{Describe, Frame};
use crate::headers::Headers;
use crate::parser::FrameParser;

/// Decoded UDP datagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdpFrame {
    /// Source port
    source_port: u16,
    /// Destination port
    destination_port: u16,
    /// Length (header + data) as declared by the sender
    length: u16,
    /// Bytes after the header
    ///
    /// Always the remainder of the buffer; the declared length is reported
    /// but not enforced.
    payload: Bytes,
    raw: Bytes,
}

impl UdpFrame {
    /// UDP header size in bytes
    pub const HEADER_SIZE: usize = 8;

    pub fn source_port(&self) -> u16 {
        self.source_port
    }

    pub fn destination_port(&self) -> u16 {
        self.destination_port
    }

    /// Length field as declared, header included
    pub fn length(&self) -> u16 {
        self.length
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }
}

impl Frame for UdpFrame {
    fn protocol(&self) -> Protocol {
        Protocol::Udp
    }

    fn raw(&self) -> &Bytes {
        &self.raw
    }

    fn headers(&self) -> Headers<'_> {
        Headers::new()
            .with_bytes("source port", self.raw.slice(0..2))
            .with_bytes("destination port", self.raw.slice(2..4))
            .with_bytes("length", self.raw.slice(4..6))
            .with_bytes("checksum", self.raw.slice(6..8))
            .with_bytes("data", self.payload.clone())
    }
}

impl Describe for UdpFrame {
    fn describe(&self, f: &mut fmt::Formatter<'_>, tab: &str) -> fmt::Result {
        writeln!(f, "{}UDP datagram:", tab)?;
        writeln!(f, "{}Source port: {}", tab, self.source_port)?;
        writeln!(f, "{}Destination port: {}", tab, self.destination_port)?;
        writeln!(f, "{}Length: {}", tab, self.length)?;
        writeln!(f, "{}Data ({} bytes):", tab, self.payload.len())?;
        f.write_str(&to_hex_dump(&self.payload, 16, &format!("{} ", tab)))
    }
}

impl fmt::Display for UdpFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe(f, "")
    }
}

/// Decoder for UDP datagrams
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpParser;

impl UdpParser {
    pub fn new() -> Self {
        UdpParser
    }
}

impl FrameParser for UdpParser {
    type Output = UdpFrame;

    fn parse(&self, raw: &Bytes) -> Option<UdpFrame> {
        if raw.len() < UdpFrame::HEADER_SIZE {
            return None;
        }

        Some(UdpFrame {
            source_port: u16::from_be_bytes([raw[0], raw[1]]),
            destination_port: u16::from_be_bytes([raw[2], raw[3]]),
            length: u16::from_be_bytes([raw[4], raw[5]]),
            payload: raw.slice(UdpFrame::HEADER_SIZE..),
            raw: raw.clone(),
        })
    }
}
