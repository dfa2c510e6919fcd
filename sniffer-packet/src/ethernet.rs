//! Ethernet II frame decoding
//!
//! The link layer of every captured buffer. The 14-byte header is followed by
//! an IPv4 or IPv6 packet; any other EtherType is a decode failure.

use bytes::Bytes;
use sniffer_core::Protocol;
use std::fmt;
use tracing::trace;

use crate::byteview::{to_hexed_int, to_mac_address};
use crate::frame::{AnyFrame, Describe, Frame, InternetFrame, Layers};
use crate::headers::Headers;
use crate::ipv4::{Ipv4Frame, Ipv4Parser};
use crate::ipv6::{Ipv6Frame, Ipv6Parser};
use crate::parser::FrameParser;

/// EtherType values the decoder distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtherType {
    /// IPv4 (0x0800)
    IPv4,
    /// IPv6 (0x86DD)
    IPv6,
    /// Any other EtherType
    Custom(u16),
}

impl EtherType {
    /// Convert EtherType to u16 value
    pub fn to_u16(self) -> u16 {
        match self {
            EtherType::IPv4 => 0x0800,
            EtherType::IPv6 => 0x86DD,
            EtherType::Custom(val) => val,
        }
    }

    /// Create EtherType from u16 value
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0800 => EtherType::IPv4,
            0x86DD => EtherType::IPv6,
            val => EtherType::Custom(val),
        }
    }
}

impl fmt::Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_hexed_int(self.to_u16().into(), Some(4)))
    }
}

/// MAC address (6 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// Broadcast MAC address (FF:FF:FF:FF:FF:FF)
    pub const BROADCAST: MacAddress = MacAddress([0xFF; 6]);

    /// Create a MAC address from a slice
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; 6] = slice.try_into().ok()?;
        Some(MacAddress(bytes))
    }

    /// Get the MAC address as a byte array
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Check if this is a broadcast address
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    /// Check if this is a multicast address (bit 0 of first octet is 1)
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 == 0x01
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_mac_address(&self.0).unwrap_or_default())
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }
}

/// Decoded Ethernet II frame, root of a frame tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetFrame {
    /// Destination MAC address
    destination: MacAddress,
    /// Source MAC address
    source: MacAddress,
    /// EtherType
    ethertype: EtherType,
    /// Bytes after the header
    payload: Bytes,
    /// Decoded internet frame
    internet: InternetFrame,
    raw: Bytes,
}

impl EthernetFrame {
    /// Ethernet header size (dst + src + type)
    pub const HEADER_SIZE: usize = 14;

    pub fn destination(&self) -> MacAddress {
        self.destination
    }

    pub fn source(&self) -> MacAddress {
        self.source
    }

    pub fn ethertype(&self) -> EtherType {
        self.ethertype
    }

    /// Bytes after the header
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Internet frame carried by this frame
    pub fn internet(&self) -> &InternetFrame {
        &self.internet
    }

    /// Borrow as a tagged frame
    pub fn as_any(&self) -> AnyFrame<'_> {
        AnyFrame::Ethernet(self)
    }

    /// Walk the frame tree from this frame down to the transport layer
    pub fn layers(&self) -> Layers<'_> {
        Layers::new(self.as_any())
    }
}

impl Frame for EthernetFrame {
    fn protocol(&self) -> Protocol {
        Protocol::Ethernet
    }

    fn raw(&self) -> &Bytes {
        &self.raw
    }

    fn headers(&self) -> Headers<'_> {
        Headers::new()
            .with_bytes("destination", self.raw.slice(0..6))
            .with_bytes("source", self.raw.slice(6..12))
            .with_bytes("type", self.raw.slice(12..14))
            .with_bytes("data", self.payload.clone())
            .with_frame("internet", self.internet.as_any())
    }
}

impl Describe for EthernetFrame {
    fn describe(&self, f: &mut fmt::Formatter<'_>, tab: &str) -> fmt::Result {
        writeln!(f, "{}Ethernet frame:", tab)?;
        writeln!(f, "{}Destination: {}", tab, self.destination)?;
        writeln!(f, "{}Source: {}", tab, self.source)?;
        writeln!(f, "{}Type: {}", tab, self.ethertype)?;
        self.internet.describe(f, &format!("{} ", tab))
    }
}

impl fmt::Display for EthernetFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe(f, "")
    }
}

/// Decoder for Ethernet II frames
///
/// Holds the IPv4 and IPv6 parsers it dispatches to.
#[derive(Debug, Clone, Default)]
pub struct EthernetParser<V4 = Ipv4Parser, V6 = Ipv6Parser> {
    ipv4: V4,
    ipv6: V6,
}

impl<V4, V6> EthernetParser<V4, V6>
where
    V4: FrameParser<Output = Ipv4Frame>,
    V6: FrameParser<Output = Ipv6Frame>,
{
    pub fn new(ipv4: V4, ipv6: V6) -> Self {
        Self { ipv4, ipv6 }
    }
}

impl<V4, V6> FrameParser for EthernetParser<V4, V6>
where
    V4: FrameParser<Output = Ipv4Frame>,
    V6: FrameParser<Output = Ipv6Frame>,
{
    type Output = EthernetFrame;

    fn parse(&self, raw: &Bytes) -> Option<EthernetFrame> {
        if raw.len() < EthernetFrame::HEADER_SIZE {
            return None;
        }

        let destination = MacAddress::from_slice(&raw[0..6])?;
        let source = MacAddress::from_slice(&raw[6..12])?;
        let ethertype = EtherType::from_u16(u16::from_be_bytes([raw[12], raw[13]]));
        let payload = raw.slice(EthernetFrame::HEADER_SIZE..);

        let internet = match ethertype {
            EtherType::IPv4 => InternetFrame::Ipv4(self.ipv4.parse(&payload)?),
            EtherType::IPv6 => InternetFrame::Ipv6(self.ipv6.parse(&payload)?),
            EtherType::Custom(value) => {
                trace!(ethertype = value, "Unsupported ethertype");
                return None;
            }
        };

        Some(EthernetFrame {
            destination,
            source,
            ethertype,
            payload,
            internet,
            raw: raw.clone(),
        })
    }
}
