//! IPv6 packet decoding
//!
//! Only the fixed 40-byte header is decoded. Extension headers are not
//! followed: a next-header value other than TCP or UDP is a decode failure.

use bytes::Bytes;
use sniffer_core::Protocol;
use std::fmt;
use std::net::Ipv6Addr;
use tracing::trace;

use crate::byteview::{to_hexed_int, to_ipv6_address};
use crate::frame::{Describe, Frame, TransportFrame};
use crate::headers::Headers;
use crate::ipv4::{parse_transport, IpProtocol};
use crate::parser::FrameParser;
use crate::tcp::{TcpFrame, TcpParser};
use crate::udp::{UdpFrame, UdpParser};

/// Decoded IPv6 packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv6Frame {
    /// Version (always 6)
    version: u8,
    /// Traffic class (8 bits)
    traffic_class: u8,
    /// Flow label (20 bits)
    flow_label: u32,
    /// Payload length in bytes, as declared
    payload_length: u16,
    /// Next header protocol
    next_header: IpProtocol,
    /// Hop limit
    hop_limit: u8,
    /// Source address
    source: Ipv6Addr,
    /// Destination address
    destination: Ipv6Addr,
    /// Bytes after the header, handed to the transport parser
    payload: Bytes,
    /// Decoded transport frame
    transport: TransportFrame,
    raw: Bytes,
}

impl Ipv6Frame {
    /// Fixed IPv6 header size
    pub const HEADER_SIZE: usize = 40;

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn traffic_class(&self) -> u8 {
        self.traffic_class
    }

    /// Flow label (low 20 bits)
    pub fn flow_label(&self) -> u32 {
        self.flow_label
    }

    /// Payload length as declared
    pub fn payload_length(&self) -> u16 {
        self.payload_length
    }

    pub fn next_header(&self) -> IpProtocol {
        self.next_header
    }

    pub fn hop_limit(&self) -> u8 {
        self.hop_limit
    }

    pub fn source(&self) -> Ipv6Addr {
        self.source
    }

    pub fn destination(&self) -> Ipv6Addr {
        self.destination
    }

    /// Bytes handed to the transport parser
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Traffic class as hex, padded to 1 digit (e.g. `0x0`)
    pub fn traffic_class_hex(&self) -> String {
        to_hexed_int(self.traffic_class.into(), Some(1))
    }

    /// Flow label as hex, padded to 3 digits (e.g. `0x000`)
    pub fn flow_label_hex(&self) -> String {
        to_hexed_int(self.flow_label.into(), Some(3))
    }

    /// Transport frame carried by this packet
    pub fn transport(&self) -> &TransportFrame {
        &self.transport
    }
}

impl Frame for Ipv6Frame {
    fn protocol(&self) -> Protocol {
        Protocol::Ipv6
    }

    fn raw(&self) -> &Bytes {
        &self.raw
    }

    fn headers(&self) -> Headers<'_> {
        Headers::new()
            .with_bytes("version, class and flow label", self.raw.slice(0..4))
            .with_bytes("payload length", self.raw.slice(4..6))
            .with_bytes("next header", self.raw.slice(6..7))
            .with_bytes("hop limit", self.raw.slice(7..8))
            .with_bytes("source", self.raw.slice(8..24))
            .with_bytes("destination", self.raw.slice(24..40))
            .with_frame("transport", self.transport.as_any())
    }
}

impl Describe for Ipv6Frame {
    fn describe(&self, f: &mut fmt::Formatter<'_>, tab: &str) -> fmt::Result {
        writeln!(f, "{}IPv6 packet:", tab)?;
        writeln!(f, "{}Traffic class: {}", tab, self.traffic_class_hex())?;
        writeln!(f, "{}Flow label: {}", tab, self.flow_label_hex())?;
        writeln!(f, "{}Payload length: {}", tab, self.payload_length)?;
        writeln!(
            f,
            "{}Next header: {}",
            tab,
            to_hexed_int(self.next_header.to_u8().into(), Some(1))
        )?;
        writeln!(f, "{}Hop limit: {}", tab, self.hop_limit)?;
        writeln!(
            f,
            "{}Source: {}",
            tab,
            to_ipv6_address(&self.source.octets()).unwrap_or_default()
        )?;
        writeln!(
            f,
            "{}Destination: {}",
            tab,
            to_ipv6_address(&self.destination.octets()).unwrap_or_default()
        )?;
        self.transport.describe(f, &format!("{} ", tab))
    }
}

impl fmt::Display for Ipv6Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe(f, "")
    }
}

/// Decoder for IPv6 packets
///
/// Holds the transport parsers it dispatches to.
#[derive(Debug, Clone, Default)]
pub struct Ipv6Parser<T = TcpParser, U = UdpParser> {
    tcp: T,
    udp: U,
}

impl<T, U> Ipv6Parser<T, U>
where
    T: FrameParser<Output = TcpFrame>,
    U: FrameParser<Output = UdpFrame>,
{
    pub fn new(tcp: T, udp: U) -> Self {
        Self { tcp, udp }
    }
}

impl<T, U> FrameParser for Ipv6Parser<T, U>
where
    T: FrameParser<Output = TcpFrame>,
    U: FrameParser<Output = UdpFrame>,
{
    type Output = Ipv6Frame;

    fn parse(&self, raw: &Bytes) -> Option<Ipv6Frame> {
        if raw.len() < Ipv6Frame::HEADER_SIZE {
            return None;
        }

        let first_word = u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]);
        let version = (first_word >> 28) as u8;
        if version != 6 {
            trace!(version, "Not an IPv6 packet");
            return None;
        }
        let traffic_class = ((first_word >> 20) & 0xFF) as u8;
        let flow_label = first_word & 0x000F_FFFF;

        let payload_length = u16::from_be_bytes([raw[4], raw[5]]);
        let next_header = IpProtocol::from_u8(raw[6]);
        let hop_limit = raw[7];

        let mut source = [0u8; 16];
        source.copy_from_slice(&raw[8..24]);
        let mut destination = [0u8; 16];
        destination.copy_from_slice(&raw[24..40]);

        // Trailing link-layer padding stays out of the transport payload
        let end = (Ipv6Frame::HEADER_SIZE + usize::from(payload_length)).min(raw.len());
        let payload = raw.slice(Ipv6Frame::HEADER_SIZE..end);
        let transport = parse_transport(&self.tcp, &self.udp, next_header, &payload)?;

        Some(Ipv6Frame {
            version,
            traffic_class,
            flow_label,
            payload_length,
            next_header,
            hop_limit,
            source: Ipv6Addr::from(source),
            destination: Ipv6Addr::from(destination),
            payload,
            transport,
            raw: raw.clone(),
        })
    }
}
