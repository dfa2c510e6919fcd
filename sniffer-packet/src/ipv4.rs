//! IPv4 packet decoding
//!
//! This module decodes the fixed IPv4 header, skips options and the header
//! checksum, and hands the payload to the TCP or UDP parser selected by the
//! protocol field. The same protocol numbers are shared with IPv6.

use bytes::Bytes;
use sniffer_core::Protocol;
use std::fmt;
use std::net::Ipv4Addr;
use tracing::trace;

use crate::byteview::to_hexed_int;
use crate::frame::{Describe, Frame, TransportFrame};
use crate::headers::Headers;
use crate::parser::FrameParser;
use crate::tcp::{TcpFrame, TcpParser};
use crate::udp::{UdpFrame, UdpParser};

/// IP protocol numbers (IPv4 protocol / IPv6 next header)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpProtocol {
    /// TCP (6)
    TCP,
    /// UDP (17)
    UDP,
    /// Any protocol the decoder does not follow
    Custom(u8),
}

impl IpProtocol {
    pub fn to_u8(self) -> u8 {
        match self {
            IpProtocol::TCP => 6,
            IpProtocol::UDP => 17,
            IpProtocol::Custom(val) => val,
        }
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            6 => IpProtocol::TCP,
            17 => IpProtocol::UDP,
            val => IpProtocol::Custom(val),
        }
    }
}

impl fmt::Display for IpProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpProtocol::TCP => write!(f, "TCP"),
            IpProtocol::UDP => write!(f, "UDP"),
            IpProtocol::Custom(val) => write!(f, "{}", val),
        }
    }
}

/// Hand `payload` to the transport parser selected by `protocol`
///
/// Unknown protocols and transport decode failures both yield `None`.
pub(crate) fn parse_transport<T, U>(
    tcp: &T,
    udp: &U,
    protocol: IpProtocol,
    payload: &Bytes,
) -> Option<TransportFrame>
where
    T: FrameParser<Output = TcpFrame>,
    U: FrameParser<Output = UdpFrame>,
{
    match protocol {
        IpProtocol::TCP => tcp.parse(payload).map(TransportFrame::Tcp),
        IpProtocol::UDP => udp.parse(payload).map(TransportFrame::Udp),
        IpProtocol::Custom(number) => {
            trace!(protocol = number, "Unsupported transport protocol");
            None
        }
    }
}

/// Decoded IPv4 packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Frame {
    /// Version (always 4)
    version: u8,
    /// Header length in bytes (IHL * 4)
    header_length: usize,
    /// Total length (header + data) in bytes, as declared
    total_length: u16,
    /// Identification
    identification: u16,
    /// Flags (3 bits) and fragment offset (13 bits), undecoded
    flags_offset: u16,
    /// Time to Live
    ttl: u8,
    /// Protocol of the payload
    protocol: IpProtocol,
    /// Source IP address
    source: Ipv4Addr,
    /// Destination IP address
    destination: Ipv4Addr,
    /// Bytes after the header, handed to the transport parser
    payload: Bytes,
    /// Decoded transport frame
    transport: TransportFrame,
    raw: Bytes,
}

impl Ipv4Frame {
    /// Minimum IPv4 header size (without options)
    pub const MIN_HEADER_SIZE: usize = 20;

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Header length in bytes (IHL * 4), options included
    pub fn header_length(&self) -> usize {
        self.header_length
    }

    /// Total length as declared, not enforced
    pub fn total_length(&self) -> u16 {
        self.total_length
    }

    pub fn identification(&self) -> u16 {
        self.identification
    }

    /// Flags (3 bits) and fragment offset (13 bits), undecoded
    pub fn flags_offset(&self) -> u16 {
        self.flags_offset
    }

    pub fn ttl(&self) -> u8 {
        self.ttl
    }

    /// Protocol number of the payload
    pub fn ip_protocol(&self) -> IpProtocol {
        self.protocol
    }

    pub fn source(&self) -> Ipv4Addr {
        self.source
    }

    pub fn destination(&self) -> Ipv4Addr {
        self.destination
    }

    /// Bytes after the header, handed to the transport parser
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Flags/fragment-offset word as a 4-digit hex value (e.g. `0x4000`)
    pub fn flags_hex(&self) -> String {
        to_hexed_int(self.flags_offset.into(), Some(4))
    }

    /// Transport frame carried by this packet
    pub fn transport(&self) -> &TransportFrame {
        &self.transport
    }
}

impl Frame for Ipv4Frame {
    fn protocol(&self) -> Protocol {
        Protocol::Ipv4
    }

    fn raw(&self) -> &Bytes {
        &self.raw
    }

    fn headers(&self) -> Headers<'_> {
        Headers::new()
            .with_bytes("version and header length", self.raw.slice(0..1))
            .with_bytes("type of service", self.raw.slice(1..2))
            .with_bytes("total length", self.raw.slice(2..4))
            .with_bytes("identifier", self.raw.slice(4..6))
            .with_bytes("flags and offset", self.raw.slice(6..8))
            .with_bytes("ttl", self.raw.slice(8..9))
            .with_bytes("protocol", self.raw.slice(9..10))
            .with_bytes("checksum", self.raw.slice(10..12))
            .with_bytes("source", self.raw.slice(12..16))
            .with_bytes("destination", self.raw.slice(16..20))
            .with_bytes("options", self.raw.slice(20..self.header_length))
            .with_frame("transport", self.transport.as_any())
    }
}

impl Describe for Ipv4Frame {
    fn describe(&self, f: &mut fmt::Formatter<'_>, tab: &str) -> fmt::Result {
        writeln!(f, "{}IPv4 packet:", tab)?;
        writeln!(f, "{}Source: {}", tab, self.source)?;
        writeln!(f, "{}Destination: {}", tab, self.destination)?;
        writeln!(f, "{}Identifier: {}", tab, self.identification)?;
        writeln!(f, "{}Flags: {}", tab, self.flags_hex())?;
        writeln!(f, "{}TTL: {}", tab, self.ttl)?;
        writeln!(f, "{}Length: {}", tab, self.total_length)?;
        self.transport.describe(f, &format!("{} ", tab))
    }
}

impl fmt::Display for Ipv4Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe(f, "")
    }
}

/// Decoder for IPv4 packets
///
/// Holds the transport parsers it dispatches to.
#[derive(Debug, Clone, Default)]
pub struct Ipv4Parser<T = TcpParser, U = UdpParser> {
    tcp: T,
    udp: U,
}

impl<T, U> Ipv4Parser<T, U>
where
    T: FrameParser<Output = TcpFrame>,
    U: FrameParser<Output = UdpFrame>,
{
    pub fn new(tcp: T, udp: U) -> Self {
        Self { tcp, udp }
    }
}

impl<T, U> FrameParser for Ipv4Parser<T, U>
where
    T: FrameParser<Output = TcpFrame>,
    U: FrameParser<Output = UdpFrame>,
{
    type Output = Ipv4Frame;

    fn parse(&self, raw: &Bytes) -> Option<Ipv4Frame> {
        if raw.len() < Ipv4Frame::MIN_HEADER_SIZE {
            return None;
        }

        let version = raw[0] >> 4;
        if version != 4 {
            trace!(version, "Not an IPv4 packet");
            return None;
        }

        let header_length = usize::from(raw[0] & 0x0F) * 4;
        if header_length < Ipv4Frame::MIN_HEADER_SIZE || header_length > raw.len() {
            return None;
        }

        let total_length = u16::from_be_bytes([raw[2], raw[3]]);
        let identification = u16::from_be_bytes([raw[4], raw[5]]);
        let flags_offset = u16::from_be_bytes([raw[6], raw[7]]);
        let ttl = raw[8];
        let protocol = IpProtocol::from_u8(raw[9]);
        // 10..12 is the header checksum, not validated
        let source = Ipv4Addr::new(raw[12], raw[13], raw[14], raw[15]);
        let destination = Ipv4Addr::new(raw[16], raw[17], raw[18], raw[19]);

        let payload = raw.slice(header_length..);
        let transport = parse_transport(&self.tcp, &self.udp, protocol, &payload)?;

        Some(Ipv4Frame {
            version,
            header_length,
            total_length,
            identification,
            flags_offset,
            ttl,
            protocol,
            source,
            destination,
            payload,
            transport,
            raw: raw.clone(),
        })
    }
}
