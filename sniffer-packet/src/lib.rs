//! Layered frame decoding for the sniffer
//!
//! This crate turns raw link-layer buffers into a tree of typed frames:
//!
//! - **Ethernet II** frames carrying
//! - **IPv4** or **IPv6** packets carrying
//! - **TCP** segments or **UDP** datagrams
//!
//! # Architecture
//!
//! - [`parser`] - the [`FrameParser`] capability every layer implements
//! - [`ethernet`], [`ipv4`], [`ipv6`], [`tcp`], [`udp`] - one frame type and
//!   one parser per protocol
//! - [`frame`] - the [`Frame`] read surface and the tagged variants
//! - [`headers`] - name-keyed header tables derived from a frame
//! - [`registry`] - known protocols per layer
//! - [`byteview`] - hex, MAC and IP formatting helpers
//!
//! Parsers that dispatch to a next layer hold that layer's parsers, injected
//! at construction. Decoding is all-or-nothing: if an inner layer fails,
//! the outer parser returns `None` as well.
//!
//! # Example
//!
//! ```rust
//! use bytes::Bytes;
//! use sniffer_packet::{EthernetParser, FrameParser, Ipv4Parser, Ipv6Parser, TcpParser, UdpParser};
//!
//! let ethernet = EthernetParser::new(
//!     Ipv4Parser::new(TcpParser::new(), UdpParser::new()),
//!     Ipv6Parser::new(TcpParser::new(), UdpParser::new()),
//! );
//!
//! // ARP is not decoded
//! let mut raw = vec![0xFF; 12];
//! raw.extend_from_slice(&[0x08, 0x06]);
//! raw.extend_from_slice(&[0u8; 28]);
//! assert!(ethernet.parse(&Bytes::from(raw)).is_none());
//! ```

pub mod byteview;
pub mod ethernet;
pub mod frame;
pub mod headers;
pub mod ipv4;
pub mod ipv6;
pub mod parser;
pub mod registry;
pub mod tcp;
pub mod udp;

#[cfg(test)]
mod testutil;

// Re-export commonly used types for convenience
pub use ethernet::{EtherType, EthernetFrame, EthernetParser, MacAddress};
pub use frame::{AnyFrame, Frame, InternetFrame, Layers, TransportFrame};
pub use headers::{HeaderValue, Headers};
pub use ipv4::{IpProtocol, Ipv4Frame, Ipv4Parser};
pub use ipv6::{Ipv6Frame, Ipv6Parser};
pub use parser::FrameParser;
pub use sniffer_core::{Layer, Protocol};
pub use tcp::{TcpFlags, TcpFrame, TcpParser};
pub use udp::{UdpFrame, UdpParser};
