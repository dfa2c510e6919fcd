//! Frame model shared by every protocol layer
//!
//! Concrete frames ([`EthernetFrame`], [`Ipv4Frame`], [`Ipv6Frame`],
//! [`TcpFrame`], [`UdpFrame`]) each own their typed header fields, the raw
//! bytes they were decoded from and, for link and internet frames, exactly
//! one child frame. The closed set of variants is exposed through
//! [`InternetFrame`], [`TransportFrame`] and [`AnyFrame`]; the [`Frame`] trait
//! is the read surface common to all of them.

use bytes::Bytes;
use sniffer_core::{Layer, Protocol};
use std::fmt;

use crate::ethernet::EthernetFrame;
use crate::headers::Headers;
use crate::ipv4::Ipv4Frame;
use crate::ipv6::Ipv6Frame;
use crate::tcp::TcpFrame;
use crate::udp::UdpFrame;

/// Read surface implemented by every decoded frame
pub trait Frame {
    /// Protocol tag of this frame
    fn protocol(&self) -> Protocol;

    /// The exact bytes this frame was decoded from
    fn raw(&self) -> &Bytes;

    /// Ordered header table of this frame
    fn headers(&self) -> Headers<'_>;

    /// Layer this frame lives on
    fn layer(&self) -> Layer {
        self.protocol().layer()
    }
}

/// Writes a multi-line description, every line prefixed with `tab`
pub(crate) trait Describe {
    fn describe(&self, f: &mut fmt::Formatter<'_>, tab: &str) -> fmt::Result;
}

/// Frame on the internet layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternetFrame {
    /// IPv4 packet
    Ipv4(Ipv4Frame),
    /// IPv6 packet
    Ipv6(Ipv6Frame),
}

impl InternetFrame {
    /// Transport frame carried by this packet
    pub fn transport(&self) -> &TransportFrame {
        match self {
            InternetFrame::Ipv4(frame) => frame.transport(),
            InternetFrame::Ipv6(frame) => frame.transport(),
        }
    }

    /// Borrow as a tagged frame
    pub fn as_any(&self) -> AnyFrame<'_> {
        match self {
            InternetFrame::Ipv4(frame) => AnyFrame::Ipv4(frame),
            InternetFrame::Ipv6(frame) => AnyFrame::Ipv6(frame),
        }
    }
}

impl Frame for InternetFrame {
    fn protocol(&self) -> Protocol {
        self.as_any().protocol()
    }

    fn raw(&self) -> &Bytes {
        match self {
            InternetFrame::Ipv4(frame) => frame.raw(),
            InternetFrame::Ipv6(frame) => frame.raw(),
        }
    }

    fn headers(&self) -> Headers<'_> {
        match self {
            InternetFrame::Ipv4(frame) => frame.headers(),
            InternetFrame::Ipv6(frame) => frame.headers(),
        }
    }
}

impl Describe for InternetFrame {
    fn describe(&self, f: &mut fmt::Formatter<'_>, tab: &str) -> fmt::Result {
        match self {
            InternetFrame::Ipv4(frame) => frame.describe(f, tab),
            InternetFrame::Ipv6(frame) => frame.describe(f, tab),
        }
    }
}

impl fmt::Display for InternetFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe(f, "")
    }
}

/// Frame on the transport layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFrame {
    /// TCP segment
    Tcp(TcpFrame),
    /// UDP datagram
    Udp(UdpFrame),
}

impl TransportFrame {
    /// Borrow as a tagged frame
    pub fn as_any(&self) -> AnyFrame<'_> {
        match self {
            TransportFrame::Tcp(frame) => AnyFrame::Tcp(frame),
            TransportFrame::Udp(frame) => AnyFrame::Udp(frame),
        }
    }

    /// Application payload carried by the segment or datagram
    pub fn payload(&self) -> &Bytes {
        match self {
            TransportFrame::Tcp(frame) => frame.payload(),
            TransportFrame::Udp(frame) => frame.payload(),
        }
    }
}

impl Frame for TransportFrame {
    fn protocol(&self) -> Protocol {
        self.as_any().protocol()
    }

    fn raw(&self) -> &Bytes {
        match self {
            TransportFrame::Tcp(frame) => frame.raw(),
            TransportFrame::Udp(frame) => frame.raw(),
        }
    }

    fn headers(&self) -> Headers<'_> {
        match self {
            TransportFrame::Tcp(frame) => frame.headers(),
            TransportFrame::Udp(frame) => frame.headers(),
        }
    }
}

impl Describe for TransportFrame {
    fn describe(&self, f: &mut fmt::Formatter<'_>, tab: &str) -> fmt::Result {
        match self {
            TransportFrame::Tcp(frame) => frame.describe(f, tab),
            TransportFrame::Udp(frame) => frame.describe(f, tab),
        }
    }
}

impl fmt::Display for TransportFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe(f, "")
    }
}

/// Borrowed frame of any protocol, tagged by variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyFrame<'a> {
    Ethernet(&'a EthernetFrame),
    Ipv4(&'a Ipv4Frame),
    Ipv6(&'a Ipv6Frame),
    Tcp(&'a TcpFrame),
    Udp(&'a UdpFrame),
}

impl<'a> AnyFrame<'a> {
    /// The frame one layer further in, if any
    pub fn child(self) -> Option<AnyFrame<'a>> {
        match self {
            AnyFrame::Ethernet(frame) => Some(frame.internet().as_any()),
            AnyFrame::Ipv4(frame) => Some(frame.transport().as_any()),
            AnyFrame::Ipv6(frame) => Some(frame.transport().as_any()),
            AnyFrame::Tcp(_) | AnyFrame::Udp(_) => None,
        }
    }
}

impl Frame for AnyFrame<'_> {
    fn protocol(&self) -> Protocol {
        match self {
            AnyFrame::Ethernet(_) => Protocol::Ethernet,
            AnyFrame::Ipv4(_) => Protocol::Ipv4,
            AnyFrame::Ipv6(_) => Protocol::Ipv6,
            AnyFrame::Tcp(_) => Protocol::Tcp,
            AnyFrame::Udp(_) => Protocol::Udp,
        }
    }

    fn raw(&self) -> &Bytes {
        match self {
            AnyFrame::Ethernet(frame) => frame.raw(),
            AnyFrame::Ipv4(frame) => frame.raw(),
            AnyFrame::Ipv6(frame) => frame.raw(),
            AnyFrame::Tcp(frame) => frame.raw(),
            AnyFrame::Udp(frame) => frame.raw(),
        }
    }

    fn headers(&self) -> Headers<'_> {
        match self {
            AnyFrame::Ethernet(frame) => frame.headers(),
            AnyFrame::Ipv4(frame) => frame.headers(),
            AnyFrame::Ipv6(frame) => frame.headers(),
            AnyFrame::Tcp(frame) => frame.headers(),
            AnyFrame::Udp(frame) => frame.headers(),
        }
    }
}

/// Iterator over a frame tree, outermost layer first
#[derive(Debug, Clone)]
pub struct Layers<'a> {
    next: Option<AnyFrame<'a>>,
}

impl<'a> Layers<'a> {
    pub(crate) fn new(root: AnyFrame<'a>) -> Self {
        Self { next: Some(root) }
    }
}

impl<'a> Iterator for Layers<'a> {
    type Item = AnyFrame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.child();
        Some(current)
    }
}
