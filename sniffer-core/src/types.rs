//! Layer and protocol tags shared by every decoded frame

use std::fmt;
use std::str::FromStr;

/// Position of a frame in the decoding chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// Link layer (Ethernet)
    Link,
    /// Internet layer (IPv4, IPv6)
    Internet,
    /// Transport layer (TCP, UDP)
    Transport,
}

impl Layer {
    /// Lowercase name of the layer
    pub fn name(self) -> &'static str {
        match self {
            Layer::Link => "link",
            Layer::Internet => "internet",
            Layer::Transport => "transport",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Protocol tag of a decoded frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Ethernet II
    Ethernet,
    /// IPv4
    Ipv4,
    /// IPv6
    Ipv6,
    /// TCP
    Tcp,
    /// UDP
    Udp,
}

impl Protocol {
    /// Every protocol the decoder knows, outermost layer first
    pub const ALL: [Protocol; 5] = [
        Protocol::Ethernet,
        Protocol::Ipv4,
        Protocol::Ipv6,
        Protocol::Tcp,
        Protocol::Udp,
    ];

    /// Short lowercase name (e.g., "ipv4")
    pub fn name(self) -> &'static str {
        match self {
            Protocol::Ethernet => "ethernet",
            Protocol::Ipv4 => "ipv4",
            Protocol::Ipv6 => "ipv6",
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }

    /// Layer frames of this protocol live on
    pub fn layer(self) -> Layer {
        match self {
            Protocol::Ethernet => Layer::Link,
            Protocol::Ipv4 | Protocol::Ipv6 => Layer::Internet,
            Protocol::Tcp | Protocol::Udp => Layer::Transport,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Protocol {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Protocol::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::Error::UnknownProtocol(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_layers() {
        assert_eq!(Protocol::Ethernet.layer(), Layer::Link);
        assert_eq!(Protocol::Ipv6.layer(), Layer::Internet);
        assert_eq!(Protocol::Udp.layer(), Layer::Transport);
    }

    #[test]
    fn test_protocol_from_str() {
        assert_eq!("tcp".parse::<Protocol>().unwrap(), Protocol::Tcp);
        assert_eq!("IPv4".parse::<Protocol>().unwrap(), Protocol::Ipv4);
        assert!("icmp".parse::<Protocol>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Protocol::Ipv6.to_string(), "ipv6");
        assert_eq!(Layer::Transport.to_string(), "transport");
    }
}
