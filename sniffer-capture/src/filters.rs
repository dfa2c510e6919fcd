//! Protocol filters over decoded frame trees

use sniffer_core::{Error, Layer, Protocol};
use sniffer_packet::{registry, EthernetFrame, Frame};
use std::fmt;
use std::str::FromStr;

/// Selects frames by the protocol of their internet or transport layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolFilter {
    /// Accept every decoded frame
    #[default]
    Any,
    /// Accept frames whose internet or transport frame has this protocol
    Only(Protocol),
}

impl ProtocolFilter {
    /// Protocol names accepted by [`FromStr`]
    pub fn choices() -> Vec<&'static str> {
        registry::INTERNET_PROTOCOLS
            .iter()
            .chain(registry::TRANSPORT_PROTOCOLS)
            .map(|p| p.name())
            .collect()
    }

    /// Whether `frame` passes the filter
    pub fn matches(&self, frame: &EthernetFrame) -> bool {
        match self {
            ProtocolFilter::Any => true,
            ProtocolFilter::Only(protocol) => {
                let internet = frame.internet();
                internet.protocol() == *protocol || internet.transport().protocol() == *protocol
            }
        }
    }
}

impl FromStr for ProtocolFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(ProtocolFilter::Any);
        }

        if registry::is_known(Layer::Internet, s) || registry::is_known(Layer::Transport, s) {
            return Ok(ProtocolFilter::Only(s.parse()?));
        }
        Err(Error::UnknownProtocol(s.to_string()))
    }
}

impl fmt::Display for ProtocolFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolFilter::Any => write!(f, "any"),
            ProtocolFilter::Only(protocol) => write!(f, "{}", protocol),
        }
    }
}
