//! Statically declared registry of known frame protocols per layer

use sniffer_core::{Layer, Protocol};

/// Protocols decoded on the link layer
pub const LINK_PROTOCOLS: &[Protocol] = &[Protocol::Ethernet];

/// Protocols decoded on the internet layer
pub const INTERNET_PROTOCOLS: &[Protocol] = &[Protocol::Ipv4, Protocol::Ipv6];

/// Protocols decoded on the transport layer
pub const TRANSPORT_PROTOCOLS: &[Protocol] = &[Protocol::Tcp, Protocol::Udp];

/// Known protocols of a layer
pub fn protocols(layer: Layer) -> &'static [Protocol] {
    match layer {
        Layer::Link => LINK_PROTOCOLS,
        Layer::Internet => INTERNET_PROTOCOLS,
        Layer::Transport => TRANSPORT_PROTOCOLS,
    }
}

/// Whether a protocol name is decoded on the given layer
pub fn is_known(layer: Layer, name: &str) -> bool {
    protocols(layer)
        .iter()
        .any(|p| p.name().eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_matches_protocol_layers() {
        for layer in [Layer::Link, Layer::Internet, Layer::Transport] {
            for protocol in protocols(layer) {
                assert_eq!(protocol.layer(), layer);
            }
        }

        let total = LINK_PROTOCOLS.len() + INTERNET_PROTOCOLS.len() + TRANSPORT_PROTOCOLS.len();
        assert_eq!(total, Protocol::ALL.len());
    }

    #[test]
    fn test_is_known() {
        assert!(is_known(Layer::Internet, "ipv6"));
        assert!(is_known(Layer::Transport, "TCP"));
        assert!(!is_known(Layer::Transport, "ipv4"));
        assert!(!is_known(Layer::Link, "wifi"));
    }
}
