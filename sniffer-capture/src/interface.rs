//! Network interface enumeration and lookup

use pnet_datalink::{self, NetworkInterface};
use sniffer_core::{Error, Result};
use std::net::IpAddr;

/// Information about a network interface
#[derive(Debug, Clone)]
pub struct InterfaceInfo {
    /// Interface name (e.g., "eth0", "wlan0")
    pub name: String,
    /// MAC address if available
    pub mac: Option<String>,
    /// List of IP addresses assigned to this interface
    pub ips: Vec<IpAddr>,
    /// Whether the interface is up
    pub is_up: bool,
    /// Whether the interface is a loopback
    pub is_loopback: bool,
}

impl From<&NetworkInterface> for InterfaceInfo {
    fn from(iface: &NetworkInterface) -> Self {
        InterfaceInfo {
            name: iface.name.clone(),
            mac: iface.mac.map(|mac| mac.to_string().to_uppercase()),
            ips: iface.ips.iter().map(|network| network.ip()).collect(),
            is_up: iface.is_up(),
            is_loopback: iface.is_loopback(),
        }
    }
}

impl InterfaceInfo {
    /// Whether the interface is worth capturing on by default
    pub fn is_capture_capable(&self) -> bool {
        self.is_up && !self.is_loopback
    }
}

/// List all available network interfaces
pub fn list_interfaces() -> Vec<InterfaceInfo> {
    pnet_datalink::interfaces()
        .iter()
        .map(InterfaceInfo::from)
        .collect()
}

/// Get information about a specific interface by name
pub fn get_interface(name: &str) -> Result<InterfaceInfo> {
    pnet_datalink::interfaces()
        .iter()
        .find(|iface| iface.name == name)
        .map(InterfaceInfo::from)
        .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))
}

/// Find the default interface (first up, non-loopback interface)
pub fn default_interface() -> Result<InterfaceInfo> {
    list_interfaces()
        .into_iter()
        .find(InterfaceInfo::is_capture_capable)
        .ok_or_else(|| Error::capture("No suitable default interface found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_nonexistent_interface() {
        match get_interface("nonexistent_interface_xyz") {
            Err(Error::InterfaceNotFound(name)) => assert_eq!(name, "nonexistent_interface_xyz"),
            other => panic!("Expected InterfaceNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_interface_info_properties() {
        for iface in list_interfaces() {
            assert!(!iface.name.is_empty());

            if iface.is_loopback {
                assert!(!iface.is_capture_capable());
            }
            if iface.is_up && !iface.is_loopback {
                assert!(iface.is_capture_capable());
            }
        }
    }

    #[test]
    fn test_listed_interfaces_resolve() {
        for iface in list_interfaces() {
            let found = get_interface(&iface.name).unwrap();
            assert_eq!(found.name, iface.name);
        }
    }
}
