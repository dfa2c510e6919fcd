//! Live frame source backed by libpcap

use bytes::Bytes;
use pcap::{Active, Capture, Device, Linktype};
use sniffer_core::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace};

use crate::interface::{default_interface, get_interface, InterfaceInfo};
use crate::source::FrameSource;

/// Default snapshot length (maximum bytes per frame)
const DEFAULT_SNAPLEN: i32 = 65535;

/// Default read timeout (milliseconds)
const DEFAULT_TIMEOUT_MS: i32 = 1000;

/// Configuration for a live capture
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Maximum bytes to capture per frame
    pub snaplen: i32,
    /// Read timeout in milliseconds; also bounds how long a stop request waits
    pub timeout_ms: i32,
    /// Enable promiscuous mode
    pub promiscuous: bool,
    /// Buffer size (0 = default)
    pub buffer_size: i32,
    /// Enable immediate mode (deliver frames immediately)
    pub immediate_mode: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            snaplen: DEFAULT_SNAPLEN,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            promiscuous: true,
            buffer_size: 0,
            immediate_mode: true,
        }
    }
}

/// Raw Ethernet frames read from a network interface
///
/// Every call to [`FrameSource::receive`] blocks until one complete link-layer
/// frame arrives. Read timeouts are absorbed internally; the stop flag is
/// checked between them so a blocked receive returns [`Error::Interrupted`]
/// within one timeout period of the flag being raised.
pub struct PcapSource {
    interface: InterfaceInfo,
    capture: Capture<Active>,
    stop: Arc<AtomicBool>,
}

impl PcapSource {
    /// Open a capture on `interface`, or on the default interface when `None`
    pub fn open(interface: Option<&str>, config: &CaptureConfig) -> Result<Self> {
        let interface = match interface {
            Some(name) => get_interface(name)?,
            None => default_interface()?,
        };

        if !interface.is_up {
            return Err(Error::Capture(format!(
                "Interface '{}' is not up",
                interface.name
            )));
        }

        debug!("Opening pcap capture on {}", interface.name);

        let device = Device::from(interface.name.as_str());
        let mut inactive = Capture::from_device(device)
            .map_err(|e| map_pcap_error(&interface.name, e))?
            .promisc(config.promiscuous)
            .snaplen(config.snaplen)
            .timeout(config.timeout_ms)
            .immediate_mode(config.immediate_mode);

        if config.buffer_size > 0 {
            inactive = inactive.buffer_size(config.buffer_size);
        }

        let capture = inactive
            .open()
            .map_err(|e| map_pcap_error(&interface.name, e))?;

        check_linktype(capture.get_datalink())?;

        info!("Capture opened on {}", interface.name);

        Ok(Self {
            interface,
            capture,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Share an externally owned stop flag with this source
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    /// Handle to the stop flag; storing `true` interrupts a blocked receive
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// The interface this source reads from
    pub fn interface(&self) -> &InterfaceInfo {
        &self.interface
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

impl FrameSource for PcapSource {
    fn receive(&mut self) -> Result<Bytes> {
        loop {
            if self.stopped() {
                return Err(Error::interrupted("capture stopped"));
            }

            match self.capture.next_packet() {
                Ok(packet) => {
                    trace!("Received {} bytes on {}", packet.data.len(), self.interface.name);
                    return Ok(Bytes::copy_from_slice(packet.data));
                }
                Err(pcap::Error::TimeoutExpired) => continue,
                Err(e) => return Err(map_pcap_error(&self.interface.name, e)),
            }
        }
    }
}

fn check_linktype(linktype: Linktype) -> Result<()> {
    if linktype == Linktype::ETHERNET {
        return Ok(());
    }
    let name = linktype
        .get_name()
        .unwrap_or_else(|_| format!("DLT {}", linktype.0));
    Err(Error::LinkType(name))
}

fn map_pcap_error(interface: &str, err: pcap::Error) -> Error {
    let message = err.to_string();
    let lower = message.to_lowercase();

    if lower.contains("permission") || lower.contains("not permitted") {
        Error::InsufficientPrivileges(message)
    } else if lower.contains("no such device") {
        Error::InterfaceNotFound(interface.to_string())
    } else {
        Error::Capture(message)
    }
}
