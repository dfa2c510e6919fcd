//! Frame acquisition and capture-file output for the sniffer
//!
//! ## Features
//!
//! - **Frame sources**: a libpcap-backed live source and an in-memory source
//! - **Frame generator**: decodes raw buffers and skips undecodable ones
//! - **Capture writer**: classic libpcap file output, optionally disabled
//! - **Protocol filters**: select frames by internet or transport protocol
//! - **Statistics**: counters for received, decoded and discarded buffers
//!
//! ## Example
//!
//! ```no_run
//! use sniffer_capture::{CaptureConfig, CaptureWriter, FrameGenerator, PcapSource};
//! use sniffer_packet::Frame;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = PcapSource::open(Some("eth0"), &CaptureConfig::default())?;
//! let mut generator = FrameGenerator::new(source);
//! let mut writer = CaptureWriter::create(Some("out.pcap"))?;
//!
//! for frame in generator.frames().take(10) {
//!     let frame = frame?;
//!     writer.save(frame.raw())?;
//!     println!("{}", frame);
//! }
//! writer.close()?;
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod filters;
pub mod generator;
pub mod interface;
pub mod source;
pub mod stats;
pub mod writer;

// Re-export main types
pub use capture::{CaptureConfig, PcapSource};
pub use filters::ProtocolFilter;
pub use generator::{FrameGenerator, Frames};
pub use interface::{default_interface, get_interface, list_interfaces, InterfaceInfo};
pub use source::{FrameSource, VecSource};
pub use stats::{CaptureStats, StatsAccumulator};
pub use writer::{CaptureWriter, GlobalHeader, RecordHeader, WriterState};
