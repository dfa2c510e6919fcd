//! TCP segment decoding
//!
//! A TCP header is at least 20 bytes. The 16-bit word at offset 12 carries
//! the data offset in its top 4 bits and the control flags in its low 9 bits;
//! the six classic flags (URG, ACK, PSH, RST, SYN, FIN) are decoded.

use bytes::Bytes;
use sniffer_core::Protocol;
use std::fmt;

use crate::byteview::{to_hex_dump, to_hexed_int};
use crate::frame::{Describe, Frame};
use crate::headers::Headers;
use crate::parser::FrameParser;

/// TCP control flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TcpFlags {
    /// URG - Urgent pointer field is significant
    pub urg: bool,
    /// ACK - Acknowledgment field is significant
    pub ack: bool,
    /// PSH - Push function
    pub psh: bool,
    /// RST - Reset the connection
    pub rst: bool,
    /// SYN - Synchronize sequence numbers
    pub syn: bool,
    /// FIN - No more data from sender
    pub fin: bool,
}

impl TcpFlags {
    /// No flags set
    pub const NONE: TcpFlags = TcpFlags {
        urg: false,
        ack: false,
        psh: false,
        rst: false,
        syn: false,
        fin: false,
    };

    /// SYN flag (connection initiation)
    pub const SYN: TcpFlags = TcpFlags {
        syn: true,
        ..TcpFlags::NONE
    };

    /// SYN+ACK flags (connection acknowledgment)
    pub const SYN_ACK: TcpFlags = TcpFlags {
        syn: true,
        ack: true,
        ..TcpFlags::NONE
    };

    /// FIN+ACK flags (connection termination)
    pub const FIN_ACK: TcpFlags = TcpFlags {
        fin: true,
        ack: true,
        ..TcpFlags::NONE
    };

    /// Decode the flag bits of the data-offset/flags word
    pub fn from_bits(word: u16) -> Self {
        TcpFlags {
            urg: word & 0b0010_0000 != 0,
            ack: word & 0b0001_0000 != 0,
            psh: word & 0b0000_1000 != 0,
            rst: word & 0b0000_0100 != 0,
            syn: word & 0b0000_0010 != 0,
            fin: word & 0b0000_0001 != 0,
        }
    }

    /// Encode back into the low 6 bits
    pub fn bits(self) -> u16 {
        let mut bits = 0u16;
        if self.urg {
            bits |= 0b0010_0000;
        }
        if self.ack {
            bits |= 0b0001_0000;
        }
        if self.psh {
            bits |= 0b0000_1000;
        }
        if self.rst {
            bits |= 0b0000_0100;
        }
        if self.syn {
            bits |= 0b0000_0010;
        }
        if self.fin {
            bits |= 0b0000_0001;
        }
        bits
    }
}

impl fmt::Display for TcpFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "URG={} ACK={} PSH={} RST={} SYN={} FIN={}",
            self.urg as u8,
            self.ack as u8,
            self.psh as u8,
            self.rst as u8,
            self.syn as u8,
            self.fin as u8
        )
    }
}

/// Decoded TCP segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpFrame {
    /// Source port
    source_port: u16,
    /// Destination port
    destination_port: u16,
    /// Sequence number
    sequence_number: u32,
    /// Acknowledgment number
    acknowledgment_number: u32,
    /// Header length in bytes (data offset * 4)
    header_length: usize,
    /// Control flags
    flags: TcpFlags,
    /// Window size
    window_size: u16,
    /// Urgent pointer
    urgent_pointer: u16,
    /// Bytes after the header
    payload: Bytes,
    raw: Bytes,
}

impl TcpFrame {
    /// Minimum TCP header size (without options)
    pub const MIN_HEADER_SIZE: usize = 20;

    pub fn source_port(&self) -> u16 {
        self.source_port
    }

    pub fn destination_port(&self) -> u16 {
        self.destination_port
    }

    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    pub fn acknowledgment_number(&self) -> u32 {
        self.acknowledgment_number
    }

    /// Header length in bytes (data offset * 4); may exceed the buffer
    pub fn header_length(&self) -> usize {
        self.header_length
    }

    pub fn flags(&self) -> TcpFlags {
        self.flags
    }

    pub fn window_size(&self) -> u16 {
        self.window_size
    }

    pub fn urgent_pointer(&self) -> u16 {
        self.urgent_pointer
    }

    /// Bytes after the header
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Option bytes between the fixed header and the payload
    pub fn options(&self) -> Bytes {
        let end = self.header_length.min(self.raw.len());
        self.raw.slice(Self::MIN_HEADER_SIZE.min(end)..end)
    }
}

impl Frame for TcpFrame {
    fn protocol(&self) -> Protocol {
        Protocol::Tcp
    }

    fn raw(&self) -> &Bytes {
        &self.raw
    }

    fn headers(&self) -> Headers<'_> {
        Headers::new()
            .with_bytes("source port", self.raw.slice(0..2))
            .with_bytes("destination port", self.raw.slice(2..4))
            .with_bytes("sequence number", self.raw.slice(4..8))
            .with_bytes("acknowledgment number", self.raw.slice(8..12))
            .with_bytes("offset and flags", self.raw.slice(12..14))
            .with_bytes("window size", self.raw.slice(14..16))
            .with_bytes("checksum", self.raw.slice(16..18))
            .with_bytes("urgent pointer", self.raw.slice(18..20))
            .with_bytes("options", self.options())
            .with_bytes("data", self.payload.clone())
    }
}

impl Describe for TcpFrame {
    fn describe(&self, f: &mut fmt::Formatter<'_>, tab: &str) -> fmt::Result {
        writeln!(f, "{}TCP segment:", tab)?;
        writeln!(f, "{}Source port: {}", tab, self.source_port)?;
        writeln!(f, "{}Destination port: {}", tab, self.destination_port)?;
        writeln!(
            f,
            "{}Sequence number: {}",
            tab,
            to_hexed_int(self.sequence_number.into(), Some(8))
        )?;
        writeln!(
            f,
            "{}Acknowledgment number: {}",
            tab,
            to_hexed_int(self.acknowledgment_number.into(), Some(8))
        )?;
        writeln!(f, "{}Header length: {}", tab, self.header_length)?;
        writeln!(f, "{}Flags: {}", tab, self.flags)?;
        writeln!(f, "{}Window size: {}", tab, self.window_size)?;
        writeln!(f, "{}Urgent pointer: {}", tab, self.urgent_pointer)?;
        writeln!(f, "{}Data ({} bytes):", tab, self.payload.len())?;
        f.write_str(&to_hex_dump(&self.payload, 16, &format!("{} ", tab)))
    }
}

impl fmt::Display for TcpFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe(f, "")
    }
}

/// Decoder for TCP segments
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpParser;

impl TcpParser {
    pub fn new() -> Self {
        TcpParser
    }
}

impl FrameParser for TcpParser {
    type Output = TcpFrame;

    fn parse(&self, raw: &Bytes) -> Option<TcpFrame> {
        if raw.len() < TcpFrame::MIN_HEADER_SIZE {
            return None;
        }

        let source_port = u16::from_be_bytes([raw[0], raw[1]]);
        let destination_port = u16::from_be_bytes([raw[2], raw[3]]);
        let sequence_number = u32::from_be_bytes([raw[4], raw[5], raw[6], raw[7]]);
        let acknowledgment_number = u32::from_be_bytes([raw[8], raw[9], raw[10], raw[11]]);

        let offset_flags = u16::from_be_bytes([raw[12], raw[13]]);
        let header_length = usize::from(offset_flags >> 12) * 4;
        if header_length < TcpFrame::MIN_HEADER_SIZE {
            return None;
        }
        let flags = TcpFlags::from_bits(offset_flags & 0x01FF);

        let window_size = u16::from_be_bytes([raw[14], raw[15]]);
        // 16..18 is the checksum, not validated
        let urgent_pointer = u16::from_be_bytes([raw[18], raw[19]]);

        let payload = raw.slice(header_length.min(raw.len())..);

        Some(TcpFrame {
            source_port,
            destination_port,
            sequence_number,
            acknowledgment_number,
            header_length,
            flags,
            window_size,
            urgent_pointer,
            payload,
            raw: raw.clone(),
        })
    }
}
