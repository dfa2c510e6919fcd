//! Capture file writer (classic libpcap format)
//!
//! A capture file is a 24-byte global header followed by one 16-byte record
//! header plus the raw frame bytes per captured frame. All integers are
//! written little-endian; readers detect the byte order from the magic
//! number.

use bytes::{BufMut, BytesMut};
use sniffer_core::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Magic number identifying a microsecond-resolution capture file
pub const PCAP_MAGIC: u32 = 0xA1B2_C3D4;

/// File format major version
pub const VERSION_MAJOR: u16 = 2;

/// File format minor version
pub const VERSION_MINOR: u16 = 4;

/// Snapshot length declared in the global header
pub const SNAPLEN: u32 = 65535;

/// LINKTYPE_ETHERNET
pub const LINKTYPE_ETHERNET: u32 = 1;

/// Global header written once at the start of the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalHeader {
    pub magic_number: u32,
    pub version_major: u16,
    pub version_minor: u16,
    /// GMT to local correction in seconds
    pub thiszone: i32,
    /// Accuracy of timestamps
    pub sigfigs: u32,
    pub snaplen: u32,
    /// Link-layer header type
    pub network: u32,
}

impl GlobalHeader {
    /// Global header size in bytes
    pub const SIZE: usize = 24;

    /// Serialize to the on-disk layout
    pub fn to_bytes(&self) -> BytesMut {
        let mut buffer = BytesMut::with_capacity(Self::SIZE);
        buffer.put_u32_le(self.magic_number);
        buffer.put_u16_le(self.version_major);
        buffer.put_u16_le(self.version_minor);
        buffer.put_i32_le(self.thiszone);
        buffer.put_u32_le(self.sigfigs);
        buffer.put_u32_le(self.snaplen);
        buffer.put_u32_le(self.network);
        buffer
    }
}

impl Default for GlobalHeader {
    fn default() -> Self {
        Self {
            magic_number: PCAP_MAGIC,
            version_major: VERSION_MAJOR,
            version_minor: VERSION_MINOR,
            thiszone: 0,
            sigfigs: 0,
            snaplen: SNAPLEN,
            network: LINKTYPE_ETHERNET,
        }
    }
}

/// Header preceding every captured frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Timestamp seconds
    pub ts_sec: u32,
    /// Timestamp microseconds
    pub ts_usec: u32,
    /// Number of bytes saved in the file
    pub incl_len: u32,
    /// Length of the frame on the wire
    pub orig_len: u32,
}

impl RecordHeader {
    /// Record header size in bytes
    pub const SIZE: usize = 16;

    /// Header for an untruncated frame of `len` bytes captured at `timestamp`
    pub fn new(len: usize, timestamp: SystemTime) -> Self {
        let since_epoch = timestamp.duration_since(UNIX_EPOCH).unwrap_or_default();
        let len = u32::try_from(len).unwrap_or(u32::MAX);

        Self {
            ts_sec: since_epoch.as_secs() as u32,
            ts_usec: since_epoch.subsec_micros(),
            incl_len: len,
            orig_len: len,
        }
    }

    /// Serialize to the on-disk layout
    pub fn to_bytes(&self) -> BytesMut {
        let mut buffer = BytesMut::with_capacity(Self::SIZE);
        buffer.put_u32_le(self.ts_sec);
        buffer.put_u32_le(self.ts_usec);
        buffer.put_u32_le(self.incl_len);
        buffer.put_u32_le(self.orig_len);
        buffer
    }
}

/// Lifecycle of a capture writer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    /// No destination; writes are accepted and dropped
    Unopened,
    /// Global header written, records may be appended
    Open,
    /// Destination released, no further writes
    Closed,
}

/// Writes raw frames into a capture file
///
/// The sink is released on [`close`](Self::close) or when the writer is
/// dropped, whichever comes first. Every record is flushed as it is saved,
/// so the file stays readable if the process stops abruptly.
pub struct CaptureWriter<W: Write> {
    sink: Option<W>,
    state: WriterState,
    enabled: bool,
    frames_written: u64,
}

impl CaptureWriter<BufWriter<File>> {
    /// Create (or truncate) a capture file, or a disabled writer for `None`
    pub fn create<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) => {
                let path = path.as_ref();
                let file = File::create(path)?;
                info!("Saving capture to {}", path.display());
                Self::new(Some(BufWriter::new(file)))
            }
            None => Ok(Self::new_disabled()),
        }
    }
}

impl<W: Write> CaptureWriter<W> {
    /// Open a writer on `sink`, writing the global header immediately
    ///
    /// `None` yields a disabled writer that accepts writes without output.
    pub fn new(sink: Option<W>) -> Result<Self> {
        let Some(sink) = sink else {
            return Ok(Self::new_disabled());
        };

        let mut writer = Self {
            sink: Some(sink),
            state: WriterState::Unopened,
            enabled: true,
            frames_written: 0,
        };
        writer.write_raw(&GlobalHeader::default().to_bytes())?;
        writer.state = WriterState::Open;
        debug!("Capture writer open");
        Ok(writer)
    }

    /// Writer without destination
    pub fn new_disabled() -> Self {
        Self {
            sink: None,
            state: WriterState::Unopened,
            enabled: false,
            frames_written: 0,
        }
    }

    /// Append one frame stamped with the current time
    pub fn save(&mut self, frame: &[u8]) -> Result<()> {
        self.save_at(frame, SystemTime::now())
    }

    /// Append one frame with an explicit capture time
    pub fn save_at(&mut self, frame: &[u8], timestamp: SystemTime) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.state == WriterState::Closed {
            return Err(Error::WriterClosed);
        }

        let mut record = RecordHeader::new(frame.len(), timestamp).to_bytes();
        record.extend_from_slice(frame);
        self.write_raw(&record)?;
        self.frames_written += 1;
        Ok(())
    }

    /// Append every frame of `frames`
    pub fn save_all<I, B>(&mut self, frames: I) -> Result<()>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        for frame in frames {
            self.save(frame.as_ref())?;
        }
        Ok(())
    }

    /// Flush and release the destination
    ///
    /// Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.state == WriterState::Closed {
            return Ok(());
        }
        self.state = WriterState::Closed;

        if let Some(mut sink) = self.sink.take() {
            sink.flush()?;
            info!("Capture closed after {} frames", self.frames_written);
        }
        Ok(())
    }

    /// Flush and hand back the destination, closing the writer
    pub fn into_inner(mut self) -> Result<Option<W>> {
        let mut sink = self.sink.take();
        self.state = WriterState::Closed;
        if let Some(sink) = sink.as_mut() {
            sink.flush()?;
        }
        Ok(sink)
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Whether this writer produces output
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of frames saved so far
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(sink) = self.sink.as_mut() {
            sink.write_all(bytes)?;
            sink.flush()?;
        }
        Ok(())
    }
}

impl<W: Write> Drop for CaptureWriter<W> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close capture file: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn expected_global_header() -> Vec<u8> {
        vec![
            0xD4, 0xC3, 0xB2, 0xA1, // magic
            0x02, 0x00, // major
            0x04, 0x00, // minor
            0x00, 0x00, 0x00, 0x00, // thiszone
            0x00, 0x00, 0x00, 0x00, // sigfigs
            0xFF, 0xFF, 0x00, 0x00, // snaplen
            0x01, 0x00, 0x00, 0x00, // ethernet
        ]
    }

    fn record_header(secs: u32, usecs: u32, len: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&secs.to_le_bytes());
        out.extend_from_slice(&usecs.to_le_bytes());
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&len.to_le_bytes());
        out
    }

    #[test]
    fn test_global_header_bytes() {
        let bytes = GlobalHeader::default().to_bytes();
        assert_eq!(bytes.len(), GlobalHeader::SIZE);
        assert_eq!(bytes.as_ref(), expected_global_header().as_slice());
    }

    #[test]
    fn test_record_header() {
        let ts = UNIX_EPOCH + Duration::new(1_700_000_000, 123_456_789);
        let header = RecordHeader::new(60, ts);
        assert_eq!(header.ts_sec, 1_700_000_000);
        assert_eq!(header.ts_usec, 123_456);
        assert_eq!(header.incl_len, 60);
        assert_eq!(header.orig_len, 60);
        assert_eq!(header.to_bytes().len(), RecordHeader::SIZE);
    }

    #[test]
    fn test_header_written_on_open() {
        let mut out = Vec::new();
        let writer = CaptureWriter::new(Some(&mut out)).unwrap();
        assert_eq!(writer.state(), WriterState::Open);
        drop(writer);
        assert_eq!(out, expected_global_header());
    }

    #[test]
    fn test_two_frames_byte_for_byte() {
        let a = [0x01u8, 0x02, 0x03];
        let b = [0xAAu8; 70];
        let ts_a = UNIX_EPOCH + Duration::new(10, 5_000);
        let ts_b = UNIX_EPOCH + Duration::new(11, 0);

        let mut out = Vec::new();
        {
            let mut writer = CaptureWriter::new(Some(&mut out)).unwrap();
            writer.save_at(&a, ts_a).unwrap();
            writer.save_at(&b, ts_b).unwrap();
            assert_eq!(writer.frames_written(), 2);
        }

        let mut expected = expected_global_header();
        expected.extend(record_header(10, 5, 3));
        expected.extend_from_slice(&a);
        expected.extend(record_header(11, 0, 70));
        expected.extend_from_slice(&b);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_save_uses_frame_length() {
        let mut out = Vec::new();
        {
            let mut writer = CaptureWriter::new(Some(&mut out)).unwrap();
            writer.save_all([vec![0u8; 42], vec![1u8; 7]]).unwrap();
        }

        let first = &out[GlobalHeader::SIZE..GlobalHeader::SIZE + RecordHeader::SIZE];
        assert_eq!(&first[8..12], &42u32.to_le_bytes());
        assert_eq!(&first[12..16], &42u32.to_le_bytes());
        assert_eq!(
            out.len(),
            GlobalHeader::SIZE + 2 * RecordHeader::SIZE + 42 + 7
        );
    }

    #[test]
    fn test_save_after_close_fails() {
        let mut out = Vec::new();
        let mut writer = CaptureWriter::new(Some(&mut out)).unwrap();
        writer.close().unwrap();
        writer.close().unwrap();
        assert_eq!(writer.state(), WriterState::Closed);
        assert!(matches!(writer.save(&[1, 2, 3]), Err(Error::WriterClosed)));
    }

    #[test]
    fn test_disabled_writer_accepts_everything() {
        let mut writer: CaptureWriter<Vec<u8>> = CaptureWriter::new(None).unwrap();
        assert!(!writer.is_enabled());
        assert_eq!(writer.state(), WriterState::Unopened);

        for len in [0usize, 1, 60, 1514, 65535] {
            writer.save(&vec![0xEE; len]).unwrap();
        }
        writer.close().unwrap();
        writer.save(&[1]).unwrap();
        assert_eq!(writer.frames_written(), 0);
        assert!(writer.into_inner().unwrap().is_none());
    }

    #[test]
    fn test_into_inner() {
        let mut writer = CaptureWriter::new(Some(Vec::new())).unwrap();
        writer.save(&[9, 9]).unwrap();
        let out = writer.into_inner().unwrap().unwrap();
        assert_eq!(out.len(), GlobalHeader::SIZE + RecordHeader::SIZE + 2);
        assert_eq!(&out[out.len() - 2..], &[9, 9]);
    }

    #[test]
    fn test_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.pcap");
        {
            let mut writer = CaptureWriter::create(Some(&path)).unwrap();
            writer.save(&[0x42; 10]).unwrap();
        }

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..GlobalHeader::SIZE], expected_global_header().as_slice());
        assert_eq!(bytes.len(), GlobalHeader::SIZE + RecordHeader::SIZE + 10);
    }

    #[test]
    fn test_libpcap_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readback.pcap");
        {
            let mut writer = CaptureWriter::create(Some(&path)).unwrap();
            writer.save(&[0x11; 60]).unwrap();
            writer.save(&[0x22; 14]).unwrap();
        }

        let mut capture = pcap::Capture::from_file(&path).unwrap();
        assert_eq!(capture.get_datalink(), pcap::Linktype::ETHERNET);

        let first = capture.next_packet().unwrap();
        assert_eq!(first.header.caplen, 60);
        assert_eq!(first.data, &[0x11; 60][..]);

        let second = capture.next_packet().unwrap();
        assert_eq!(second.header.len, 14);
        assert_eq!(second.data, &[0x22; 14][..]);

        assert!(capture.next_packet().is_err());
    }

    #[test]
    fn test_create_without_path() {
        let mut writer = CaptureWriter::create(None::<&Path>).unwrap();
        assert!(!writer.is_enabled());
        writer.save(&[1, 2, 3]).unwrap();
    }

    #[test]
    fn test_create_in_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("capture.pcap");
        assert!(matches!(
            CaptureWriter::create(Some(&path)),
            Err(Error::Io(_))
        ));
    }
}
