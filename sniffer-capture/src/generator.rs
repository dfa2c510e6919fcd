//! Decoded frame generator
//!
//! Pulls raw buffers from a [`FrameSource`], runs them through the Ethernet
//! parser and hands out only buffers that decode into a complete frame tree.

use sniffer_core::Result;
use sniffer_packet::{EthernetFrame, EthernetParser, FrameParser};
use tracing::trace;

use crate::source::FrameSource;
use crate::stats::{CaptureStats, StatsAccumulator};

/// Generator of decoded Ethernet frames
pub struct FrameGenerator<S, P = EthernetParser> {
    source: S,
    parser: P,
    stats: StatsAccumulator,
}

impl<S: FrameSource> FrameGenerator<S> {
    /// Create a generator using the standard Ethernet → IP → TCP/UDP chain
    pub fn new(source: S) -> Self {
        Self::with_parser(source, EthernetParser::default())
    }
}

impl<S, P> FrameGenerator<S, P>
where
    S: FrameSource,
    P: FrameParser<Output = EthernetFrame>,
{
    /// Create a generator with a custom top-level parser
    pub fn with_parser(source: S, parser: P) -> Self {
        Self {
            source,
            parser,
            stats: StatsAccumulator::new(),
        }
    }

    /// Block until the next buffer that decodes successfully
    ///
    /// Undecodable buffers are skipped without limit. Errors from the source
    /// are returned unchanged.
    pub fn next_frame(&mut self) -> Result<EthernetFrame> {
        loop {
            let raw = self.source.receive()?;
            self.stats.record_buffer(raw.len());

            match self.parser.parse(&raw) {
                Some(frame) => {
                    self.stats.record_decoded();
                    return Ok(frame);
                }
                None => {
                    self.stats.record_discarded();
                    trace!(len = raw.len(), "Skipping undecodable frame");
                }
            }
        }
    }

    /// Unbounded sequence of decoded frames
    ///
    /// The iterator yields one item per decoded frame and ends after the
    /// first source error, which it yields. Calling `frames` again starts a
    /// fresh sequence over the same source.
    pub fn frames(&mut self) -> Frames<'_, S, P> {
        Frames {
            generator: self,
            done: false,
        }
    }

    /// Counters of received, decoded and discarded buffers
    pub fn stats(&self) -> CaptureStats {
        self.stats.snapshot()
    }

    /// Borrow the underlying source
    pub fn source(&self) -> &S {
        &self.source
    }
}

/// Iterator returned by [`FrameGenerator::frames`]
pub struct Frames<'a, S, P> {
    generator: &'a mut FrameGenerator<S, P>,
    done: bool,
}

impl<S, P> Iterator for Frames<'_, S, P>
where
    S: FrameSource,
    P: FrameParser<Output = EthernetFrame>,
{
    type Item = Result<EthernetFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let next = self.generator.next_frame();
        if next.is_err() {
            self.done = true;
        }
        Some(next)
    }
}

impl<S, P> std::iter::FusedIterator for Frames<'_, S, P>
where
    S: FrameSource,
    P: FrameParser<Output = EthernetFrame>,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::VecSource;
    use bytes::Bytes;
    use sniffer_core::{Error, Protocol};
    use sniffer_packet::Frame;

    fn tcp_frame(flags: u16) -> Vec<u8> {
        let mut data = vec![0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];
        data.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        data.extend_from_slice(&[0x08, 0x00]);
        data.extend_from_slice(&[0x45, 0x00, 0x00, 40, 0, 1, 0x40, 0, 64, 6, 0, 0]);
        data.extend_from_slice(&[10, 0, 0, 1, 10, 0, 0, 2]);
        data.extend_from_slice(&[0x30, 0x39, 0x00, 0x50, 0, 0, 0, 1, 0, 0, 0, 0]);
        data.extend_from_slice(&flags.to_be_bytes());
        data.extend_from_slice(&[0xFF, 0xFF, 0, 0, 0, 0]);
        data
    }

    fn arp_frame() -> Vec<u8> {
        let mut data = vec![0xFF; 12];
        data.extend_from_slice(&[0x08, 0x06]);
        data.extend_from_slice(&[0u8; 28]);
        data
    }

    #[test]
    fn test_next_frame_skips_undecodable() {
        let source = VecSource::new(vec![
            arp_frame(),
            vec![0u8; 5],
            tcp_frame(0x5002),
            tcp_frame(0x5011),
        ]);
        let mut generator = FrameGenerator::new(source);

        let first = generator.next_frame().unwrap();
        assert_eq!(first.raw().as_ref(), tcp_frame(0x5002).as_slice());

        let stats = generator.stats();
        assert_eq!(stats.buffers_received, 3);
        assert_eq!(stats.buffers_discarded, 2);
        assert_eq!(stats.frames_decoded, 1);

        let second = generator.next_frame().unwrap();
        assert_eq!(second.internet().transport().protocol(), Protocol::Tcp);
        assert_eq!(generator.source().remaining(), 0);
    }

    #[test]
    fn test_source_error_propagates() {
        let mut generator = FrameGenerator::new(VecSource::new(vec![arp_frame()]));
        assert!(matches!(generator.next_frame(), Err(Error::SourceExhausted)));
        assert_eq!(generator.stats().buffers_discarded, 1);
    }

    #[test]
    fn test_frames_iterator() {
        let source = VecSource::new(vec![
            tcp_frame(0x5002),
            arp_frame(),
            tcp_frame(0x5010),
            tcp_frame(0x5011),
        ]);
        let mut generator = FrameGenerator::new(source);

        let items: Vec<_> = generator.frames().collect();
        assert_eq!(items.len(), 4);
        assert!(items[..3].iter().all(|item| item.is_ok()));
        assert!(matches!(items[3], Err(Error::SourceExhausted)));
    }

    #[test]
    fn test_frames_restartable() {
        let mut generator = FrameGenerator::new(VecSource::new(vec![
            tcp_frame(0x5002),
            tcp_frame(0x5002),
            tcp_frame(0x5002),
        ]));

        assert_eq!(generator.frames().take(2).count(), 2);
        assert!(generator.frames().next().unwrap().is_ok());
        assert!(generator.frames().next().unwrap().is_err());
    }

    #[test]
    fn test_custom_parser() {
        struct UnpaddedOnly(EthernetParser);

        impl FrameParser for UnpaddedOnly {
            type Output = EthernetFrame;

            fn parse(&self, raw: &Bytes) -> Option<EthernetFrame> {
                if raw.len() == 54 {
                    self.0.parse(raw)
                } else {
                    None
                }
            }
        }

        let mut padded = tcp_frame(0x5002);
        padded.extend_from_slice(&[0u8; 6]);
        let source = VecSource::new(vec![padded, tcp_frame(0x5004)]);
        let parser = UnpaddedOnly(EthernetParser::default());
        let mut generator = FrameGenerator::with_parser(source, parser);

        let frame = generator.next_frame().unwrap();
        assert_eq!(frame.raw().len(), 54);
        assert_eq!(generator.stats().buffers_discarded, 1);
    }
}
