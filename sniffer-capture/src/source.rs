//! Raw frame sources
//!
//! A [`FrameSource`] hands out one raw link-layer buffer per call. The live
//! libpcap implementation is [`PcapSource`](crate::PcapSource); [`VecSource`]
//! replays buffers held in memory.

use bytes::Bytes;
use sniffer_core::{Error, Result};
use std::collections::VecDeque;

/// Supplier of raw link-layer frames
pub trait FrameSource {
    /// Block until the next raw frame is available
    ///
    /// Errors (missing interface, permissions, capture failure, interruption)
    /// are fatal for the source and must reach the caller.
    fn receive(&mut self) -> Result<Bytes>;
}

impl<S: FrameSource + ?Sized> FrameSource for &mut S {
    fn receive(&mut self) -> Result<Bytes> {
        (**self).receive()
    }
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn receive(&mut self) -> Result<Bytes> {
        (**self).receive()
    }
}

/// In-memory source that replays a queue of buffers
///
/// Reports [`Error::SourceExhausted`] once the queue is empty.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    frames: VecDeque<Bytes>,
}

impl VecSource {
    pub fn new<I, B>(frames: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Self {
            frames: frames.into_iter().map(Into::into).collect(),
        }
    }

    /// Queue another buffer
    pub fn push<B: Into<Bytes>>(&mut self, frame: B) {
        self.frames.push_back(frame.into());
    }

    /// Number of buffers not yet received
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for VecSource {
    fn receive(&mut self) -> Result<Bytes> {
        self.frames.pop_front().ok_or(Error::SourceExhausted)
    }
}
