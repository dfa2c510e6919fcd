//! Capture loop driving the generator, filter and writer

use sniffer_capture::{CaptureStats, CaptureWriter, FrameGenerator, FrameSource, ProtocolFilter};
use sniffer_core::{Error, Result};
use sniffer_packet::Frame;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Printed after every frame description
pub const SEPARATOR: &str = ">>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>";

/// Settings for a capture run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnifferConfig {
    /// Frames not matching the filter are neither saved nor printed
    pub filter: ProtocolFilter,
    /// Stop after this many accepted frames; `None` runs until stopped
    pub max_frames: Option<usize>,
}

/// Why a capture run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The frame limit was reached
    Limit,
    /// The stop flag was raised or the source was interrupted
    Interrupted,
    /// The source has no more buffers
    Exhausted,
}

/// Outcome of [`Sniffer::run`]
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Frames accepted by the filter, saved and printed
    pub frames: usize,
    pub reason: StopReason,
    pub stats: CaptureStats,
}

/// Network sniffer driver
pub struct Sniffer {
    config: SnifferConfig,
    stop: Arc<AtomicBool>,
}

impl Sniffer {
    pub fn new(config: SnifferConfig) -> Self {
        Self {
            config,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an externally owned stop flag
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    /// Handle to the stop flag; storing `true` ends the run at the next frame
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn config(&self) -> &SnifferConfig {
        &self.config
    }

    /// Capture frames from `source` until the limit, a stop request or the
    /// end of the source
    ///
    /// Each accepted frame is saved to `writer`, then written to `out` as
    /// `Frame #<n>:`, its description and a separator line. The writer is
    /// closed before returning on every path.
    pub fn run<S, W, O>(
        &self,
        source: S,
        mut writer: CaptureWriter<W>,
        out: &mut O,
    ) -> Result<RunReport>
    where
        S: FrameSource,
        W: Write,
        O: Write,
    {
        let mut generator = FrameGenerator::new(source);
        let mut count = 0usize;

        info!("Sniffing with filter '{}'", self.config.filter);

        let reason = loop {
            if self.limit_reached(count) {
                break StopReason::Limit;
            }
            if self.stop.load(Ordering::Relaxed) {
                break StopReason::Interrupted;
            }

            let frame = match generator.next_frame() {
                Ok(frame) => frame,
                Err(e) if e.is_interrupted() => break StopReason::Interrupted,
                Err(Error::SourceExhausted) => break StopReason::Exhausted,
                Err(e) => return Err(e),
            };

            if !self.config.filter.matches(&frame) {
                debug!("Frame filtered out ({} bytes)", frame.raw().len());
                continue;
            }

            writer.save(frame.raw())?;
            writeln!(out, "Frame #{}:", count)?;
            write!(out, "{}", frame)?;
            writeln!(out, "{}", SEPARATOR)?;
            count += 1;
        };

        writer.close()?;

        if reason == StopReason::Interrupted {
            writeln!(out, "\nStopped")?;
        }
        out.flush()?;

        info!("Capture finished after {} frames ({:?})", count, reason);

        Ok(RunReport {
            frames: count,
            reason,
            stats: generator.stats(),
        })
    }

    fn limit_reached(&self, count: usize) -> bool {
        matches!(self.config.max_frames, Some(max) if count >= max)
    }
}

/// The single user-facing report for an error that ends the process
pub fn fatal_message(err: &Error) -> String {
    match err {
        Error::InsufficientPrivileges(_) => "Permission denied\n\
             Please, make sure you run me with superuser privileges (use sudo or su)"
            .to_string(),
        Error::InterfaceNotFound(name) => format!("No such interface: {}", name),
        other => format!("Error: {}", other),
    }
}
