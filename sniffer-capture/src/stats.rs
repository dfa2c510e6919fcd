//! Capture statistics and metrics

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Snapshot of the frame generator's counters
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureStats {
    /// Raw buffers received from the frame source
    pub buffers_received: u64,
    /// Total bytes received
    pub bytes_received: u64,
    /// Buffers decoded into a frame tree
    pub frames_decoded: u64,
    /// Buffers discarded as undecodable
    pub buffers_discarded: u64,
    /// Capture duration
    pub duration: Duration,
    /// Decoded frames per second
    pub frames_per_second: f64,
}

impl CaptureStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self {
            buffers_received: 0,
            bytes_received: 0,
            frames_decoded: 0,
            buffers_discarded: 0,
            duration: Duration::from_secs(0),
            frames_per_second: 0.0,
        }
    }

    /// Share of received buffers that could not be decoded, as a percentage
    pub fn discard_rate(&self) -> f64 {
        if self.buffers_received == 0 {
            return 0.0;
        }
        (self.buffers_discarded as f64 / self.buffers_received as f64) * 100.0
    }

    /// Format statistics as human-readable string
    pub fn format(&self) -> String {
        format!(
            "Received: {} buffers ({} bytes)\n\
             Decoded: {} frames\n\
             Discarded: {} buffers ({:.2}%)\n\
             Duration: {:.2}s\n\
             Rate: {:.2} fps",
            self.buffers_received,
            self.bytes_received,
            self.frames_decoded,
            self.buffers_discarded,
            self.discard_rate(),
            self.duration.as_secs_f64(),
            self.frames_per_second,
        )
    }
}

impl Default for CaptureStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared statistics accumulator
///
/// Clones share the same counters.
#[derive(Debug, Clone)]
pub struct StatsAccumulator {
    buffers_received: Arc<AtomicU64>,
    bytes_received: Arc<AtomicU64>,
    frames_decoded: Arc<AtomicU64>,
    buffers_discarded: Arc<AtomicU64>,
    start_time: Instant,
}

impl StatsAccumulator {
    /// Create a new statistics accumulator
    pub fn new() -> Self {
        Self {
            buffers_received: Arc::new(AtomicU64::new(0)),
            bytes_received: Arc::new(AtomicU64::new(0)),
            frames_decoded: Arc::new(AtomicU64::new(0)),
            buffers_discarded: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    /// Record a raw buffer handed out by the source
    pub fn record_buffer(&self, size: usize) {
        self.buffers_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(size as u64, Ordering::Relaxed);
    }

    /// Record a successfully decoded frame
    pub fn record_decoded(&self) {
        self.frames_decoded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a buffer that failed to decode
    pub fn record_discarded(&self) {
        self.buffers_discarded.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current statistics snapshot
    pub fn snapshot(&self) -> CaptureStats {
        let frames_decoded = self.frames_decoded.load(Ordering::Relaxed);
        let duration = self.start_time.elapsed();

        let secs = duration.as_secs_f64();
        let frames_per_second = if secs > 0.0 {
            frames_decoded as f64 / secs
        } else {
            0.0
        };

        CaptureStats {
            buffers_received: self.buffers_received.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            frames_decoded,
            buffers_discarded: self.buffers_discarded.load(Ordering::Relaxed),
            duration,
            frames_per_second,
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.buffers_received.store(0, Ordering::Relaxed);
        self.bytes_received.store(0, Ordering::Relaxed);
        self.frames_decoded.store(0, Ordering::Relaxed);
        self.buffers_discarded.store(0, Ordering::Relaxed);
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for StatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CaptureStats::new();
        assert_eq!(stats.buffers_received, 0);
        assert_eq!(stats.discard_rate(), 0.0);
    }

    #[test]
    fn test_accumulator_counts() {
        let acc = StatsAccumulator::new();
        acc.record_buffer(60);
        acc.record_buffer(40);
        acc.record_buffer(100);
        acc.record_decoded();
        acc.record_discarded();
        acc.record_discarded();

        let stats = acc.snapshot();
        assert_eq!(stats.buffers_received, 3);
        assert_eq!(stats.bytes_received, 200);
        assert_eq!(stats.frames_decoded, 1);
        assert_eq!(stats.buffers_discarded, 2);
        assert!((stats.discard_rate() - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_clones_share_counters() {
        let acc = StatsAccumulator::new();
        let other = acc.clone();
        other.record_decoded();
        assert_eq!(acc.snapshot().frames_decoded, 1);

        acc.reset();
        assert_eq!(other.snapshot().frames_decoded, 0);
    }

    #[test]
    fn test_format() {
        let stats = CaptureStats {
            buffers_received: 4,
            bytes_received: 256,
            frames_decoded: 3,
            buffers_discarded: 1,
            duration: Duration::from_secs(2),
            frames_per_second: 1.5,
        };
        let text = stats.format();
        assert!(text.contains("Received: 4 buffers (256 bytes)"));
        assert!(text.contains("Discarded: 1 buffers (25.00%)"));
        assert!(text.contains("Rate: 1.50 fps"));
    }
}
