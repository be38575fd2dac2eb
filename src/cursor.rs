//! Time cursor and slice tracking.
//!
//! The control loop only does useful work when new data has arrived
//! since its last pass. The tracker holds the previously processed
//! timestamp, asks the timestamp source for the current one, and reports
//! how many whole slices of data that makes available. Zero slices gates
//! the entire tick.

use crate::error::{Result, SentinelError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Source of monotonic timestamps, queried once per tick.
///
/// Implemented by the capture driver on hardware and by test clocks in
/// tests. A failure here means the capture device itself is in trouble;
/// the tracker surfaces it as `FeatureGenerationFailed`.
pub trait TimestampSource {
    /// Latest capture timestamp in milliseconds. Monotonic.
    fn latest_timestamp(&self) -> Result<u64>;
}

/// Wall-clock timestamp source anchored at its creation instant.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    /// Create a clock starting at zero milliseconds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampSource for MonotonicClock {
    fn latest_timestamp(&self) -> Result<u64> {
        Ok(self.start.elapsed().as_millis() as u64)
    }
}

/// Shared manually-advanced clock, for tests and synthetic feeds.
///
/// The producer side advances it as it pushes samples; the detector
/// reads it through the `TimestampSource` boundary.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `ms` milliseconds.
    pub fn advance(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::Relaxed);
    }

    /// Set the clock to an absolute time.
    pub fn set(&self, ms: u64) {
        self.now_ms.store(ms, Ordering::Relaxed);
    }
}

impl TimestampSource for ManualClock {
    fn latest_timestamp(&self) -> Result<u64> {
        Ok(self.now_ms.load(Ordering::Relaxed))
    }
}

/// Tracks the previously processed timestamp and converts elapsed time
/// into a count of newly available slices.
#[derive(Debug)]
pub struct SliceTracker {
    previous_time: u64,
    slice_duration_ms: u64,
}

impl SliceTracker {
    /// Create a tracker at time zero with the given slice duration.
    ///
    /// `slice_duration_ms` must be non-zero; config validation enforces
    /// that before construction.
    #[must_use]
    pub fn new(slice_duration_ms: u64) -> Self {
        Self {
            previous_time: 0,
            slice_duration_ms,
        }
    }

    /// Pull new slices against the given current timestamp.
    ///
    /// Commits `previous_time = current_time` and returns the number of
    /// whole slices elapsed since the last pull. A current timestamp
    /// behind the previous one (a non-monotonic source) is surfaced as
    /// `FeatureGenerationFailed` rather than a count.
    pub fn advance(&mut self, current_time: u64) -> Result<u32> {
        if current_time < self.previous_time {
            return Err(SentinelError::feature_generation(format!(
                "timestamp went backwards: {} -> {}",
                self.previous_time, current_time
            )));
        }
        let elapsed = current_time - self.previous_time;
        let slices = elapsed / self.slice_duration_ms;
        self.previous_time = current_time;
        Ok(u32::try_from(slices).unwrap_or(u32::MAX))
    }

    /// The last committed timestamp.
    #[must_use]
    pub fn previous_time(&self) -> u64 {
        self.previous_time
    }
}
