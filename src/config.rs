//! Pipeline configuration.
//!
//! All sizing knobs live here: window length, queue capacity, the anomaly
//! threshold, slice timing, and actuator polarity. Fixed at construction
//! time: the pipeline never resizes buffers after initialization, since
//! bounded memory is a functional requirement, not an implementation
//! detail.

use crate::actuator::Polarity;
use crate::error::{Result, SentinelError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the detection pipeline.
///
/// # Example
///
/// ```
/// use edge_sentinel::config::PipelineConfig;
///
/// let config = PipelineConfig::new(0.35)
///     .with_window_len(160)
///     .with_queue_capacity(32);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of samples per inference window.
    /// Must match the loaded model's input dimension.
    pub window_len: usize,

    /// Capacity of the sample queue between the sensor producer and the
    /// control loop. Pushes beyond this are silently dropped.
    pub queue_capacity: usize,

    /// MSE threshold; any score strictly above this is an anomaly.
    /// Must be finite and non-negative. There is no default; an unset
    /// threshold is a configuration error, not a guess.
    pub threshold: f32,

    /// Duration of one logical data slice in milliseconds.
    /// Slice counting divides elapsed time by this.
    pub slice_duration_ms: u64,

    /// Cooperative yield at the end of every tick.
    #[serde(with = "duration_millis")]
    pub tick_yield: Duration,

    /// Logic-level mapping of the actuator output.
    pub polarity: Polarity,
}

/// Default window length, matching the reference 160-sample model.
pub const DEFAULT_WINDOW_LEN: usize = 160;

/// Default sample queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// Default slice duration in milliseconds.
pub const DEFAULT_SLICE_DURATION_MS: u64 = 1;

impl PipelineConfig {
    /// Create a configuration with the given anomaly threshold and
    /// defaults for everything else.
    #[must_use]
    pub fn new(threshold: f32) -> Self {
        Self {
            window_len: DEFAULT_WINDOW_LEN,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            threshold,
            slice_duration_ms: DEFAULT_SLICE_DURATION_MS,
            tick_yield: Duration::from_millis(1),
            polarity: Polarity::ActiveHigh,
        }
    }

    /// Set the window length.
    #[must_use]
    pub fn with_window_len(mut self, window_len: usize) -> Self {
        self.window_len = window_len;
        self
    }

    /// Set the queue capacity.
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the slice duration in milliseconds.
    #[must_use]
    pub fn with_slice_duration_ms(mut self, ms: u64) -> Self {
        self.slice_duration_ms = ms;
        self
    }

    /// Set the per-tick yield duration.
    #[must_use]
    pub fn with_tick_yield(mut self, yield_for: Duration) -> Self {
        self.tick_yield = yield_for;
        self
    }

    /// Set the actuator polarity.
    #[must_use]
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if any size is zero or the threshold is
    /// non-finite or negative.
    pub fn validate(&self) -> Result<()> {
        if self.window_len == 0 {
            return Err(SentinelError::invalid_config("window_len must be > 0"));
        }
        if self.queue_capacity == 0 {
            return Err(SentinelError::invalid_config("queue_capacity must be > 0"));
        }
        if !self.threshold.is_finite() {
            return Err(SentinelError::invalid_config(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        if self.threshold < 0.0 {
            return Err(SentinelError::invalid_config(format!(
                "threshold must be non-negative, got {}",
                self.threshold
            )));
        }
        if self.slice_duration_ms == 0 {
            return Err(SentinelError::invalid_config(
                "slice_duration_ms must be > 0",
            ));
        }
        Ok(())
    }
}

/// Serde helper: `tick_yield` as integer milliseconds in config files.
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let ms = u64::deserialize(d)?;
        Ok(Duration::from_millis(ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PipelineConfig::new(0.5);
        assert_eq!(config.window_len, DEFAULT_WINDOW_LEN);
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(config.slice_duration_ms, DEFAULT_SLICE_DURATION_MS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder_chain() {
        let config = PipelineConfig::new(0.1)
            .with_window_len(4)
            .with_queue_capacity(2)
            .with_slice_duration_ms(20)
            .with_polarity(Polarity::ActiveLow);
        assert_eq!(config.window_len, 4);
        assert_eq!(config.queue_capacity, 2);
        assert_eq!(config.slice_duration_ms, 20);
        assert_eq!(config.polarity, Polarity::ActiveLow);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_zero_window() {
        let config = PipelineConfig::new(0.5).with_window_len(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_zero_queue() {
        let config = PipelineConfig::new(0.5).with_queue_capacity(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_nan_threshold() {
        let config = PipelineConfig::new(f32::NAN);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("threshold must be finite"));
    }

    #[test]
    fn test_config_rejects_infinite_threshold() {
        let config = PipelineConfig::new(f32::INFINITY);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_negative_threshold() {
        let config = PipelineConfig::new(-0.1);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_config_zero_threshold_is_valid() {
        // Everything with any reconstruction error at all is abnormal.
        let config = PipelineConfig::new(0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = PipelineConfig::new(0.25)
            .with_window_len(64)
            .with_tick_yield(Duration::from_millis(2));
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.window_len, 64);
        assert_eq!(back.tick_yield, Duration::from_millis(2));
        assert!((back.threshold - 0.25).abs() < f32::EPSILON);
    }
}
