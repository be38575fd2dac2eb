//! # Edge Sentinel
//!
//! A streaming anomaly-detection control loop for resource-constrained
//! devices. Raw sensor samples flow through a bounded queue into
//! fixed-size windows; each complete window is reconstructed by a
//! pretrained autoencoder model, scored by mean squared error, and the
//! score drives a binary actuator through a configured threshold.
//!
//! Design principles:
//!
//! - **Bounded memory**: every buffer is sized at initialization and
//!   never grows. Queue overflow drops samples instead of allocating.
//! - **Never block the producer**: the sensor side only ever touches a
//!   non-blocking push.
//! - **Fail fatal early, fail transient quietly**: bad models and bad
//!   config abort startup; per-tick failures are logged and the next
//!   tick is the retry.
//!
//! ## Example
//!
//! ```
//! use edge_sentinel::prelude::*;
//!
//! let config = PipelineConfig::new(0.1).with_window_len(4);
//! let model = edge_sentinel::synth::identity_model(4, 10.0);
//! let latch = LatchActuator::new();
//! let clock = ManualClock::new();
//!
//! let mut detector =
//!     Detector::initialize(config, &model, 10 * 1024, latch.clone(), clock.clone())?;
//! let producer = detector.producer();
//!
//! for _ in 0..4 {
//!     producer.push(1.0);
//!     clock.advance(1);
//!     detector.tick();
//! }
//! assert_eq!(detector.stats().windows_scored, 1);
//! assert!(!latch.level());
//! # Ok::<(), edge_sentinel::SentinelError>(())
//! ```

pub mod actuator;
pub mod config;
pub mod cursor;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod queue;
pub mod score;
pub mod synth;
pub mod window;

pub use error::{Result, SentinelError};

/// Re-exports for convenient access
pub mod prelude {
    pub use crate::actuator::{Actuator, LatchActuator, Polarity, Signal};
    pub use crate::config::PipelineConfig;
    pub use crate::cursor::{ManualClock, MonotonicClock, SliceTracker, TimestampSource};
    pub use crate::error::{Result, SentinelError};
    pub use crate::model::{DenseAutoencoder, ModelImage, ModelImageBuilder, ModelRuntime};
    pub use crate::pipeline::{Detector, DetectorStats, TickOutcome};
    pub use crate::queue::{Sample, SampleQueue};
    pub use crate::score::{decide, mse, Decision};
    pub use crate::window::{WindowAccumulator, WindowState};
}
