//! Binary actuator output.
//!
//! The decision stage asserts the actuator on an abnormal window and
//! deasserts it on a normal one; the mapping from asserted/deasserted to
//! a physical logic level is a polarity concern handled here, at the pin
//! boundary. Last write wins, no history, no acknowledgement path.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Logical actuator state as written by the decision stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Anomaly present.
    Asserted,
    /// No anomaly.
    Deasserted,
}

/// Mapping from logical signal to physical logic level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    /// Asserted drives the pin high.
    ActiveHigh,
    /// Asserted drives the pin low (e.g., an LED wired to pull down).
    ActiveLow,
}

impl Polarity {
    /// Physical level for a logical signal under this polarity.
    #[must_use]
    pub fn level(self, signal: Signal) -> bool {
        match (self, signal) {
            (Self::ActiveHigh, Signal::Asserted) | (Self::ActiveLow, Signal::Deasserted) => true,
            (Self::ActiveHigh, Signal::Deasserted) | (Self::ActiveLow, Signal::Asserted) => false,
        }
    }
}

/// A settable binary output.
///
/// Hardware implementations write a GPIO level; tests observe a latch.
/// `set` is fire-and-forget; there is no feedback path.
pub trait Actuator {
    /// Drive the physical output to `level`.
    fn set(&mut self, level: bool);
}

/// In-memory actuator retaining only the most recent level.
///
/// Cloneable handle; clones observe the same latch, which lets a test
/// hold a reader while the control loop owns the writer.
#[derive(Debug, Clone, Default)]
pub struct LatchActuator {
    level: Arc<AtomicBool>,
}

impl LatchActuator {
    /// Create a latch, initially low.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently written level.
    #[must_use]
    pub fn level(&self) -> bool {
        self.level.load(Ordering::Relaxed)
    }
}

impl Actuator for LatchActuator {
    fn set(&mut self, level: bool) {
        self.level.store(level, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_high_mapping() {
        assert!(Polarity::ActiveHigh.level(Signal::Asserted));
        assert!(!Polarity::ActiveHigh.level(Signal::Deasserted));
    }

    #[test]
    fn test_active_low_mapping() {
        assert!(!Polarity::ActiveLow.level(Signal::Asserted));
        assert!(Polarity::ActiveLow.level(Signal::Deasserted));
    }

    #[test]
    fn test_latch_last_write_wins() {
        let mut latch = LatchActuator::new();
        assert!(!latch.level());
        latch.set(true);
        latch.set(false);
        latch.set(true);
        assert!(latch.level());
    }

    #[test]
    fn test_latch_clones_share_state() {
        let mut writer = LatchActuator::new();
        let reader = writer.clone();
        writer.set(true);
        assert!(reader.level());
    }
}
