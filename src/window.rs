//! Fixed-size window accumulation.
//!
//! Collects samples one at a time into a preallocated buffer of exactly
//! `N` slots. Completion is reported exactly when the `N`th sample since
//! the last completion lands, and completion resets the cursor for the
//! next window. There is no timeout-based partial completion: a window
//! either fills completely or is dropped by an explicit reset.

use crate::queue::Sample;

/// Result of feeding one sample into the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// The window just reached exactly `N` samples and is ready to score.
    Completed,
    /// More samples are needed.
    Pending,
}

/// Accumulates samples into a reusable fixed-size window buffer.
#[derive(Debug)]
pub struct WindowAccumulator {
    buf: Vec<Sample>,
    cursor: usize,
}

impl WindowAccumulator {
    /// Create an accumulator for windows of `window_len` samples.
    ///
    /// The buffer is allocated once here and reused for every window.
    #[must_use]
    pub fn new(window_len: usize) -> Self {
        assert!(window_len > 0, "window length must be > 0");
        Self {
            buf: vec![0.0; window_len],
            cursor: 0,
        }
    }

    /// Write `sample` at the cursor and advance.
    ///
    /// Returns `Completed` exactly when the write fills the final slot,
    /// simultaneously resetting the cursor for the next window. The
    /// completed window contents stay readable through [`window`] until
    /// the next `accumulate` call overwrites slot zero.
    ///
    /// [`window`]: WindowAccumulator::window
    pub fn accumulate(&mut self, sample: Sample) -> WindowState {
        self.buf[self.cursor] = sample;
        self.cursor += 1;
        if self.cursor == self.buf.len() {
            self.cursor = 0;
            WindowState::Completed
        } else {
            WindowState::Pending
        }
    }

    /// The window buffer, in arrival order.
    ///
    /// Only meaningful immediately after `accumulate` returned
    /// `Completed`; mid-fill it mixes fresh and stale slots.
    #[must_use]
    pub fn window(&self) -> &[Sample] {
        &self.buf
    }

    /// Number of samples accumulated toward the current window.
    #[must_use]
    pub fn fill(&self) -> usize {
        self.cursor
    }

    /// Configured window length.
    #[must_use]
    pub fn window_len(&self) -> usize {
        self.buf.len()
    }

    /// Drop a partially filled window.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}
