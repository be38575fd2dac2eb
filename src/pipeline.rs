//! The detection control loop.
//!
//! One `tick` is one pass of the cooperative state machine: drain the
//! sample queue, ask the slice tracker whether new data arrived, feed at
//! most one fresh sample into the window accumulator, and, only when a
//! window completes, invoke the model, score the reconstruction, and
//! drive the actuator. Every branch returns promptly; the run loop
//! yields between ticks so the sensor producer is never starved.
//!
//! All state lives in the [`Detector`] context constructed once at
//! initialization: no globals, single-instance semantics by ownership.
//!
//! Transient failures (feature generation, inference) are logged and
//! absorbed; the next tick is the retry. Windows are strictly
//! sequential: a new window cannot begin accumulating before the
//! previous one is scored and decided.

use crate::actuator::{Actuator, Signal};
use crate::config::PipelineConfig;
use crate::cursor::{SliceTracker, TimestampSource};
use crate::error::{Result, SentinelError};
use crate::model::{DenseAutoencoder, ModelImage, ModelRuntime};
use crate::queue::SampleQueue;
use crate::score::{decide, mse, Decision};
use crate::window::{WindowAccumulator, WindowState};
use tracing::{debug, warn};

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No new slices since the last tick; all downstream work skipped.
    NoNewData,
    /// New slices arrived but the queue had no sample to accumulate.
    Idle,
    /// One sample entered the window; `fill` samples accumulated so far.
    Accumulating { fill: usize },
    /// A window completed and was scored.
    WindowScored { score: f32, decision: Decision },
    /// Slice computation failed; tick skipped. Already logged.
    SkippedFeatureFailure,
    /// The model runtime failed on a completed window; the actuator was
    /// left untouched. Already logged.
    SkippedInferenceFailure,
}

/// Running diagnostic counters.
///
/// Monotonic over the detector's lifetime; no per-window history is
/// retained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectorStats {
    /// Ticks executed.
    pub ticks: u64,
    /// Samples accumulated into windows.
    pub samples_accumulated: u64,
    /// Windows fully scored and decided.
    pub windows_scored: u64,
    /// Windows decided abnormal.
    pub anomalies: u64,
    /// Ticks skipped due to feature generation failure.
    pub feature_failures: u64,
    /// Windows skipped due to inference failure.
    pub inference_failures: u64,
}

/// The control-loop context: queue consumer, slice tracker, window
/// accumulator, model runtime, and actuator, owned together.
pub struct Detector<R, A, T> {
    config: PipelineConfig,
    queue: SampleQueue,
    tracker: SliceTracker,
    accumulator: WindowAccumulator,
    runtime: R,
    actuator: A,
    clock: T,
    stats: DetectorStats,
}

impl<A: Actuator, T: TimestampSource> Detector<DenseAutoencoder, A, T> {
    /// One-time initialization with the bundled dense runtime: validate
    /// config, parse and check the model, allocate inference buffers
    /// against `arena_bytes`, and wire the peripherals.
    ///
    /// # Errors
    ///
    /// Any of the fatal init-time conditions: `InvalidConfig`,
    /// `InvalidModel` (including a model whose input dimension differs
    /// from the configured window length), `SchemaVersionMismatch`,
    /// `BufferAllocationFailed`.
    pub fn initialize(
        config: PipelineConfig,
        model_bytes: &[u8],
        arena_bytes: usize,
        actuator: A,
        clock: T,
    ) -> Result<Self> {
        let image = ModelImage::from_bytes(model_bytes)?;
        let runtime = DenseAutoencoder::allocate(image, arena_bytes)?;
        Self::with_runtime(config, runtime, actuator, clock)
    }
}

impl<R: ModelRuntime, A: Actuator, T: TimestampSource> Detector<R, A, T> {
    /// Initialize with an already-allocated model runtime.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if validation fails, `InvalidModel` if the
    /// runtime's input dimension does not match the configured window
    /// length.
    pub fn with_runtime(
        config: PipelineConfig,
        runtime: R,
        actuator: A,
        clock: T,
    ) -> Result<Self> {
        config.validate()?;
        if runtime.input_dim() != config.window_len {
            return Err(SentinelError::invalid_model(format!(
                "model input dimension {} does not match window length {}",
                runtime.input_dim(),
                config.window_len
            )));
        }
        Ok(Self {
            queue: SampleQueue::with_capacity(config.queue_capacity),
            tracker: SliceTracker::new(config.slice_duration_ms),
            accumulator: WindowAccumulator::new(config.window_len),
            runtime,
            actuator,
            clock,
            config,
            stats: DetectorStats::default(),
        })
    }

    /// Handle for the sensor producer. Push-only by convention; the
    /// queue never blocks the producer.
    #[must_use]
    pub fn producer(&self) -> SampleQueue {
        self.queue.clone()
    }

    /// Diagnostic counters.
    #[must_use]
    pub fn stats(&self) -> DetectorStats {
        self.stats
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Execute one tick of the control loop.
    ///
    /// Never blocks and never fails: transient errors are logged,
    /// counted, and folded into the returned outcome.
    pub fn tick(&mut self) -> TickOutcome {
        self.stats.ticks += 1;

        // Drain whatever is queued right now, bounded by capacity. The
        // freshest drained sample is the accumulation candidate; the
        // producer oversamples and the tick rate decimates.
        let mut freshest = None;
        for _ in 0..self.queue.capacity() {
            match self.queue.try_pop() {
                Some(sample) => freshest = Some(sample),
                None => break,
            }
        }

        // Gate on new slices before doing any model work.
        let slices = match self
            .clock
            .latest_timestamp()
            .and_then(|now| self.tracker.advance(now))
        {
            Ok(n) => n,
            Err(err) => {
                warn!(error = %err, "feature generation failed, skipping tick");
                self.stats.feature_failures += 1;
                return TickOutcome::SkippedFeatureFailure;
            }
        };
        if slices == 0 {
            return TickOutcome::NoNewData;
        }

        let Some(sample) = freshest else {
            return TickOutcome::Idle;
        };

        self.stats.samples_accumulated += 1;
        match self.accumulator.accumulate(sample) {
            WindowState::Pending => TickOutcome::Accumulating {
                fill: self.accumulator.fill(),
            },
            WindowState::Completed => self.score_window(),
        }
    }

    /// Invoke, score, and decide one completed window.
    fn score_window(&mut self) -> TickOutcome {
        let window = self.accumulator.window();
        let output = match self.runtime.infer(window) {
            Ok(output) => output,
            Err(err) => {
                // The actuator keeps its previous state for this window.
                warn!(error = %err, "inference failed, skipping window");
                self.stats.inference_failures += 1;
                return TickOutcome::SkippedInferenceFailure;
            }
        };

        let score = mse(window, output);
        let decision = decide(score, self.config.threshold);
        debug!(score, ?decision, "window scored");

        let signal = match decision {
            Decision::Abnormal => Signal::Asserted,
            Decision::Normal => Signal::Deasserted,
        };
        self.actuator.set(self.config.polarity.level(signal));

        self.stats.windows_scored += 1;
        if decision == Decision::Abnormal {
            self.stats.anomalies += 1;
        }
        TickOutcome::WindowScored { score, decision }
    }

    /// Run the loop forever, yielding for the configured duration after
    /// every tick regardless of the branch taken.
    pub fn run(&mut self) -> ! {
        loop {
            let _ = self.tick();
            std::thread::sleep(self.config.tick_yield);
        }
    }
}

impl<R: std::fmt::Debug, A, T> std::fmt::Debug for Detector<R, A, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("config", &self.config)
            .field("queue", &self.queue)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
