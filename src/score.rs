//! Reconstruction-error scoring and the anomaly decision.
//!
//! The score is the mean squared error between a window and the model's
//! reconstruction of it; the decision is a plain threshold comparison.
//! Both are pure functions; the actuator write lives with the control
//! loop, not here.

/// Outcome of comparing a score against the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Reconstruction error within tolerance.
    Normal,
    /// Reconstruction error above threshold, or not comparable.
    Abnormal,
}

/// Mean squared error over two equal-length windows.
///
/// # Panics
///
/// Mismatched lengths are a wiring bug between the accumulator and the
/// model, not a runtime condition, and panic.
#[must_use]
pub fn mse(input: &[f32], output: &[f32]) -> f32 {
    assert_eq!(
        input.len(),
        output.len(),
        "mse inputs must have equal length: {} vs {}",
        input.len(),
        output.len()
    );
    assert!(!input.is_empty(), "mse over an empty window is undefined");

    let sum: f32 = input
        .iter()
        .zip(output.iter())
        .map(|(a, b)| {
            let d = a - b;
            d * d
        })
        .sum();
    sum / input.len() as f32
}

/// Threshold decision.
///
/// `Abnormal` iff `score > threshold`. Equality is `Normal`. A
/// non-finite score (NaN from bad sensor data, Inf from overflow) can
/// never be shown to be within tolerance and is therefore `Abnormal`.
#[must_use]
pub fn decide(score: f32, threshold: f32) -> Decision {
    if !score.is_finite() || score > threshold {
        Decision::Abnormal
    } else {
        Decision::Normal
    }
}
