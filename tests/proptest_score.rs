//! Property-based tests for scoring and the threshold decision.
//!
//! These tests verify invariants that should hold for any valid input.

use edge_sentinel::score::{decide, mse, Decision};
use proptest::prelude::*;

/// Strategy for finite sample values in a realistic sensor range
fn sample() -> impl Strategy<Value = f32> {
    -1000.0f32..1000.0
}

proptest! {
    /// Property: MSE is a pure function; identical inputs always yield
    /// the identical value.
    #[test]
    fn mse_is_deterministic(
        window in prop::collection::vec(sample(), 1..256),
        offsets in prop::collection::vec(sample(), 1..256),
    ) {
        let n = window.len().min(offsets.len());
        let input = &window[..n];
        let output: Vec<f32> = input
            .iter()
            .zip(&offsets[..n])
            .map(|(a, b)| a + b)
            .collect();

        prop_assert_eq!(mse(input, &output), mse(input, &output));
    }

    /// Property: MSE is non-negative for finite inputs, and zero only
    /// for identical windows.
    #[test]
    fn mse_non_negative_and_zero_on_identity(
        window in prop::collection::vec(sample(), 1..256),
    ) {
        prop_assert_eq!(mse(&window, &window), 0.0);

        let shifted: Vec<f32> = window.iter().map(|s| s + 1.0).collect();
        let score = mse(&window, &shifted);
        prop_assert!(score >= 0.0);
    }

    /// Property: uniform offset d over N samples scores exactly d².
    #[test]
    fn mse_uniform_offset_is_d_squared(
        window in prop::collection::vec(-100.0f32..100.0, 1..64),
        d in -10.0f32..10.0,
    ) {
        let output: Vec<f32> = window.iter().map(|s| s + d).collect();
        let score = mse(&window, &output);
        prop_assert!((score - d * d).abs() < 1e-2);
    }

    /// Property: threshold boundary. Scores at or below the threshold
    /// are Normal, scores above are Abnormal.
    #[test]
    fn decide_threshold_boundary(
        threshold in 0.0f32..1000.0,
        score in 0.0f32..1000.0,
    ) {
        let expected = if score > threshold {
            Decision::Abnormal
        } else {
            Decision::Normal
        };
        prop_assert_eq!(decide(score, threshold), expected);
    }

    /// Property: a score exactly equal to the threshold is Normal.
    #[test]
    fn decide_equality_is_normal(threshold in 0.0f32..1000.0) {
        prop_assert_eq!(decide(threshold, threshold), Decision::Normal);
    }

    /// Property: non-finite scores are always Abnormal, whatever the
    /// threshold.
    #[test]
    fn decide_non_finite_is_abnormal(threshold in 0.0f32..1000.0) {
        prop_assert_eq!(decide(f32::NAN, threshold), Decision::Abnormal);
        prop_assert_eq!(decide(f32::INFINITY, threshold), Decision::Abnormal);
    }
}
