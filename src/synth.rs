//! Deterministic synthetic signals and model fixtures.
//!
//! Tests, benches, and the demo tools need loadable model images and
//! repeatable sensor streams without real hardware. Everything here is
//! seeded; the same seed always produces the same bytes.

use crate::model::{ModelImage, ModelImageBuilder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build an identity autoencoder image for `input_dim` samples.
///
/// Encoder and decoder are identity matrices with a bias shift of
/// `bias` through the ReLU hidden layer, so reconstruction is exact for
/// every sample greater than `-bias`. Choose `bias` above the expected
/// signal amplitude.
#[must_use]
pub fn identity_model(input_dim: usize, bias: f32) -> Vec<u8> {
    let n = input_dim;
    let mut weights = Vec::with_capacity(ModelImage::param_count(n, n));

    // encoder weights: identity
    for j in 0..n {
        for i in 0..n {
            weights.push(if i == j { 1.0 } else { 0.0 });
        }
    }
    // encoder bias: shift into the ReLU-linear region
    weights.extend(std::iter::repeat(bias).take(n));
    // decoder weights: identity
    for k in 0..n {
        for j in 0..n {
            weights.push(if j == k { 1.0 } else { 0.0 });
        }
    }
    // decoder bias: shift back
    weights.extend(std::iter::repeat(-bias).take(n));

    ModelImageBuilder::new()
        .with_dims(n, n)
        .with_weights(weights)
        .build()
}

/// Build a model image with seeded random weights.
///
/// Reconstruction quality is meaningless; useful for exercising load
/// and invoke paths with arbitrary dimensions.
#[must_use]
pub fn random_model(seed: u64, input_dim: usize, hidden_dim: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let weights: Vec<f32> = (0..ModelImage::param_count(input_dim, hidden_dim))
        .map(|_| rng.gen_range(-0.5..0.5))
        .collect();

    ModelImageBuilder::new()
        .with_dims(input_dim, hidden_dim)
        .with_weights(weights)
        .build()
}

/// Generate a deterministic noisy sine signal.
///
/// `noise` is the peak amplitude of the uniform jitter added to each
/// sample. All values stay within `amplitude + noise` of zero.
#[must_use]
pub fn sine_signal(seed: u64, len: usize, period: usize, amplitude: f32, noise: f32) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|i| {
            let phase = (i % period) as f32 / period as f32;
            let base = amplitude * (phase * std::f32::consts::TAU).sin();
            let jitter = if noise > 0.0 {
                rng.gen_range(-noise..noise)
            } else {
                0.0
            };
            base + jitter
        })
        .collect()
}

/// Splice a high-amplitude burst into `signal` starting at `at`.
///
/// Simulates the anomaly a reconstruction model should flag. A burst
/// range beyond the end of the signal is clamped; a start past the end
/// is a no-op.
pub fn inject_burst(signal: &mut [f32], at: usize, len: usize, amplitude: f32) {
    let at = at.min(signal.len());
    let end = at.saturating_add(len).min(signal.len());
    for (i, s) in signal[at..end].iter_mut().enumerate() {
        let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
        *s = sign * amplitude;
    }
}
