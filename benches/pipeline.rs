//! Detection pipeline performance benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use edge_sentinel::prelude::*;
use edge_sentinel::synth;

fn benchmark_mse(c: &mut Criterion) {
    let input = synth::sine_signal(1, 160, 40, 1.0, 0.05);
    let output = synth::sine_signal(2, 160, 40, 1.0, 0.05);

    c.bench_function("mse_160", |b| {
        b.iter(|| black_box(mse(black_box(&input), black_box(&output))));
    });
}

fn benchmark_invoke(c: &mut Criterion) {
    let image = ModelImage::from_bytes(&synth::identity_model(160, 10.0)).unwrap();
    let mut runtime = DenseAutoencoder::allocate(image, 64 * 1024).unwrap();
    let window = synth::sine_signal(3, 160, 40, 1.0, 0.05);

    c.bench_function("invoke_160", |b| {
        b.iter(|| {
            let output = runtime.infer(black_box(&window)).unwrap();
            black_box(output[0])
        });
    });
}

fn benchmark_full_window_cycle(c: &mut Criterion) {
    let config = PipelineConfig::new(0.1)
        .with_window_len(160)
        .with_queue_capacity(32);
    let clock = ManualClock::new();
    let mut detector = Detector::initialize(
        config,
        &synth::identity_model(160, 10.0),
        64 * 1024,
        LatchActuator::new(),
        clock.clone(),
    )
    .unwrap();
    let producer = detector.producer();
    let signal = synth::sine_signal(4, 160, 40, 1.0, 0.05);

    c.bench_function("window_cycle_160", |b| {
        b.iter(|| {
            for &s in &signal {
                producer.push(s);
                clock.advance(1);
                black_box(detector.tick());
            }
        });
    });
}

criterion_group!(
    benches,
    benchmark_mse,
    benchmark_invoke,
    benchmark_full_window_cycle
);
criterion_main!(benches);
