//! Benchmarks for the diveo encoder.

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use diveo::{
    PixelFrame,
    capture::{Region, SyntheticSource, capture_sequence},
    codec::{compress, encode},
    to_stream,
};

fn synthetic_frames(size: u32, count: usize) -> Vec<PixelFrame> {
    let mut source = SyntheticSource::new();
    capture_sequence(
        &mut source,
        Region::new(0, 0, size, size),
        count,
        Duration::ZERO,
    )
    .expect("synthetic capture")
    .into_vec()
}

fn bench_delta_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("delta_encode");

    for size in [64, 256, 1024] {
        let frames = synthetic_frames(size, 30);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| encode(black_box(&frames)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");

    for size in [64, 256] {
        let payload = encode(&synthetic_frames(size, 30)).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| compress(black_box(&payload)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_to_stream(c: &mut Criterion) {
    let frames = synthetic_frames(256, 60);

    c.bench_function("to_stream_256x256_60_frames", |b| {
        b.iter(|| to_stream(60, black_box(&frames)).unwrap());
    });
}

criterion_group!(benches, bench_delta_encode, bench_compress, bench_to_stream);
criterion_main!(benches);
