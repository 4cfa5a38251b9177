//! Benchmarks for the recording hot path and the sorting query path of `latency_ring`.
//!
//! Recording is expected to cost a handful of nanoseconds regardless of capacity. The
//! percentile and summary queries scale with occupancy and are included to show the cost
//! a status reporter pays per report.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use latency_ring::{ExtremaTracking, LatencyStatsBuffer, SharedLatencyStats};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

const CAPACITIES: &[usize] = &[50, 1000];

fn filled_buffer(capacity: usize, extrema: ExtremaTracking) -> LatencyStatsBuffer {
    let mut buffer = LatencyStatsBuffer::builder()
        .capacity(capacity)
        .extrema(extrema)
        .build()
        .unwrap();

    // Enough samples to wrap around, with a spread of values so sorting has work to do.
    for i in 0..(capacity as u64 * 2) {
        buffer.record((i * 7919) % 20_000_000, i * 20_000_000);
    }

    buffer
}

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("lr_record");

    for &capacity in CAPACITIES {
        for extrema in [ExtremaTracking::Insertion, ExtremaTracking::Window] {
            let mut buffer = filled_buffer(capacity, extrema);
            let mut timestamp = 0_u64;

            group.bench_function(BenchmarkId::new(extrema.as_str(), capacity), |b| {
                b.iter(|| {
                    timestamp = timestamp.wrapping_add(20_000_000);
                    buffer.record(black_box(timestamp % 3_000_000), black_box(timestamp));
                });
            });
        }
    }

    {
        let stats = SharedLatencyStats::new(filled_buffer(50, ExtremaTracking::Insertion));
        let mut timestamp = 0_u64;

        group.bench_function("shared_uncontended", |b| {
            b.iter(|| {
                timestamp = timestamp.wrapping_add(20_000_000);
                stats.record(black_box(1_500_000), black_box(timestamp));
            });
        });
    }

    group.finish();

    let mut group = c.benchmark_group("lr_query");

    for &capacity in CAPACITIES {
        let buffer = filled_buffer(capacity, ExtremaTracking::Insertion);

        group.bench_function(BenchmarkId::new("mean", capacity), |b| {
            b.iter(|| black_box(&buffer).mean());
        });

        group.bench_function(BenchmarkId::new("rate", capacity), |b| {
            b.iter(|| black_box(&buffer).rate());
        });

        group.bench_function(BenchmarkId::new("percentile", capacity), |b| {
            b.iter(|| black_box(&buffer).percentile(black_box(0.95)));
        });

        group.bench_function(BenchmarkId::new("summary", capacity), |b| {
            b.iter(|| black_box(&buffer).summary());
        });
    }

    group.finish();
}
