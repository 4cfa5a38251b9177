//! Basic usage of `latency_ring`: record some samples, then query the statistics.

use latency_ring::{ExtremaTracking, LatencyStatsBuffer, Nanos};

// (latency, timestamp) pairs in nanoseconds.
const SAMPLES: &[(Nanos, Nanos)] = &[
    (100, 0),
    (200, 1000),
    (300, 2000),
    (50, 3000),
    (150, 4000),
    (160, 5000),
    (170, 6000),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== latency_ring basic example ===");

    let mut buffer = LatencyStatsBuffer::builder()
        .capacity(3)
        .sample_interval(1)
        .build()?;

    let mut windowed = LatencyStatsBuffer::builder()
        .capacity(3)
        .sample_interval(1)
        .extrema(ExtremaTracking::Window)
        .build()?;

    for &(latency, timestamp) in SAMPLES {
        buffer.record(latency, timestamp);
        windowed.record(latency, timestamp);

        println!(
            "recorded {latency:>3} ns: mean {:.6} ms, p50 {:.6} ms, min/max {:?} ms",
            buffer.mean(),
            buffer.percentile(0.5),
            buffer.min_max()
        );
    }

    // Only 150, 160 and 170 are still resident. The default extrema mode still
    // remembers the overwritten 50 and 300.
    println!("Insertion extrema: {:?} ms", buffer.min_max());
    println!("Window extrema:    {:?} ms", windowed.min_max());

    println!("{}", buffer.summary());

    buffer.clear();
    println!("After clear: {}", buffer.summary());

    Ok(())
}
