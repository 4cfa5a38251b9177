use std::fmt::{self, Display};

use crate::{LatencyStatsBuffer, Nanos, nanos_to_millis, select_percentile};

// Fractional ranks reported by a summary.
const P50: f64 = 0.50;
const P95: f64 = 0.95;
const P99: f64 = 0.99;

/// A human- and machine-readable snapshot of the statistics of a [`LatencyStatsBuffer`].
///
/// For human-readable output, use the `Display` trait implementation. This is intended for
/// status lines written to a terminal or log and uses only the basic ASCII character set.
///
/// For machine-readable output, inspect the snapshot via the provided methods. All latency
/// values are in milliseconds.
///
/// # Example
///
/// ```
/// use latency_ring::LatencyStatsBuffer;
///
/// let mut buffer = LatencyStatsBuffer::new(50).unwrap();
///
/// for i in 0..10 {
///     buffer.record(2_000_000 + i * 100_000, i * 20_000_000);
/// }
///
/// let summary = buffer.summary();
/// assert_eq!(summary.samples(), 10);
/// println!("{summary}");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatencySummary {
    samples: usize,
    capacity: usize,

    mean_ms: f64,
    min_ms: f64,
    max_ms: f64,

    p50_ms: f64,
    p95_ms: f64,
    p99_ms: f64,

    rate_per_second: f64,
}

impl LatencySummary {
    /// `sorted` must be the resident latencies of `buffer` in ascending order.
    pub(crate) fn from_buffer(buffer: &LatencyStatsBuffer, sorted: &[Nanos]) -> Self {
        debug_assert_eq!(sorted.len(), buffer.len());

        let percentile = |fraction| select_percentile(sorted, fraction).map_or(0.0, nanos_to_millis);
        let (min_ms, max_ms) = buffer.min_max();

        Self {
            samples: buffer.len(),
            capacity: buffer.capacity(),
            mean_ms: buffer.mean(),
            min_ms,
            max_ms,
            p50_ms: percentile(P50),
            p95_ms: percentile(P95),
            p99_ms: percentile(P99),
            rate_per_second: buffer.rate(),
        }
    }

    /// Number of samples the statistics were calculated from.
    #[must_use]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Capacity of the buffer the snapshot was taken from.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the snapshot was taken from an empty buffer, in which case all values are zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    /// Mean latency.
    #[must_use]
    pub fn mean_ms(&self) -> f64 {
        self.mean_ms
    }

    /// Minimum latency, subject to the buffer's [`ExtremaTracking`][crate::ExtremaTracking] mode.
    #[must_use]
    pub fn min_ms(&self) -> f64 {
        self.min_ms
    }

    /// Maximum latency, subject to the buffer's [`ExtremaTracking`][crate::ExtremaTracking] mode.
    #[must_use]
    pub fn max_ms(&self) -> f64 {
        self.max_ms
    }

    /// Median latency.
    #[must_use]
    pub fn p50_ms(&self) -> f64 {
        self.p50_ms
    }

    /// 95th percentile latency.
    #[must_use]
    pub fn p95_ms(&self) -> f64 {
        self.p95_ms
    }

    /// 99th percentile latency.
    #[must_use]
    pub fn p99_ms(&self) -> f64 {
        self.p99_ms
    }

    /// Observed event throughput in events per second.
    #[must_use]
    pub fn rate_per_second(&self) -> f64 {
        self.rate_per_second
    }
}

impl Display for LatencySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // If there is no recorded data, we just say so instead of printing a row of zeroes.
        if self.is_empty() {
            return write!(f, "latency: no samples (capacity {})", self.capacity);
        }

        write!(
            f,
            "latency: {samples}/{capacity} samples; mean {mean:.3} ms; min {min:.3} ms; \
             max {max:.3} ms; p50 {p50:.3} ms; p95 {p95:.3} ms; p99 {p99:.3} ms; {rate:.1}/s",
            samples = self.samples,
            capacity = self.capacity,
            mean = self.mean_ms,
            min = self.min_ms,
            max = self.max_ms,
            p50 = self.p50_ms,
            p95 = self.p95_ms,
            p99 = self.p99_ms,
            rate = self.rate_per_second,
        )
    }
}
