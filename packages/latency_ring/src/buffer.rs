use std::time::Duration;

use tracing::debug;

use crate::{
    BufferConfig, Extrema, LatencyStatsBufferBuilder, LatencySummary, Nanos, Sample,
    duration_to_nanos, nanos_to_millis, nanos_to_seconds,
};
use crate::units::NANOS_PER_MILLISECOND;

/// A fixed-capacity ring of latency samples with streaming aggregate statistics.
///
/// Once the buffer is full, each new sample overwrites the oldest one. The sum of resident
/// latencies and the extrema are maintained incrementally, so recording and the common queries
/// are O(1) and never allocate. Only [`percentile()`][Self::percentile] and
/// [`summary()`][Self::summary] look at every resident sample.
///
/// Latencies and timestamps are supplied in nanoseconds. Latency statistics are reported in
/// milliseconds and throughput in events per second (see the [`units`][crate::units] module).
///
/// # Thread safety
///
/// The buffer performs no internal synchronization. If the producer and the consumer run on
/// different threads, wrap it in a [`SharedLatencyStats`][crate::SharedLatencyStats].
///
/// # Example
///
/// ```
/// use latency_ring::LatencyStatsBuffer;
///
/// let mut buffer = LatencyStatsBuffer::new(3).unwrap();
///
/// buffer.record(100, 0);
/// buffer.record(200, 1000);
/// buffer.record(300, 2000);
///
/// assert!((buffer.mean() - 200.0 / 1e6).abs() < 1e-12);
/// assert_eq!(buffer.len(), 3);
/// ```
#[derive(Debug)]
pub struct LatencyStatsBuffer {
    config: BufferConfig,

    // Length is always `config.capacity()`. Slots at or beyond `occupancy` (when not full)
    // hold stale data that no query ever reads.
    storage: Box<[Sample]>,

    // Index of the next slot to overwrite. Always < storage.len().
    write_cursor: usize,

    // Number of valid samples, saturating at storage.len().
    occupancy: usize,

    // Exact sum of the resident latencies. At most `usize::MAX` values of `Nanos` are resident,
    // which cannot exceed u128.
    running_sum: u128,

    extrema: Extrema,
}

impl LatencyStatsBuffer {
    /// Creates a buffer with the given capacity and default values for all other parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroCapacity`][crate::Error::ZeroCapacity] if `capacity` is zero.
    pub fn new(capacity: usize) -> crate::Result<Self> {
        Self::builder().capacity(capacity).build()
    }

    /// Starts building a buffer with custom parameters.
    pub fn builder() -> LatencyStatsBufferBuilder {
        LatencyStatsBufferBuilder::new()
    }

    /// Creates a buffer from an already validated configuration.
    #[must_use]
    pub fn from_config(config: &BufferConfig) -> Self {
        let capacity = config.capacity();

        debug!(
            capacity = capacity.get(),
            sample_interval = config.sample_interval().get(),
            extrema = %config.extrema(),
            "creating latency statistics buffer"
        );

        Self {
            config: *config,
            storage: vec![Sample::default(); capacity.get()].into_boxed_slice(),
            write_cursor: 0,
            occupancy: 0,
            running_sum: 0,
            extrema: Extrema::new(config.extrema(), capacity),
        }
    }

    /// Records one latency measurement observed at the given monotonic timestamp.
    ///
    /// If the buffer is full, the oldest sample is overwritten. Any values are accepted,
    /// including timestamps that go backwards; keeping timestamps monotonic is the
    /// responsibility of the caller.
    #[inline]
    #[expect(
        clippy::arithmetic_side_effects,
        reason = "the running sum of resident u64 latencies cannot overflow u128"
    )]
    pub fn record(&mut self, latency: Nanos, timestamp: Nanos) {
        let capacity = self.storage.len();
        let is_full = self.occupancy == capacity;

        let slot = self
            .storage
            .get_mut(self.write_cursor)
            .expect("write cursor is always within storage bounds");

        if is_full {
            self.running_sum -= u128::from(slot.latency());
        }

        *slot = Sample::new(latency, timestamp);

        self.running_sum += u128::from(latency);
        self.extrema.insert(latency);

        self.write_cursor = next_index(self.write_cursor, capacity);
        self.occupancy = self.occupancy.saturating_add(1).min(capacity);
    }

    /// Records one latency measurement given as a [`Duration`].
    ///
    /// Latencies that do not fit in [`Nanos`] are clamped to [`Nanos::MAX`].
    #[inline]
    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    pub fn record_duration(&mut self, latency: Duration, timestamp: Nanos) {
        self.record(duration_to_nanos(latency), timestamp);
    }

    /// Mean latency of the resident samples, in milliseconds.
    ///
    /// Returns zero if the buffer is empty.
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.occupancy == 0 {
            return 0.0;
        }

        #[expect(
            clippy::cast_precision_loss,
            reason = "occupancy is far below 2^52 in any realistic buffer"
        )]
        let occupancy = self.occupancy as f64;

        #[expect(
            clippy::cast_precision_loss,
            reason = "sub-nanosecond precision is irrelevant for reporting"
        )]
        let running_sum = self.running_sum as f64;

        running_sum / NANOS_PER_MILLISECOND / occupancy
    }

    /// Minimum and maximum latency, in milliseconds.
    ///
    /// Returns `(0.0, 0.0)` if the buffer is empty.
    ///
    /// With the default [`ExtremaTracking::Insertion`][crate::ExtremaTracking::Insertion] mode,
    /// these are the extreme values recorded since the buffer was created or last cleared, which
    /// may include samples that have since been overwritten. Use
    /// [`ExtremaTracking::Window`][crate::ExtremaTracking::Window] to only consider resident
    /// samples.
    #[must_use]
    pub fn min_max(&self) -> (f64, f64) {
        if self.occupancy == 0 {
            return (0.0, 0.0);
        }

        self.extrema.min_max().map_or((0.0, 0.0), |(min, max)| {
            (nanos_to_millis(min), nanos_to_millis(max))
        })
    }

    /// Observed event throughput in events per second.
    ///
    /// Derived from the timestamps of the oldest and newest resident samples, scaled by the
    /// configured sample interval because only every n-th underlying event is recorded.
    ///
    /// Returns zero if fewer than two samples are resident or if the newest timestamp is not
    /// later than the oldest one.
    #[must_use]
    pub fn rate(&self) -> f64 {
        if self.occupancy < 2 {
            return 0.0;
        }

        let Some((oldest, newest)) = self.oldest_and_newest() else {
            return 0.0;
        };

        let elapsed = match newest.arrival_time().checked_sub(oldest.arrival_time()) {
            Some(elapsed) if elapsed > 0 => elapsed,
            _ => return 0.0,
        };

        #[expect(
            clippy::cast_precision_loss,
            reason = "occupancy is far below 2^52 in any realistic buffer"
        )]
        let occupancy = self.occupancy as f64;
        let sample_interval = f64::from(self.config.sample_interval().get());

        (occupancy * sample_interval - 1.0) / nanos_to_seconds(elapsed)
    }

    /// The latency at the given fractional rank among the resident samples, in milliseconds.
    ///
    /// `fraction` is expected to be in `0.0..=1.0`; `0.0` yields the smallest resident latency
    /// and `1.0` the largest. Values outside this range are clamped to it.
    ///
    /// Returns zero if the buffer is empty.
    ///
    /// This copies and sorts all resident samples, so it is O(k log k) and allocates. Use it
    /// sparingly and never on the recording path. To obtain several percentiles at once, prefer
    /// [`percentiles()`][Self::percentiles] or [`summary()`][Self::summary], which sort only once.
    #[must_use]
    pub fn percentile(&self, fraction: f64) -> f64 {
        select_percentile(&self.sorted_latencies(), fraction).map_or(0.0, nanos_to_millis)
    }

    /// Several percentiles computed from a single sort of the resident samples.
    ///
    /// The result has one entry per input fraction, in the same order, each following the rules
    /// of [`percentile()`][Self::percentile].
    #[must_use]
    pub fn percentiles(&self, fractions: &[f64]) -> Vec<f64> {
        let sorted = self.sorted_latencies();

        fractions
            .iter()
            .map(|&fraction| select_percentile(&sorted, fraction).map_or(0.0, nanos_to_millis))
            .collect()
    }

    /// Takes a snapshot of all statistics of the resident samples.
    ///
    /// Like [`percentile()`][Self::percentile], this sorts the resident samples once.
    #[must_use]
    pub fn summary(&self) -> LatencySummary {
        LatencySummary::from_buffer(self, &self.sorted_latencies())
    }

    /// Discards all samples and resets the statistics.
    ///
    /// The storage is retained and not zeroed. The buffer afterwards behaves exactly like a
    /// freshly created one with the same configuration.
    pub fn clear(&mut self) {
        let discarded = self.occupancy;

        self.occupancy = 0;
        self.write_cursor = 0;
        self.running_sum = 0;
        self.extrema.clear();

        debug!(discarded, "cleared latency statistics buffer");
    }

    /// Iterates over the resident samples from oldest to newest.
    #[must_use]
    pub fn samples(&self) -> impl DoubleEndedIterator<Item = &Sample> {
        let (older, newer) = if self.is_full() {
            let (newer, older) = self.storage.split_at(self.write_cursor);
            (older, newer)
        } else {
            (self.storage.get(..self.occupancy).unwrap_or_default(), &[][..])
        };

        older.iter().chain(newer)
    }

    /// Number of resident samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.occupancy
    }

    /// Whether no samples are resident.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupancy == 0
    }

    /// Whether the buffer has wrapped, i.e. each further sample overwrites the oldest one.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.occupancy == self.storage.len()
    }

    /// Maximum number of resident samples.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// The configuration the buffer was created with.
    #[must_use]
    pub fn config(&self) -> BufferConfig {
        self.config
    }

    fn oldest_and_newest(&self) -> Option<(&Sample, &Sample)> {
        let last = self.occupancy.checked_sub(1)?;

        let (oldest, newest) = if self.is_full() {
            (
                self.write_cursor,
                previous_index(self.write_cursor, self.storage.len()),
            )
        } else {
            (0, last)
        };

        Some((self.storage.get(oldest)?, self.storage.get(newest)?))
    }

    fn sorted_latencies(&self) -> Vec<Nanos> {
        let mut latencies = self.samples().map(Sample::latency).collect::<Vec<_>>();
        latencies.sort_unstable();
        latencies
    }
}

#[inline]
fn next_index(index: usize, capacity: usize) -> usize {
    let next = index.wrapping_add(1);

    if next == capacity { 0 } else { next }
}

fn previous_index(index: usize, capacity: usize) -> usize {
    index
        .checked_sub(1)
        .unwrap_or_else(|| capacity.wrapping_sub(1))
}

/// Picks the value at index `floor(fraction * len)`, clamped to the valid index range.
///
/// `None` if `sorted` is empty.
pub(crate) fn select_percentile(sorted: &[Nanos], fraction: f64) -> Option<Nanos> {
    let last = sorted.len().checked_sub(1)?;

    #[expect(
        clippy::cast_precision_loss,
        reason = "occupancy is far below 2^52 in any realistic buffer"
    )]
    let rank = (fraction * sorted.len() as f64).floor();

    // Float to integer casts saturate: negative values and NaN become 0, huge values usize::MAX.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "saturating cast is the desired clamping behavior"
    )]
    let index = (rank as usize).min(last);

    sorted.get(index).copied()
}
