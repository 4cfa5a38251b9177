use std::time::Duration;

/// A duration or monotonic timestamp expressed in nanoseconds.
///
/// Adding a latency to a running sum and later subtracting it again restores the previous sum
/// exactly.
pub type Nanos = u64;

/// Converts a [`Duration`] to [`Nanos`], saturating at `Nanos::MAX`.
///
/// A latency that does not fit in 584 years of nanoseconds is not a latency we can say anything
/// meaningful about, so we simply clamp it.
#[must_use]
pub fn duration_to_nanos(duration: Duration) -> Nanos {
    Nanos::try_from(duration.as_nanos()).unwrap_or(Nanos::MAX)
}

/// One observation recorded into a [`LatencyStatsBuffer`][crate::LatencyStatsBuffer].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Sample {
    latency: Nanos,
    arrival_time: Nanos,
}

impl Sample {
    /// Creates a sample from a latency and the monotonic time at which it was observed.
    #[must_use]
    pub const fn new(latency: Nanos, arrival_time: Nanos) -> Self {
        Self {
            latency,
            arrival_time,
        }
    }

    /// The observed latency, in nanoseconds.
    #[must_use]
    pub const fn latency(&self) -> Nanos {
        self.latency
    }

    /// The monotonic timestamp of the observation, in nanoseconds.
    ///
    /// Only used for ordering and throughput calculations, never for latency conversion.
    #[must_use]
    pub const fn arrival_time(&self) -> Nanos {
        self.arrival_time
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Sample: Send, Sync, Copy, Debug);

    #[test]
    fn sample_exposes_fields() {
        let sample = Sample::new(1500, 42);

        assert_eq!(sample.latency(), 1500);
        assert_eq!(sample.arrival_time(), 42);
    }

    #[test]
    fn default_sample_is_zeroed() {
        assert_eq!(Sample::default(), Sample::new(0, 0));
    }

    #[test]
    fn duration_conversion_saturates() {
        assert_eq!(duration_to_nanos(Duration::from_micros(3)), 3_000);
        assert_eq!(duration_to_nanos(Duration::MAX), Nanos::MAX);
    }
}
