use crate::{
    BufferConfig, DEFAULT_CAPACITY, DEFAULT_SAMPLE_INTERVAL, ExtremaTracking, LatencyStatsBuffer,
};

/// Creates instances of [`LatencyStatsBuffer`].
///
/// All parameters are optional and default to the values of [`BufferConfig::default()`].
///
/// Use `LatencyStatsBuffer::builder()` to create a new instance of this builder.
///
/// # Example
///
/// ```
/// use latency_ring::{ExtremaTracking, LatencyStatsBuffer};
///
/// let buffer = LatencyStatsBuffer::builder()
///     .capacity(200)
///     .sample_interval(1)
///     .extrema(ExtremaTracking::Window)
///     .build()
///     .unwrap();
///
/// assert_eq!(buffer.capacity(), 200);
/// ```
#[derive(Debug)]
#[must_use]
pub struct LatencyStatsBufferBuilder {
    capacity: usize,
    sample_interval: u32,
    extrema: ExtremaTracking,
}

impl LatencyStatsBufferBuilder {
    pub(crate) fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY.get(),
            sample_interval: DEFAULT_SAMPLE_INTERVAL.get(),
            extrema: ExtremaTracking::default(),
        }
    }

    /// Sets the number of samples the buffer holds before it starts overwriting the oldest.
    ///
    /// Must be at least 1, which is validated by [`build()`][Self::build].
    pub fn capacity(self, capacity: usize) -> Self {
        Self { capacity, ..self }
    }

    /// Sets how many underlying ticks separate two recorded samples.
    ///
    /// This only affects [`LatencyStatsBuffer::rate()`]. If the producer records every event it
    /// observes, use 1. Must be at least 1, which is validated by [`build()`][Self::build].
    pub fn sample_interval(self, sample_interval: u32) -> Self {
        Self {
            sample_interval,
            ..self
        }
    }

    /// Sets how the minimum and maximum latency are tracked.
    ///
    /// See [`ExtremaTracking`] for the semantics of each mode.
    pub fn extrema(self, extrema: ExtremaTracking) -> Self {
        Self { extrema, ..self }
    }

    /// Validates the parameters and creates the buffer, preallocating all of its storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroCapacity`][crate::Error::ZeroCapacity] or
    /// [`Error::ZeroSampleInterval`][crate::Error::ZeroSampleInterval] if the respective
    /// parameter is zero.
    pub fn build(self) -> crate::Result<LatencyStatsBuffer> {
        let config =
            BufferConfig::new(self.capacity, self.sample_interval)?.with_extrema(self.extrema);

        Ok(LatencyStatsBuffer::from_config(&config))
    }
}
