use std::sync::{Arc, Mutex};

use crate::{ERR_POISONED_LOCK, LatencyStatsBuffer, LatencySummary, Nanos};

/// A cloneable, thread-safe handle to a [`LatencyStatsBuffer`].
///
/// All clones refer to the same buffer, guarded by a single lock. This allows a measurement
/// task to record samples on one thread while a status reporter queries them from another.
///
/// Every operation holds the lock only for the duration of the call. Recording never waits on
/// anything but a concurrent query, and queries other than [`percentile()`][Self::percentile]
/// and [`summary()`][Self::summary] are O(1).
///
/// # Example
///
/// ```
/// use std::thread;
///
/// use latency_ring::{LatencyStatsBuffer, SharedLatencyStats};
///
/// let stats = SharedLatencyStats::new(LatencyStatsBuffer::new(50).unwrap());
///
/// let producer = thread::spawn({
///     let stats = stats.clone();
///
///     move || {
///         for i in 0..100 {
///             stats.record(1_000_000, i * 10_000_000);
///         }
///     }
/// });
///
/// producer.join().unwrap();
///
/// assert_eq!(stats.len(), 50);
/// println!("{}", stats.summary());
/// ```
#[derive(Clone, Debug)]
pub struct SharedLatencyStats {
    buffer: Arc<Mutex<LatencyStatsBuffer>>,
}

impl SharedLatencyStats {
    /// Takes ownership of a buffer and makes it shareable.
    #[must_use]
    pub fn new(buffer: LatencyStatsBuffer) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(buffer)),
        }
    }

    /// See [`LatencyStatsBuffer::record()`].
    pub fn record(&self, latency: Nanos, timestamp: Nanos) {
        self.with_mut(|buffer| buffer.record(latency, timestamp));
    }

    /// See [`LatencyStatsBuffer::mean()`].
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    pub fn mean(&self) -> f64 {
        self.with(LatencyStatsBuffer::mean)
    }

    /// See [`LatencyStatsBuffer::min_max()`].
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    pub fn min_max(&self) -> (f64, f64) {
        self.with(LatencyStatsBuffer::min_max)
    }

    /// See [`LatencyStatsBuffer::rate()`].
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    pub fn rate(&self) -> f64 {
        self.with(LatencyStatsBuffer::rate)
    }

    /// See [`LatencyStatsBuffer::percentile()`].
    ///
    /// The lock is held while the resident samples are copied and sorted.
    #[must_use]
    pub fn percentile(&self, fraction: f64) -> f64 {
        self.with(|buffer| buffer.percentile(fraction))
    }

    /// See [`LatencyStatsBuffer::summary()`].
    ///
    /// The lock is held while the resident samples are copied and sorted.
    #[must_use]
    pub fn summary(&self) -> LatencySummary {
        self.with(LatencyStatsBuffer::summary)
    }

    /// See [`LatencyStatsBuffer::clear()`].
    pub fn clear(&self) {
        self.with_mut(LatencyStatsBuffer::clear);
    }

    /// See [`LatencyStatsBuffer::len()`].
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    pub fn len(&self) -> usize {
        self.with(LatencyStatsBuffer::len)
    }

    /// See [`LatencyStatsBuffer::is_empty()`].
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    pub fn is_empty(&self) -> bool {
        self.with(LatencyStatsBuffer::is_empty)
    }

    /// Runs a closure with shared access to the buffer while holding the lock.
    ///
    /// Useful for combining several queries into one consistent view.
    pub fn with<R>(&self, f: impl FnOnce(&LatencyStatsBuffer) -> R) -> R {
        let buffer = self.buffer.lock().expect(ERR_POISONED_LOCK);
        f(&buffer)
    }

    fn with_mut<R>(&self, f: impl FnOnce(&mut LatencyStatsBuffer) -> R) -> R {
        let mut buffer = self.buffer.lock().expect(ERR_POISONED_LOCK);
        f(&mut buffer)
    }
}

impl From<LatencyStatsBuffer> for SharedLatencyStats {
    fn from(buffer: LatencyStatsBuffer) -> Self {
        Self::new(buffer)
    }
}
