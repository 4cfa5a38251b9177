#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Streaming latency statistics over a fixed-capacity ring of samples.
//!
//! This package summarizes the timing of a real-time control loop, such as the delay between a
//! servo command being issued and it being applied, without unbounded memory growth and without
//! rescanning the history on every query.
//!
//! The core type is [`LatencyStatsBuffer`], which keeps the most recent `N` samples and maintains
//! their sum and extrema incrementally:
//!
//! * [`record()`][LatencyStatsBuffer::record] is O(1) and never allocates, so it is safe to call
//!   from a latency-sensitive periodic task.
//! * [`mean()`][LatencyStatsBuffer::mean], [`min_max()`][LatencyStatsBuffer::min_max] and
//!   [`rate()`][LatencyStatsBuffer::rate] are O(1).
//! * [`percentile()`][LatencyStatsBuffer::percentile] and
//!   [`summary()`][LatencyStatsBuffer::summary] sort the resident samples and should be used
//!   sparingly, e.g. from a status reporter running every few seconds.
//!
//! # Units
//!
//! Latencies and timestamps are recorded as integer nanoseconds ([`Nanos`]). Latency statistics
//! are reported in milliseconds and throughput in events per second. The conversion constants
//! live in the [`units`] module.
//!
//! # Example
//!
//! ```
//! use latency_ring::LatencyStatsBuffer;
//!
//! let mut buffer = LatencyStatsBuffer::builder()
//!     .capacity(5)
//!     .sample_interval(5)
//!     .build()
//!     .unwrap();
//!
//! // One recorded sample every 250 ms, each with a latency of 2 ms.
//! for i in 0..5 {
//!     buffer.record(2_000_000, i * 250_000_000);
//! }
//!
//! assert!((buffer.mean() - 2.0).abs() < 1e-9);
//! assert!((buffer.rate() - 24.0).abs() < 1e-9);
//!
//! println!("{}", buffer.summary());
//! ```
//!
//! # Empty and degenerate states
//!
//! Construction is the only fallible operation. Queries on an empty buffer, or a throughput query
//! over identical or backwards timestamps, return zero instead of failing, so a periodic status
//! report never needs to special-case a buffer that has not warmed up yet.
//!
//! # Minimum and maximum
//!
//! By default the extrema are updated on insertion only and are not recomputed when the sample
//! holding the current extremum is overwritten. They therefore describe everything recorded
//! since the last [`clear()`][LatencyStatsBuffer::clear], not only the resident samples. Select
//! [`ExtremaTracking::Window`] to track the extrema of the resident samples instead.
//!
//! # Threading
//!
//! [`LatencyStatsBuffer`] performs no internal synchronization. Use [`SharedLatencyStats`] when
//! recording and querying happen on different threads.
//!
//! # Configuration
//!
//! The capacity and the sample interval (how many underlying events separate two recorded
//! samples, used by the throughput calculation) can be set via
//! [`LatencyStatsBuffer::builder()`] or loaded from TOML via [`BufferConfig::from_toml_str()`].

mod buffer;
mod builder;
mod config;
mod data_types;
mod error;
mod extrema;
mod shared;
mod summary;
pub mod units;

pub use buffer::*;
pub use builder::*;
pub use config::*;
pub use data_types::*;
pub use error::Error;
pub(crate) use error::Result;
pub use extrema::ExtremaTracking;
pub(crate) use extrema::Extrema;
pub use shared::*;
pub use summary::*;
pub(crate) use units::{nanos_to_millis, nanos_to_seconds};

// A panic while the lock is held may have left the ring half-updated.
pub(crate) const ERR_POISONED_LOCK: &str =
    "encountered poisoned lock - latency statistics can no longer be trusted";
