//! Conversion from the storage unit (nanoseconds) to the reporting units.
//!
//! Everything inside the buffer is kept in integer nanoseconds. Conversion happens only at the
//! reporting boundary: latency statistics are reported in milliseconds and elapsed time for
//! throughput calculations in seconds.

use crate::Nanos;

/// Number of nanoseconds in one millisecond.
pub const NANOS_PER_MILLISECOND: f64 = 1_000_000.0;

/// Number of nanoseconds in one second.
pub const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Converts a nanosecond quantity to fractional milliseconds.
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "sub-nanosecond precision is irrelevant for reporting"
)]
pub fn nanos_to_millis(nanos: Nanos) -> f64 {
    nanos as f64 / NANOS_PER_MILLISECOND
}

/// Converts a nanosecond quantity to fractional seconds.
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "sub-nanosecond precision is irrelevant for reporting"
)]
pub fn nanos_to_seconds(nanos: Nanos) -> f64 {
    nanos as f64 / NANOS_PER_SECOND
}
