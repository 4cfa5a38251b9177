use std::collections::VecDeque;
use std::fmt::{self, Display};
use std::num::NonZero;
use std::str::FromStr;

use crate::{Error, Nanos};

/// How a [`LatencyStatsBuffer`][crate::LatencyStatsBuffer] tracks the minimum and maximum latency.
///
/// The two modes differ in what `min_max()` reports once the buffer has wrapped around and
/// started evicting old samples.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ExtremaTracking {
    /// The extrema are updated on every insertion and never recomputed on eviction.
    ///
    /// This is the cheapest option: two comparisons per recorded sample and no extra memory.
    /// The reported minimum and maximum are the extreme values recorded since the last
    /// `clear()`, which may include values that have already been evicted from the buffer.
    #[default]
    Insertion,

    /// The extrema always reflect the samples currently resident in the buffer.
    ///
    /// Uses two monotonic queues preallocated to the buffer capacity, so recording stays
    /// allocation-free and amortized O(1), at the cost of extra memory and bookkeeping.
    Window,
}

impl ExtremaTracking {
    /// The name of the mode as used in configuration documents.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Insertion => "insertion",
            Self::Window => "window",
        }
    }
}

impl Display for ExtremaTracking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtremaTracking {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "insertion" => Ok(Self::Insertion),
            "window" => Ok(Self::Window),
            other => Err(Error::invalid_config(
                "extrema",
                format!("'{other}' is not one of 'insertion', 'window'"),
            )),
        }
    }
}

/// The extrema state owned by a buffer, matching its configured [`ExtremaTracking`].
#[derive(Debug)]
pub(crate) enum Extrema {
    Insertion(InsertionExtrema),
    Window(WindowExtrema),
}

impl Extrema {
    pub(crate) fn new(tracking: ExtremaTracking, capacity: NonZero<usize>) -> Self {
        match tracking {
            ExtremaTracking::Insertion => Self::Insertion(InsertionExtrema::new()),
            ExtremaTracking::Window => Self::Window(WindowExtrema::new(capacity)),
        }
    }

    #[inline]
    pub(crate) fn insert(&mut self, latency: Nanos) {
        match self {
            Self::Insertion(extrema) => extrema.insert(latency),
            Self::Window(extrema) => extrema.insert(latency),
        }
    }

    /// `None` if nothing has been inserted since construction or the last `clear()`.
    pub(crate) fn min_max(&self) -> Option<(Nanos, Nanos)> {
        match self {
            Self::Insertion(extrema) => extrema.min_max(),
            Self::Window(extrema) => extrema.min_max(),
        }
    }

    pub(crate) fn clear(&mut self) {
        match self {
            Self::Insertion(extrema) => extrema.clear(),
            Self::Window(extrema) => extrema.clear(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct InsertionExtrema {
    // Nanos::MAX and 0 play the role of +inf and -inf. An empty state is detected by min > max.
    min: Nanos,
    max: Nanos,
}

impl InsertionExtrema {
    fn new() -> Self {
        Self {
            min: Nanos::MAX,
            max: Nanos::MIN,
        }
    }

    #[inline]
    fn insert(&mut self, latency: Nanos) {
        self.min = self.min.min(latency);
        self.max = self.max.max(latency);
    }

    fn min_max(&self) -> Option<(Nanos, Nanos)> {
        (self.min <= self.max).then_some((self.min, self.max))
    }

    fn clear(&mut self) {
        *self = Self::new();
    }
}

/// Sliding-window extrema over the last `capacity` insertions.
///
/// Each queue holds `(sequence, latency)` pairs. The min queue is ascending by latency and the
/// max queue descending, so the front of each is the current extremum. Entries whose sequence
/// number has left the window are dropped from the front on the next insertion.
#[derive(Debug)]
pub(crate) struct WindowExtrema {
    window: u64,
    next_sequence: u64,

    min_queue: VecDeque<(u64, Nanos)>,
    max_queue: VecDeque<(u64, Nanos)>,
}

impl WindowExtrema {
    fn new(capacity: NonZero<usize>) -> Self {
        Self {
            window: u64::try_from(capacity.get()).unwrap_or(u64::MAX),
            next_sequence: 0,
            min_queue: VecDeque::with_capacity(capacity.get()),
            max_queue: VecDeque::with_capacity(capacity.get()),
        }
    }

    #[inline]
    fn insert(&mut self, latency: Nanos) {
        let sequence = self.next_sequence;
        self.next_sequence = sequence.wrapping_add(1);

        // Expiry runs before the push, so neither queue ever holds more than `window` entries
        // and the preallocated storage is never outgrown.
        push_monotonic(&mut self.min_queue, self.window, sequence, latency, |old, new| {
            old >= new
        });
        push_monotonic(&mut self.max_queue, self.window, sequence, latency, |old, new| {
            old <= new
        });
    }

    fn min_max(&self) -> Option<(Nanos, Nanos)> {
        let (_, min) = self.min_queue.front()?;
        let (_, max) = self.max_queue.front()?;
        Some((*min, *max))
    }

    fn clear(&mut self) {
        self.next_sequence = 0;
        self.min_queue.clear();
        self.max_queue.clear();
    }
}

fn push_monotonic(
    queue: &mut VecDeque<(u64, Nanos)>,
    window: u64,
    sequence: u64,
    latency: Nanos,
    is_dominated: impl Fn(Nanos, Nanos) -> bool,
) {
    while let Some(&(oldest_sequence, _)) = queue.front() {
        if sequence.wrapping_sub(oldest_sequence) >= window {
            queue.pop_front();
        } else {
            break;
        }
    }

    while let Some(&(_, newest)) = queue.back() {
        if is_dominated(newest, latency) {
            queue.pop_back();
        } else {
            break;
        }
    }

    queue.push_back((sequence, latency));
}
