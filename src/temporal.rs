//! Time interval arithmetic for visit overlap
//!
//! Intervals are half-open: two visits that touch at a single instant do not
//! overlap.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Whether `[a_start, a_end)` and `[b_start, b_end)` share a non-empty overlap
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start.max(b_start) < a_end.min(b_end)
}

/// Signed length of the intersection of two intervals
///
/// Zero or negative means the intervals do not overlap; check the sign or
/// call [`overlaps`] first.
pub fn overlap_duration(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> Duration {
    a_end.min(b_end) - a_start.max(b_start)
}

/// Whether an exposure lasted at least `threshold`
pub fn exceeds_threshold(duration: Duration, threshold: Duration) -> bool {
    duration >= threshold
}

/// Error returned when an interval would end before it starts
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("interval ends at {end} before it starts at {start}")]
pub struct InvertedInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A `[start, end)` time range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, InvertedInterval> {
        if start > end {
            return Err(InvertedInterval { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }

    pub fn overlap_duration(&self, other: &Interval) -> Duration {
        overlap_duration(self.start, self.end, other.start, other.end)
    }

    /// The shared part of both intervals, if any
    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Interval {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }
}
