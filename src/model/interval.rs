//! Interval and disjoint-interval locations.
//!
//! Unlike permissive geometry types that let malformed values through for a
//! later validation pass, intervals enforce `begin < end` at construction
//! and at every mutation: a tier's ordering and overlap logic is built on
//! that invariant and cannot tolerate degenerate spans.

use serde::{Deserialize, Serialize};

use super::point::TimePoint;
use crate::error::AnnTierError;

/// An ordered pair of [`TimePoint`]s with the strict invariant
/// `begin < end` under fuzzy comparison.
///
/// Construction and every mutation of either bound re-check the invariant;
/// a failed mutation returns an error and leaves the interval unchanged.
#[derive(Clone, Copy, Serialize)]
pub struct TimeInterval {
    begin: TimePoint,
    end: TimePoint,
}

impl TimeInterval {
    /// Creates an interval from two points.
    ///
    /// Fails when `begin` is not strictly before `end` under fuzzy
    /// comparison (fuzzy-equal bounds would make a zero-width span).
    pub fn new(begin: TimePoint, end: TimePoint) -> Result<Self, AnnTierError> {
        if begin < end {
            Ok(Self { begin, end })
        } else {
            Err(AnnTierError::InvalidInterval {
                begin: begin.midpoint(),
                end: end.midpoint(),
            })
        }
    }

    /// Creates an interval from exact begin/end values in seconds.
    pub fn from_seconds(begin: f64, end: f64) -> Result<Self, AnnTierError> {
        Self::new(TimePoint::exact(begin), TimePoint::exact(end))
    }

    /// Returns the begin point.
    #[inline]
    pub fn begin(&self) -> TimePoint {
        self.begin
    }

    /// Returns the end point.
    #[inline]
    pub fn end(&self) -> TimePoint {
        self.end
    }

    /// Moves the begin point, re-checking `begin < end`.
    pub fn set_begin(&mut self, begin: TimePoint) -> Result<(), AnnTierError> {
        if begin < self.end {
            self.begin = begin;
            Ok(())
        } else {
            Err(AnnTierError::InvalidInterval {
                begin: begin.midpoint(),
                end: self.end.midpoint(),
            })
        }
    }

    /// Moves the end point, re-checking `begin < end`.
    pub fn set_end(&mut self, end: TimePoint) -> Result<(), AnnTierError> {
        if self.begin < end {
            self.end = end;
            Ok(())
        } else {
            Err(AnnTierError::InvalidInterval {
                begin: self.begin.midpoint(),
                end: end.midpoint(),
            })
        }
    }

    /// Returns the duration in seconds, measured between midpoints.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end.midpoint() - self.begin.midpoint()
    }

    /// Sets the vagueness radius of both bounds.
    pub fn set_radius(&mut self, radius: f64) {
        self.begin.set_radius(radius);
        self.end.set_radius(radius);
    }

    /// Returns true if both bounds are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.begin.is_finite() && self.end.is_finite()
    }
}

impl PartialEq for TimeInterval {
    fn eq(&self, other: &Self) -> bool {
        self.begin == other.begin && self.end == other.end
    }
}

impl std::fmt::Debug for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TimeInterval([{:?}, {:?}])",
            self.begin.midpoint(),
            self.end.midpoint()
        )
    }
}

// Custom deserialize so the begin < end invariant holds for data read back
// in; malformed spans are a parse error, not a latent corrupt value.
impl<'de> Deserialize<'de> for TimeInterval {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct IntervalData {
            begin: TimePoint,
            end: TimePoint,
        }
        let data = IntervalData::deserialize(deserializer)?;
        TimeInterval::new(data.begin, data.end).map_err(serde::de::Error::custom)
    }
}

/// A non-empty run of [`TimeInterval`]s for a single annotation spanning
/// several non-contiguous spans (e.g. an utterance interrupted by an
/// overlapping speaker).
///
/// Members are kept sorted by begin point. Begin/end are derived as the
/// min/max over members; duration is the sum of member durations, so gaps
/// between members do not count.
#[derive(Clone, Serialize)]
pub struct TimeDisjoint {
    intervals: Vec<TimeInterval>,
}

impl TimeDisjoint {
    /// Creates a disjoint location from a non-empty set of intervals.
    pub fn new(mut intervals: Vec<TimeInterval>) -> Result<Self, AnnTierError> {
        if intervals.is_empty() {
            return Err(AnnTierError::EmptyDisjoint);
        }
        intervals.sort_by(|a, b| a.begin().midpoint().total_cmp(&b.begin().midpoint()));
        Ok(Self { intervals })
    }

    /// Returns the member intervals, sorted by begin.
    #[inline]
    pub fn intervals(&self) -> &[TimeInterval] {
        &self.intervals
    }

    /// Returns the earliest begin point across members.
    pub fn begin(&self) -> TimePoint {
        self.intervals[0].begin()
    }

    /// Returns the latest end point across members.
    pub fn end(&self) -> TimePoint {
        self.intervals
            .iter()
            .map(TimeInterval::end)
            .fold(self.intervals[0].end(), |acc, p| {
                if p.midpoint() > acc.midpoint() {
                    p
                } else {
                    acc
                }
            })
    }

    /// Returns the summed duration of the members (gaps excluded).
    pub fn duration(&self) -> f64 {
        self.intervals.iter().map(TimeInterval::duration).sum()
    }

    /// Moves the begin of the earliest member, re-checking its invariant.
    ///
    /// Members are re-sorted afterwards: when members overlap, moving the
    /// first begin can push it past another member's begin.
    pub fn set_begin(&mut self, begin: TimePoint) -> Result<(), AnnTierError> {
        self.intervals[0].set_begin(begin)?;
        self.intervals
            .sort_by(|a, b| a.begin().midpoint().total_cmp(&b.begin().midpoint()));
        Ok(())
    }

    /// Moves the end of the latest-ending member, re-checking its invariant.
    pub fn set_end(&mut self, end: TimePoint) -> Result<(), AnnTierError> {
        let last = self
            .intervals
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.end().midpoint().total_cmp(&b.end().midpoint()))
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        self.intervals[last].set_end(end)
    }

    /// Sets the vagueness radius of every member bound.
    pub fn set_radius(&mut self, radius: f64) {
        for interval in &mut self.intervals {
            interval.set_radius(radius);
        }
    }

    /// Returns true if all member bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.intervals.iter().all(TimeInterval::is_finite)
    }
}

impl PartialEq for TimeDisjoint {
    fn eq(&self, other: &Self) -> bool {
        self.intervals == other.intervals
    }
}

impl std::fmt::Debug for TimeDisjoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TimeDisjoint").field(&self.intervals).finish()
    }
}

impl<'de> Deserialize<'de> for TimeDisjoint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct DisjointData {
            intervals: Vec<TimeInterval>,
        }
        let data = DisjointData::deserialize(deserializer)?;
        TimeDisjoint::new(data.intervals).map_err(serde::de::Error::custom)
    }
}
