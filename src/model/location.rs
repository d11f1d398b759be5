//! The polymorphic location of an annotation.
//!
//! A location is one of a closed set of variants: a single point, an
//! interval, or a disjoint run of intervals. The set is never extended at
//! runtime. Accessors that only make sense for some variants return a typed
//! kind-mismatch error for the others instead of silently coercing.

use serde::{Deserialize, Serialize};

use super::interval::{TimeDisjoint, TimeInterval};
use super::point::TimePoint;
use crate::error::AnnTierError;

/// Where an annotation sits on the time axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Location {
    /// A single instant (e.g. a pitch target or a click mark).
    Point(TimePoint),
    /// A contiguous span.
    Interval(TimeInterval),
    /// Several non-contiguous spans belonging to one annotation.
    Disjoint(TimeDisjoint),
}

impl Location {
    /// Returns the variant name, used in kind-mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Location::Point(_) => "point",
            Location::Interval(_) => "interval",
            Location::Disjoint(_) => "disjoint",
        }
    }

    /// Returns the begin point of a span location.
    ///
    /// Fails with a kind mismatch on a point location.
    pub fn begin(&self) -> Result<TimePoint, AnnTierError> {
        match self {
            Location::Interval(interval) => Ok(interval.begin()),
            Location::Disjoint(disjoint) => Ok(disjoint.begin()),
            Location::Point(_) => Err(AnnTierError::LocationKind {
                expected: "interval or disjoint",
                found: "point",
            }),
        }
    }

    /// Returns the end point of a span location.
    ///
    /// Fails with a kind mismatch on a point location.
    pub fn end(&self) -> Result<TimePoint, AnnTierError> {
        match self {
            Location::Interval(interval) => Ok(interval.end()),
            Location::Disjoint(disjoint) => Ok(disjoint.end()),
            Location::Point(_) => Err(AnnTierError::LocationKind {
                expected: "interval or disjoint",
                found: "point",
            }),
        }
    }

    /// Returns the point of a point location.
    ///
    /// Fails with a kind mismatch on span locations.
    pub fn point(&self) -> Result<TimePoint, AnnTierError> {
        match self {
            Location::Point(point) => Ok(*point),
            other => Err(AnnTierError::LocationKind {
                expected: "point",
                found: other.kind(),
            }),
        }
    }

    /// Moves the begin of a span location, re-checking `begin < end`.
    ///
    /// On a disjoint location the earliest member is adjusted.
    pub fn set_begin(&mut self, begin: TimePoint) -> Result<(), AnnTierError> {
        match self {
            Location::Interval(interval) => interval.set_begin(begin),
            Location::Disjoint(disjoint) => disjoint.set_begin(begin),
            Location::Point(_) => Err(AnnTierError::LocationKind {
                expected: "interval or disjoint",
                found: "point",
            }),
        }
    }

    /// Moves the end of a span location, re-checking `begin < end`.
    ///
    /// On a disjoint location the latest-ending member is adjusted.
    pub fn set_end(&mut self, end: TimePoint) -> Result<(), AnnTierError> {
        match self {
            Location::Interval(interval) => interval.set_end(end),
            Location::Disjoint(disjoint) => disjoint.set_end(end),
            Location::Point(_) => Err(AnnTierError::LocationKind {
                expected: "interval or disjoint",
                found: "point",
            }),
        }
    }

    /// Moves a point location.
    ///
    /// Fails with a kind mismatch on span locations.
    pub fn set_point(&mut self, point: TimePoint) -> Result<(), AnnTierError> {
        match self {
            Location::Point(p) => {
                *p = point;
                Ok(())
            }
            other => Err(AnnTierError::LocationKind {
                expected: "point",
                found: other.kind(),
            }),
        }
    }

    /// Reduces any location to a `(begin, end)` span, points becoming
    /// zero-width. This is the basis of tier ordering, overlap checks and
    /// Allen-relation evaluation.
    pub fn span(&self) -> (TimePoint, TimePoint) {
        match self {
            Location::Point(point) => (*point, *point),
            Location::Interval(interval) => (interval.begin(), interval.end()),
            Location::Disjoint(disjoint) => (disjoint.begin(), disjoint.end()),
        }
    }

    /// Returns the duration in seconds. A point has duration 0: its
    /// vagueness lives in the radius, not in the duration.
    pub fn duration(&self) -> f64 {
        match self {
            Location::Point(_) => 0.0,
            Location::Interval(interval) => interval.duration(),
            Location::Disjoint(disjoint) => disjoint.duration(),
        }
    }

    /// Sets the vagueness radius of every bound in the location.
    pub fn set_radius(&mut self, radius: f64) {
        match self {
            Location::Point(point) => point.set_radius(radius),
            Location::Interval(interval) => interval.set_radius(radius),
            Location::Disjoint(disjoint) => disjoint.set_radius(radius),
        }
    }

    /// Returns true if every bound is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Location::Point(point) => point.is_finite(),
            Location::Interval(interval) => interval.is_finite(),
            Location::Disjoint(disjoint) => disjoint.is_finite(),
        }
    }

    /// True when the point falls inside this location's span (bounds
    /// included, under fuzzy comparison).
    pub fn covers(&self, point: &TimePoint) -> bool {
        let (begin, end) = self.span();
        begin <= *point && *point <= end
    }

    /// True when the whole location lies strictly before the point.
    pub fn is_before(&self, point: &TimePoint) -> bool {
        self.span().1 < *point
    }

    /// True when the whole location lies strictly after the point.
    pub fn is_after(&self, point: &TimePoint) -> bool {
        self.span().0 > *point
    }
}

impl From<TimePoint> for Location {
    fn from(point: TimePoint) -> Self {
        Location::Point(point)
    }
}

impl From<TimeInterval> for Location {
    fn from(interval: TimeInterval) -> Self {
        Location::Interval(interval)
    }
}

impl From<TimeDisjoint> for Location {
    fn from(disjoint: TimeDisjoint) -> Self {
        Location::Disjoint(disjoint)
    }
}
