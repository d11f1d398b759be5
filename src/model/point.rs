//! Time values with built-in measurement vagueness.
//!
//! A boundary produced by forced alignment or manual segmentation is never
//! exact, so every point carries a `radius`: the half-width of the window in
//! which the true value is assumed to live. Equality is defined over that
//! window rather than over raw floats.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A point on the time axis: a midpoint in seconds plus a non-negative
/// vagueness radius.
///
/// Two points are equal iff their windows touch:
/// `|a.mid - b.mid| <= a.radius + b.radius`. Ordering is consistent with
/// that equality: `a < b` iff the points are not equal and `a.mid < b.mid`.
///
/// Fuzzy equality is reflexive and symmetric but NOT transitive: with
/// radius 0.5, `0.0 == 0.8` and `0.8 == 1.6` while `0.0 != 1.6`. Nothing in
/// this crate relies on transitivity, and callers must not either. `Eq` and
/// `Hash` are deliberately not implemented.
///
/// The radius is mutable; widening it after the fact changes the outcome of
/// later comparisons, which callers use to normalize vagueness before bulk
/// structural comparisons (see [`Tier::set_radius`](super::Tier::set_radius)).
#[derive(Clone, Copy, Serialize)]
pub struct TimePoint {
    midpoint: f64,
    radius: f64,
}

impl TimePoint {
    /// Creates a point with the given midpoint and radius.
    ///
    /// Never fails: a negative radius is clamped to 0.
    #[inline]
    pub fn new(midpoint: f64, radius: f64) -> Self {
        Self {
            midpoint,
            radius: radius.max(0.0),
        }
    }

    /// Creates an exact point (radius 0).
    #[inline]
    pub fn exact(midpoint: f64) -> Self {
        Self::new(midpoint, 0.0)
    }

    /// Returns the midpoint in seconds.
    #[inline]
    pub fn midpoint(&self) -> f64 {
        self.midpoint
    }

    /// Returns the vagueness radius in seconds.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Sets the vagueness radius, clamping negative values to 0.
    ///
    /// This retroactively changes the outcome of equality comparisons.
    #[inline]
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.max(0.0);
    }

    /// Moves the midpoint, keeping the radius.
    #[inline]
    pub fn set_midpoint(&mut self, midpoint: f64) {
        self.midpoint = midpoint;
    }

    /// Returns true if the midpoint and radius are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.midpoint.is_finite() && self.radius.is_finite()
    }

    /// Three-way fuzzy comparison.
    ///
    /// Returns `Ordering::Equal` when the vagueness windows touch, otherwise
    /// compares midpoints. Falls back to `Equal` for non-finite midpoints,
    /// which validation reports separately.
    #[inline]
    pub fn fuzzy_cmp(&self, other: &TimePoint) -> Ordering {
        if (self.midpoint - other.midpoint).abs() <= self.radius + other.radius {
            Ordering::Equal
        } else {
            self.midpoint
                .partial_cmp(&other.midpoint)
                .unwrap_or(Ordering::Equal)
        }
    }
}

impl PartialEq for TimePoint {
    fn eq(&self, other: &Self) -> bool {
        self.fuzzy_cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for TimePoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.fuzzy_cmp(other))
    }
}

impl std::fmt::Debug for TimePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimePoint({}, ~{})", self.midpoint, self.radius)
    }
}

impl std::fmt::Display for TimePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.midpoint)
    }
}

// Custom deserialize so the radius clamp also applies to data read back in.
impl<'de> Deserialize<'de> for TimePoint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct PointData {
            midpoint: f64,
            #[serde(default)]
            radius: f64,
        }
        let data = PointData::deserialize(deserializer)?;
        Ok(TimePoint::new(data.midpoint, data.radius))
    }
}

/// Discrete analog of [`TimePoint`]: a frame index with an integer radius.
///
/// Same fuzzy contract: two frame points are equal iff
/// `|a.frame - b.frame| <= a.radius + b.radius`.
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct FramePoint {
    frame: u64,
    #[serde(default)]
    radius: u64,
}

impl FramePoint {
    /// Creates a frame point with the given index and radius.
    #[inline]
    pub fn new(frame: u64, radius: u64) -> Self {
        Self { frame, radius }
    }

    /// Returns the frame index.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Returns the vagueness radius in frames.
    #[inline]
    pub fn radius(&self) -> u64 {
        self.radius
    }

    /// Sets the vagueness radius.
    #[inline]
    pub fn set_radius(&mut self, radius: u64) {
        self.radius = radius;
    }

    /// Three-way fuzzy comparison over frame indices.
    #[inline]
    pub fn fuzzy_cmp(&self, other: &FramePoint) -> Ordering {
        if self.frame.abs_diff(other.frame) <= self.radius + other.radius {
            Ordering::Equal
        } else {
            self.frame.cmp(&other.frame)
        }
    }
}

impl PartialEq for FramePoint {
    fn eq(&self, other: &Self) -> bool {
        self.fuzzy_cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for FramePoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.fuzzy_cmp(other))
    }
}

impl std::fmt::Debug for FramePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FramePoint({}, ~{})", self.frame, self.radius)
    }
}
