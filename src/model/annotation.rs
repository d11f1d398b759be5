//! An annotation pairs one location with one label.

use serde::{Deserialize, Serialize};

use super::label::Label;
use super::location::Location;
use super::point::TimePoint;
use crate::error::AnnTierError;

/// One time-anchored labeled unit of a tier.
///
/// Annotations have value semantics: domain logic compares them by
/// location and label, never by identity. `Clone` is a deep copy, so a
/// clone and its original can be edited independently.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    location: Location,
    #[serde(default)]
    label: Label,
}

impl Annotation {
    /// Creates an annotation from a location and a label.
    pub fn new(location: impl Into<Location>, label: Label) -> Self {
        Self {
            location: location.into(),
            label,
        }
    }

    /// Creates an annotation with a single-alternative label.
    pub fn with_text(location: impl Into<Location>, text: impl Into<String>) -> Self {
        Self::new(location, Label::from_text(text))
    }

    /// Returns the location.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Returns the label.
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Returns the label mutably.
    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    /// Replaces the label.
    pub fn set_label(&mut self, label: Label) {
        self.label = label;
    }

    /// Returns the begin point of a span-located annotation.
    pub fn begin(&self) -> Result<TimePoint, AnnTierError> {
        self.location.begin()
    }

    /// Returns the end point of a span-located annotation.
    pub fn end(&self) -> Result<TimePoint, AnnTierError> {
        self.location.end()
    }

    /// Moves the begin point, re-checking location invariants.
    pub fn set_begin(&mut self, begin: TimePoint) -> Result<(), AnnTierError> {
        self.location.set_begin(begin)
    }

    /// Moves the end point, re-checking location invariants.
    pub fn set_end(&mut self, end: TimePoint) -> Result<(), AnnTierError> {
        self.location.set_end(end)
    }

    /// Moves a point-located annotation.
    pub fn set_point(&mut self, point: TimePoint) -> Result<(), AnnTierError> {
        self.location.set_point(point)
    }

    /// The `(begin, end)` span, points reduced to zero width.
    pub fn span(&self) -> (TimePoint, TimePoint) {
        self.location.span()
    }

    /// Duration in seconds (0 for points).
    pub fn duration(&self) -> f64 {
        self.location.duration()
    }

    /// Sets the vagueness radius of every bound of the location.
    pub fn set_radius(&mut self, radius: f64) {
        self.location.set_radius(radius);
    }
}
