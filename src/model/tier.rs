//! An ordered, name-tagged track of annotations.

use serde::{Deserialize, Serialize};

use super::annotation::Annotation;
use super::point::TimePoint;
use crate::error::AnnTierError;

/// A media descriptor a tier can be attached to (the recording it
/// annotates). Media handling itself is out of scope; this is metadata
/// carried for the serializing collaborators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Media {
    /// Filename or URI of the media.
    pub file_name: String,

    /// Optional MIME type (e.g. "audio/wav").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Media {
    /// Creates a media descriptor.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
        }
    }

    /// Sets the MIME type.
    pub fn with_mime(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// An ordered sequence of annotations under a tier name.
///
/// Invariants maintained by every insertion path:
/// - annotations are in non-decreasing order of span begin;
/// - no two annotation spans strictly overlap. Fuzzy-equal abutting
///   boundaries count as adjacency, not overlap, so silences may sit flush
///   against their neighbors.
///
/// `Clone` is a deep copy: the clone's annotations share nothing with the
/// original.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    media: Option<Media>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    annotations: Vec<Annotation>,
}

impl Tier {
    /// Creates an empty tier with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            media: None,
            annotations: Vec::new(),
        }
    }

    /// Attaches a media descriptor.
    pub fn with_media(mut self, media: Media) -> Self {
        self.media = Some(media);
        self
    }

    /// Returns the tier name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the tier.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the media descriptor, if any.
    pub fn media(&self) -> Option<&Media> {
        self.media.as_ref()
    }

    /// Returns the number of annotations.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Returns true when the tier holds no annotation.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Returns the annotation at `index`.
    pub fn get(&self, index: usize) -> Option<&Annotation> {
        self.annotations.get(index)
    }

    /// Iterates over the annotations in time order.
    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.annotations.iter()
    }

    /// Returns the begin of the first annotation, in seconds (0 when
    /// empty).
    pub fn begin(&self) -> f64 {
        self.annotations
            .first()
            .map_or(0.0, |a| a.span().0.midpoint())
    }

    /// Returns the end of the last annotation, in seconds (0 when empty).
    pub fn end(&self) -> f64 {
        self.annotations
            .iter()
            .map(|a| a.span().1.midpoint())
            .fold(0.0, f64::max)
    }

    /// Inserts at the end of the tier.
    ///
    /// The strict "must insert" path: fails when the new annotation begins
    /// before the current tier end.
    pub fn append(&mut self, annotation: Annotation) -> Result<(), AnnTierError> {
        if let Some(last) = self.annotations.last() {
            let tier_end = last.span().1;
            if annotation.span().0 < tier_end {
                return Err(AnnTierError::DisorderedAppend {
                    begin: annotation.span().0.midpoint(),
                    end: tier_end.midpoint(),
                });
            }
        }
        self.annotations.push(annotation);
        Ok(())
    }

    /// Inserts at the correct sorted position.
    ///
    /// The soft "try insert" path used when merging data from several
    /// passes: returns `false` without modifying the tier when the new
    /// annotation would strictly overlap an existing one.
    pub fn add(&mut self, annotation: Annotation) -> bool {
        if self.annotations.iter().any(|a| spans_overlap(a, &annotation)) {
            return false;
        }
        let begin = annotation.span().0.midpoint();
        let at = self
            .annotations
            .partition_point(|a| a.span().0.midpoint() <= begin);
        self.annotations.insert(at, annotation);
        true
    }

    /// Removes and returns the last annotation.
    pub fn pop(&mut self) -> Result<Annotation, AnnTierError> {
        self.annotations
            .pop()
            .ok_or(AnnTierError::IndexOutOfRange { index: 0, len: 0 })
    }

    /// Removes and returns the annotation at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Annotation, AnnTierError> {
        if index < self.annotations.len() {
            Ok(self.annotations.remove(index))
        } else {
            Err(AnnTierError::IndexOutOfRange {
                index,
                len: self.annotations.len(),
            })
        }
    }

    /// True when the given point fuzzy-matches some annotation boundary of
    /// this tier.
    pub fn has_boundary(&self, point: &TimePoint) -> bool {
        self.annotations.iter().any(|a| {
            let (begin, end) = a.span();
            begin == *point || end == *point
        })
    }

    /// True when every annotation boundary of `other` is also a boundary of
    /// this tier, under fuzzy equality.
    ///
    /// This is the structural predicate the hierarchy relies on for
    /// TimeAlignment. O(n·m); no granularity ordering is assumed between
    /// the two tiers. Reflexive, and monotone in `self`: adding
    /// annotations to `self` never invalidates it.
    pub fn is_superset(&self, other: &Tier) -> bool {
        other.iter().all(|a| {
            let (begin, end) = a.span();
            self.has_boundary(&begin) && self.has_boundary(&end)
        })
    }

    /// Bulk-sets the vagueness radius of every boundary in the tier.
    ///
    /// Used to normalize vagueness before structural comparisons, e.g.
    /// when comparing segmentations that came from media with different
    /// frame rates.
    pub fn set_radius(&mut self, radius: f64) {
        for annotation in &mut self.annotations {
            annotation.set_radius(radius);
        }
    }

    /// Returns the index of the first annotation whose span covers `point`,
    /// under fuzzy comparison.
    ///
    /// A midpoint-based cutoff is not usable here: an annotation whose
    /// begin has a wide radius can fuzzy-cover a point its midpoint sits
    /// past, so every annotation is checked.
    pub fn find_index_at(&self, point: &TimePoint) -> Option<usize> {
        self.annotations
            .iter()
            .position(|a| a.location().covers(point))
    }

    pub(crate) fn annotations_mut(&mut self) -> &mut [Annotation] {
        &mut self.annotations
    }
}

impl<'a> IntoIterator for &'a Tier {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Strict span intersection under fuzzy comparison.
fn spans_overlap(a: &Annotation, b: &Annotation) -> bool {
    let (a_begin, a_end) = a.span();
    let (b_begin, b_end) = b.span();
    a_begin < b_end && b_begin < a_end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TimeInterval, TimePoint};

    fn spanning(begin: f64, end: f64, text: &str) -> Annotation {
        Annotation::with_text(TimeInterval::from_seconds(begin, end).unwrap(), text)
    }

    #[test]
    fn test_append_keeps_order() {
        let mut tier = Tier::new("Tokens");
        tier.append(spanning(0.0, 1.0, "the")).unwrap();
        tier.append(spanning(1.0, 2.0, "cat")).unwrap();
        assert_eq!(tier.len(), 2);
        assert_eq!(tier.begin(), 0.0);
        assert_eq!(tier.end(), 2.0);
    }

    #[test]
    fn test_append_rejects_disordered() {
        let mut tier = Tier::new("Tokens");
        tier.append(spanning(0.0, 2.0, "the")).unwrap();
        let err = tier.append(spanning(1.0, 3.0, "cat")).unwrap_err();
        assert!(matches!(err, AnnTierError::DisorderedAppend { .. }));
        assert_eq!(tier.len(), 1);
    }

    #[test]
    fn test_add_sorts_and_rejects_overlap() {
        let mut tier = Tier::new("Tokens");
        assert!(tier.add(spanning(2.0, 3.0, "cat")));
        assert!(tier.add(spanning(0.0, 1.0, "the")));
        assert_eq!(tier.get(0).unwrap().label().value(), "the");

        // Overlaps "cat": soft failure, tier untouched.
        assert!(!tier.add(spanning(2.5, 3.5, "sat")));
        assert_eq!(tier.len(), 2);
    }

    #[test]
    fn test_add_allows_adjacent_silences() {
        let mut tier = Tier::new("IPU");
        assert!(tier.add(spanning(0.0, 1.0, "#")));
        assert!(tier.add(spanning(1.0, 2.0, "speech")));
        assert!(tier.add(spanning(2.0, 3.0, "#")));
        assert_eq!(tier.len(), 3);
    }

    #[test]
    fn test_empty_tier_reports_zero_extent() {
        let tier = Tier::new("Empty");
        assert_eq!(tier.begin(), 0.0);
        assert_eq!(tier.end(), 0.0);
    }

    #[test]
    fn test_pop_and_remove_index_errors() {
        let mut tier = Tier::new("Tokens");
        assert!(tier.pop().is_err());
        assert!(tier.remove(0).is_err());

        tier.append(spanning(0.0, 1.0, "the")).unwrap();
        assert!(tier.remove(5).is_err());
        assert_eq!(tier.pop().unwrap().label().value(), "the");
        assert!(tier.is_empty());
    }

    #[test]
    fn test_is_superset_reflexive_and_monotone() {
        let mut phonemes = Tier::new("Phonemes");
        phonemes.append(spanning(0.0, 1.0, "dh")).unwrap();
        phonemes.append(spanning(1.0, 2.0, "ax")).unwrap();

        let mut tokens = Tier::new("Tokens");
        tokens.append(spanning(0.0, 2.0, "the")).unwrap();

        assert!(phonemes.is_superset(&phonemes));
        assert!(phonemes.is_superset(&tokens));
        assert!(!tokens.is_superset(&phonemes));

        // Growing self can only help.
        phonemes.append(spanning(2.0, 3.0, "k")).unwrap();
        assert!(phonemes.is_superset(&tokens));
    }

    #[test]
    fn test_is_superset_uses_fuzzy_boundaries() {
        let mut coarse = Tier::new("Coarse");
        coarse.append(spanning(0.0, 1.01, "a")).unwrap();

        let mut fine = Tier::new("Fine");
        fine.append(spanning(0.0, 1.0, "a")).unwrap();
        assert!(!coarse.is_superset(&fine));

        // Widening the vagueness makes 1.01 and 1.0 the same boundary.
        coarse.set_radius(0.02);
        assert!(coarse.is_superset(&fine));
    }

    #[test]
    fn test_deep_copy_independence() {
        let mut tier = Tier::new("Tokens");
        tier.append(spanning(0.0, 1.0, "the")).unwrap();

        let mut copy = tier.clone();
        copy.annotations_mut()[0]
            .set_end(TimePoint::exact(5.0))
            .unwrap();
        copy.annotations_mut()[0].label_mut().add("a", 0.1);

        assert_eq!(tier.get(0).unwrap().end().unwrap().midpoint(), 1.0);
        assert_eq!(tier.get(0).unwrap().label().alternatives().len(), 1);
    }

    #[test]
    fn test_point_annotations_order_and_lookup() {
        let mut clicks = Tier::new("Clicks");
        assert!(clicks.add(Annotation::with_text(TimePoint::exact(2.0), "b")));
        assert!(clicks.add(Annotation::with_text(TimePoint::exact(1.0), "a")));
        assert_eq!(clicks.get(0).unwrap().label().value(), "a");

        let mut tier = Tier::new("Tokens");
        tier.append(spanning(0.0, 1.0, "the")).unwrap();
        tier.append(spanning(1.0, 2.0, "cat")).unwrap();
        assert_eq!(tier.find_index_at(&TimePoint::exact(1.5)), Some(1));
        assert_eq!(tier.find_index_at(&TimePoint::exact(9.0)), None);
    }

    #[test]
    fn test_find_index_at_honors_wide_begin_radius() {
        let mut tier = Tier::new("Tokens");
        tier.append(spanning(0.0, 1.0, "a")).unwrap();
        // Begin midpoint 2.0 but radius 0.6, so the span fuzzy-covers 1.5.
        let wide = TimeInterval::new(TimePoint::new(2.0, 0.6), TimePoint::exact(3.0)).unwrap();
        tier.append(Annotation::with_text(wide, "b")).unwrap();

        assert_eq!(tier.find_index_at(&TimePoint::exact(1.5)), Some(1));
    }
}
