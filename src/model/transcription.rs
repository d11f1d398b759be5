//! The root aggregate: an ordered set of tiers plus their hierarchy.
//!
//! The transcription owns its tiers in an arena and hands out stable
//! [`TierId`] handles. All hierarchy-aware mutation goes through the
//! transcription, because only it can see both sides of a link; the raw
//! [`Tier`] methods stay available through [`Transcription::tier_mut`] for
//! tiers that are not linked (or for callers who deliberately bypass the
//! checks and re-validate afterwards).

use serde::{Deserialize, Serialize};

use super::annotation::Annotation;
use super::hierarchy::{Hierarchy, Link, LinkKind};
use super::ids::TierId;
use super::label::Label;
use super::point::TimePoint;
use super::tier::Tier;
use crate::error::AnnTierError;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TierEntry {
    id: TierId,
    #[serde(flatten)]
    tier: Tier,
}

/// A named, ordered collection of tiers plus one hierarchy.
#[derive(Clone, Debug, Serialize)]
pub struct Transcription {
    name: String,

    tiers: Vec<TierEntry>,

    #[serde(default, skip_serializing_if = "Hierarchy::is_empty")]
    hierarchy: Hierarchy,

    #[serde(skip)]
    next_id: u64,
}

impl Transcription {
    /// Creates an empty transcription.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tiers: Vec::new(),
            hierarchy: Hierarchy::new(),
            next_id: 1,
        }
    }

    /// Returns the transcription name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the transcription.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the number of tiers.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Returns true when the transcription holds no tier.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Creates an empty tier and returns its handle.
    pub fn new_tier(&mut self, name: impl Into<String>) -> TierId {
        self.add_tier(Tier::new(name))
    }

    /// Adopts a prebuilt tier and returns its handle.
    pub fn add_tier(&mut self, tier: Tier) -> TierId {
        let id = TierId::new(self.next_id);
        self.next_id += 1;
        self.tiers.push(TierEntry { id, tier });
        id
    }

    /// Returns the tier behind a handle.
    pub fn tier(&self, id: TierId) -> Option<&Tier> {
        self.tiers.iter().find(|e| e.id == id).map(|e| &e.tier)
    }

    /// Returns the tier behind a handle, mutably.
    ///
    /// This is raw access: hierarchy invariants are NOT enforced on edits
    /// made through it. While a tier is linked, prefer the checked
    /// `*_annotation` methods; a caller that edits through here is in a
    /// critical section and should re-validate before relying on the
    /// hierarchy again.
    pub fn tier_mut(&mut self, id: TierId) -> Option<&mut Tier> {
        self.tiers
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| &mut e.tier)
    }

    /// Iterates over `(handle, tier)` pairs in tier order.
    pub fn tiers(&self) -> impl Iterator<Item = (TierId, &Tier)> {
        self.tiers.iter().map(|e| (e.id, &e.tier))
    }

    /// Exact-name lookup.
    pub fn find(&self, name: &str) -> Option<TierId> {
        self.tiers
            .iter()
            .find(|e| e.tier.name() == name)
            .map(|e| e.id)
    }

    /// Removes a tier, dropping every hierarchy link it takes part in.
    pub fn remove_tier(&mut self, id: TierId) -> Option<Tier> {
        let at = self.tiers.iter().position(|e| e.id == id)?;
        self.hierarchy.remove_tier(id);
        Some(self.tiers.remove(at).tier)
    }

    /// Returns the hierarchy.
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Bulk-sets the vagueness radius of every boundary of every tier.
    pub fn set_radius(&mut self, radius: f64) {
        for entry in &mut self.tiers {
            entry.tier.set_radius(radius);
        }
    }

    /// Links `child` under `reference` with the given semantics.
    ///
    /// Boundary compatibility is checked now, per kind: association needs
    /// identical sizes and per-index fuzzy-equal boundaries; alignment
    /// needs the reference to be a boundary superset of the child;
    /// constituency has no boundary precondition. Shape violations
    /// (self-link, occupied child, cycle) fail regardless of kind.
    pub fn add_in_hierarchy(
        &mut self,
        reference: TierId,
        child: TierId,
        kind: LinkKind,
    ) -> Result<(), AnnTierError> {
        let reference_tier = self.tier(reference).ok_or(AnnTierError::UnknownTier(reference))?;
        let child_tier = self.tier(child).ok_or(AnnTierError::UnknownTier(child))?;

        match kind {
            LinkKind::TimeAssociation => {
                if reference_tier.len() != child_tier.len() {
                    return Err(AnnTierError::AssociationSizeMismatch {
                        reference_len: reference_tier.len(),
                        child_len: child_tier.len(),
                    });
                }
                for (index, (a, b)) in reference_tier.iter().zip(child_tier.iter()).enumerate() {
                    let (a_begin, a_end) = a.span();
                    let (b_begin, b_end) = b.span();
                    if a_begin != b_begin || a_end != b_end {
                        return Err(AnnTierError::AssociationBoundaryMismatch { index });
                    }
                }
            }
            LinkKind::TimeAlignment => {
                if !reference_tier.is_superset(child_tier) {
                    return Err(AnnTierError::NotSuperset { reference, child });
                }
            }
            LinkKind::Constituency => {}
        }

        self.hierarchy.link(reference, child, kind)
    }

    /// Removes the reference -> child link.
    ///
    /// A constituency child stops aggregating immediately:
    /// [`Transcription::label_at`] reports its own (empty) labels again.
    pub fn remove_of_hierarchy(
        &mut self,
        reference: TierId,
        child: TierId,
    ) -> Result<(), AnnTierError> {
        self.hierarchy.unlink(reference, child)
    }

    /// Hierarchy-aware strict insertion at the end of a tier.
    pub fn append_annotation(
        &mut self,
        id: TierId,
        annotation: Annotation,
    ) -> Result<(), AnnTierError> {
        self.check_insertion(id, &annotation)?;
        let tier = self.tier_mut(id).ok_or(AnnTierError::UnknownTier(id))?;
        tier.append(annotation)
    }

    /// Hierarchy-aware soft insertion at the sorted position.
    ///
    /// Hierarchy violations are hard errors; an overlap with an existing
    /// annotation stays a soft `Ok(false)`.
    pub fn add_annotation(
        &mut self,
        id: TierId,
        annotation: Annotation,
    ) -> Result<bool, AnnTierError> {
        self.check_insertion(id, &annotation)?;
        let tier = self.tier_mut(id).ok_or(AnnTierError::UnknownTier(id))?;
        Ok(tier.add(annotation))
    }

    /// Moves the begin boundary of one annotation, keeping every invariant.
    ///
    /// Refused while the tier is the reference of an alignment or
    /// association link (boundaries are frozen until the children are
    /// unlinked); refused on an alignment child when the new boundary does
    /// not exist in the reference; refused when the move would disorder the
    /// tier or overlap a neighbor.
    pub fn set_annotation_begin(
        &mut self,
        id: TierId,
        index: usize,
        begin: TimePoint,
    ) -> Result<(), AnnTierError> {
        self.check_boundary_edit(id, index, &begin)?;
        let tier = self.tier_mut(id).ok_or(AnnTierError::UnknownTier(id))?;

        if index > 0 {
            let prev_end = tier.get(index - 1).map(|a| a.span().1);
            if let Some(prev_end) = prev_end {
                if begin < prev_end {
                    return Err(AnnTierError::EditWouldOverlap {
                        at: begin.midpoint(),
                    });
                }
            }
        }
        tier.annotations_mut()[index].set_begin(begin)
    }

    /// Moves the end boundary of one annotation, keeping every invariant.
    ///
    /// Same refusal rules as [`Transcription::set_annotation_begin`].
    pub fn set_annotation_end(
        &mut self,
        id: TierId,
        index: usize,
        end: TimePoint,
    ) -> Result<(), AnnTierError> {
        self.check_boundary_edit(id, index, &end)?;
        let tier = self.tier_mut(id).ok_or(AnnTierError::UnknownTier(id))?;

        let next_begin = tier.get(index + 1).map(|a| a.span().0);
        if let Some(next_begin) = next_begin {
            if next_begin < end {
                return Err(AnnTierError::EditWouldOverlap { at: end.midpoint() });
            }
        }
        tier.annotations_mut()[index].set_end(end)
    }

    /// Returns the effective label of one annotation.
    ///
    /// For a constituency child this is computed, never cached: the
    /// concatenation (in time order) of the canonical texts of the
    /// reference annotations whose spans fall inside the child's span.
    /// Editing a reference label is therefore immediately visible here.
    /// For every other tier the annotation's own label is returned.
    pub fn label_at(&self, id: TierId, index: usize) -> Result<Label, AnnTierError> {
        let tier = self.tier(id).ok_or(AnnTierError::UnknownTier(id))?;
        let annotation = tier.get(index).ok_or(AnnTierError::IndexOutOfRange {
            index,
            len: tier.len(),
        })?;

        let link = match self.hierarchy.parent_of(id) {
            Some(link) if link.kind == LinkKind::Constituency => link,
            _ => return Ok(annotation.label().clone()),
        };
        let reference = self
            .tier(link.reference)
            .ok_or(AnnTierError::UnknownTier(link.reference))?;

        let (begin, end) = annotation.span();
        let mut text = String::new();
        for constituent in reference.iter() {
            let (c_begin, c_end) = constituent.span();
            if c_begin >= begin && c_end <= end {
                text.push_str(constituent.label().value());
            }
        }
        if text.is_empty() {
            Ok(Label::new())
        } else {
            Ok(Label::from_text(text))
        }
    }

    fn check_insertion(&self, id: TierId, annotation: &Annotation) -> Result<(), AnnTierError> {
        if self.tier(id).is_none() {
            return Err(AnnTierError::UnknownTier(id));
        }

        // Inserting into an association tier (either side) breaks the 1:1
        // size contract of the link.
        if let Some(link) = self.hierarchy.parent_of(id) {
            if link.kind == LinkKind::TimeAssociation {
                return self.association_size_error(link);
            }
            if link.kind == LinkKind::TimeAlignment {
                let reference = self
                    .tier(link.reference)
                    .ok_or(AnnTierError::UnknownTier(link.reference))?;
                let (begin, end) = annotation.span();
                if !reference.has_boundary(&begin) {
                    return Err(AnnTierError::UnalignedBoundary {
                        at: begin.midpoint(),
                    });
                }
                if !reference.has_boundary(&end) {
                    return Err(AnnTierError::UnalignedBoundary { at: end.midpoint() });
                }
            }
        }
        if let Some(link) = self
            .hierarchy
            .children_of(id)
            .find(|l| l.kind == LinkKind::TimeAssociation)
        {
            return self.association_size_error(link);
        }
        Ok(())
    }

    fn association_size_error(&self, link: &Link) -> Result<(), AnnTierError> {
        Err(AnnTierError::AssociationSizeMismatch {
            reference_len: self.tier(link.reference).map_or(0, Tier::len),
            child_len: self.tier(link.child).map_or(0, Tier::len),
        })
    }

    fn check_boundary_edit(
        &self,
        id: TierId,
        index: usize,
        point: &TimePoint,
    ) -> Result<(), AnnTierError> {
        let tier = self.tier(id).ok_or(AnnTierError::UnknownTier(id))?;
        if index >= tier.len() {
            return Err(AnnTierError::IndexOutOfRange {
                index,
                len: tier.len(),
            });
        }
        if self.hierarchy.locks_reference(id) {
            return Err(AnnTierError::ReferenceLocked(id));
        }
        if let Some(link) = self.hierarchy.parent_of(id) {
            match link.kind {
                LinkKind::TimeAssociation => {
                    return Err(AnnTierError::AssociationBoundaryMismatch { index });
                }
                LinkKind::TimeAlignment => {
                    let reference = self
                        .tier(link.reference)
                        .ok_or(AnnTierError::UnknownTier(link.reference))?;
                    if !reference.has_boundary(point) {
                        return Err(AnnTierError::UnalignedBoundary {
                            at: point.midpoint(),
                        });
                    }
                }
                LinkKind::Constituency => {}
            }
        }
        Ok(())
    }
}

// Custom deserialize to rebuild the private id counter: handles must stay
// unique after a read-back, so the counter restarts past the largest id on
// file.
impl<'de> Deserialize<'de> for Transcription {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct TranscriptionData {
            name: String,
            #[serde(default)]
            tiers: Vec<TierEntry>,
            #[serde(default)]
            hierarchy: Hierarchy,
        }
        let data = TranscriptionData::deserialize(deserializer)?;
        let next_id = data
            .tiers
            .iter()
            .map(|e| e.id.as_u64())
            .max()
            .map_or(1, |max| max + 1);
        Ok(Transcription {
            name: data.name,
            tiers: data.tiers,
            hierarchy: data.hierarchy,
            next_id,
        })
    }
}
