//! The link registry between tiers of a transcription.
//!
//! Links are stored over [`TierId`] handles, never over tier references, so
//! the registry survives tier edits and cannot form ownership cycles. The
//! registry itself only enforces shape (one reference per child, no
//! self-links, no cycles); the boundary-compatibility checks that depend on
//! tier content live on [`Transcription`](super::Transcription), which owns
//! both sides of every link.

use serde::{Deserialize, Serialize};

use super::ids::TierId;
use crate::error::AnnTierError;

/// The semantics of a reference -> child tier link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkKind {
    /// Child and reference are different labelings of the exact same
    /// segmentation (e.g. Tokens vs. Lemmas): identical boundaries, 1:1.
    TimeAssociation,

    /// Every child boundary snaps to a reference boundary (e.g. Tokens over
    /// Phonemes): the reference is a boundary superset of the child.
    TimeAlignment,

    /// The child carries no label of its own; its label is computed by
    /// concatenating the reference labels falling inside its span.
    Constituency,
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LinkKind::TimeAssociation => "TimeAssociation",
            LinkKind::TimeAlignment => "TimeAlignment",
            LinkKind::Constituency => "Constituency",
        };
        write!(f, "{}", name)
    }
}

/// One reference -> child link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub reference: TierId,
    pub child: TierId,
    pub kind: LinkKind,
}

/// The set of links of one transcription.
///
/// Shape invariants: a child has at most one reference; a tier is never its
/// own reference; no cycles (a reference cannot transitively be its own
/// child). A tier may be the reference of many children.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Hierarchy {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    links: Vec<Link>,
}

impl Hierarchy {
    /// Creates an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates over all links.
    pub fn iter(&self) -> std::slice::Iter<'_, Link> {
        self.links.iter()
    }

    /// Returns the number of links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns true when no link exists.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Returns the link this tier is a child of, if any.
    pub fn parent_of(&self, child: TierId) -> Option<&Link> {
        self.links.iter().find(|l| l.child == child)
    }

    /// Iterates over the links this tier is the reference of.
    pub fn children_of(&self, reference: TierId) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |l| l.reference == reference)
    }

    /// True while boundary edits on `tier` must be refused: the tier is the
    /// reference of an alignment or association link.
    pub fn locks_reference(&self, tier: TierId) -> bool {
        self.children_of(tier)
            .any(|l| matches!(l.kind, LinkKind::TimeAlignment | LinkKind::TimeAssociation))
    }

    /// Registers a link after shape checks; boundary compatibility is the
    /// caller's responsibility.
    pub(crate) fn link(
        &mut self,
        reference: TierId,
        child: TierId,
        kind: LinkKind,
    ) -> Result<(), AnnTierError> {
        if reference == child {
            return Err(AnnTierError::SelfReference(reference));
        }
        if let Some(existing) = self.parent_of(child) {
            return Err(AnnTierError::ChildAlreadyLinked {
                child,
                reference: existing.reference,
            });
        }
        // Each child has one reference, so the ancestry of `reference` is a
        // simple chain; a cycle means `child` already sits on it.
        let mut cursor = Some(reference);
        while let Some(current) = cursor {
            if current == child {
                return Err(AnnTierError::CyclicLink { reference, child });
            }
            cursor = self.parent_of(current).map(|l| l.reference);
        }
        self.links.push(Link {
            reference,
            child,
            kind,
        });
        Ok(())
    }

    /// Removes the reference -> child link.
    pub(crate) fn unlink(&mut self, reference: TierId, child: TierId) -> Result<(), AnnTierError> {
        let at = self
            .links
            .iter()
            .position(|l| l.reference == reference && l.child == child)
            .ok_or(AnnTierError::LinkNotFound { reference, child })?;
        self.links.remove(at);
        Ok(())
    }

    /// Drops every link involving the tier, called when it is removed from
    /// its transcription.
    pub(crate) fn remove_tier(&mut self, tier: TierId) {
        self.links
            .retain(|l| l.reference != tier && l.child != tier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_link_is_refused() {
        let mut hierarchy = Hierarchy::new();
        assert!(matches!(
            hierarchy.link(TierId(1), TierId(1), LinkKind::TimeAlignment),
            Err(AnnTierError::SelfReference(_))
        ));
    }

    #[test]
    fn test_child_has_one_reference() {
        let mut hierarchy = Hierarchy::new();
        hierarchy
            .link(TierId(1), TierId(2), LinkKind::TimeAlignment)
            .unwrap();
        assert!(matches!(
            hierarchy.link(TierId(3), TierId(2), LinkKind::Constituency),
            Err(AnnTierError::ChildAlreadyLinked { .. })
        ));
    }

    #[test]
    fn test_cycles_are_refused() {
        let mut hierarchy = Hierarchy::new();
        hierarchy
            .link(TierId(1), TierId(2), LinkKind::TimeAlignment)
            .unwrap();
        hierarchy
            .link(TierId(2), TierId(3), LinkKind::TimeAlignment)
            .unwrap();
        // 3 is transitively a child of 1.
        assert!(matches!(
            hierarchy.link(TierId(3), TierId(1), LinkKind::TimeAlignment),
            Err(AnnTierError::CyclicLink { .. })
        ));
    }

    #[test]
    fn test_reference_may_have_many_children() {
        let mut hierarchy = Hierarchy::new();
        hierarchy
            .link(TierId(1), TierId(2), LinkKind::TimeAlignment)
            .unwrap();
        hierarchy
            .link(TierId(1), TierId(3), LinkKind::Constituency)
            .unwrap();
        assert_eq!(hierarchy.children_of(TierId(1)).count(), 2);
    }

    #[test]
    fn test_locks_reference_only_for_boundary_kinds() {
        let mut hierarchy = Hierarchy::new();
        hierarchy
            .link(TierId(1), TierId(2), LinkKind::Constituency)
            .unwrap();
        assert!(!hierarchy.locks_reference(TierId(1)));

        hierarchy
            .link(TierId(1), TierId(3), LinkKind::TimeAlignment)
            .unwrap();
        assert!(hierarchy.locks_reference(TierId(1)));
    }

    #[test]
    fn test_remove_tier_drops_both_sides() {
        let mut hierarchy = Hierarchy::new();
        hierarchy
            .link(TierId(1), TierId(2), LinkKind::TimeAlignment)
            .unwrap();
        hierarchy
            .link(TierId(2), TierId(3), LinkKind::Constituency)
            .unwrap();
        hierarchy.remove_tier(TierId(2));
        assert!(hierarchy.is_empty());
    }

    #[test]
    fn test_unlink_missing_link() {
        let mut hierarchy = Hierarchy::new();
        assert!(matches!(
            hierarchy.unlink(TierId(1), TierId(2)),
            Err(AnnTierError::LinkNotFound { .. })
        ));
    }
}
