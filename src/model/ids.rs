//! Newtype handle for type-safe identification of tiers.
//!
//! The hierarchy stores `TierId` handles rather than references into the
//! tier arena, so links survive tier mutation and never form ownership
//! cycles. Handles are assigned monotonically by the owning
//! [`Transcription`](super::Transcription) and are never reused, even after
//! a tier is removed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable handle to a tier inside a [`Transcription`](super::Transcription).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierId(pub u64);

impl TierId {
    /// Creates a new TierId.
    #[inline]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value.
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TierId({})", self.0)
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_equality() {
        assert_eq!(TierId(1), TierId(1));
        assert_ne!(TierId(1), TierId(2));
    }

    #[test]
    fn test_id_ordering() {
        assert!(TierId(1) < TierId(2));
    }

    #[test]
    fn test_id_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(TierId(1));
        set.insert(TierId(2));
        set.insert(TierId(1)); // duplicate
        assert_eq!(set.len(), 2);
    }
}
