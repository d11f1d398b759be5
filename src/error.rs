use std::path::PathBuf;
use thiserror::Error;

use crate::model::TierId;
use crate::validation::ValidationReport;

/// The main error type for anntier operations.
///
/// Recoverable conditions (soft insertion conflicts, lookups of an absent
/// tier) are reported via `bool`/`Option` sentinels instead and never appear
/// here.
#[derive(Debug, Error)]
pub enum AnnTierError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse transcription JSON from {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write transcription JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Begin must be strictly before end under fuzzy comparison.
    #[error("Invalid interval: begin {begin} must be strictly before end {end}")]
    InvalidInterval { begin: f64, end: f64 },

    /// A disjoint location needs at least one interval.
    #[error("A disjoint location requires at least one interval")]
    EmptyDisjoint,

    /// An accessor was called on a location variant that does not support it.
    #[error("Location kind mismatch: expected {expected}, found {found}")]
    LocationKind {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Index {index} out of range for tier of size {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// `Tier::append` requires the new annotation to start at or after the
    /// current tier end.
    #[error("Cannot append annotation beginning at {begin}: tier already ends at {end}")]
    DisorderedAppend { begin: f64, end: f64 },

    /// A boundary edit that would make the annotation overlap a neighbor.
    #[error("Moving a boundary to {at} would overlap a neighboring annotation")]
    EditWouldOverlap { at: f64 },

    #[error("Unknown tier handle {0}")]
    UnknownTier(TierId),

    #[error("Tier {0} cannot be its own hierarchy reference")]
    SelfReference(TierId),

    #[error("Tier {child} is already the child of tier {reference}")]
    ChildAlreadyLinked { child: TierId, reference: TierId },

    #[error("Linking {reference} -> {child} would create a hierarchy cycle")]
    CyclicLink { reference: TierId, child: TierId },

    /// TimeAssociation requires both tiers to have the same number of
    /// annotations.
    #[error(
        "Association size mismatch: reference has {reference_len} annotations, child has {child_len}"
    )]
    AssociationSizeMismatch {
        reference_len: usize,
        child_len: usize,
    },

    /// TimeAssociation requires identical boundaries at every index.
    #[error("Association boundary mismatch at annotation index {index}")]
    AssociationBoundaryMismatch { index: usize },

    /// TimeAlignment requires the reference tier to contain every child
    /// boundary.
    #[error("Alignment failure: reference tier {reference} is not a boundary superset of {child}")]
    NotSuperset { reference: TierId, child: TierId },

    /// Mutation of an alignment child whose new boundary does not exist in
    /// the reference tier.
    #[error("Boundary {at} is not a boundary of the reference tier")]
    UnalignedBoundary { at: f64 },

    /// Boundary edits on a tier are refused while it is the reference of an
    /// alignment or association link.
    #[error("Tier {0} is the reference of a hierarchy link; unlink before editing its boundaries")]
    ReferenceLocked(TierId),

    #[error("No hierarchy link exists from {reference} to {child}")]
    LinkNotFound { reference: TierId, child: TierId },

    #[error("Invalid regular expression: {0}")]
    Regex(#[from] regex::Error),

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },

    #[error("Unsupported output format: {0}")]
    UnsupportedOutput(String),
}
