//! The core annotation data model.
//!
//! This module defines the canonical representation of a time-anchored
//! transcription: tiers of labeled annotations, the temporal primitives
//! they sit on, and the hierarchy linking tiers together. External format
//! converters construct instances of these types and read query results
//! back out; nothing here performs I/O except the canonical JSON helpers
//! in [`io_json`].
//!
//! # Design Principles
//!
//! 1. **Fuzzy time by construction**: boundaries are [`TimePoint`]s
//!    carrying an explicit vagueness radius, and comparisons go through
//!    that type; raw floats are never compared where fuzzy comparison was
//!    intended.
//!
//! 2. **Closed variants**: an annotation's [`Location`] is a tagged sum of
//!    point/interval/disjoint; accessors invalid for a variant return a
//!    typed error instead of coercing.
//!
//! 3. **Handles, not back-references**: tiers live in an arena owned by
//!    their [`Transcription`], and the [`Hierarchy`] stores [`TierId`]
//!    handles, so links survive edits and never create ownership cycles.
//!
//! # Example
//!
//! ```
//! use anntier::model::{Annotation, Label, LinkKind, TimeInterval, Transcription};
//!
//! let mut trans = Transcription::new("sample");
//! let phonemes = trans.new_tier("Phonemes");
//! for (begin, end, text) in [(0.0, 1.0, "dh"), (1.0, 2.0, "ax")] {
//!     let interval = TimeInterval::from_seconds(begin, end).unwrap();
//!     trans
//!         .append_annotation(phonemes, Annotation::with_text(interval, text))
//!         .unwrap();
//! }
//!
//! let tokens = trans.new_tier("Tokens");
//! let span = TimeInterval::from_seconds(0.0, 2.0).unwrap();
//! trans
//!     .append_annotation(tokens, Annotation::with_text(span, "the"))
//!     .unwrap();
//!
//! trans
//!     .add_in_hierarchy(phonemes, tokens, LinkKind::TimeAlignment)
//!     .unwrap();
//! ```

mod annotation;
mod hierarchy;
mod ids;
mod interval;
pub mod io_json;
mod label;
mod location;
mod point;
mod tier;
mod transcription;

// Re-export core types for convenient access
pub use annotation::Annotation;
pub use hierarchy::{Hierarchy, Link, LinkKind};
pub use ids::TierId;
pub use interval::{TimeDisjoint, TimeInterval};
pub use label::{Alternative, Label};
pub use location::Location;
pub use point::{FramePoint, TimePoint};
pub use tier::{Media, Tier};
pub use transcription::Transcription;
