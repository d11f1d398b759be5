//! Labels as weighted sets of alternative text values.
//!
//! An ambiguous transcription ("there" vs "their") is represented as one
//! label holding several scored alternatives; the highest-scoring one is the
//! canonical value.

use serde::{Deserialize, Serialize};

/// Reserved texts conventionally marking silence.
const SILENCE_TEXTS: [&str; 2] = ["#", "sil"];

/// Reserved texts conventionally marking a short pause.
const PAUSE_TEXTS: [&str; 2] = ["+", "sp"];

/// One scored text alternative of a [`Label`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Alternative {
    pub text: String,
    pub score: f64,
}

// Custom deserialize so the score clamp also applies to data read back in.
impl<'de> Deserialize<'de> for Alternative {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct AlternativeData {
            text: String,
            score: f64,
        }
        let data = AlternativeData::deserialize(deserializer)?;
        Ok(Alternative {
            text: data.text,
            score: data.score.clamp(0.0, 1.0),
        })
    }
}

/// A weighted set of alternative text values.
///
/// Alternatives are kept in descending score order (stable, so insertion
/// order breaks ties). `add` never removes an existing alternative with the
/// same text; duplicates are allowed and retained, and callers dedup if
/// they need to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    alternatives: Vec<Alternative>,
}

impl Label {
    /// Creates an empty label.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a label with a single alternative at score 1.
    pub fn from_text(text: impl Into<String>) -> Self {
        let mut label = Self::new();
        label.add(text, 1.0);
        label
    }

    /// Adds a scored alternative, keeping descending score order.
    ///
    /// The score is clamped to `[0, 1]`. Existing alternatives with the
    /// same text are kept.
    pub fn add(&mut self, text: impl Into<String>, score: f64) {
        let alternative = Alternative {
            text: text.into(),
            score: score.clamp(0.0, 1.0),
        };
        // Insert after the last strictly-greater score so ties keep
        // insertion order.
        let at = self
            .alternatives
            .partition_point(|a| a.score >= alternative.score);
        self.alternatives.insert(at, alternative);
    }

    /// Returns the alternatives, sorted by descending score.
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    /// Returns the canonical (highest-score) text, or "" when empty.
    pub fn value(&self) -> &str {
        self.alternatives.first().map_or("", |a| a.text.as_str())
    }

    /// Returns the score of the canonical alternative.
    pub fn score(&self) -> Option<f64> {
        self.alternatives.first().map(|a| a.score)
    }

    /// Returns true when the label holds no alternative.
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// True when the canonical value is a reserved silence text.
    pub fn is_silence(&self) -> bool {
        SILENCE_TEXTS.contains(&self.value())
    }

    /// True when the canonical value is a reserved pause text.
    pub fn is_pause(&self) -> bool {
        PAUSE_TEXTS.contains(&self.value())
    }

    /// Appends every alternative of `other` to this label.
    ///
    /// Used when relation-filter output merges labels from both sides of a
    /// matched pair.
    pub fn extend_from(&mut self, other: &Label) {
        for alternative in other.alternatives() {
            self.add(alternative.text.clone(), alternative.score);
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}
