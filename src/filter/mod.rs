//! Predicates and filters over annotations.
//!
//! Predicates form a closed algebra resolved at compile time: a
//! [`Pred`] is a tree of content/time tests combined with `And`/`Or`/`Not`
//! (operator sugar `&`, `|`, `!`), and a [`Filter`] applies one predicate
//! to one tier as a lazy, restartable sequence of matches. The pairwise
//! Allen-relation predicates live in [`relation`].
//!
//! ```
//! use anntier::filter::{Filter, Pred};
//! use anntier::model::{Annotation, Tier, TimeInterval};
//!
//! let mut tier = Tier::new("Tokens");
//! for (begin, end, text) in [(0.0, 1.0, "toto"), (1.0, 2.0, "titi")] {
//!     let interval = TimeInterval::from_seconds(begin, end).unwrap();
//!     tier.append(Annotation::with_text(interval, text)).unwrap();
//! }
//!
//! let pred = Pred::startswith("t") & Pred::endswith("o");
//! let matched: Vec<_> = Filter::new(&tier, pred).iter().collect();
//! assert_eq!(matched.len(), 1);
//! ```

pub mod relation;

pub use relation::{AllenRelation, RelationFilter, RelationQuery};

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

use regex::Regex;

use crate::error::AnnTierError;
use crate::model::{Annotation, Label, Tier};

/// Which label alternatives a content predicate tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TagScope {
    /// Only the canonical (highest-score) alternative.
    #[default]
    Best,
    /// Any alternative.
    Any,
}

/// How a content predicate compares label text to its pattern.
#[derive(Clone, Debug)]
pub enum StrMatch {
    Exact,
    IExact,
    StartsWith,
    IStartsWith,
    EndsWith,
    IEndsWith,
    Contains,
    IContains,
    Regexp(Regex),
}

impl StrMatch {
    fn test(&self, text: &str, pattern: &str) -> bool {
        match self {
            StrMatch::Exact => text == pattern,
            StrMatch::IExact => text.eq_ignore_ascii_case(pattern),
            StrMatch::StartsWith => text.starts_with(pattern),
            StrMatch::IStartsWith => {
                text.to_lowercase().starts_with(&pattern.to_lowercase())
            }
            StrMatch::EndsWith => text.ends_with(pattern),
            StrMatch::IEndsWith => text.to_lowercase().ends_with(&pattern.to_lowercase()),
            StrMatch::Contains => text.contains(pattern),
            StrMatch::IContains => text.to_lowercase().contains(&pattern.to_lowercase()),
            StrMatch::Regexp(regex) => regex.is_match(text),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            StrMatch::Exact => "exact",
            StrMatch::IExact => "iexact",
            StrMatch::StartsWith => "startswith",
            StrMatch::IStartsWith => "istartswith",
            StrMatch::EndsWith => "endswith",
            StrMatch::IEndsWith => "iendswith",
            StrMatch::Contains => "contains",
            StrMatch::IContains => "icontains",
            StrMatch::Regexp(_) => "regexp",
        }
    }
}

/// Comparator for numeric time predicates and relation bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumCmp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl NumCmp {
    pub(crate) fn eval(&self, left: f64, right: f64) -> bool {
        match self {
            NumCmp::Lt => left < right,
            NumCmp::Le => left <= right,
            NumCmp::Gt => left > right,
            NumCmp::Ge => left >= right,
            NumCmp::Eq => left == right,
        }
    }

    pub(crate) fn suffix(&self) -> &'static str {
        match self {
            NumCmp::Lt => "lt",
            NumCmp::Le => "le",
            NumCmp::Gt => "gt",
            NumCmp::Ge => "ge",
            NumCmp::Eq => "eq",
        }
    }
}

/// Which time value a numeric predicate tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeField {
    Begin,
    End,
    Duration,
}

impl TimeField {
    fn of(&self, annotation: &Annotation) -> f64 {
        match self {
            TimeField::Begin => annotation.span().0.midpoint(),
            TimeField::End => annotation.span().1.midpoint(),
            TimeField::Duration => annotation.duration(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            TimeField::Begin => "begin",
            TimeField::End => "end",
            TimeField::Duration => "duration",
        }
    }
}

/// A single-annotation predicate.
///
/// A closed tree: content tests on the label, numeric tests on
/// begin/end/duration, a bool-typed label test, and the three boolean
/// combinators. Short-circuit evaluation, `Display` gives a composed
/// human-readable name for diagnostics.
#[derive(Clone, Debug)]
pub enum Pred {
    /// String comparison against label text.
    Tag {
        matcher: StrMatch,
        pattern: String,
        scope: TagScope,
    },
    /// Label text read as a boolean by convention
    /// ("true"/"false", "1"/"0", "yes"/"no").
    TagBool { value: bool, scope: TagScope },
    /// Numeric comparison on a time value of the annotation.
    Time {
        field: TimeField,
        cmp: NumCmp,
        value: f64,
    },
    And(Box<Pred>, Box<Pred>),
    Or(Box<Pred>, Box<Pred>),
    Not(Box<Pred>),
}

impl Pred {
    /// Label text equals the pattern.
    pub fn exact(pattern: impl Into<String>) -> Self {
        Self::tag(StrMatch::Exact, pattern)
    }

    /// Case-insensitive [`Pred::exact`].
    pub fn iexact(pattern: impl Into<String>) -> Self {
        Self::tag(StrMatch::IExact, pattern)
    }

    /// Label text starts with the pattern.
    pub fn startswith(pattern: impl Into<String>) -> Self {
        Self::tag(StrMatch::StartsWith, pattern)
    }

    /// Case-insensitive [`Pred::startswith`].
    pub fn istartswith(pattern: impl Into<String>) -> Self {
        Self::tag(StrMatch::IStartsWith, pattern)
    }

    /// Label text ends with the pattern.
    pub fn endswith(pattern: impl Into<String>) -> Self {
        Self::tag(StrMatch::EndsWith, pattern)
    }

    /// Case-insensitive [`Pred::endswith`].
    pub fn iendswith(pattern: impl Into<String>) -> Self {
        Self::tag(StrMatch::IEndsWith, pattern)
    }

    /// Label text contains the pattern.
    pub fn contains(pattern: impl Into<String>) -> Self {
        Self::tag(StrMatch::Contains, pattern)
    }

    /// Case-insensitive [`Pred::contains`].
    pub fn icontains(pattern: impl Into<String>) -> Self {
        Self::tag(StrMatch::IContains, pattern)
    }

    /// Label text matches the regular expression.
    pub fn regexp(pattern: &str) -> Result<Self, AnnTierError> {
        Ok(Pred::Tag {
            matcher: StrMatch::Regexp(Regex::new(pattern)?),
            pattern: pattern.to_string(),
            scope: TagScope::default(),
        })
    }

    /// Label text reads as the given boolean.
    pub fn label_bool(value: bool) -> Self {
        Pred::TagBool {
            value,
            scope: TagScope::default(),
        }
    }

    /// Numeric test on the annotation begin, in seconds.
    pub fn begin(cmp: NumCmp, value: f64) -> Self {
        Pred::Time {
            field: TimeField::Begin,
            cmp,
            value,
        }
    }

    /// Numeric test on the annotation end, in seconds.
    pub fn end(cmp: NumCmp, value: f64) -> Self {
        Pred::Time {
            field: TimeField::End,
            cmp,
            value,
        }
    }

    /// Numeric test on the annotation duration, in seconds.
    pub fn duration(cmp: NumCmp, value: f64) -> Self {
        Pred::Time {
            field: TimeField::Duration,
            cmp,
            value,
        }
    }

    /// Switches every content predicate in the tree from testing only the
    /// canonical alternative to testing any alternative.
    ///
    /// Recurses through `And`/`Or`/`Not`; time predicates are unaffected.
    pub fn any_alternative(mut self) -> Self {
        self.set_scope(TagScope::Any);
        self
    }

    fn set_scope(&mut self, new: TagScope) {
        match self {
            Pred::Tag { scope, .. } | Pred::TagBool { scope, .. } => *scope = new,
            Pred::Time { .. } => {}
            Pred::And(left, right) | Pred::Or(left, right) => {
                left.set_scope(new);
                right.set_scope(new);
            }
            Pred::Not(inner) => inner.set_scope(new),
        }
    }

    fn tag(matcher: StrMatch, pattern: impl Into<String>) -> Self {
        Pred::Tag {
            matcher,
            pattern: pattern.into(),
            scope: TagScope::default(),
        }
    }

    /// Evaluates the predicate against one annotation.
    pub fn matches(&self, annotation: &Annotation) -> bool {
        match self {
            Pred::Tag {
                matcher,
                pattern,
                scope,
            } => scoped_texts(annotation.label(), *scope)
                .any(|text| matcher.test(text, pattern)),
            Pred::TagBool { value, scope } => scoped_texts(annotation.label(), *scope)
                .any(|text| text_as_bool(text) == Some(*value)),
            Pred::Time { field, cmp, value } => cmp.eval(field.of(annotation), *value),
            Pred::And(left, right) => left.matches(annotation) && right.matches(annotation),
            Pred::Or(left, right) => left.matches(annotation) || right.matches(annotation),
            Pred::Not(inner) => !inner.matches(annotation),
        }
    }
}

fn scoped_texts(label: &Label, scope: TagScope) -> impl Iterator<Item = &str> {
    let alternatives = label.alternatives();
    let take = match scope {
        TagScope::Best => alternatives.len().min(1),
        TagScope::Any => alternatives.len(),
    };
    alternatives[..take].iter().map(|a| a.text.as_str())
}

fn text_as_bool(text: &str) -> Option<bool> {
    match text {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

impl BitAnd for Pred {
    type Output = Pred;
    fn bitand(self, rhs: Pred) -> Pred {
        Pred::And(Box::new(self), Box::new(rhs))
    }
}

impl BitOr for Pred {
    type Output = Pred;
    fn bitor(self, rhs: Pred) -> Pred {
        Pred::Or(Box::new(self), Box::new(rhs))
    }
}

impl Not for Pred {
    type Output = Pred;
    fn not(self) -> Pred {
        Pred::Not(Box::new(self))
    }
}

// Composed human-readable name, e.g. "(startswith(t) & endswith(o))".
impl fmt::Display for Pred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pred::Tag {
                matcher,
                pattern,
                scope,
            } => {
                write!(f, "{}({})", matcher.name(), pattern)?;
                if *scope == TagScope::Any {
                    write!(f, "[any]")?;
                }
                Ok(())
            }
            Pred::TagBool { value, scope } => {
                write!(f, "bool({})", value)?;
                if *scope == TagScope::Any {
                    write!(f, "[any]")?;
                }
                Ok(())
            }
            Pred::Time { field, cmp, value } => {
                write!(f, "{}_{}({})", field.name(), cmp.suffix(), value)
            }
            Pred::And(left, right) => write!(f, "({} & {})", left, right),
            Pred::Or(left, right) => write!(f, "({} | {})", left, right),
            Pred::Not(inner) => write!(f, "not({})", inner),
        }
    }
}

/// A lazy, restartable sequence of the annotations of one tier matching a
/// predicate.
///
/// Re-iterating re-evaluates from the start; nothing is cached, so edits
/// to the underlying labels between iterations are picked up.
pub struct Filter<'a> {
    tier: &'a Tier,
    pred: Pred,
}

impl<'a> Filter<'a> {
    /// Wraps a tier and a predicate.
    pub fn new(tier: &'a Tier, pred: Pred) -> Self {
        Self { tier, pred }
    }

    /// Returns the wrapped tier.
    pub fn tier(&self) -> &'a Tier {
        self.tier
    }

    /// Iterates over matching annotations in time order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Annotation> + '_ {
        self.tier.iter().filter(move |a| self.pred.matches(a))
    }

    /// Materializes the matches into a new tier of deep copies.
    pub fn to_tier(&self, name: impl Into<String>) -> Tier {
        let mut out = Tier::new(name);
        for annotation in self.iter() {
            out.add(annotation.clone());
        }
        out
    }
}
