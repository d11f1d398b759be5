//! Allen's interval algebra over annotation pairs.
//!
//! Two annotations stand in exactly one of the 13 pairwise relations,
//! computed from their `(begin, end)` spans under fuzzy comparison with
//! point annotations reduced to zero-width intervals. Because the
//! relations are mutually exclusive, a [`RelationQuery`] only composes
//! with OR (`|`): an AND of two primitive relations can never hold, so the
//! type provides no way to write one.

use std::fmt;
use std::ops::BitOr;

use super::{Filter, NumCmp};
use crate::model::{Annotation, Label, Tier};

/// The 13 mutually exclusive pairwise interval relations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AllenRelation {
    Before,
    After,
    Meets,
    MetBy,
    Overlaps,
    OverlappedBy,
    Starts,
    StartedBy,
    Finishes,
    FinishedBy,
    During,
    Contains,
    Equals,
}

impl AllenRelation {
    /// All 13 relations, in canonical order.
    pub const ALL: [AllenRelation; 13] = [
        AllenRelation::Before,
        AllenRelation::After,
        AllenRelation::Meets,
        AllenRelation::MetBy,
        AllenRelation::Overlaps,
        AllenRelation::OverlappedBy,
        AllenRelation::Starts,
        AllenRelation::StartedBy,
        AllenRelation::Finishes,
        AllenRelation::FinishedBy,
        AllenRelation::During,
        AllenRelation::Contains,
        AllenRelation::Equals,
    ];

    /// The relations under which the two spans share no inner time.
    pub const DISJOINT: [AllenRelation; 4] = [
        AllenRelation::Before,
        AllenRelation::After,
        AllenRelation::Meets,
        AllenRelation::MetBy,
    ];

    /// The relations under which the two spans share inner time without
    /// being equal.
    pub const CONVERGENT: [AllenRelation; 8] = [
        AllenRelation::Overlaps,
        AllenRelation::OverlappedBy,
        AllenRelation::Starts,
        AllenRelation::StartedBy,
        AllenRelation::Finishes,
        AllenRelation::FinishedBy,
        AllenRelation::During,
        AllenRelation::Contains,
    ];

    /// The lowercase name used in query results and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            AllenRelation::Before => "before",
            AllenRelation::After => "after",
            AllenRelation::Meets => "meets",
            AllenRelation::MetBy => "metby",
            AllenRelation::Overlaps => "overlaps",
            AllenRelation::OverlappedBy => "overlappedby",
            AllenRelation::Starts => "starts",
            AllenRelation::StartedBy => "startedby",
            AllenRelation::Finishes => "finishes",
            AllenRelation::FinishedBy => "finishedby",
            AllenRelation::During => "during",
            AllenRelation::Contains => "contains",
            AllenRelation::Equals => "equals",
        }
    }
}

impl fmt::Display for AllenRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Classifies the relation of `a` to `b` from their spans.
///
/// Total and exclusive: comparing begins, ends and the cross boundaries
/// under fuzzy comparison lands on exactly one relation. Degenerate
/// zero-width spans (points) classify like any other: two fuzzy-equal
/// points are `Equals`.
pub fn allen_between(a: &Annotation, b: &Annotation) -> AllenRelation {
    use std::cmp::Ordering::*;

    let (a_begin, a_end) = a.span();
    let (b_begin, b_end) = b.span();

    match (a_begin.fuzzy_cmp(&b_begin), a_end.fuzzy_cmp(&b_end)) {
        (Equal, Equal) => AllenRelation::Equals,
        (Equal, Less) => AllenRelation::Starts,
        (Equal, Greater) => AllenRelation::StartedBy,
        (Greater, Equal) => AllenRelation::Finishes,
        (Less, Equal) => AllenRelation::FinishedBy,
        (Less, Greater) => AllenRelation::Contains,
        (Greater, Less) => AllenRelation::During,
        (Less, Less) => match a_end.fuzzy_cmp(&b_begin) {
            Less => AllenRelation::Before,
            Equal => AllenRelation::Meets,
            Greater => AllenRelation::Overlaps,
        },
        (Greater, Greater) => match a_begin.fuzzy_cmp(&b_end) {
            Greater => AllenRelation::After,
            Equal => AllenRelation::MetBy,
            Less => AllenRelation::OverlappedBy,
        },
    }
}

#[derive(Clone, Copy, Debug)]
struct Check {
    relation: AllenRelation,
    bound: Option<(NumCmp, f64)>,
}

/// A set of accepted relations, some with numeric bounds.
///
/// Bounds apply to the four parameterizable relations: for
/// `before`/`after` the bound constrains the gap between the spans, for
/// `overlaps`/`overlappedby` it constrains the shared duration. Queries
/// compose only with `|` (see module docs).
#[derive(Clone, Debug, Default)]
pub struct RelationQuery {
    checks: Vec<Check>,
}

impl RelationQuery {
    /// Accepts one relation, unbounded.
    pub fn of(relation: AllenRelation) -> Self {
        Self {
            checks: vec![Check {
                relation,
                bound: None,
            }],
        }
    }

    /// Accepts several relations, unbounded.
    pub fn any_of(relations: impl IntoIterator<Item = AllenRelation>) -> Self {
        Self {
            checks: relations
                .into_iter()
                .map(|relation| Check {
                    relation,
                    bound: None,
                })
                .collect(),
        }
    }

    /// The `disjoint` meta-relation: before | after | meets | metby.
    pub fn disjoint() -> Self {
        Self::any_of(AllenRelation::DISJOINT)
    }

    /// The `convergent` meta-relation: every non-equals relation that
    /// shares inner time.
    pub fn convergent() -> Self {
        Self::any_of(AllenRelation::CONVERGENT)
    }

    /// `before` with a bound on the gap `b.begin - a.end`.
    pub fn before_bound(cmp: NumCmp, max_delay: f64) -> Self {
        Self::bounded(AllenRelation::Before, cmp, max_delay)
    }

    /// `after` with a bound on the gap `a.begin - b.end`.
    pub fn after_bound(cmp: NumCmp, max_delay: f64) -> Self {
        Self::bounded(AllenRelation::After, cmp, max_delay)
    }

    /// `overlaps` with a bound on the shared duration `a.end - b.begin`.
    pub fn overlaps_bound(cmp: NumCmp, min_overlap: f64) -> Self {
        Self::bounded(AllenRelation::Overlaps, cmp, min_overlap)
    }

    /// `overlappedby` with a bound on the shared duration
    /// `b.end - a.begin`.
    pub fn overlappedby_bound(cmp: NumCmp, min_overlap: f64) -> Self {
        Self::bounded(AllenRelation::OverlappedBy, cmp, min_overlap)
    }

    fn bounded(relation: AllenRelation, cmp: NumCmp, value: f64) -> Self {
        Self {
            checks: vec![Check {
                relation,
                bound: Some((cmp, value)),
            }],
        }
    }

    /// Evaluates the query over a pair.
    ///
    /// Returns the relation holding between `a` and `b` when it is
    /// accepted by this query (and passes its bound, if any), `None`
    /// otherwise.
    pub fn eval(&self, a: &Annotation, b: &Annotation) -> Option<AllenRelation> {
        let relation = allen_between(a, b);
        let check = self.checks.iter().find(|c| c.relation == relation)?;

        if let Some((cmp, value)) = check.bound {
            let measured = match relation {
                AllenRelation::Before => b.span().0.midpoint() - a.span().1.midpoint(),
                AllenRelation::After => a.span().0.midpoint() - b.span().1.midpoint(),
                AllenRelation::Overlaps => a.span().1.midpoint() - b.span().0.midpoint(),
                AllenRelation::OverlappedBy => b.span().1.midpoint() - a.span().0.midpoint(),
                // Other relations carry no bound; constructors cannot
                // build one.
                _ => return Some(relation),
            };
            if !cmp.eval(measured, value) {
                return None;
            }
        }
        Some(relation)
    }
}

impl BitOr for RelationQuery {
    type Output = RelationQuery;

    fn bitor(mut self, rhs: RelationQuery) -> RelationQuery {
        self.checks.extend(rhs.checks);
        self
    }
}

impl fmt::Display for RelationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for check in &self.checks {
            if !first {
                write!(f, " | ")?;
            }
            first = false;
            match check.bound {
                Some((cmp, value)) => {
                    write!(f, "{}_{}({})", check.relation, cmp.suffix(), value)?
                }
                None => write!(f, "{}", check.relation)?,
            }
        }
        Ok(())
    }
}

/// Pairs two filters with a relation query.
///
/// Iteration is lazy and restartable: every call to [`RelationFilter::iter`]
/// re-runs both filters and re-classifies each cross pair.
pub struct RelationFilter<'a> {
    source: Filter<'a>,
    target: Filter<'a>,
    query: RelationQuery,
}

impl<'a> RelationFilter<'a> {
    /// Wraps two filters and a query.
    pub fn new(source: Filter<'a>, target: Filter<'a>, query: RelationQuery) -> Self {
        Self {
            source,
            target,
            query,
        }
    }

    /// Iterates over `(source annotation, relation)` pairs: one pair per
    /// cross match, in source time order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a Annotation, AllenRelation)> + '_ {
        self.pairs().map(|(a, _, relation)| (a, relation))
    }

    /// Materializes the matched source annotations into a new tier of deep
    /// copies. With `merge_labels`, each copy's label also receives the
    /// alternatives of the matched target annotation.
    ///
    /// Insertion uses the soft path, so a source annotation matching
    /// several targets lands once.
    pub fn to_tier(&self, name: impl Into<String>, merge_labels: bool) -> Tier {
        let mut out = Tier::new(name);
        for (source, target, _) in self.pairs() {
            let mut copy = source.clone();
            if merge_labels {
                let mut label: Label = copy.label().clone();
                label.extend_from(target.label());
                copy.set_label(label);
            }
            out.add(copy);
        }
        out
    }

    fn pairs(&self) -> impl Iterator<Item = (&'a Annotation, &'a Annotation, AllenRelation)> + '_ {
        let targets: Vec<&'a Annotation> = self.target.iter().collect();
        self.source.iter().flat_map(move |a| {
            let query = &self.query;
            targets
                .clone()
                .into_iter()
                .filter_map(move |b| query.eval(a, b).map(|relation| (a, b, relation)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Pred;
    use crate::model::{TimeInterval, TimePoint};

    fn spanning(begin: f64, end: f64, text: &str) -> Annotation {
        Annotation::with_text(TimeInterval::from_seconds(begin, end).unwrap(), text)
    }

    #[test]
    fn test_primitive_relations() {
        let x = spanning(0.0, 1.0, "x");
        let y = spanning(2.0, 3.0, "y");
        assert_eq!(allen_between(&x, &y), AllenRelation::Before);
        assert_eq!(allen_between(&y, &x), AllenRelation::After);

        let z = spanning(1.0, 2.0, "z");
        assert_eq!(allen_between(&x, &z), AllenRelation::Meets);
        assert_eq!(allen_between(&z, &x), AllenRelation::MetBy);

        let w = spanning(0.5, 1.5, "w");
        assert_eq!(allen_between(&x, &w), AllenRelation::Overlaps);
        assert_eq!(allen_between(&w, &x), AllenRelation::OverlappedBy);

        assert_eq!(allen_between(&x, &x.clone()), AllenRelation::Equals);
    }

    #[test]
    fn test_containment_relations() {
        let outer = spanning(0.0, 4.0, "outer");
        let inner = spanning(1.0, 2.0, "inner");
        assert_eq!(allen_between(&inner, &outer), AllenRelation::During);
        assert_eq!(allen_between(&outer, &inner), AllenRelation::Contains);

        let prefix = spanning(0.0, 2.0, "prefix");
        assert_eq!(allen_between(&prefix, &outer), AllenRelation::Starts);
        assert_eq!(allen_between(&outer, &prefix), AllenRelation::StartedBy);

        let suffix = spanning(2.0, 4.0, "suffix");
        assert_eq!(allen_between(&suffix, &outer), AllenRelation::Finishes);
        assert_eq!(allen_between(&outer, &suffix), AllenRelation::FinishedBy);
    }

    #[test]
    fn test_points_reduce_to_zero_width() {
        let p = Annotation::with_text(TimePoint::exact(1.5), "p");
        let span = spanning(1.0, 2.0, "s");
        assert_eq!(allen_between(&p, &span), AllenRelation::During);

        let q = Annotation::with_text(TimePoint::exact(1.5), "q");
        assert_eq!(allen_between(&p, &q), AllenRelation::Equals);
    }

    #[test]
    fn test_relations_are_exclusive_over_a_grid() {
        let spans = [
            spanning(0.0, 1.0, "a"),
            spanning(0.0, 2.0, "b"),
            spanning(1.0, 2.0, "c"),
            spanning(0.5, 1.5, "d"),
            spanning(3.0, 4.0, "e"),
        ];
        for a in &spans {
            for b in &spans {
                let relation = allen_between(a, b);
                // Exactly one primitive accepts the pair.
                let accepted = AllenRelation::ALL
                    .iter()
                    .filter(|r| RelationQuery::of(**r).eval(a, b).is_some())
                    .count();
                assert_eq!(accepted, 1, "{} vs {}", relation, a.label());
            }
        }
    }

    #[test]
    fn test_bounded_before() {
        let x = spanning(0.0, 1.0, "x");
        let near = spanning(1.3, 2.0, "near");
        let far = spanning(3.0, 4.0, "far");

        let query = RelationQuery::before_bound(NumCmp::Le, 0.5);
        assert_eq!(query.eval(&x, &near), Some(AllenRelation::Before));
        assert_eq!(query.eval(&x, &far), None); // gap 2 > 0.5
    }

    #[test]
    fn test_bounded_overlap() {
        let a = spanning(0.0, 2.0, "a");
        let slight = spanning(1.9, 3.0, "slight");
        let deep = spanning(1.0, 3.0, "deep");

        let query = RelationQuery::overlaps_bound(NumCmp::Ge, 0.5);
        assert_eq!(query.eval(&a, &slight), None); // overlap 0.1 < 0.5
        assert_eq!(query.eval(&a, &deep), Some(AllenRelation::Overlaps));
    }

    #[test]
    fn test_meta_relations() {
        let x = spanning(0.0, 1.0, "x");
        let y = spanning(2.0, 3.0, "y");
        let w = spanning(0.5, 1.5, "w");

        assert_eq!(RelationQuery::disjoint().eval(&x, &y), Some(AllenRelation::Before));
        assert_eq!(RelationQuery::disjoint().eval(&x, &w), None);
        assert_eq!(
            RelationQuery::convergent().eval(&x, &w),
            Some(AllenRelation::Overlaps)
        );
        assert_eq!(RelationQuery::convergent().eval(&x, &x.clone()), None);
    }

    #[test]
    fn test_query_union() {
        let x = spanning(0.0, 1.0, "x");
        let y = spanning(1.0, 2.0, "y");

        let query = RelationQuery::of(AllenRelation::Before) | RelationQuery::of(AllenRelation::Meets);
        assert_eq!(query.eval(&x, &y), Some(AllenRelation::Meets));
        assert_eq!(format!("{}", query), "before | meets");
    }

    fn tokens_and_noises() -> (Tier, Tier) {
        let mut tokens = Tier::new("Tokens");
        tokens.append(spanning(0.0, 1.0, "the")).unwrap();
        tokens.append(spanning(1.0, 2.0, "cat")).unwrap();
        tokens.append(spanning(2.0, 3.0, "sat")).unwrap();

        let mut noises = Tier::new("Noises");
        noises.append(spanning(0.5, 1.5, "cough")).unwrap();
        noises.append(spanning(2.0, 3.0, "hum")).unwrap();
        (tokens, noises)
    }

    #[test]
    fn test_relation_filter_pairs() {
        let (tokens, noises) = tokens_and_noises();
        let filter = RelationFilter::new(
            Filter::new(&tokens, Pred::regexp(".*").unwrap()),
            Filter::new(&noises, Pred::regexp(".*").unwrap()),
            RelationQuery::convergent() | RelationQuery::of(AllenRelation::Equals),
        );

        let pairs: Vec<(String, &'static str)> = filter
            .iter()
            .map(|(a, relation)| (a.label().value().to_string(), relation.name()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("the".to_string(), "overlaps"),
                ("cat".to_string(), "overlappedby"),
                ("sat".to_string(), "equals"),
            ]
        );
    }

    #[test]
    fn test_relation_filter_to_tier_merges_labels() {
        let (tokens, noises) = tokens_and_noises();
        let filter = RelationFilter::new(
            Filter::new(&tokens, Pred::exact("sat")),
            Filter::new(&noises, Pred::exact("hum")),
            RelationQuery::of(AllenRelation::Equals),
        );

        let plain = filter.to_tier("matched", false);
        assert_eq!(plain.len(), 1);
        assert_eq!(plain.get(0).unwrap().label().alternatives().len(), 1);

        let merged = filter.to_tier("matched", true);
        let label = merged.get(0).unwrap().label();
        assert_eq!(label.alternatives().len(), 2);
        assert_eq!(label.value(), "sat");
    }
}
