//! Transcription validation.
//!
//! The core types uphold their own invariants during normal mutation, but
//! data can reach a transcription through raw tier access or through the
//! canonical JSON reader, which accepts structurally questionable
//! hierarchies on purpose (the value-level invariants are enforced on
//! read; aggregate consistency is this module's job). Validation checks:
//! - tier naming (non-empty, unambiguous)
//! - per-tier ordering and overlap invariants, finiteness of time values
//! - hierarchy shape (dangling handles, duplicate children, self-links,
//!   cycles) and per-kind boundary compatibility drift

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::{HashMap, HashSet};

use crate::model::{LinkKind, Tier, TierId, Transcription};

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
}

/// Validates a transcription and returns a report of all issues found.
pub fn validate_transcription(
    transcription: &Transcription,
    _opts: &ValidateOptions,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_tiers(transcription, &mut report);
    validate_annotations(transcription, &mut report);
    validate_hierarchy(transcription, &mut report);

    report
}

/// Validates tier naming.
fn validate_tiers(transcription: &Transcription, report: &mut ValidationReport) {
    let mut seen_names: HashSet<&str> = HashSet::new();

    for (_, tier) in transcription.tiers() {
        if tier.name().is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyTierName,
                "Empty tier name",
                IssueContext::Transcription,
            ));
        } else if !seen_names.insert(tier.name()) {
            report.add(ValidationIssue::warning(
                IssueCode::DuplicateTierName,
                format!("Duplicate tier name '{}'", tier.name()),
                IssueContext::Tier {
                    name: tier.name().to_string(),
                },
            ));
        }

        if tier.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyTier,
                "Tier holds no annotation",
                IssueContext::Tier {
                    name: tier.name().to_string(),
                },
            ));
        }
    }
}

/// Validates per-tier annotation invariants.
fn validate_annotations(transcription: &Transcription, report: &mut ValidationReport) {
    for (_, tier) in transcription.tiers() {
        let mut previous: Option<(f64, f64)> = None;

        for (index, annotation) in tier.iter().enumerate() {
            let context = || IssueContext::Annotation {
                tier: tier.name().to_string(),
                index,
            };

            if !annotation.location().is_finite() {
                report.add(ValidationIssue::error(
                    IssueCode::TimeNotFinite,
                    "Non-finite time value",
                    context(),
                ));
                continue; // ordering checks are meaningless on NaN
            }

            let (begin, end) = annotation.span();
            let (begin, end) = (begin.midpoint(), end.midpoint());

            if let Some((prev_begin, prev_end)) = previous {
                if begin < prev_begin {
                    report.add(ValidationIssue::error(
                        IssueCode::DisorderedAnnotations,
                        format!("Begins at {} before its predecessor at {}", begin, prev_begin),
                        context(),
                    ));
                }
                if begin < prev_end && end > prev_begin {
                    report.add(ValidationIssue::error(
                        IssueCode::OverlappingAnnotations,
                        format!(
                            "Span [{}, {}] overlaps its predecessor ending at {}",
                            begin, end, prev_end
                        ),
                        context(),
                    ));
                }
            }
            previous = Some((begin, end));
        }
    }
}

/// Validates hierarchy shape and per-kind boundary compatibility.
fn validate_hierarchy(transcription: &Transcription, report: &mut ValidationReport) {
    let hierarchy = transcription.hierarchy();
    let mut seen_children: HashMap<TierId, usize> = HashMap::new();

    for link in hierarchy.iter() {
        let context = IssueContext::Link {
            reference: link.reference.as_u64(),
            child: link.child.as_u64(),
        };

        let reference = transcription.tier(link.reference);
        let child = transcription.tier(link.child);

        if reference.is_none() || child.is_none() {
            report.add(ValidationIssue::error(
                IssueCode::DanglingLink,
                "Link names a tier that does not exist",
                context,
            ));
            continue;
        }

        if link.reference == link.child {
            report.add(ValidationIssue::error(
                IssueCode::SelfLinkedTier,
                "Tier is its own reference",
                context.clone(),
            ));
        }

        let count = seen_children.entry(link.child).or_insert(0);
        *count += 1;
        if *count == 2 {
            report.add(ValidationIssue::error(
                IssueCode::DuplicateChildLink,
                "Tier is a child of more than one reference",
                context.clone(),
            ));
        }

        let (reference, child) = match (reference, child) {
            (Some(r), Some(c)) => (r, c),
            _ => continue,
        };

        match link.kind {
            LinkKind::TimeAssociation => {
                validate_association(reference, child, context, report);
            }
            LinkKind::TimeAlignment => {
                if !reference.is_superset(child) {
                    report.add(ValidationIssue::error(
                        IssueCode::AlignmentDrift,
                        format!(
                            "'{}' is no longer a boundary superset of '{}'",
                            reference.name(),
                            child.name()
                        ),
                        context,
                    ));
                }
            }
            LinkKind::Constituency => {}
        }
    }

    validate_acyclicity(transcription, report);
}

fn validate_association(
    reference: &Tier,
    child: &Tier,
    context: IssueContext,
    report: &mut ValidationReport,
) {
    if reference.len() != child.len() {
        report.add(ValidationIssue::error(
            IssueCode::AssociationSizeDrift,
            format!(
                "Association sizes differ: {} vs {}",
                reference.len(),
                child.len()
            ),
            context,
        ));
        return;
    }
    for (index, (a, b)) in reference.iter().zip(child.iter()).enumerate() {
        let (a_begin, a_end) = a.span();
        let (b_begin, b_end) = b.span();
        if a_begin != b_begin || a_end != b_end {
            report.add(ValidationIssue::error(
                IssueCode::AssociationBoundaryDrift,
                format!("Boundaries differ at annotation index {}", index),
                context,
            ));
            return;
        }
    }
}

fn validate_acyclicity(transcription: &Transcription, report: &mut ValidationReport) {
    let hierarchy = transcription.hierarchy();

    for link in hierarchy.iter() {
        let mut visited: HashSet<TierId> = HashSet::new();
        let mut cursor = Some(link.reference);
        while let Some(current) = cursor {
            if !visited.insert(current) {
                report.add(ValidationIssue::error(
                    IssueCode::CyclicHierarchy,
                    "Link chain loops back on itself",
                    IssueContext::Link {
                        reference: link.reference.as_u64(),
                        child: link.child.as_u64(),
                    },
                ));
                break;
            }
            cursor = hierarchy.parent_of(current).map(|l| l.reference);
        }
    }
}
