#![allow(dead_code)]

use anntier::model::{Annotation, Label, LinkKind, TierId, TimeInterval, Transcription};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// One annotation as (gap before it, duration, text, scaled score).
///
/// Gap and duration are in centisecond steps; duration gets +1 so every
/// generated interval is non-degenerate. Spans built from these seeds are
/// ordered and non-overlapping by construction, so they always satisfy the
/// tier insertion invariants.
type AnnSeed = (u8, u8, String, u16);

fn ann_seed_strategy() -> BoxedStrategy<AnnSeed> {
    (any::<u8>(), any::<u8>(), text_strategy(), 0u16..=1000u16).boxed()
}

fn text_strategy() -> BoxedStrategy<String> {
    proptest::string::string_regex("[a-z#+]{1,8}")
        .expect("valid text regex")
        .boxed()
}

/// Generates a transcription of 1..=max_tiers tiers with up to max_anns
/// annotations each. Half the time a mirror of the first tier is added and
/// linked under it as a time association, so hierarchies are exercised too.
pub fn arb_transcription(max_tiers: usize, max_anns: usize) -> BoxedStrategy<Transcription> {
    assert!(max_tiers > 0, "max_tiers must be > 0");

    let tier_strategy = proptest::collection::vec(ann_seed_strategy(), 0..=max_anns);
    (
        proptest::collection::vec(tier_strategy, 1..=max_tiers),
        any::<bool>(),
    )
        .prop_map(|(tier_seeds, with_mirror)| build_transcription(tier_seeds, with_mirror))
        .boxed()
}

fn build_transcription(tier_seeds: Vec<Vec<AnnSeed>>, with_mirror: bool) -> Transcription {
    let mut trans = Transcription::new("generated");
    let mut first: Option<TierId> = None;

    for (idx, seeds) in tier_seeds.into_iter().enumerate() {
        let id = trans.new_tier(format!("tier_{}", idx + 1));
        first.get_or_insert(id);

        let mut cursor = 0.0;
        for (gap, duration, text, score) in seeds {
            let begin = cursor + gap as f64 * 0.01;
            let end = begin + (duration as f64 + 1.0) * 0.01;
            cursor = end;

            let interval = TimeInterval::from_seconds(begin, end).expect("seeded begin < end");
            let mut label = Label::new();
            label.add(text, score as f64 / 1000.0);
            trans
                .append_annotation(id, Annotation::new(interval, label))
                .expect("seeded spans are ordered");
        }
    }

    if with_mirror {
        if let Some(reference) = first {
            add_association_mirror(&mut trans, reference);
        }
    }
    trans
}

/// Adds a tier with the exact boundaries of `reference` and links it under
/// `reference` as a time association.
fn add_association_mirror(trans: &mut Transcription, reference: TierId) {
    let spans: Vec<(f64, f64)> = trans
        .tier(reference)
        .expect("reference tier exists")
        .iter()
        .map(|a| {
            let (begin, end) = a.span();
            (begin.midpoint(), end.midpoint())
        })
        .collect();
    if spans.is_empty() {
        return;
    }

    let child = trans.new_tier("mirror");
    for (begin, end) in spans {
        let interval = TimeInterval::from_seconds(begin, end).expect("mirrored begin < end");
        trans
            .append_annotation(child, Annotation::with_text(interval, "m"))
            .expect("mirrored spans are ordered");
    }
    trans
        .add_in_hierarchy(reference, child, LinkKind::TimeAssociation)
        .expect("mirror has identical boundaries");
}
