//! Criterion microbenches for the anntier core.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - canonical JSON parsing (from_json_str)
//! - boundary superset checks between tiers (is_superset)
//! - Allen relation classification and relation filtering
//! - content predicate evaluation over a tier

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use anntier::filter::relation::allen_between;
use anntier::filter::{Filter, NumCmp, Pred, RelationFilter, RelationQuery};
use anntier::model::io_json::from_json_str;
use anntier::model::{Annotation, Tier, TimeInterval};

// Include the CLI fixture at compile time (no file I/O during benchmark)
const JSON_FIXTURE: &str = include_str!("../tests/fixtures/sample_valid.json");

/// Builds a tier of `count` back-to-back one-decisecond intervals.
fn dense_tier(name: &str, count: usize) -> Tier {
    let mut tier = Tier::new(name);
    for i in 0..count {
        let begin = i as f64 * 0.1;
        let interval = TimeInterval::from_seconds(begin, begin + 0.1).unwrap();
        let text = if i % 10 == 0 { "#" } else { "tok" };
        tier.append(Annotation::with_text(interval, text)).unwrap();
    }
    tier
}

/// Builds a tier whose boundaries are every `stride`-th boundary of a dense
/// tier of `count` intervals.
fn grouped_tier(name: &str, count: usize, stride: usize) -> Tier {
    let mut tier = Tier::new(name);
    for i in (0..count).step_by(stride) {
        let begin = i as f64 * 0.1;
        let end = (i + stride).min(count) as f64 * 0.1;
        let interval = TimeInterval::from_seconds(begin, end).unwrap();
        tier.append(Annotation::with_text(interval, "grp")).unwrap();
    }
    tier
}

/// Benchmark canonical JSON parsing from string.
fn bench_json_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_parse");
    group.throughput(Throughput::Bytes(JSON_FIXTURE.len() as u64));

    group.bench_function("from_json_str", |b| {
        b.iter(|| {
            let trans = from_json_str(black_box(JSON_FIXTURE)).unwrap();
            black_box(trans)
        })
    });

    group.finish();
}

/// Benchmark the boundary superset check used by alignment links.
fn bench_is_superset(c: &mut Criterion) {
    let phonemes = dense_tier("Phonemes", 500);
    let tokens = grouped_tier("Tokens", 500, 5);

    let mut group = c.benchmark_group("is_superset");
    group.throughput(Throughput::Elements(tokens.len() as u64));

    group.bench_function("dense_500_over_100", |b| {
        b.iter(|| black_box(&phonemes).is_superset(black_box(&tokens)))
    });

    group.finish();
}

/// Benchmark Allen relation classification over a full cross product.
fn bench_allen_classification(c: &mut Criterion) {
    let source = dense_tier("Source", 50);
    let target = grouped_tier("Target", 50, 5);

    let mut group = c.benchmark_group("allen");
    group.throughput(Throughput::Elements((source.len() * target.len()) as u64));

    group.bench_function("classify_cross_product", |b| {
        b.iter(|| {
            let mut count = 0usize;
            for a in source.iter() {
                for x in target.iter() {
                    let relation = allen_between(black_box(a), black_box(x));
                    count += relation as usize;
                }
            }
            black_box(count)
        })
    });

    group.finish();
}

/// Benchmark a relation filter end to end, including predicate passes.
fn bench_relation_filter(c: &mut Criterion) {
    let source = dense_tier("Source", 200);
    let target = grouped_tier("Target", 200, 4);

    let mut group = c.benchmark_group("relation_filter");
    group.throughput(Throughput::Elements(source.len() as u64));

    group.bench_function("during_over_grouped", |b| {
        b.iter(|| {
            let filter = RelationFilter::new(
                Filter::new(black_box(&source), Pred::contains("o").any_alternative()),
                Filter::new(black_box(&target), Pred::contains("g")),
                RelationQuery::of(anntier::filter::AllenRelation::During),
            );
            black_box(filter.iter().count())
        })
    });

    group.finish();
}

/// Benchmark content predicate evaluation over a tier.
fn bench_predicate_filter(c: &mut Criterion) {
    let tier = dense_tier("Tokens", 1000);
    let pred = (Pred::startswith("to") & !Pred::exact("#")) | Pred::duration(NumCmp::Gt, 0.05);

    let mut group = c.benchmark_group("predicate_filter");
    group.throughput(Throughput::Elements(tier.len() as u64));

    group.bench_function("composite_over_1000", |b| {
        b.iter(|| {
            let filter = Filter::new(black_box(&tier), pred.clone());
            black_box(filter.iter().count())
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_json_parse,
    bench_is_superset,
    bench_allen_classification,
    bench_relation_filter,
    bench_predicate_filter,
);
criterion_main!(benches);
