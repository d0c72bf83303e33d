//! Scoring throughput against the built-in knowledge base.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rayon::prelude::*;
use std::hint::black_box;
use std::sync::Arc;
use symptomap::matching::{SimilarityStrategy, StrategyKind};
use symptomap::{DiseaseScorer, KnowledgeBase, PatientContext};

const PHRASES: &[&str] = &[
    "fever",
    "severe headache",
    "runy nose",
    "sore throat",
    "cough",
    "chest pain",
    "nausea",
    "fatigue",
];

fn bench_score(c: &mut Criterion) {
    let kb = Arc::new(KnowledgeBase::builtin().expect("builtin knowledge base"));
    let scorer = DiseaseScorer::with_defaults(Arc::clone(&kb));
    let patient = PatientContext::new()
        .with_age(67)
        .with_chronic_condition("type 2 diabetes");

    let mut group = c.benchmark_group("score");
    for size in [1, 3, PHRASES.len()] {
        group.bench_with_input(BenchmarkId::new("phrases", size), &size, |b, &size| {
            b.iter(|| scorer.score(black_box(&PHRASES[..size]), Some(&patient)))
        });
    }
    group.finish();

    c.bench_function("score_text", |b| {
        b.iter(|| {
            scorer.score_text(
                black_box("fever, chills and a bad cough with chest pain"),
                None,
            )
        })
    });

    let queries: Vec<Vec<&str>> = (0..256)
        .map(|i| PHRASES.iter().copied().cycle().skip(i).take(1 + i % 5).collect())
        .collect();
    c.bench_function("batch_256_parallel", |b| {
        b.iter(|| {
            queries
                .par_iter()
                .map(|q| scorer.score(q.as_slice(), None).ranked.len())
                .sum::<usize>()
        })
    });
}

fn bench_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity");
    for kind in [
        StrategyKind::TokenSort,
        StrategyKind::Levenshtein,
        StrategyKind::Subsequence,
    ] {
        let strategy = kind.build();
        group.bench_function(strategy.name(), |b| {
            b.iter(|| strategy.similarity(black_box("shortnes of breth"), black_box("shortness of breath")))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_score, bench_similarity);
criterion_main!(benches);
