use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pathfit_core::catalog::builtin_catalog;
use pathfit_core::engine::assess;
use pathfit_core::model::ResponseSnapshot;
use pathfit_core::normalize::rank_agreement;

fn full_snapshot() -> ResponseSnapshot {
    let catalog = builtin_catalog();
    let mut responses = ResponseSnapshot::new();
    for q in &catalog.questions {
        if let Some(scale) = &q.scale {
            responses.record(&q.id, scale.max);
        } else if let Some(correct) = &q.correct_choice {
            responses.record(&q.id, correct.as_str());
        } else if let Some(order) = &q.reference_order {
            responses.record(&q.id, order.clone());
        } else if let Some(first) = q.choices.first() {
            responses.record(&q.id, first.as_str());
        }
    }
    responses
}

fn bench_assess(c: &mut Criterion) {
    let mut group = c.benchmark_group("assess");
    let catalog = builtin_catalog();

    let empty = ResponseSnapshot::new();
    let full = full_snapshot();
    let partial: ResponseSnapshot = [("psych_1", 4), ("psych_4", 2), ("wiscar_1", 3)]
        .into_iter()
        .collect();

    group.bench_function("empty", |b| {
        b.iter(|| assess(black_box(&catalog), black_box(&empty)))
    });

    group.bench_function("full", |b| {
        b.iter(|| assess(black_box(&catalog), black_box(&full)))
    });

    group.bench_function("partial", |b| {
        b.iter(|| assess(black_box(&catalog), black_box(&partial)))
    });

    group.finish();
}

fn bench_rank_agreement(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_agreement");

    let identity: Vec<usize> = (0..5).collect();
    let reversed: Vec<usize> = (0..5).rev().collect();
    let large: Vec<usize> = (0..200).rev().collect();
    let large_reference: Vec<usize> = (0..200).collect();

    group.bench_function("5_identity", |b| {
        b.iter(|| rank_agreement(black_box(&identity), black_box(&identity)))
    });

    group.bench_function("5_reversed", |b| {
        b.iter(|| rank_agreement(black_box(&reversed), black_box(&identity)))
    });

    group.bench_function("200_reversed", |b| {
        b.iter(|| rank_agreement(black_box(&large), black_box(&large_reference)))
    });

    group.finish();
}

criterion_group!(benches, bench_assess, bench_rank_agreement);
criterion_main!(benches);
