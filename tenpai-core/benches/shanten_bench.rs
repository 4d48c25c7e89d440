use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use tenpai_core::batch::{random_workload, BatchEvaluator};
use tenpai_core::config::EvaluatorConfig;
use tenpai_core::policy::{rank_discards, DiscardMode};
use tenpai_core::seeding::random_hands;
use tenpai_engine::shanten::{shanten, ShantenCache};

fn bench_shanten(c: &mut Criterion) {
    let hands = random_hands(42, 1000, 13);

    c.bench_function("shanten_fresh_1000", |b| {
        b.iter(|| {
            for hand in &hands {
                black_box(shanten(hand, 0).ok());
            }
        });
    });

    let mut cache = ShantenCache::new();
    c.bench_function("shanten_cached_1000", |b| {
        b.iter(|| {
            for hand in &hands {
                black_box(cache.shanten(hand, 0).ok());
            }
        });
    });
}

fn bench_rank_discards(c: &mut Criterion) {
    let items = random_workload(&EvaluatorConfig::default(), 100);
    c.bench_function("rank_discards_push_100", |b| {
        b.iter(|| {
            for item in &items {
                black_box(rank_discards(&item.hand, 0, &item.pool, DiscardMode::Push).ok());
            }
        });
    });
}

fn bench_batch(c: &mut Criterion) {
    let config = EvaluatorConfig::default();
    let items = random_workload(&config, 1000);
    let Ok(evaluator) = BatchEvaluator::new(&config) else {
        return;
    };
    c.bench_function("batch_rank_1000", |b| {
        b.iter(|| black_box(evaluator.rank_all(&items)));
    });
}

criterion_group!(benches, bench_shanten, bench_rank_discards, bench_batch);
criterion_main!(benches);
