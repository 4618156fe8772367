//! Benchmarks comparing packed counters against cache-line-aligned ones
//! under concurrent per-worker increments.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strand::prelude::*;

const WORKERS: usize = 2;
const INCREMENTS: u64 = 100_000;

fn hammer_packed(pools: &[WorkerPool], counters: &Arc<Vec<AtomicU64>>) {
    for (th, pool) in pools.iter().enumerate() {
        let counters = counters.clone();
        pool.post(move || {
            for _ in 0..INCREMENTS {
                counters[th].fetch_add(1, Ordering::Relaxed);
            }
        })
        .unwrap();
    }
    for pool in pools {
        pool.wait();
    }
}

fn hammer_aligned(pools: &[WorkerPool], counters: &Arc<AlignedArray<AtomicU64>>) {
    for (th, pool) in pools.iter().enumerate() {
        let counters = counters.clone();
        pool.post(move || {
            for _ in 0..INCREMENTS {
                counters[th].fetch_add(1, Ordering::Relaxed);
            }
        })
        .unwrap();
    }
    for pool in pools {
        pool.wait();
    }
}

fn bench_counter_increments(c: &mut Criterion) {
    let mut group = c.benchmark_group("counter_increments");

    group.bench_function("packed", |b| {
        let pools: Vec<WorkerPool> = (0..WORKERS).map(|_| WorkerPool::new().unwrap()).collect();
        let counters: Arc<Vec<AtomicU64>> =
            Arc::new((0..WORKERS).map(|_| AtomicU64::new(0)).collect());

        b.iter(|| hammer_packed(&pools, &counters));
        black_box(counters[0].load(Ordering::Relaxed));
    });

    group.bench_function("cache_line_aligned", |b| {
        let pools: Vec<WorkerPool> = (0..WORKERS).map(|_| WorkerPool::new().unwrap()).collect();
        let counters = Arc::new(AlignedArray::<AtomicU64>::new(WORKERS));

        b.iter(|| hammer_aligned(&pools, &counters));
        black_box(counters[0].load(Ordering::Relaxed));
    });

    group.finish();
}

criterion_group!(benches, bench_counter_increments);
criterion_main!(benches);
