//! Criterion micro-benchmarks for allocate/free cycles on both allocators.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use memops_arena::{
    AllocatorConfig, BestFit, EagerCoalescingAllocator, FirstFit, FreeListStorage,
    LazyDefragAllocator, WorstFit,
};
use memops_bench::{churn_profile, message_profile, replay, Workload};
use memops_core::{AllocationStrategy, RangeAllocator};

fn eager(workload: &Workload) -> EagerCoalescingAllocator<Vec<u8>> {
    EagerCoalescingAllocator::new(vec![0u8; workload.buffer_len as usize]).unwrap()
}

fn lazy(workload: &Workload, threshold: u32) -> LazyDefragAllocator<Vec<u8>> {
    let config = AllocatorConfig {
        storage: FreeListStorage::growable(),
        defrag_threshold: threshold,
        ..AllocatorConfig::eager()
    };
    LazyDefragAllocator::with_config(vec![0u8; workload.buffer_len as usize], &config).unwrap()
}

/// Benchmark: random-order churn, eager vs lazy.
fn bench_churn(c: &mut Criterion) {
    let workload = churn_profile(42, 10_000);
    let mut group = c.benchmark_group("churn_10k");

    group.bench_function("eager", |b| {
        b.iter(|| {
            let mut a = eager(&workload);
            black_box(replay(&mut a, &workload));
        });
    });

    for threshold in [64u32, 1024] {
        group.bench_with_input(
            BenchmarkId::new("lazy", threshold),
            &threshold,
            |b, &threshold| {
                b.iter(|| {
                    let mut a = lazy(&workload, threshold);
                    black_box(replay(&mut a, &workload));
                });
            },
        );
    }
    group.finish();
}

/// Benchmark: arrival-order message bursts, where lazy frees stay O(1).
fn bench_messages(c: &mut Criterion) {
    let workload = message_profile(42, 50, 256);
    let mut group = c.benchmark_group("messages_50x256");

    group.bench_function("eager", |b| {
        b.iter(|| {
            let mut a = eager(&workload);
            black_box(replay(&mut a, &workload));
        });
    });
    group.bench_function("lazy", |b| {
        b.iter(|| {
            let mut a = lazy(&workload, 512);
            black_box(replay(&mut a, &workload));
        });
    });
    group.finish();
}

/// Benchmark: policy cost on the eager allocator.
fn bench_policies(c: &mut Criterion) {
    let workload = churn_profile(7, 10_000);
    let mut group = c.benchmark_group("policy");

    let policies: [(&str, fn() -> Box<dyn AllocationStrategy>); 3] = [
        ("first_fit", || Box::new(FirstFit)),
        ("best_fit", || Box::new(BestFit)),
        ("worst_fit", || Box::new(WorstFit)),
    ];
    for (name, make) in policies {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut a = eager(&workload).with_strategy(make());
                black_box(replay(&mut a, &workload));
            });
        });
    }
    group.finish();
}

/// Benchmark: one defragmentation pass over a shuffled free list.
fn bench_defragment(c: &mut Criterion) {
    c.bench_function("defragment_4k_ranges", |b| {
        b.iter_batched(
            || {
                let mut a = LazyDefragAllocator::with_config(
                    vec![0u8; 64 * 1024],
                    &AllocatorConfig {
                        storage: FreeListStorage::growable(),
                        ..AllocatorConfig::eager()
                    },
                )
                .unwrap();
                for _ in 0..4096 {
                    a.allocate(16).unwrap();
                }
                // Release every other block, back to front, so nothing merges.
                for i in (0..4096u32).rev().step_by(2) {
                    a.free(i * 16, i * 16 + 16);
                }
                a
            },
            |mut a| {
                a.defragment();
                black_box(a.free_block_count())
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_churn,
    bench_messages,
    bench_policies,
    bench_defragment
);
criterion_main!(benches);
