//! Benchmark workloads for the memops allocators.
//!
//! Provides seeded, reproducible operation streams so every allocator and
//! policy is measured against the same sequence:
//!
//! - [`churn_profile`]: mixed small requests with frees in random order
//! - [`message_profile`]: bursts of message-sized requests released in
//!   arrival order, the pattern the lazy allocator is built for
//! - [`replay`]: run a workload against any [`RangeAllocator`]

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use memops_core::RangeAllocator;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One step of a workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkloadOp {
    /// Request this many bytes.
    Alloc(u32),
    /// Release the live allocation at this index, modulo the live count.
    Free(usize),
}

/// A buffer length and the operations to run against it.
#[derive(Clone, Debug)]
pub struct Workload {
    pub buffer_len: u32,
    pub ops: Vec<WorkloadOp>,
}

/// What happened when a workload was replayed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub allocated: u32,
    pub failed: u32,
    pub freed: u32,
}

/// Mixed churn: 60% requests of 16..=1024 bytes, 40% frees of a random
/// live allocation, over a 1 MiB buffer.
pub fn churn_profile(seed: u64, op_count: usize) -> Workload {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let ops = (0..op_count)
        .map(|_| {
            if rng.next_u32() % 10 < 6 {
                WorkloadOp::Alloc(16 + rng.next_u32() % 1009)
            } else {
                WorkloadOp::Free(rng.next_u32() as usize)
            }
        })
        .collect();
    Workload {
        buffer_len: 1 << 20,
        ops,
    }
}

/// Message bursts: `burst` requests of 64..=576 bytes, then the oldest
/// half of the live set released, repeated `rounds` times over a 4 MiB
/// buffer.
pub fn message_profile(seed: u64, rounds: usize, burst: usize) -> Workload {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut ops = Vec::with_capacity(rounds * burst * 2);
    for _ in 0..rounds {
        for _ in 0..burst {
            ops.push(WorkloadOp::Alloc(64 + rng.next_u32() % 513));
        }
        for _ in 0..burst / 2 {
            ops.push(WorkloadOp::Free(0));
        }
    }
    Workload {
        buffer_len: 4 << 20,
        ops,
    }
}

/// Run `workload` against `allocator`, freeing every survivor at the end.
pub fn replay<A: RangeAllocator + ?Sized>(allocator: &mut A, workload: &Workload) -> ReplayOutcome {
    let mut live: Vec<(u32, u32)> = Vec::new();
    let mut outcome = ReplayOutcome::default();
    for op in &workload.ops {
        match *op {
            WorkloadOp::Alloc(size) => match allocator.allocate(size) {
                Some(offset) => {
                    live.push((offset, offset + size));
                    outcome.allocated += 1;
                }
                None => outcome.failed += 1,
            },
            WorkloadOp::Free(index) if !live.is_empty() => {
                // Index 0 keeps arrival order; anything else is random order.
                let (start, end) = if index == 0 {
                    live.remove(0)
                } else {
                    live.swap_remove(index % live.len())
                };
                allocator.free(start, end);
                outcome.freed += 1;
            }
            WorkloadOp::Free(_) => {}
        }
    }
    for (start, end) in live.drain(..) {
        allocator.free(start, end);
        outcome.freed += 1;
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use memops_arena::{
        AllocatorConfig, EagerCoalescingAllocator, FreeListStorage, LazyDefragAllocator,
    };

    #[test]
    fn profiles_are_deterministic() {
        assert_eq!(churn_profile(7, 500).ops, churn_profile(7, 500).ops);
        assert_ne!(churn_profile(7, 500).ops, churn_profile(8, 500).ops);
    }

    #[test]
    fn churn_replay_returns_everything() {
        let workload = churn_profile(42, 2_000);
        let mut a = EagerCoalescingAllocator::new(vec![0u8; workload.buffer_len as usize]).unwrap();
        let outcome = replay(&mut a, &workload);
        assert_eq!(outcome.allocated, outcome.freed);
        assert_eq!(a.free_block_count(), 1);
        assert_eq!(a.free_capacity(), workload.buffer_len);
    }

    #[test]
    fn message_replay_fits_lazy_allocator() {
        let workload = message_profile(42, 20, 64);
        let config = AllocatorConfig {
            storage: FreeListStorage::growable(),
            defrag_threshold: 256,
            ..AllocatorConfig::eager()
        };
        let mut a =
            LazyDefragAllocator::with_config(vec![0u8; workload.buffer_len as usize], &config)
                .unwrap();
        let outcome = replay(&mut a, &workload);
        assert_eq!(outcome.failed, 0);
        a.defragment();
        assert_eq!(a.largest_free_range(), workload.buffer_len);
    }
}
