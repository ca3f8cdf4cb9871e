//! Test utilities and fixtures for memops development.
//!
//! - [`AllocationLedger`] remembers what an allocator handed out, so tests
//!   can check that live allocations never overlap and that free plus
//!   allocated bytes always add up to the buffer length.
//! - [`assert_canonical`] checks the sorted, fully-merged free-list shape.
//! - [`init_logging`] routes `log` output through `env_logger` in tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::BTreeMap;

use memops_core::{FreeRange, RangeAllocator};

/// Install `env_logger` for the test binary. Safe to call from every test.
///
/// Respects `RUST_LOG`, e.g. `RUST_LOG=memops_arena=debug cargo test`.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Whether `ranges` is sorted by start with no two entries touching or
/// overlapping.
pub fn is_canonical(ranges: &[FreeRange]) -> bool {
    ranges.windows(2).all(|w| w[0].end() < w[1].start())
}

/// Panic with a readable message unless `ranges` is canonical.
#[track_caller]
pub fn assert_canonical(ranges: &[FreeRange]) {
    for (i, w) in ranges.windows(2).enumerate() {
        assert!(
            w[0].end() < w[1].start(),
            "free list not canonical at {i}: {:?} then {:?} in {ranges:?}",
            w[0],
            w[1]
        );
    }
}

/// External record of live allocations, keyed by offset.
#[derive(Debug, Default)]
pub struct AllocationLedger {
    live: BTreeMap<u32, u32>,
    allocated: u64,
}

impl AllocationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `[offset, offset + size)` as handed out.
    ///
    /// Panics if it overlaps an allocation already in flight.
    #[track_caller]
    pub fn record(&mut self, offset: u32, size: u32) {
        let end = offset + size;
        if let Some((&prev_off, &prev_size)) = self.live.range(..=offset).next_back() {
            assert!(
                prev_off + prev_size <= offset,
                "[{offset}, {end}) overlaps live [{prev_off}, {})",
                prev_off + prev_size
            );
        }
        if let Some((&next_off, &next_size)) = self.live.range(offset..).next() {
            assert!(
                end <= next_off,
                "[{offset}, {end}) overlaps live [{next_off}, {})",
                next_off + next_size
            );
        }
        self.live.insert(offset, size);
        self.allocated += u64::from(size);
    }

    /// Forget the allocation at `offset` and return its bounds.
    #[track_caller]
    pub fn release(&mut self, offset: u32) -> (u32, u32) {
        let size = self
            .live
            .remove(&offset)
            .unwrap_or_else(|| panic!("no live allocation at {offset}"));
        self.allocated -= u64::from(size);
        (offset, offset + size)
    }

    /// Bounds of the `n`-th live allocation in address order, wrapping.
    pub fn nth(&self, n: usize) -> Option<(u32, u32)> {
        if self.live.is_empty() {
            return None;
        }
        let (&offset, &size) = self.live.iter().nth(n % self.live.len())?;
        Some((offset, offset + size))
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Total bytes in flight.
    pub fn allocated_bytes(&self) -> u64 {
        self.allocated
    }

    /// Panic unless `allocator`'s free bytes plus the ledger's live bytes
    /// equal its capacity.
    #[track_caller]
    pub fn assert_conserved<A: RangeAllocator + ?Sized>(&self, allocator: &A) {
        assert_eq!(
            u64::from(allocator.free_capacity()) + self.allocated,
            u64::from(allocator.capacity()),
            "free {} + allocated {} != capacity {}",
            allocator.free_capacity(),
            self.allocated,
            allocator.capacity()
        );
    }
}
