//! Reusable strategy and handle fixtures.
//!
//! - [`CountingStrategy`]: wraps another policy and counts calls.
//! - [`LastFit`]: picks the last range that fits, to exercise callers that
//!   assume nothing about which entry a policy chooses.
//! - [`TrackedBlock`]: a handle that counts how often it has been assigned.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use memops_core::{AllocationStrategy, Block, FreeRange};

/// Delegates to `inner` and counts every `try_allocate` call.
///
/// The counter is shared, so a test can keep a handle to it after boxing
/// the strategy into an allocator.
#[derive(Debug)]
pub struct CountingStrategy {
    inner: Box<dyn AllocationStrategy>,
    calls: Arc<AtomicUsize>,
}

impl CountingStrategy {
    pub fn new(inner: Box<dyn AllocationStrategy>) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared call counter.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl AllocationStrategy for CountingStrategy {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn try_allocate(&self, block_size: u32, free_ranges: &mut [FreeRange]) -> Option<u32> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.try_allocate(block_size, free_ranges)
    }
}

/// Carves from the last range in list order that fits.
#[derive(Clone, Copy, Debug, Default)]
pub struct LastFit;

impl AllocationStrategy for LastFit {
    fn name(&self) -> &'static str {
        "last-fit"
    }

    fn try_allocate(&self, block_size: u32, free_ranges: &mut [FreeRange]) -> Option<u32> {
        let range = free_ranges.iter_mut().rev().find(|r| r.len() >= block_size)?;
        let offset = range.start();
        *range = range.with_start(offset + block_size);
        Some(offset)
    }
}

/// Handle that records how many times it has been (re)assigned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackedBlock {
    pub start: u32,
    pub end: u32,
    pub assignments: u32,
}

impl Block for TrackedBlock {
    fn bounds(&self) -> (u32, u32) {
        (self.start, self.end)
    }

    fn assign(&mut self, start: u32, end: u32) {
        self.start = start;
        self.end = end;
        self.assignments += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_strategy_counts_and_delegates() {
        let s = CountingStrategy::new(Box::new(LastFit));
        let calls = s.calls();
        let mut ranges = vec![FreeRange::new(0, 10), FreeRange::new(20, 30)];
        assert_eq!(s.try_allocate(5, &mut ranges), Some(20));
        assert_eq!(s.try_allocate(50, &mut ranges), None);
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn tracked_block_counts_assignments() {
        let mut b = TrackedBlock::default();
        b.assign(1, 2);
        b.assign(3, 4);
        assert_eq!(b.bounds(), (3, 4));
        assert_eq!(b.assignments, 2);
    }
}
