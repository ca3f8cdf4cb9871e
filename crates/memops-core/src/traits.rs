//! Core abstraction traits for range allocation.

use std::fmt;

use crate::block::Block;
use crate::error::FreeError;
use crate::range::FreeRange;
use crate::stats::FreeListStats;

/// Policy that picks which free range satisfies a request.
///
/// Implementations scan `free_ranges` (in whatever order the owning
/// allocator keeps it, not assumed sorted), carve `block_size` bytes from
/// the low end of the chosen range by rewriting that one descriptor in
/// place, and return the range's original `start`.
///
/// A range that is consumed exactly is left behind as a zero-length entry;
/// it is up to the owning allocator whether to prune it.
pub trait AllocationStrategy: fmt::Debug + Send {
    /// Short policy name, used in logs.
    fn name(&self) -> &'static str;

    /// Carve `block_size` bytes out of one entry of `free_ranges`.
    ///
    /// Returns the offset of the carved block, or `None` if no entry is
    /// large enough. `block_size` is always non-zero. No entry other than
    /// the chosen one may be modified.
    fn try_allocate(&self, block_size: u32, free_ranges: &mut [FreeRange]) -> Option<u32>;
}

/// A sub-allocator over one fixed-length backing buffer.
///
/// Offsets are byte positions in `[0, capacity())`. The allocator does not
/// remember what it handed out: releasing a range the caller does not own,
/// or releasing the same range twice, corrupts the free list. That contract
/// is the caller's to keep.
pub trait RangeAllocator {
    /// Reserve `block_size` bytes and return their offset.
    ///
    /// `None` when `block_size` is zero or no free range is large enough.
    fn allocate(&mut self, block_size: u32) -> Option<u32>;

    /// Return `[start, end)` to the free pool.
    ///
    /// # Panics
    ///
    /// Panics if the free-range list has fixed storage and is full. Use
    /// [`try_free`](RangeAllocator::try_free) to observe that condition.
    fn free(&mut self, start: u32, end: u32);

    /// Return `[start, end)` to the free pool, reporting a full free list
    /// instead of panicking.
    fn try_free(&mut self, start: u32, end: u32) -> Result<(), FreeError>;

    /// Return the range described by a handle.
    fn free_block<H: Block + ?Sized>(&mut self, block: &H)
    where
        Self: Sized,
    {
        let (start, end) = block.bounds();
        self.free(start, end);
    }

    /// Total length of the backing buffer in bytes.
    fn capacity(&self) -> u32;

    /// The live entries of the free-range list, in list order.
    fn free_ranges(&self) -> &[FreeRange];

    /// Sum of the lengths of all free ranges.
    fn free_capacity(&self) -> u32 {
        self.free_ranges().iter().map(|r| r.len()).sum()
    }

    /// Number of entries in the free-range list.
    fn free_block_count(&self) -> u32 {
        self.free_ranges().len() as u32
    }

    /// Length of the largest free range, i.e. the largest request that can
    /// currently succeed.
    fn largest_free_range(&self) -> u32 {
        self.free_ranges().iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Occupancy summary of the free list.
    fn stats(&self) -> FreeListStats {
        FreeListStats::from_ranges(self.capacity(), self.free_ranges())
    }

    /// Replace the allocation policy.
    fn set_allocation_strategy(&mut self, strategy: Box<dyn AllocationStrategy>);

    /// Forget every allocation: the free list becomes one range spanning the
    /// whole buffer.
    fn reset(&mut self);
}
