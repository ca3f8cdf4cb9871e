//! Merge-on-free allocator.
//!
//! [`EagerCoalescingAllocator`] keeps its free list sorted by start offset
//! and fully coalesced after every operation: no two entries touch or
//! overlap, and no entry is empty. Each `free` is a binary search plus at
//! most one array shift, so the list never needs a separate cleanup pass.

use std::fmt;

use memops_core::{AllocationStrategy, Block, FreeError, FreeRange, RangeAllocator};

use crate::buffer::BackingBuffer;
use crate::config::AllocatorConfig;
use crate::error::ArenaError;
use crate::free_list::FreeRangeList;
use crate::strategy::default_strategy;

/// Sub-allocator that coalesces neighbouring free ranges as soon as they
/// are released.
///
/// Because the list stays in address order, first-fit returns the lowest
/// suitable address, so allocation order is reproducible.
pub struct EagerCoalescingAllocator<B> {
    buffer: BackingBuffer<B>,
    free_ranges: FreeRangeList,
    strategy: Box<dyn AllocationStrategy>,
}

impl<B: AsRef<[u8]>> EagerCoalescingAllocator<B> {
    /// Partition `buffer` with growable free-list storage and first-fit.
    pub fn new(buffer: B) -> Result<Self, ArenaError> {
        Self::with_config(buffer, &AllocatorConfig::eager())
    }

    /// Partition `buffer` using `config`'s storage policy.
    pub fn with_config(buffer: B, config: &AllocatorConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let buffer = BackingBuffer::new(buffer)?;
        let mut free_ranges = FreeRangeList::new(config.storage);
        free_ranges.reset_to_whole(buffer.len());
        log::debug!(
            "eager allocator over {} bytes, storage {:?}",
            buffer.len(),
            config.storage
        );
        Ok(Self {
            buffer,
            free_ranges,
            strategy: default_strategy(),
        })
    }

    /// Replace the allocation policy, builder style.
    pub fn with_strategy(mut self, strategy: Box<dyn AllocationStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Name of the active allocation policy.
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// The whole backing buffer.
    pub fn data(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// The bytes covered by `block`.
    ///
    /// # Panics
    ///
    /// Panics if the block lies outside the buffer.
    pub fn block_bytes<H: Block + ?Sized>(&self, block: &H) -> &[u8] {
        self.buffer.bytes(block)
    }

    /// Give the backing buffer back, discarding all bookkeeping.
    pub fn into_inner(self) -> B {
        self.buffer.into_inner()
    }

    /// Drop the descriptor the last allocation exhausted, if any.
    ///
    /// Every policy carves from the low end, so the touched entry now starts
    /// at `new_start`; the list is still sorted, so binary search finds it.
    fn prune_exhausted(&mut self, new_start: u32) {
        let ranges = self.free_ranges.as_slice();
        if let Ok(i) = ranges.binary_search_by_key(&new_start, |r| r.start()) {
            if ranges[i].is_empty() {
                self.free_ranges.remove(i);
            }
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> EagerCoalescingAllocator<B> {
    /// The whole backing buffer, mutably.
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.buffer.as_mut_slice()
    }

    /// The bytes covered by `block`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the block lies outside the buffer.
    pub fn block_bytes_mut<H: Block + ?Sized>(&mut self, block: &H) -> &mut [u8] {
        self.buffer.bytes_mut(block)
    }
}

impl<B: AsRef<[u8]>> RangeAllocator for EagerCoalescingAllocator<B> {
    fn allocate(&mut self, block_size: u32) -> Option<u32> {
        if block_size == 0 {
            return None;
        }
        let offset = self
            .strategy
            .try_allocate(block_size, self.free_ranges.as_mut_slice())?;
        self.prune_exhausted(offset + block_size);
        Some(offset)
    }

    fn free(&mut self, start: u32, end: u32) {
        if let Err(e) = self.try_free(start, end) {
            log::error!("eager allocator cannot take back [{start}, {end}): {e}");
            panic!("{e}");
        }
    }

    fn try_free(&mut self, start: u32, end: u32) -> Result<(), FreeError> {
        debug_assert!(
            start < end && end <= self.buffer.len(),
            "freed range [{start}, {end}) outside buffer of {} bytes",
            self.buffer.len()
        );
        let freed = FreeRange::new(start, end);
        let ranges = self.free_ranges.as_mut_slice();

        // First entry whose descriptor sorts after the freed one.
        let i = ranges.partition_point(|r| *r <= freed);
        let merge_prev = i > 0 && ranges[i - 1].end() == start;
        let merge_next = i < ranges.len() && ranges[i].start() == end;

        match (merge_prev, merge_next) {
            (true, true) => {
                ranges[i - 1] = ranges[i - 1].with_end(ranges[i].end());
                self.free_ranges.remove(i);
            }
            (true, false) => ranges[i - 1] = ranges[i - 1].with_end(end),
            (false, true) => ranges[i] = ranges[i].with_start(start),
            (false, false) => self.free_ranges.insert(i, freed)?,
        }
        Ok(())
    }

    fn capacity(&self) -> u32 {
        self.buffer.len()
    }

    fn free_ranges(&self) -> &[FreeRange] {
        self.free_ranges.as_slice()
    }

    fn set_allocation_strategy(&mut self, strategy: Box<dyn AllocationStrategy>) {
        log::debug!(
            "eager allocator strategy {} -> {}",
            self.strategy.name(),
            strategy.name()
        );
        self.strategy = strategy;
    }

    fn reset(&mut self) {
        self.free_ranges.reset_to_whole(self.buffer.len());
    }
}

impl<B> fmt::Debug for EagerCoalescingAllocator<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EagerCoalescingAllocator")
            .field("free_ranges", &self.free_ranges.as_slice())
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}
