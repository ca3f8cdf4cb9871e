//! Append-on-free allocator with batch defragmentation.
//!
//! [`LazyDefragAllocator`] makes `free` an O(1) append and pays for it
//! later: the free list is an unsorted log that is sorted and coalesced in
//! one pass by [`defragment`](LazyDefragAllocator::defragment), either on
//! request or automatically once the list reaches the configured threshold.
//!
//! Between passes the list may contain neighbouring entries that have not
//! been merged and zero-length entries left by exact-fit allocations, so
//! first-fit returns the first suitable range in release order rather than
//! the lowest address. Zero-length entries never satisfy a request and are
//! folded into a neighbour, or kept as-is if isolated, by the next pass.
//!
//! The allocator also hands out and takes back block handles, keeping a
//! bounded pool of released ones so steady-state acquire/release cycles do
//! not construct new handles.

use std::fmt;

use memops_core::{AllocationStrategy, Block, FreeError, FreeRange, MemoryBlock, RangeAllocator};

use crate::buffer::BackingBuffer;
use crate::config::{check_threshold, AllocatorConfig, ConfigError, FreeListStorage};
use crate::error::ArenaError;
use crate::free_list::FreeRangeList;
use crate::pool::{BlockFactory, BlockPool};
use crate::strategy::default_strategy;

/// Sub-allocator that appends released ranges and coalesces them in
/// batches.
///
/// Defaults to a fixed-capacity free list sized by the caller; if the list
/// fills up between defragmentation passes, `free` panics (see
/// [`RangeAllocator::free`]).
pub struct LazyDefragAllocator<B, H = MemoryBlock> {
    buffer: BackingBuffer<B>,
    free_ranges: FreeRangeList,
    strategy: Box<dyn AllocationStrategy>,
    defrag_threshold: u32,
    next_defrag_at: usize,
    defrag_passes: u64,
    pool: BlockPool<H>,
    factory: Box<dyn BlockFactory<H> + Send>,
}

impl<B: AsRef<[u8]>> LazyDefragAllocator<B, MemoryBlock> {
    /// Partition `buffer` with a fixed free list of `free_range_capacity`
    /// descriptors and default settings otherwise.
    pub fn new(buffer: B, free_range_capacity: u32) -> Result<Self, ArenaError> {
        Self::with_config(buffer, &AllocatorConfig::lazy(free_range_capacity))
    }

    /// Partition `buffer` according to `config`, handing out
    /// [`MemoryBlock`] handles.
    pub fn with_config(buffer: B, config: &AllocatorConfig) -> Result<Self, ArenaError> {
        Self::with_factory(buffer, config, MemoryBlock::default)
    }
}

impl<B: AsRef<[u8]>, H: Block> LazyDefragAllocator<B, H> {
    /// Partition `buffer` according to `config`, creating handles with
    /// `factory` whenever the pool is empty.
    pub fn with_factory<F>(
        buffer: B,
        config: &AllocatorConfig,
        factory: F,
    ) -> Result<Self, ArenaError>
    where
        F: BlockFactory<H> + Send + 'static,
    {
        config.validate_lazy()?;
        let buffer = BackingBuffer::new(buffer)?;
        let mut free_ranges = FreeRangeList::new(config.storage);
        free_ranges.reset_to_whole(buffer.len());
        log::debug!(
            "lazy allocator over {} bytes, storage {:?}, defrag threshold {}",
            buffer.len(),
            config.storage,
            config.defrag_threshold
        );
        let mut allocator = Self {
            buffer,
            free_ranges,
            strategy: default_strategy(),
            defrag_threshold: config.defrag_threshold,
            next_defrag_at: 0,
            defrag_passes: 0,
            pool: BlockPool::new(config.block_pool_capacity as usize),
            factory: Box::new(factory),
        };
        allocator.schedule_next_pass();
        Ok(allocator)
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

    /// Sort the free list by address and merge every run of touching ranges.
    ///
    /// Afterwards the list is sorted by start and no two entries touch. An
    /// isolated zero-length entry is kept. O(n log n) for the sort plus one
    /// linear sweep.
    pub fn defragment(&mut self) {
        let before = self.free_ranges.len();
        let ranges = self.free_ranges.as_mut_slice();
        ranges.sort_unstable();

        let mut write = 0;
        let mut read = 0;
        while read < ranges.len() {
            let mut merged = ranges[read];
            read += 1;
            while read < ranges.len() && merged.touches(ranges[read]) {
                merged = merged.with_end(ranges[read].end());
                read += 1;
            }
            ranges[write] = merged;
            write += 1;
        }
        self.free_ranges.truncate(write);
        self.defrag_passes += 1;
        self.schedule_next_pass();
        log::debug!("defragmented free list: {before} -> {write} ranges");
    }

    /// Number of defragmentation passes run so far, manual or automatic.
    pub fn defrag_passes(&self) -> u64 {
        self.defrag_passes
    }

    /// Configured threshold; see [`next_defrag_at`](Self::next_defrag_at).
    pub fn defrag_threshold(&self) -> u32 {
        self.defrag_threshold
    }

    /// Change the automatic defragmentation threshold.
    ///
    /// Rejected under the same rules as [`AllocatorConfig::validate_lazy`].
    pub fn set_defrag_threshold(&mut self, threshold: u32) -> Result<(), ConfigError> {
        check_threshold(threshold, self.free_ranges.storage())?;
        self.defrag_threshold = threshold;
        self.schedule_next_pass();
        Ok(())
    }

    /// Free-list length at which the next automatic pass runs.
    pub fn next_defrag_at(&self) -> usize {
        self.next_defrag_at
    }

    /// Number of descriptors the free list can hold right now.
    pub fn free_range_capacity(&self) -> usize {
        self.free_ranges.slot_capacity()
    }

    /// Allocate `block_size` bytes and return a handle pointing at them.
    ///
    /// The handle comes from the pool when one is available, from the
    /// factory otherwise. `None` if the allocation fails; no handle is
    /// consumed in that case.
    pub fn acquire(&mut self, block_size: u32) -> Option<H> {
        let offset = self.allocate(block_size)?;
        let mut block = match self.pool.take() {
            Some(block) => block,
            None => {
                log::trace!("block pool empty, creating handle");
                self.factory.create_block()
            }
        };
        block.assign(offset, offset + block_size);
        Some(block)
    }

    /// Take back a handle and the range it points at.
    ///
    /// The handle is kept for reuse if the pool has room, dropped otherwise;
    /// its bounds are then appended to the free list.
    ///
    /// # Panics
    ///
    /// Panics if the free list is fixed and full; see
    /// [`try_release`](Self::try_release).
    pub fn release(&mut self, block: H) {
        let (start, end) = block.bounds();
        self.recycle(block);
        self.free(start, end);
    }

    /// Like [`release`](Self::release), reporting a full free list instead of
    /// panicking. The handle is recycled either way.
    pub fn try_release(&mut self, block: H) -> Result<(), FreeError> {
        let (start, end) = block.bounds();
        self.recycle(block);
        self.try_free(start, end)
    }

    /// Number of released handles waiting for reuse.
    pub fn pooled_blocks(&self) -> usize {
        self.pool.len()
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
    pub fn block_bytes<K: Block + ?Sized>(&self, block: &K) -> &[u8] {
        self.buffer.bytes(block)
    }

    /// Give the backing buffer back, discarding all bookkeeping.
    pub fn into_inner(self) -> B {
        self.buffer.into_inner()
    }

    /// Place the next trigger.
    ///
    /// A list shorter than the threshold is passed again when it reaches
    /// the threshold. A list still at or above it after a pass (every entry
    /// isolated) is passed again after `threshold` more appends instead of
    /// on every free. Fixed storage clamps the trigger to its capacity.
    fn schedule_next_pass(&mut self) {
        let len = self.free_ranges.len();
        let threshold = self.defrag_threshold as usize;
        let mut at = if len < threshold {
            threshold
        } else {
            len + threshold
        };
        if let FreeListStorage::Fixed { capacity } = self.free_ranges.storage() {
            at = at.min(capacity as usize);
        }
        self.next_defrag_at = at;
    }

    fn recycle(&mut self, mut block: H) {
        block.assign(0, 0);
        if !self.pool.try_recycle(block) {
            log::trace!("block pool full ({}), dropping handle", self.pool.capacity());
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>, H: Block> LazyDefragAllocator<B, H> {
    /// The whole backing buffer, mutably.
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.buffer.as_mut_slice()
    }

    /// The bytes covered by `block`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the block lies outside the buffer.
    pub fn block_bytes_mut<K: Block + ?Sized>(&mut self, block: &K) -> &mut [u8] {
        self.buffer.bytes_mut(block)
    }
}

impl<B: AsRef<[u8]>, H: Block> RangeAllocator for LazyDefragAllocator<B, H> {
    fn allocate(&mut self, block_size: u32) -> Option<u32> {
        if block_size == 0 {
            return None;
        }
        self.strategy
            .try_allocate(block_size, self.free_ranges.as_mut_slice())
    }

    fn free(&mut self, start: u32, end: u32) {
        if let Err(e) = self.try_free(start, end) {
            log::error!(
                "lazy allocator cannot take back [{start}, {end}): {e}; \
                 size the free list for at least the defrag threshold"
            );
            panic!("{e}");
        }
    }

    fn try_free(&mut self, start: u32, end: u32) -> Result<(), FreeError> {
        debug_assert!(
            start < end && end <= self.buffer.len(),
            "freed range [{start}, {end}) outside buffer of {} bytes",
            self.buffer.len()
        );
        self.free_ranges.push(FreeRange::new(start, end))?;
        if self.free_ranges.len() >= self.next_defrag_at {
            log::debug!(
                "free list reached {} ranges (threshold {}), defragmenting",
                self.next_defrag_at,
                self.defrag_threshold
            );
            self.defragment();
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
            "lazy allocator strategy {} -> {}",
            self.strategy.name(),
            strategy.name()
        );
        self.strategy = strategy;
    }

    fn reset(&mut self) {
        self.free_ranges.reset_to_whole(self.buffer.len());
        self.pool.clear();
        self.schedule_next_pass();
    }
}

impl<B, H> fmt::Debug for LazyDefragAllocator<B, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyDefragAllocator")
            .field("free_ranges", &self.free_ranges.len())
            .field("defrag_threshold", &self.defrag_threshold)
            .field("next_defrag_at", &self.next_defrag_at)
            .field("defrag_passes", &self.defrag_passes)
            .field("pooled_blocks", &self.pool.len())
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}
