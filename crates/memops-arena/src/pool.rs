//! Reuse of released block handles.
//!
//! [`BlockPool`] is a bounded stack: released handles are pushed while there
//! is room and popped on the next acquire. When it is empty the owning
//! allocator asks its [`BlockFactory`] for a fresh handle.

/// Source of new handles when the pool is empty.
///
/// Any `FnMut() -> H` closure is a factory, so `MemoryBlock::default` works
/// directly.
pub trait BlockFactory<H> {
    /// Build a new, unassigned handle.
    fn create_block(&mut self) -> H;
}

impl<H, F> BlockFactory<H> for F
where
    F: FnMut() -> H,
{
    fn create_block(&mut self) -> H {
        self()
    }
}

/// Fixed-capacity stack of handles waiting to be reused.
#[derive(Debug)]
pub struct BlockPool<H> {
    blocks: Vec<H>,
    capacity: usize,
}

impl<H> BlockPool<H> {
    /// Create an empty pool that keeps at most `capacity` handles.
    ///
    /// Storage is allocated as handles arrive, not up front.
    pub fn new(capacity: usize) -> Self {
        Self {
            blocks: Vec::new(),
            capacity,
        }
    }

    /// Keep `block` for reuse if there is room.
    ///
    /// Returns `false` (and drops the handle) when the pool is full.
    pub fn try_recycle(&mut self, block: H) -> bool {
        if self.blocks.len() >= self.capacity {
            return false;
        }
        self.blocks.push(block);
        true
    }

    /// Pop the most recently recycled handle.
    pub fn take(&mut self) -> Option<H> {
        self.blocks.pop()
    }

    /// Number of handles waiting for reuse.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no handles are waiting.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Maximum number of handles kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every pooled handle.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}
