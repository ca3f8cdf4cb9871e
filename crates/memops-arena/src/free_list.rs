//! Storage for packed free-range descriptors.
//!
//! [`FreeRangeList`] is a `Vec<FreeRange>` with an explicit capacity
//! policy. It knows nothing about ordering or merging; the allocators own
//! those invariants and use this type only to insert, append, and remove
//! descriptors without exceeding the configured storage.

use memops_core::{FreeError, FreeRange};

use crate::config::FreeListStorage;

/// A list of free-range descriptors with growable or fixed storage.
#[derive(Clone, Debug)]
pub struct FreeRangeList {
    ranges: Vec<FreeRange>,
    storage: FreeListStorage,
}

impl FreeRangeList {
    /// Create an empty list, reserving the storage's initial slots.
    pub fn new(storage: FreeListStorage) -> Self {
        Self {
            ranges: Vec::with_capacity(storage.initial_slots()),
            storage,
        }
    }

    /// The live descriptors.
    pub fn as_slice(&self) -> &[FreeRange] {
        &self.ranges
    }

    /// The live descriptors, mutably. Length cannot change through this.
    pub fn as_mut_slice(&mut self) -> &mut [FreeRange] {
        &mut self.ranges
    }

    /// Number of live descriptors.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The storage policy.
    pub fn storage(&self) -> FreeListStorage {
        self.storage
    }

    /// Number of descriptors the list can hold before it must grow (or,
    /// for fixed storage, before it is full).
    pub fn slot_capacity(&self) -> usize {
        match self.storage {
            FreeListStorage::Growable { .. } => self.ranges.capacity(),
            FreeListStorage::Fixed { capacity } => capacity as usize,
        }
    }

    /// Append a descriptor.
    pub fn push(&mut self, range: FreeRange) -> Result<(), FreeError> {
        self.make_room()?;
        self.ranges.push(range);
        Ok(())
    }

    /// Insert a descriptor at `index`, shifting later entries right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn insert(&mut self, index: usize, range: FreeRange) -> Result<(), FreeError> {
        self.make_room()?;
        self.ranges.insert(index, range);
        Ok(())
    }

    /// Remove the descriptor at `index`, shifting later entries left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> FreeRange {
        self.ranges.remove(index)
    }

    /// Keep only the first `len` descriptors.
    pub fn truncate(&mut self, len: usize) {
        self.ranges.truncate(len);
    }

    /// Replace the contents with a single range spanning `[0, len)`, or
    /// with nothing if `len` is zero.
    pub fn reset_to_whole(&mut self, len: u32) {
        self.ranges.clear();
        if len > 0 {
            // A validated storage policy always has at least one slot.
            self.ranges.push(FreeRange::new(0, len));
        }
    }

    fn make_room(&mut self) -> Result<(), FreeError> {
        match self.storage {
            FreeListStorage::Growable { increment } => {
                if self.ranges.len() == self.ranges.capacity() {
                    self.ranges.reserve_exact(increment as usize);
                    log::trace!(
                        "free-range list grown to {} slots ({} live)",
                        self.ranges.capacity(),
                        self.ranges.len()
                    );
                }
                Ok(())
            }
            FreeListStorage::Fixed { capacity } => {
                if self.ranges.len() >= capacity as usize {
                    Err(FreeError::FreeListFull {
                        capacity: capacity as usize,
                    })
                } else {
                    Ok(())
                }
            }
        }
    }
}
