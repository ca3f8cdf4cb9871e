//! Point-in-time summary of a free-range list.

use std::fmt;

use crate::range::FreeRange;

/// Occupancy figures for one allocator, computed in a single pass over its
/// free-range list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FreeListStats {
    /// Total length of the backing buffer in bytes.
    pub capacity: u32,
    /// Sum of all free-range lengths.
    pub free_capacity: u32,
    /// Number of entries in the free-range list, including zero-length ones.
    pub free_block_count: u32,
    /// Length of the largest single free range.
    pub largest_free_range: u32,
}

impl FreeListStats {
    /// Summarise `ranges` for a buffer of `capacity` bytes.
    pub fn from_ranges(capacity: u32, ranges: &[FreeRange]) -> Self {
        let mut free_capacity = 0u32;
        let mut largest_free_range = 0u32;
        for r in ranges {
            free_capacity += r.len();
            largest_free_range = largest_free_range.max(r.len());
        }
        Self {
            capacity,
            free_capacity,
            free_block_count: ranges.len() as u32,
            largest_free_range,
        }
    }

    /// Bytes currently handed out to callers.
    pub fn allocated(&self) -> u32 {
        self.capacity - self.free_capacity
    }

    /// External fragmentation in `[0, 1]`: `1 - largest / free`.
    ///
    /// Zero when all free space is one range or when nothing is free.
    pub fn fragmentation(&self) -> f64 {
        if self.free_capacity == 0 {
            return 0.0;
        }
        1.0 - f64::from(self.largest_free_range) / f64::from(self.free_capacity)
    }
}

impl fmt::Display for FreeListStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} bytes free in {} ranges (largest {}, fragmentation {:.2})",
            self.free_capacity,
            self.capacity,
            self.free_block_count,
            self.largest_free_range,
            self.fragmentation()
        )
    }
}
