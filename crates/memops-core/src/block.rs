//! Block handles.
//!
//! A [`Block`] is whatever object a caller uses to remember an allocated
//! range. The allocators only ever read its bounds on release and write
//! them on acquire; everything else about the handle belongs to the caller.

use std::fmt;
use std::ops::Range;

/// An object that carries the bounds of one allocated range.
pub trait Block {
    /// The `(start, end)` offsets of the range this handle covers.
    fn bounds(&self) -> (u32, u32);

    /// Point this handle at `[start, end)`.
    fn assign(&mut self, start: u32, end: u32);
}

/// Default handle: just the bounds of one allocated range.
///
/// `MemoryBlock::default()` covers no bytes and is the state pooled handles
/// are returned in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MemoryBlock {
    start: u32,
    end: u32,
}

impl MemoryBlock {
    /// Create a handle covering `[start, end)`.
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "block start {start} past end {end}");
        Self { start, end }
    }

    /// Offset of the first byte.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Offset one past the last byte.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of bytes covered.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the handle covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The bounds as a `usize` range, for slicing the backing buffer.
    pub fn as_range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl Block for MemoryBlock {
    fn bounds(&self) -> (u32, u32) {
        (self.start, self.end)
    }

    fn assign(&mut self, start: u32, end: u32) {
        debug_assert!(start <= end, "block start {start} past end {end}");
        self.start = start;
        self.end = end;
    }
}

impl fmt::Display for MemoryBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryBlock([{}, {}), len={})", self.start, self.end, self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_block_reports_bounds() {
        let b = MemoryBlock::new(16, 48);
        assert_eq!(b.bounds(), (16, 48));
        assert_eq!(b.len(), 32);
        assert_eq!(b.as_range(), 16..48);
        assert!(!b.is_empty());
    }

    #[test]
    fn default_block_is_empty() {
        let b = MemoryBlock::default();
        assert!(b.is_empty());
        assert_eq!(b.bounds(), (0, 0));
    }

    #[test]
    fn assign_repoints_handle() {
        let mut b = MemoryBlock::new(0, 8);
        b.assign(100, 164);
        assert_eq!(b.start(), 100);
        assert_eq!(b.end(), 164);
        assert_eq!(b.len(), 64);
    }

    #[test]
    fn display_includes_length() {
        assert_eq!(
            MemoryBlock::new(4, 10).to_string(),
            "MemoryBlock([4, 10), len=6)"
        );
    }
}
