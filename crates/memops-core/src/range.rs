//! Packed free-range descriptors.
//!
//! A free range `[start, end)` is stored as one `u64`: `start` in the high
//! 32 bits, `end` in the low 32 bits. Because `start` occupies the high
//! bits, plain integer ordering on descriptors is ordering by `start` with
//! `end` as the tiebreak, so a slice of descriptors can be sorted with
//! `sort_unstable()` and searched with `partition_point()`.
//!
//! All shifts operate on `u64`, so offsets above `2^31` round-trip intact.

use std::fmt;
use std::ops::Range;

const END_MASK: u64 = 0x0000_0000_FFFF_FFFF;

/// Pack `(start, end)` into a descriptor.
#[inline]
pub const fn encode(start: u32, end: u32) -> u64 {
    ((start as u64) << 32) | end as u64
}

/// High 32 bits of a descriptor.
#[inline]
pub const fn decode_start(descriptor: u64) -> u32 {
    (descriptor >> 32) as u32
}

/// Low 32 bits of a descriptor.
#[inline]
pub const fn decode_end(descriptor: u64) -> u32 {
    (descriptor & END_MASK) as u32
}

/// A half-open span `[start, end)` of free offsets in a backing buffer.
///
/// Stored as its packed descriptor, so a `Vec<FreeRange>` has the layout of
/// a `Vec<u64>` and sorts in address order.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct FreeRange(u64);

impl FreeRange {
    /// Build a range from its bounds. `start <= end` is not checked.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self(encode(start, end))
    }

    /// Wrap an existing packed descriptor.
    #[inline]
    pub const fn from_descriptor(descriptor: u64) -> Self {
        Self(descriptor)
    }

    /// The packed descriptor.
    #[inline]
    pub const fn descriptor(self) -> u64 {
        self.0
    }

    /// First free offset.
    #[inline]
    pub const fn start(self) -> u32 {
        decode_start(self.0)
    }

    /// One past the last free offset.
    #[inline]
    pub const fn end(self) -> u32 {
        decode_end(self.0)
    }

    /// Number of free bytes in the range.
    ///
    /// Saturates to zero for a malformed range with `start > end`.
    #[inline]
    pub const fn len(self) -> u32 {
        self.end().saturating_sub(self.start())
    }

    /// Whether the range covers no bytes.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Same range with `start` replaced.
    #[inline]
    pub const fn with_start(self, start: u32) -> Self {
        Self::new(start, self.end())
    }

    /// Same range with `end` replaced.
    #[inline]
    pub const fn with_end(self, end: u32) -> Self {
        Self::new(self.start(), end)
    }

    /// Whether `self` ends exactly where `next` begins.
    #[inline]
    pub const fn touches(self, next: FreeRange) -> bool {
        self.end() == next.start()
    }

    /// The bounds as a `usize` range, for slicing the backing buffer.
    #[inline]
    pub fn as_range(self) -> Range<usize> {
        self.start() as usize..self.end() as usize
    }
}

impl fmt::Debug for FreeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start(), self.end())
    }
}

impl fmt::Display for FreeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<FreeRange> for u64 {
    fn from(range: FreeRange) -> Self {
        range.0
    }
}

impl From<u64> for FreeRange {
    fn from(descriptor: u64) -> Self {
        Self(descriptor)
    }
}
