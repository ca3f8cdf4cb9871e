//! Errors reported by range allocators.
//!
//! Allocation failure is not an error: `allocate` returns `None` when no free
//! range is large enough. The only fallible operation is returning a range
//! to a free list whose storage cannot grow.

use std::error::Error;
use std::fmt;

/// Errors from releasing a range back to an allocator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FreeError {
    /// The free-range list uses fixed storage and every slot is occupied.
    ///
    /// This is a sizing mistake, not a transient condition: the list must be
    /// created with more capacity (or growable storage).
    FreeListFull {
        /// Number of descriptors the list can hold.
        capacity: usize,
    },
}

impl fmt::Display for FreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FreeListFull { capacity } => {
                write!(f, "free-range list full: fixed capacity of {capacity} ranges exhausted")
            }
        }
    }
}

impl Error for FreeError {}
