//! Core types and traits for the memops arena allocators.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! packed free-range descriptor, the block handle abstraction, and the
//! [`RangeAllocator`] / [`AllocationStrategy`] traits that the concrete
//! allocators in `memops-arena` implement.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod error;
pub mod range;
pub mod stats;
pub mod traits;

pub use block::{Block, MemoryBlock};
pub use error::FreeError;
pub use range::{decode_end, decode_start, encode, FreeRange};
pub use stats::FreeListStats;
pub use traits::{AllocationStrategy, RangeAllocator};
