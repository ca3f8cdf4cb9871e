//! memops: sub-allocators that carve one pre-allocated byte buffer into
//! variable-size blocks addressed by `u32` offsets.
//!
//! This is the facade crate that re-exports the public API of the memops
//! sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use memops::prelude::*;
//!
//! // Eager: the free list is merged on every free.
//! let mut eager = EagerCoalescingAllocator::new(vec![0u8; 100]).unwrap();
//! let a = eager.allocate(30).unwrap();
//! let b = eager.allocate(20).unwrap();
//! eager.free(a, a + 30);
//! eager.free(b, b + 20);
//! assert_eq!(eager.free_ranges(), &[FreeRange::new(0, 100)]);
//!
//! // Lazy: frees are appended and merged in batches.
//! let mut lazy = LazyDefragAllocator::new(vec![0u8; 100], 16).unwrap();
//! let block = lazy.acquire(30).unwrap();
//! lazy.block_bytes_mut(&block).fill(0xAB);
//! lazy.release(block);
//! lazy.defragment();
//! assert_eq!(lazy.free_ranges(), &[FreeRange::new(0, 100)]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `memops-core` | Range descriptors, block handles, core traits |
//! | [`arena`] | `memops-arena` | The two allocators, policies, configuration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Free-range descriptors, block handles, and the allocator traits
/// (`memops-core`).
pub use memops_core as types;

/// Allocators, allocation policies, and configuration (`memops-arena`).
///
/// [`arena::EagerCoalescingAllocator`] keeps its free list merged at all
/// times; [`arena::LazyDefragAllocator`] defers merging to
/// [`defragment`](arena::LazyDefragAllocator::defragment).
pub use memops_arena as arena;

/// Common imports for typical memops usage.
///
/// ```rust
/// use memops::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use memops_core::{
        AllocationStrategy, Block, FreeError, FreeListStats, FreeRange, MemoryBlock,
        RangeAllocator,
    };

    // Allocators
    pub use memops_arena::{
        AllocatorConfig, ArenaError, BestFit, EagerCoalescingAllocator, FirstFit,
        FreeListStorage, LazyDefragAllocator, WorstFit,
    };
}
