//! Sub-allocators that partition one pre-allocated byte buffer.
//!
//! Both allocators track free space as a list of packed
//! [`FreeRange`](memops_core::FreeRange) descriptors and hand out plain
//! `u32` offsets. They differ in when free ranges are coalesced:
//!
//! ```text
//! EagerCoalescingAllocator
//! └── free list: sorted + merged after every free (binary search, one shift)
//!
//! LazyDefragAllocator
//! ├── free list: append log, sorted + merged by defragment()
//! ├── defragment() on request or when the list reaches the threshold
//! └── BlockPool: bounded stack of released handles for acquire()/release()
//! ```
//!
//! The choice of range within the list is delegated to an
//! [`AllocationStrategy`](memops_core::AllocationStrategy): [`FirstFit`]
//! by default, [`BestFit`] and [`WorstFit`] on request.
//!
//! # Threading
//!
//! Nothing here locks. An allocator is `Send` when its buffer and handle
//! types are, so it can be handed to a worker, but shared use needs an
//! external mutex.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod eager;
pub mod error;
pub mod free_list;
pub mod lazy;
pub mod pool;
pub mod strategy;

// Public re-exports for the primary API surface.
pub use buffer::BackingBuffer;
pub use config::{AllocatorConfig, ConfigError, FreeListStorage};
pub use eager::EagerCoalescingAllocator;
pub use error::ArenaError;
pub use free_list::FreeRangeList;
pub use lazy::LazyDefragAllocator;
pub use pool::{BlockFactory, BlockPool};
pub use strategy::{BestFit, FirstFit, WorstFit};
