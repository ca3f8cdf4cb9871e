//! Message buffer pool example.
//!
//! Demonstrates: lazy allocator over one buffer → acquire handles → write
//! payloads → release in arrival order → automatic and manual
//! defragmentation → stats.
//!
//! Run with `RUST_LOG=memops_arena=debug` to see the defragmentation passes.

use memops_arena::{AllocatorConfig, LazyDefragAllocator};
use memops_core::{MemoryBlock, RangeAllocator};

fn main() {
    env_logger::init();
    println!("=== memops message pool ===\n");

    let config = AllocatorConfig {
        defrag_threshold: 32,
        block_pool_capacity: 64,
        ..AllocatorConfig::lazy(128)
    };
    let mut pool = LazyDefragAllocator::with_config(vec![0u8; 64 * 1024], &config)
        .expect("valid pool config");

    let mut in_flight: Vec<MemoryBlock> = Vec::new();
    for round in 0..10u32 {
        // A burst of inbound messages.
        for seq in 0..24u32 {
            let payload = format!("round {round} message {seq}");
            let len = payload.len() as u32;
            let Some(block) = pool.acquire(len) else {
                log::warn!("pool exhausted at round {round}, message {seq}");
                break;
            };
            pool.block_bytes_mut(&block)
                .copy_from_slice(payload.as_bytes());
            in_flight.push(block);
        }

        // Oldest messages are consumed first.
        let consumed = in_flight.len() / 2;
        for block in in_flight.drain(..consumed) {
            let text = String::from_utf8_lossy(pool.block_bytes(&block)).into_owned();
            log::debug!("consumed {text:?} at {block}");
            pool.release(block);
        }

        println!("  round {round:2}: {}", pool.stats());
    }

    println!("\nDraining {} in-flight messages", in_flight.len());
    for block in in_flight.drain(..) {
        pool.release(block);
    }
    pool.defragment();

    println!("  final:    {}", pool.stats());
    println!("  defragmentation passes: {}", pool.defrag_passes());
    println!("  pooled handles: {}", pool.pooled_blocks());
    assert_eq!(pool.largest_free_range(), pool.capacity());
}
