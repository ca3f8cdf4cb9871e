//! The byte buffer an allocator partitions.
//!
//! [`BackingBuffer`] owns the caller's storage (`Vec<u8>`, `Box<[u8]>`,
//! `&mut [u8]`, ...) and fixes its length at construction. The allocators
//! only compute offsets into it; these accessors turn a block handle back
//! into bytes.

use memops_core::Block;

use crate::error::ArenaError;

/// A fixed-length byte buffer addressed by `u32` offsets.
#[derive(Debug)]
pub struct BackingBuffer<B> {
    data: B,
    len: u32,
}

impl<B: AsRef<[u8]>> BackingBuffer<B> {
    /// Wrap `data`.
    ///
    /// Fails with [`ArenaError::BufferTooLarge`] if the buffer is longer than
    /// `u32::MAX` bytes, since range endpoints are stored in 32 bits.
    pub fn new(data: B) -> Result<Self, ArenaError> {
        let len = data.as_ref().len();
        let len = u32::try_from(len).map_err(|_| ArenaError::BufferTooLarge {
            len,
            max: u32::MAX as usize,
        })?;
        Ok(Self { data, len })
    }

    /// Length in bytes.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether the buffer has no bytes to hand out.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The whole buffer.
    pub fn as_slice(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// The bytes covered by `block`.
    ///
    /// # Panics
    ///
    /// Panics if the block's bounds fall outside the buffer.
    pub fn bytes<H: Block + ?Sized>(&self, block: &H) -> &[u8] {
        let (start, end) = block.bounds();
        &self.data.as_ref()[start as usize..end as usize]
    }

    /// Give the storage back to the caller.
    pub fn into_inner(self) -> B {
        self.data
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> BackingBuffer<B> {
    /// The whole buffer, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        self.data.as_mut()
    }

    /// The bytes covered by `block`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the block's bounds fall outside the buffer.
    pub fn bytes_mut<H: Block + ?Sized>(&mut self, block: &H) -> &mut [u8] {
        let (start, end) = block.bounds();
        &mut self.data.as_mut()[start as usize..end as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memops_core::MemoryBlock;

    #[test]
    fn length_is_captured_at_construction() {
        let buf = BackingBuffer::new(vec![0u8; 256]).unwrap();
        assert_eq!(buf.len(), 256);
        assert!(!buf.is_empty());
    }

    #[test]
    fn empty_buffer_is_allowed() {
        let buf = BackingBuffer::new(Vec::<u8>::new()).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn block_bytes_read_back_writes() {
        let mut buf = BackingBuffer::new(vec![0u8; 32]).unwrap();
        let block = MemoryBlock::new(8, 12);
        buf.bytes_mut(&block).copy_from_slice(b"ping");
        assert_eq!(buf.bytes(&block), b"ping");
        assert_eq!(&buf.as_slice()[8..12], b"ping");
    }

    #[test]
    fn borrowed_storage_is_written_through() {
        let mut storage = [0u8; 16];
        {
            let mut buf = BackingBuffer::new(&mut storage[..]).unwrap();
            buf.bytes_mut(&MemoryBlock::new(0, 2)).fill(0xAB);
        }
        assert_eq!(&storage[..3], &[0xAB, 0xAB, 0]);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_block_panics() {
        let buf = BackingBuffer::new(vec![0u8; 4]).unwrap();
        let _ = buf.bytes(&MemoryBlock::new(2, 8));
    }
}
