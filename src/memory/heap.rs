//! Heap-backed memory segment.

use super::MemorySegment;
use crate::error::{Error, Result};

/// A memory segment backed by a heap allocation.
///
/// # Example
///
/// ```rust
/// use md5sum::memory::{HeapSegment, MemorySegment};
///
/// let segment = HeapSegment::from_slice(b"abc");
/// assert_eq!(segment.len(), 3);
/// ```
pub struct HeapSegment {
    /// Boxed so the allocation never moves or grows.
    data: Box<[u8]>,
}

impl HeapSegment {
    /// Allocate a zero-filled segment.
    ///
    /// # Errors
    ///
    /// Returns an error if size is 0. Use [`from_vec`](Self::from_vec) with an
    /// empty vector to back an empty buffer.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::AllocationFailed(
                "size must be greater than 0".into(),
            ));
        }
        Ok(Self {
            data: vec![0u8; size].into_boxed_slice(),
        })
    }

    /// Take ownership of existing bytes.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data: data.into_boxed_slice(),
        }
    }

    /// Copy bytes into a new segment.
    pub fn from_slice(data: &[u8]) -> Self {
        Self::from_vec(data.to_vec())
    }
}

impl MemorySegment for HeapSegment {
    fn as_slice(&self) -> &[u8] {
        &self.data
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

impl std::fmt::Debug for HeapSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeapSegment")
            .field("len", &self.data.len())
            .finish()
    }
}
