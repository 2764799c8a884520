//! Buffer types for zero-copy data passing.

use crate::clock::ClockTime;
use crate::error::{Error, Result};
use crate::memory::{HeapSegment, MemorySegment};
use crate::metadata::Metadata;
use std::sync::Arc;

/// Handle to a memory region within a segment.
///
/// A handle records the length its producer *declared*. Handles built with
/// [`new`](Self::new) or [`from_segment`](Self::from_segment) are checked at
/// construction; [`declared`](Self::declared) takes the producer's word for
/// it and defers the check to [`try_as_slice`](Self::try_as_slice).
///
/// This is cheap to clone (just Arc increment + copy of offset/len).
#[derive(Clone)]
pub struct MemoryHandle {
    segment: Arc<dyn MemorySegment>,
    offset: usize,
    len: usize,
}

impl MemoryHandle {
    /// Create a handle over `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedBuffer`] if the range exceeds the segment.
    pub fn new(segment: Arc<dyn MemorySegment>, offset: usize, len: usize) -> Result<Self> {
        let handle = Self::declared(segment, offset, len);
        handle.check()?;
        Ok(handle)
    }

    /// Create a handle covering an entire segment.
    pub fn from_segment(segment: Arc<dyn MemorySegment>) -> Self {
        let len = segment.len();
        Self {
            segment,
            offset: 0,
            len,
        }
    }

    /// Create a handle whose length is asserted by an upstream producer.
    ///
    /// Nothing is validated here. Readers must go through
    /// [`try_as_slice`](Self::try_as_slice), which fails with
    /// [`Error::MalformedBuffer`] when the declared range is not readable.
    pub fn declared(segment: Arc<dyn MemorySegment>, offset: usize, len: usize) -> Self {
        Self {
            segment,
            offset,
            len,
        }
    }

    /// Declared length of this handle's data.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if this handle has zero length.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset within the segment.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes readable from `offset` to the end of the segment.
    pub fn available(&self) -> usize {
        self.segment.len().saturating_sub(self.offset)
    }

    /// The backing segment.
    pub fn segment(&self) -> &Arc<dyn MemorySegment> {
        &self.segment
    }

    /// Verify the declared range lies inside the segment.
    pub fn check(&self) -> Result<()> {
        let in_bounds = self
            .offset
            .checked_add(self.len)
            .is_some_and(|end| end <= self.segment.len());
        if in_bounds {
            Ok(())
        } else {
            Err(Error::MalformedBuffer {
                declared: self.len,
                available: self.available(),
            })
        }
    }

    /// The handle's bytes, if the declared range is readable.
    pub fn try_as_slice(&self) -> Result<&[u8]> {
        self.check()?;
        Ok(&self.segment.as_slice()[self.offset..self.offset + self.len])
    }

    /// Create a sub-handle (a view into a portion of this handle).
    ///
    /// # Panics
    ///
    /// Panics if `offset + len > self.len`.
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        assert!(offset + len <= self.len, "sub-handle exceeds parent bounds");
        Self {
            segment: Arc::clone(&self.segment),
            offset: self.offset + offset,
            len,
        }
    }
}

impl std::fmt::Debug for MemoryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryHandle")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("available", &self.available())
            .finish()
    }
}

/// A buffer containing data and metadata.
///
/// Buffers are cheap to clone - only the Arc reference count is incremented.
/// The data itself is never copied as a buffer moves through a pipeline.
///
/// # Example
///
/// ```rust
/// use md5sum::buffer::Buffer;
/// use md5sum::metadata::Metadata;
///
/// let buffer = Buffer::from_bytes(b"abc".to_vec(), Metadata::with_sequence(0));
/// assert_eq!(buffer.len(), 3);
/// assert_eq!(buffer.try_as_bytes().unwrap(), b"abc");
/// ```
#[derive(Clone)]
pub struct Buffer {
    memory: MemoryHandle,
    metadata: Metadata,
}

impl Buffer {
    /// Create a new buffer.
    pub fn new(memory: MemoryHandle, metadata: Metadata) -> Self {
        Self { memory, metadata }
    }

    /// Create a buffer backed by `data` without copying it.
    pub fn from_bytes(data: Vec<u8>, metadata: Metadata) -> Self {
        let segment: Arc<dyn MemorySegment> = Arc::new(HeapSegment::from_vec(data));
        Self::new(MemoryHandle::from_segment(segment), metadata)
    }

    /// Get a reference to the buffer's metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Get a mutable reference to the buffer's metadata.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Presentation timestamp, [`ClockTime::NONE`] if unset.
    pub fn pts(&self) -> ClockTime {
        self.metadata.pts
    }

    /// Get a reference to the memory handle.
    pub fn memory(&self) -> &MemoryHandle {
        &self.memory
    }

    /// The buffer's bytes, or [`Error::MalformedBuffer`] if its declared
    /// length is not backed by readable memory.
    pub fn try_as_bytes(&self) -> Result<&[u8]> {
        self.memory.try_as_slice()
    }

    /// Declared length of the buffer data.
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Create a sub-buffer sharing this buffer's memory and metadata.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len > self.len()`.
    pub fn slice(&self, offset: usize, len: usize) -> Buffer {
        Buffer {
            memory: self.memory.slice(offset, len),
            metadata: self.metadata.clone(),
        }
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("memory", &self.memory)
            .field("metadata", &self.metadata)
            .finish()
    }
}
