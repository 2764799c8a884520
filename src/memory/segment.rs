//! Memory segment trait.

/// A contiguous region of readable memory.
///
/// Segments are shared between buffers through `Arc<dyn MemorySegment>`;
/// their contents must not change while any handle refers to them.
pub trait MemorySegment: Send + Sync {
    /// The segment's bytes.
    fn as_slice(&self) -> &[u8];

    /// Total size of the segment in bytes.
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns true if the segment has zero length.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MemorySegment for Vec<u8> {
    fn as_slice(&self) -> &[u8] {
        self
    }
}

impl MemorySegment for &'static [u8] {
    fn as_slice(&self) -> &[u8] {
        self
    }
}
