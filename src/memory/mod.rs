//! Memory backing for buffers.
//!
//! - [`MemorySegment`]: Trait for a contiguous, readable region of bytes
//! - [`HeapSegment`]: Heap-allocated segment owned by a single process
//!
//! Buffers never own bytes directly. They hold a
//! [`MemoryHandle`](crate::buffer::MemoryHandle) into a shared segment, so
//! passing a buffer downstream or cloning it never copies data.

mod heap;
mod segment;

pub use heap::HeapSegment;
pub use segment::MemorySegment;
