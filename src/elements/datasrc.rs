//! DataSrc element: buffers from in-memory bytes.

use crate::buffer::{Buffer, MemoryHandle};
use crate::clock::ClockTime;
use crate::element::Source;
use crate::error::Result;
use crate::memory::{HeapSegment, MemorySegment};
use crate::metadata::Metadata;
use std::sync::Arc;

/// A source that emits a fixed byte string, optionally split into chunks.
///
/// All chunks are views into one shared segment, so no data is copied after
/// construction. Empty data produces a single empty buffer.
///
/// # Example
///
/// ```rust
/// use md5sum::element::Source;
/// use md5sum::elements::DataSrc;
///
/// let mut src = DataSrc::new(b"hello world".to_vec()).with_chunk_size(5);
///
/// assert_eq!(src.produce().unwrap().unwrap().try_as_bytes().unwrap(), b"hello");
/// assert_eq!(src.produce().unwrap().unwrap().try_as_bytes().unwrap(), b" worl");
/// assert_eq!(src.produce().unwrap().unwrap().try_as_bytes().unwrap(), b"d");
/// assert!(src.produce().unwrap().is_none());
/// ```
pub struct DataSrc {
    name: String,
    segment: Arc<dyn MemorySegment>,
    chunk_size: Option<usize>,
    pts_interval: Option<ClockTime>,
    position: usize,
    sequence: u64,
    done: bool,
}

impl DataSrc {
    /// Create a source that emits `data` as a single buffer.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            name: "datasrc".to_string(),
            segment: Arc::new(HeapSegment::from_vec(data)),
            chunk_size: None,
            pts_interval: None,
            position: 0,
            sequence: 0,
            done: false,
        }
    }

    /// Set a custom name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Split the data into buffers of at most `size` bytes.
    ///
    /// A size of zero means "no splitting".
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = (size > 0).then_some(size);
        self
    }

    /// Stamp buffers with PTS `0, interval, 2 * interval, ...` and a duration
    /// of `interval`.
    pub fn with_pts_interval(mut self, interval: ClockTime) -> Self {
        self.pts_interval = Some(interval);
        self
    }

    /// Total number of bytes this source emits.
    pub fn total_len(&self) -> usize {
        self.segment.len()
    }

    /// Bytes not yet emitted.
    pub fn remaining(&self) -> usize {
        self.segment.len() - self.position
    }
}

impl Source for DataSrc {
    fn produce(&mut self) -> Result<Option<Buffer>> {
        if self.done {
            return Ok(None);
        }

        let total = self.segment.len();
        let len = match self.chunk_size {
            Some(chunk) => chunk.min(total - self.position),
            None => total - self.position,
        };

        let handle = MemoryHandle::new(Arc::clone(&self.segment), self.position, len)?;
        let mut metadata = Metadata::with_sequence(self.sequence).with_offset(self.position as u64);
        if let Some(interval) = self.pts_interval {
            let pts = ClockTime::from_nanos(interval.nanos().saturating_mul(self.sequence));
            metadata = metadata.with_pts(pts).with_duration(interval);
        }

        self.position += len;
        self.sequence += 1;
        self.done = self.position >= total;

        Ok(Some(Buffer::new(handle, metadata)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
