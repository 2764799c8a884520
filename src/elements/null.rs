//! NullSink element.

use crate::buffer::Buffer;
use crate::element::Sink;
use crate::error::Result;

/// A sink that discards all buffers.
///
/// This is useful for:
/// - Benchmarking digest throughput
/// - Running an `md5sum` stage only for its log output
///
/// # Example
///
/// ```rust
/// use md5sum::buffer::Buffer;
/// use md5sum::element::Sink;
/// use md5sum::elements::NullSink;
/// use md5sum::metadata::Metadata;
///
/// let mut sink = NullSink::new();
/// sink.consume(Buffer::from_bytes(vec![0; 8], Metadata::new())).unwrap();
///
/// assert_eq!(sink.count(), 1);
/// assert_eq!(sink.bytes(), 8);
/// ```
pub struct NullSink {
    name: String,
    count: u64,
    bytes: u64,
}

impl NullSink {
    /// Create a new NullSink.
    pub fn new() -> Self {
        Self::with_name("nullsink")
    }

    /// Create a new NullSink with a custom name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: 0,
            bytes: 0,
        }
    }

    /// Get the number of buffers consumed.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Get the declared length of all buffers consumed.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}

impl Default for NullSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for NullSink {
    fn consume(&mut self, buffer: Buffer) -> Result<()> {
        self.count += 1;
        self.bytes += buffer.len() as u64;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;

    #[test]
    fn test_null_sink() {
        let mut sink = NullSink::new();
        assert_eq!(sink.count(), 0);

        for i in 0..10 {
            sink.consume(Buffer::from_bytes(vec![0; 4], Metadata::with_sequence(i)))
                .unwrap();
        }

        assert_eq!(sink.count(), 10);
        assert_eq!(sink.bytes(), 40);
    }

    #[test]
    fn test_null_sink_with_name() {
        let sink = NullSink::with_name("drain");
        assert_eq!(sink.name(), "drain");
    }
}
