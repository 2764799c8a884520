//! Core element traits.

use crate::buffer::Buffer;
use crate::error::Result;

// ============================================================================
// Source Trait
// ============================================================================

/// A source element that produces buffers.
///
/// - Return `Ok(Some(buffer))` to emit a buffer
/// - Return `Ok(None)` to signal end-of-stream (EOS)
/// - Return `Err(...)` to signal an error
///
/// # Example
///
/// ```rust
/// use md5sum::buffer::Buffer;
/// use md5sum::element::Source;
/// use md5sum::error::Result;
/// use md5sum::metadata::Metadata;
///
/// struct CounterSource {
///     count: u64,
///     max: u64,
/// }
///
/// impl Source for CounterSource {
///     fn produce(&mut self) -> Result<Option<Buffer>> {
///         if self.count >= self.max {
///             return Ok(None);
///         }
///         let buffer = Buffer::from_bytes(
///             self.count.to_le_bytes().to_vec(),
///             Metadata::with_sequence(self.count),
///         );
///         self.count += 1;
///         Ok(Some(buffer))
///     }
/// }
///
/// let mut src = CounterSource { count: 0, max: 1 };
/// assert!(src.produce().unwrap().is_some());
/// assert!(src.produce().unwrap().is_none());
/// ```
pub trait Source: Send {
    /// Produce the next buffer.
    ///
    /// Returns `Ok(None)` when the source is exhausted (end of stream).
    fn produce(&mut self) -> Result<Option<Buffer>>;

    /// Get the name of this source (for debugging/logging).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

// ============================================================================
// Sink Trait
// ============================================================================

/// A sink element that consumes buffers.
pub trait Sink: Send {
    /// Consume a buffer.
    fn consume(&mut self, buffer: Buffer) -> Result<()>;

    /// Called once after the last buffer, when the source reaches end of
    /// stream. Not called if the run fails.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    /// Get the name of this sink (for debugging/logging).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

// ============================================================================
// Element Trait
// ============================================================================

/// An element that sits between a source and a sink.
///
/// # Return Values
///
/// - `Ok(Some(buffer))`: Emit a buffer downstream
/// - `Ok(None)`: Drop this buffer (filter it out)
/// - `Err(...)`: Signal an error; the buffer is not forwarded
pub trait Element: Send {
    /// Process an input buffer and optionally produce an output buffer.
    fn process(&mut self, buffer: Buffer) -> Result<Option<Buffer>>;

    /// Get the name of this element (for debugging/logging).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn produce(&mut self) -> Result<Option<Buffer>> {
        (**self).produce()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn consume(&mut self, buffer: Buffer) -> Result<()> {
        (**self).consume(buffer)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<E: Element + ?Sized> Element for Box<E> {
    fn process(&mut self, buffer: Buffer) -> Result<Option<Buffer>> {
        (**self).process(buffer)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;

    struct Drop0;

    impl Element for Drop0 {
        fn process(&mut self, buffer: Buffer) -> Result<Option<Buffer>> {
            if buffer.is_empty() {
                Ok(None)
            } else {
                Ok(Some(buffer))
            }
        }

        fn name(&self) -> &str {
            "drop0"
        }
    }

    #[test]
    fn test_boxed_element_delegates() {
        let mut element: Box<dyn Element> = Box::new(Drop0);
        assert_eq!(element.name(), "drop0");

        let empty = Buffer::from_bytes(Vec::new(), Metadata::new());
        assert!(element.process(empty).unwrap().is_none());

        let full = Buffer::from_bytes(vec![1], Metadata::new());
        assert!(element.process(full).unwrap().is_some());
    }

    #[test]
    fn test_default_name_is_type_name() {
        struct Unnamed;
        impl Sink for Unnamed {
            fn consume(&mut self, _buffer: Buffer) -> Result<()> {
                Ok(())
            }
        }
        assert!(Unnamed.name().ends_with("Unnamed"));
    }
}
