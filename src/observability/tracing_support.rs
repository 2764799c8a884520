//! Tracing integration for structured logging and spans.

use tracing::{Level, Span, span};

/// Create a span for a pipeline run.
///
/// # Example
///
/// ```rust
/// use md5sum::observability::span_pipeline;
///
/// let span = span_pipeline("launch");
/// let _guard = span.enter();
/// ```
#[inline]
pub fn span_pipeline(name: &str) -> Span {
    span!(Level::INFO, "pipeline", name = %name)
}

/// Create a span for one element of a pipeline.
#[inline]
pub fn span_element(pipeline: &str, element: &str) -> Span {
    span!(
        Level::DEBUG,
        "element",
        pipeline = %pipeline,
        element = %element
    )
}

/// Enter a pipeline span, returning the guard.
pub fn instrument_pipeline(name: &str) -> tracing::span::EnteredSpan {
    span_pipeline(name).entered()
}

/// Log a buffer being produced.
#[inline]
pub fn trace_buffer_produced(element: &str, size: usize, sequence: u64) {
    tracing::debug!(
        element = %element,
        size = size,
        sequence = sequence,
        "buffer produced"
    );
}

/// Log a buffer being consumed.
#[inline]
pub fn trace_buffer_consumed(element: &str, size: usize, sequence: u64) {
    tracing::debug!(
        element = %element,
        size = size,
        sequence = sequence,
        "buffer consumed"
    );
}

/// Log an error.
#[inline]
pub fn trace_error(element: &str, error: &dyn std::error::Error) {
    tracing::error!(
        element = %element,
        error = %error,
        "processing error"
    );
}

/// Log end-of-stream.
#[inline]
pub fn trace_eos(pipeline: &str, buffers: u64) {
    tracing::info!(
        pipeline = %pipeline,
        buffers = buffers,
        "end of stream"
    );
}
