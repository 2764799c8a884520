//! AppSink element for extracting data to application code.
//!
//! Allows applications to pull buffers from a pipeline programmatically.

use crate::buffer::Buffer;
use crate::element::Sink;
use crate::error::Result;
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// A sink element that hands buffers to application code.
///
/// Buffers are queued without limit. A pipeline drives its sink from the same
/// thread as its source, so the queue never blocks the producer; the
/// application drains it through an [`AppSinkHandle`], during or after the
/// run.
///
/// # Example
///
/// ```rust
/// use md5sum::pipeline::Pipeline;
///
/// let mut pipeline = Pipeline::parse("datasrc data=abc ! md5sum ! appsink name=out")?;
/// let handle = pipeline.appsink_handle("out").unwrap();
/// pipeline.run()?;
///
/// let buffer = handle.try_pull_buffer().unwrap();
/// assert_eq!(buffer.try_as_bytes()?, b"abc");
/// assert!(handle.is_eos());
/// # Ok::<(), md5sum::error::Error>(())
/// ```
pub struct AppSink {
    name: String,
    inner: Arc<AppSinkInner>,
}

struct AppSinkInner {
    state: Mutex<AppSinkState>,
    data_available: Condvar,
}

#[derive(Default)]
struct AppSinkState {
    queue: VecDeque<Buffer>,
    eos: bool,
    total_received: u64,
    total_pulled: u64,
}

/// Handle for pulling data from an AppSink.
///
/// This handle can be cloned and sent to other threads.
#[derive(Clone)]
pub struct AppSinkHandle {
    inner: Arc<AppSinkInner>,
}

/// Statistics about AppSink operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppSinkStats {
    /// Number of buffers currently queued.
    pub queued_buffers: usize,
    /// Total buffers received from the pipeline.
    pub total_received: u64,
    /// Total buffers pulled by the application.
    pub total_pulled: u64,
    /// Whether EOS has been received.
    pub eos: bool,
}

impl AppSink {
    /// Create a new AppSink.
    pub fn new() -> Self {
        Self {
            name: "appsink".to_string(),
            inner: Arc::new(AppSinkInner {
                state: Mutex::new(AppSinkState::default()),
                data_available: Condvar::new(),
            }),
        }
    }

    /// Set a custom name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Get a handle for pulling data from this sink.
    pub fn handle(&self) -> AppSinkHandle {
        AppSinkHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Signal end of stream.
    pub fn send_eos(&self) {
        let mut state = self.inner.state.lock().unwrap();
        state.eos = true;
        self.inner.data_available.notify_all();
    }
}

impl Default for AppSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for AppSink {
    fn consume(&mut self, buffer: Buffer) -> Result<()> {
        let mut state = self.inner.state.lock().unwrap();
        state.queue.push_back(buffer);
        state.total_received += 1;
        self.inner.data_available.notify_one();
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.send_eos();
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl AppSinkHandle {
    /// Pull a buffer, waiting up to `timeout` for one to arrive.
    ///
    /// Returns `None` on timeout, or once EOS is reached and the queue is
    /// drained.
    pub fn pull_buffer_timeout(&self, timeout: Duration) -> Option<Buffer> {
        let state = self.inner.state.lock().unwrap();
        let (mut state, _) = self
            .inner
            .data_available
            .wait_timeout_while(state, timeout, |s| s.queue.is_empty() && !s.eos)
            .unwrap();

        let buffer = state.queue.pop_front()?;
        state.total_pulled += 1;
        Some(buffer)
    }

    /// Try to pull a buffer without blocking.
    pub fn try_pull_buffer(&self) -> Option<Buffer> {
        let mut state = self.inner.state.lock().unwrap();
        let buffer = state.queue.pop_front()?;
        state.total_pulled += 1;
        Some(buffer)
    }

    /// Take every queued buffer.
    pub fn drain(&self) -> Vec<Buffer> {
        let mut state = self.inner.state.lock().unwrap();
        let buffers: Vec<Buffer> = state.queue.drain(..).collect();
        state.total_pulled += buffers.len() as u64;
        buffers
    }

    /// Get the current queue length.
    pub fn queue_len(&self) -> usize {
        self.inner.state.lock().unwrap().queue.len()
    }

    /// Check if EOS has been reached.
    pub fn is_eos(&self) -> bool {
        self.inner.state.lock().unwrap().eos
    }

    /// Get statistics.
    pub fn stats(&self) -> AppSinkStats {
        let state = self.inner.state.lock().unwrap();
        AppSinkStats {
            queued_buffers: state.queue.len(),
            total_received: state.total_received,
            total_pulled: state.total_pulled,
            eos: state.eos,
        }
    }
}

impl std::fmt::Debug for AppSinkHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSinkHandle")
            .field("stats", &self.stats())
            .finish()
    }
}
