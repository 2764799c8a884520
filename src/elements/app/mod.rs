//! Application integration elements.
//!
//! - [`AppSink`]: Extract buffers to application code

mod appsink;

pub use appsink::{AppSink, AppSinkHandle, AppSinkStats};
