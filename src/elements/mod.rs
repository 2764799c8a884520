//! Built-in pipeline elements.
//!
//! ## Sources
//! - [`DataSrc`]: Generates buffers from inline data
//! - [`FileSrc`]: Reads buffers from a file
//!
//! ## Transforms
//! - [`Md5Sum`]: Logs the size and digest of each buffer, passes it on
//!
//! ## Sinks
//! - [`AppSink`]: Extracts buffers to application code
//! - [`NullSink`]: Discards all buffers (useful for benchmarking)

mod app;
mod datasrc;
mod file;
mod md5sum;
mod null;

// Sources
pub use datasrc::DataSrc;
pub use file::FileSrc;

// Transforms
pub use md5sum::{Md5Sum, Md5SumControl, Md5SumStats};

// Sinks
pub use app::{AppSink, AppSinkHandle, AppSinkStats};
pub use null::NullSink;
