//! # md5sum
//!
//! A pass-through pipeline element that logs the size and digest of every
//! buffer flowing through it.
//!
//! For each buffer, [`Md5Sum`](elements::Md5Sum) applies any property values
//! scheduled for the buffer's timestamp, logs a marker unless `silent` is set,
//! then logs the buffer's size and hex digest and hands the buffer on
//! unchanged.
//!
//! ## Features
//!
//! - **Zero-copy buffers**: Buffers share their backing memory; digesting
//!   never copies or alters the data
//! - **Thread-safe control**: `silent` can be flipped from any thread through
//!   a cloneable handle
//! - **Scheduled changes**: A [`Controller`](control::Controller) applies
//!   property values at stream timestamps
//! - **Pluggable digests**: MD5 by default, BLAKE3 on request
//! - **Launch lines**: `datasrc data=abc ! md5sum ! nullsink`
//!
//! ## Quick Start
//!
//! ```rust
//! use md5sum::prelude::*;
//!
//! let mut pipeline = Pipeline::parse("datasrc data=abc ! md5sum silent=true ! appsink name=out")?;
//! let out = pipeline.appsink_handle("out").unwrap();
//!
//! pipeline.run()?;
//! assert_eq!(out.try_pull_buffer().unwrap().try_as_bytes()?, b"abc");
//! # Ok::<(), md5sum::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod clock;
pub mod control;
pub mod digest;
pub mod element;
pub mod elements;
pub mod error;
pub mod memory;
pub mod metadata;
pub mod observability;
pub mod pipeline;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::buffer::Buffer;
    pub use crate::clock::ClockTime;
    pub use crate::control::{Controller, TimelineSource};
    pub use crate::digest::DigestKind;
    pub use crate::element::{Element, Sink, Source};
    pub use crate::elements::{Md5Sum, Md5SumControl};
    pub use crate::error::{Error, Result};
    pub use crate::metadata::Metadata;
    pub use crate::pipeline::{Pipeline, PipelineStats, PropertyValue};
}

pub use error::{Error, Result};
