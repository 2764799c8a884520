//! Element system for md5sum pipelines.
//!
//! - [`Source`]: Produces buffers (e.g., file reader, inline data)
//! - [`Element`]: Inspects or transforms buffers in flight
//! - [`Sink`]: Consumes buffers (e.g., discard, collect)
//!
//! Elements follow a "sync processing" model: `produce`, `process` and
//! `consume` are synchronous and are called for one buffer at a time. A
//! pipeline never overlaps two calls on the same element.

mod traits;

pub use traits::{Element, Sink, Source};
