//! Observability: digest reports and tracing.
//!
//! - **Reports**: The per-buffer log entries written by
//!   [`Md5Sum`](crate::elements::Md5Sum) go through a [`Reporter`]. The
//!   default [`TracingReporter`] turns them into `tracing` events under the
//!   `md5sum` target; [`MemoryReporter`] keeps them for inspection.
//! - **Tracing**: Spans and events for pipeline runs via `tracing`.
//!
//! ## Report entries
//!
//! | Entry | Message | Gated by `silent` |
//! |-------|---------|-------------------|
//! | [`ReportEntry::Marker`] | `I'm plugged, therefore I'm in.` | yes |
//! | [`ReportEntry::Size`] | `Received buffer: <N> bytes` | no |
//! | [`ReportEntry::Digest`] | `Buffer's digest: <hex>` | no |

mod report;
mod tracing_support;

pub use report::{
    DigestRecord, MARKER, MemoryReporter, ReportEntry, ReportOrigin, Reported, Reporter,
    TracingReporter,
};
pub use tracing_support::{
    instrument_pipeline, span_element, span_pipeline, trace_buffer_consumed,
    trace_buffer_produced, trace_eos, trace_error,
};
