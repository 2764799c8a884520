//! Per-buffer digest reports.

use crate::clock::ClockTime;
use std::sync::{Arc, Mutex};

/// Marker line written for every buffer while `silent` is false.
pub const MARKER: &str = "I'm plugged, therefore I'm in.";

/// One log entry about one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEntry {
    /// The element is active and receiving data.
    Marker,
    /// Size of the buffer in bytes.
    Size(usize),
    /// Hex digest of the buffer's bytes.
    Digest(String),
}

impl ReportEntry {
    /// Human-readable message for this entry.
    pub fn message(&self) -> String {
        match self {
            ReportEntry::Marker => MARKER.to_string(),
            ReportEntry::Size(size) => format!("Received buffer: {size} bytes"),
            ReportEntry::Digest(digest) => format!("Buffer's digest: {digest}"),
        }
    }
}

impl std::fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Which element and buffer an entry is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOrigin<'a> {
    /// Name of the reporting element.
    pub element: &'a str,
    /// Sequence number of the buffer.
    pub sequence: u64,
    /// Presentation timestamp of the buffer, [`ClockTime::NONE`] if unset.
    pub pts: ClockTime,
}

/// Destination for report entries.
///
/// Reporters are collaborators: they must not fail the data path, so
/// `report` returns nothing. A reporter that cannot deliver an entry drops it.
pub trait Reporter: Send + Sync {
    /// Record one entry.
    fn report(&self, origin: &ReportOrigin<'_>, entry: &ReportEntry);
}

/// Writes entries as `tracing` events with target `md5sum`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, origin: &ReportOrigin<'_>, entry: &ReportEntry) {
        tracing::info!(
            target: "md5sum",
            element = %origin.element,
            sequence = origin.sequence,
            pts = %origin.pts,
            "{}",
            entry
        );
    }
}

/// A report entry with its origin, as kept by [`MemoryReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reported {
    /// Name of the reporting element.
    pub element: String,
    /// Sequence number of the buffer.
    pub sequence: u64,
    /// Presentation timestamp of the buffer.
    pub pts: ClockTime,
    /// The entry itself.
    pub entry: ReportEntry,
}

/// Size and digest of one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestRecord {
    /// Sequence number of the buffer.
    pub sequence: u64,
    /// Presentation timestamp of the buffer.
    pub pts: ClockTime,
    /// Buffer size in bytes.
    pub size: usize,
    /// Hex digest of the buffer's bytes.
    pub digest: String,
}

/// Keeps every entry in memory, in arrival order.
///
/// Clones share the same log, so one clone can be handed to an element while
/// another is kept for reading.
///
/// # Example
///
/// ```rust
/// use md5sum::buffer::Buffer;
/// use md5sum::element::Element;
/// use md5sum::elements::Md5Sum;
/// use md5sum::metadata::Metadata;
/// use md5sum::observability::MemoryReporter;
///
/// let reporter = MemoryReporter::new();
/// let mut md5sum = Md5Sum::new().with_reporter(reporter.clone());
///
/// md5sum
///     .process(Buffer::from_bytes(b"abc".to_vec(), Metadata::new()))
///     .unwrap();
///
/// let records = reporter.records();
/// assert_eq!(records[0].size, 3);
/// assert_eq!(records[0].digest, "900150983cd24fb0d6963f7d28e17f72");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryReporter {
    log: Arc<Mutex<Vec<Reported>>>,
}

impl MemoryReporter {
    /// Create an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries so far.
    pub fn entries(&self) -> Vec<Reported> {
        self.log.lock().unwrap().clone()
    }

    /// Messages of all entries so far.
    pub fn messages(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.entry.message())
            .collect()
    }

    /// Pair each size entry with the digest entry that follows it for the
    /// same element and buffer.
    pub fn records(&self) -> Vec<DigestRecord> {
        let log = self.log.lock().unwrap();
        let mut records = Vec::new();
        let mut pending: Option<&Reported> = None;

        for reported in log.iter() {
            match &reported.entry {
                ReportEntry::Size(_) => pending = Some(reported),
                ReportEntry::Digest(digest) => {
                    if let Some(size_entry) = pending.take() {
                        if let ReportEntry::Size(size) = size_entry.entry {
                            if size_entry.element == reported.element
                                && size_entry.sequence == reported.sequence
                            {
                                records.push(DigestRecord {
                                    sequence: reported.sequence,
                                    pts: reported.pts,
                                    size,
                                    digest: digest.clone(),
                                });
                            }
                        }
                    }
                }
                ReportEntry::Marker => {}
            }
        }
        records
    }

    /// Number of marker entries.
    pub fn marker_count(&self) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.entry == ReportEntry::Marker)
            .count()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    /// True if nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget all entries.
    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, origin: &ReportOrigin<'_>, entry: &ReportEntry) {
        self.log.lock().unwrap().push(Reported {
            element: origin.element.to_string(),
            sequence: origin.sequence,
            pts: origin.pts,
            entry: entry.clone(),
        });
    }
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn report(&self, origin: &ReportOrigin<'_>, entry: &ReportEntry) {
        (**self).report(origin, entry)
    }
}
