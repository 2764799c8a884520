//! Md5Sum element: digest every buffer and let it through.
//!
//! ```text
//! md5sum-launch datasrc data="hello" ! md5sum silent=true ! nullsink
//! ```

use crate::buffer::Buffer;
use crate::control::{ControlTarget, Controller};
use crate::digest::{DigestAlgorithm, Md5};
use crate::element::Element;
use crate::error::{Error, Result};
use crate::observability::{ReportEntry, ReportOrigin, Reporter, TracingReporter};
use crate::pipeline::PropertyValue;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// A pass-through element that reports the size and digest of each buffer.
///
/// For every buffer, in order:
///
/// 1. If the buffer has a PTS and a [`Controller`] is attached, scheduled
///    property values due at that PTS are applied.
/// 2. Unless `silent` is set, a marker entry is reported.
/// 3. The buffer's size is reported.
/// 4. The digest of its bytes is reported.
/// 5. The same buffer is returned unchanged.
///
/// A buffer whose declared length is not readable fails with
/// [`Error::MalformedBuffer`] after step 2; nothing is hashed and the buffer
/// is not forwarded.
///
/// `silent` defaults to `false`, which means the marker *is* reported.
///
/// # Example
///
/// ```rust
/// use md5sum::buffer::Buffer;
/// use md5sum::element::Element;
/// use md5sum::elements::Md5Sum;
/// use md5sum::metadata::Metadata;
///
/// let mut md5sum = Md5Sum::new();
/// let control = md5sum.control();
///
/// // From any thread:
/// control.set_silent(true);
///
/// let out = md5sum
///     .process(Buffer::from_bytes(b"abc".to_vec(), Metadata::new()))
///     .unwrap()
///     .unwrap();
/// assert_eq!(out.len(), 3);
/// assert_eq!(control.stats().buffer_count, 1);
/// ```
pub struct Md5Sum {
    name: String,
    shared: Arc<Md5SumShared>,
    algorithm: Box<dyn DigestAlgorithm>,
    reporter: Box<dyn Reporter>,
    controller: Option<Controller>,
}

/// State shared between the element and its control handles.
struct Md5SumShared {
    silent: AtomicBool,
    count: AtomicU64,
    bytes: AtomicU64,
}

/// Control handle for an [`Md5Sum`].
///
/// Can be cloned and sent to other threads. Writes are visible to the next
/// buffer the element starts processing.
#[derive(Clone)]
pub struct Md5SumControl {
    shared: Arc<Md5SumShared>,
}

/// Statistics for an [`Md5Sum`] element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Md5SumStats {
    /// Number of buffers digested.
    pub buffer_count: u64,
    /// Total bytes digested.
    pub byte_count: u64,
}

impl Md5Sum {
    /// Create an MD5 element that reports through `tracing`.
    pub fn new() -> Self {
        Self {
            name: "md5sum".to_string(),
            shared: Arc::new(Md5SumShared {
                silent: AtomicBool::new(false),
                count: AtomicU64::new(0),
                bytes: AtomicU64::new(0),
            }),
            algorithm: Box::new(Md5),
            reporter: Box::new(TracingReporter),
            controller: None,
        }
    }

    /// Set a custom name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the initial value of `silent`.
    pub fn with_silent(self, silent: bool) -> Self {
        self.shared.silent.store(silent, Ordering::SeqCst);
        self
    }

    /// Replace the digest algorithm.
    pub fn with_algorithm(mut self, algorithm: impl DigestAlgorithm + 'static) -> Self {
        self.algorithm = Box::new(algorithm);
        self
    }

    /// Replace the digest algorithm with an already boxed one.
    pub fn with_boxed_algorithm(mut self, algorithm: Box<dyn DigestAlgorithm>) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Send report entries to `reporter` instead of `tracing`.
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Attach a controller for timestamp-scheduled property changes.
    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Get a control handle for this element.
    pub fn control(&self) -> Md5SumControl {
        Md5SumControl {
            shared: Arc::clone(&self.shared),
        }
    }

    /// The attached controller, if any.
    pub fn controller(&self) -> Option<&Controller> {
        self.controller.as_ref()
    }

    /// Name of the digest algorithm in use.
    pub fn algorithm(&self) -> &'static str {
        self.algorithm.name()
    }

    /// Current value of `silent`.
    pub fn is_silent(&self) -> bool {
        self.shared.silent.load(Ordering::SeqCst)
    }

    /// Get statistics.
    pub fn stats(&self) -> Md5SumStats {
        self.shared.stats()
    }
}

impl Default for Md5Sum {
    fn default() -> Self {
        Self::new()
    }
}

impl Element for Md5Sum {
    fn process(&mut self, buffer: Buffer) -> Result<Option<Buffer>> {
        let pts = buffer.pts();

        // Scheduled changes due at this PTS must land before `silent` is read.
        if let (Some(controller), Some(ts)) = (&self.controller, pts.to_option()) {
            controller.sync_at(ts, self.shared.as_ref())?;
        }

        let origin = ReportOrigin {
            element: &self.name,
            sequence: buffer.metadata().sequence,
            pts,
        };

        if !self.shared.silent.load(Ordering::SeqCst) {
            self.reporter.report(&origin, &ReportEntry::Marker);
        }

        let bytes = match buffer.try_as_bytes() {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(
                    element = %self.name,
                    sequence = origin.sequence,
                    error = %err,
                    "refusing to digest buffer"
                );
                return Err(err);
            }
        };

        self.reporter
            .report(&origin, &ReportEntry::Size(bytes.len()));
        let digest = self.algorithm.digest(bytes);
        self.reporter.report(&origin, &ReportEntry::Digest(digest));

        self.shared.count.fetch_add(1, Ordering::Relaxed);
        self.shared
            .bytes
            .fetch_add(bytes.len() as u64, Ordering::Relaxed);

        Ok(Some(buffer))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Md5SumShared {
    fn stats(&self) -> Md5SumStats {
        Md5SumStats {
            buffer_count: self.count.load(Ordering::Relaxed),
            byte_count: self.bytes.load(Ordering::Relaxed),
        }
    }
}

impl ControlTarget for Md5SumShared {
    fn set_property(&self, name: &str, value: &PropertyValue) -> Result<()> {
        match name {
            "silent" => {
                let silent = value.as_bool().ok_or_else(|| {
                    Error::invalid_property(
                        "md5sum",
                        name,
                        format!("expected a boolean, got '{}'", value.as_string()),
                    )
                })?;
                self.silent.store(silent, Ordering::SeqCst);
                Ok(())
            }
            _ => Err(Error::invalid_property(
                "md5sum",
                name,
                "not a controllable property",
            )),
        }
    }
}

impl Md5SumControl {
    /// Current value of `silent`.
    pub fn silent(&self) -> bool {
        self.shared.silent.load(Ordering::SeqCst)
    }

    /// Set `silent`. `false` reports the marker for each buffer.
    pub fn set_silent(&self, silent: bool) {
        self.shared.silent.store(silent, Ordering::SeqCst);
    }

    /// Read a property by name.
    pub fn property(&self, name: &str) -> Option<PropertyValue> {
        match name {
            "silent" => Some(PropertyValue::Bool(self.silent())),
            _ => None,
        }
    }

    /// Get statistics.
    pub fn stats(&self) -> Md5SumStats {
        self.shared.stats()
    }

    /// Reset statistics.
    pub fn reset_stats(&self) {
        self.shared.count.store(0, Ordering::Relaxed);
        self.shared.bytes.store(0, Ordering::Relaxed);
    }
}

impl ControlTarget for Md5SumControl {
    fn set_property(&self, name: &str, value: &PropertyValue) -> Result<()> {
        self.shared.set_property(name, value)
    }
}

impl std::fmt::Debug for Md5SumControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Md5SumControl")
            .field("silent", &self.silent())
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::MemoryHandle;
    use crate::clock::ClockTime;
    use crate::control::TimelineSource;
    use crate::digest::Blake3;
    use crate::memory::{HeapSegment, MemorySegment};
    use crate::metadata::Metadata;
    use crate::observability::MemoryReporter;

    fn create_test_buffer(data: &[u8], seq: u64) -> Buffer {
        Buffer::from_bytes(data.to_vec(), Metadata::with_sequence(seq))
    }

    fn md5sum_with_log() -> (Md5Sum, MemoryReporter) {
        let reporter = MemoryReporter::new();
        let md5sum = Md5Sum::new().with_reporter(reporter.clone());
        (md5sum, reporter)
    }

    #[test]
    fn test_md5sum_known_vector() {
        let (mut md5sum, reporter) = md5sum_with_log();

        md5sum.process(create_test_buffer(b"abc", 0)).unwrap();

        assert_eq!(
            reporter.messages(),
            vec![
                "I'm plugged, therefore I'm in.",
                "Received buffer: 3 bytes",
                "Buffer's digest: 900150983cd24fb0d6963f7d28e17f72",
            ]
        );
    }

    #[test]
    fn test_md5sum_empty_buffer() {
        let (mut md5sum, reporter) = md5sum_with_log();

        let out = md5sum.process(create_test_buffer(b"", 0)).unwrap().unwrap();
        assert!(out.is_empty());

        let records = reporter.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].size, 0);
        assert_eq!(records[0].digest, "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_md5sum_passthrough() {
        let (mut md5sum, _) = md5sum_with_log();
        let input = create_test_buffer(b"payload bytes", 7)
            .clone_with_pts(ClockTime::from_millis(40));
        let input_ptr = input.try_as_bytes().unwrap().as_ptr();
        let input_meta = input.metadata().clone();

        let out = md5sum.process(input).unwrap().unwrap();

        assert_eq!(out.try_as_bytes().unwrap().as_ptr(), input_ptr);
        assert_eq!(out.try_as_bytes().unwrap(), b"payload bytes");
        assert_eq!(out.metadata(), &input_meta);
    }

    #[test]
    fn test_md5sum_silent_gating() {
        let (mut md5sum, reporter) = md5sum_with_log();
        let control = md5sum.control();

        md5sum.process(create_test_buffer(b"a", 0)).unwrap();
        assert_eq!(reporter.marker_count(), 1);

        control.set_silent(true);
        md5sum.process(create_test_buffer(b"b", 1)).unwrap();
        assert_eq!(reporter.marker_count(), 1);
        assert_eq!(reporter.records().len(), 2);

        control.set_silent(false);
        md5sum.process(create_test_buffer(b"c", 2)).unwrap();
        assert_eq!(reporter.marker_count(), 2);
    }

    #[test]
    fn test_md5sum_with_silent_builder() {
        let reporter = MemoryReporter::new();
        let mut md5sum = Md5Sum::new()
            .with_silent(true)
            .with_reporter(reporter.clone());
        assert!(md5sum.is_silent());

        md5sum.process(create_test_buffer(b"x", 0)).unwrap();
        assert_eq!(reporter.marker_count(), 0);
        assert_eq!(reporter.len(), 2);
    }

    #[test]
    fn test_md5sum_malformed_buffer() {
        let (mut md5sum, reporter) = md5sum_with_log();
        let segment: Arc<dyn MemorySegment> = Arc::new(HeapSegment::from_slice(b"short"));
        let buffer = Buffer::new(MemoryHandle::declared(segment, 0, 64), Metadata::new());

        let err = md5sum.process(buffer).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedBuffer {
                declared: 64,
                available: 5
            }
        ));
        assert!(reporter.records().is_empty());
        assert_eq!(reporter.marker_count(), 1);
        assert_eq!(md5sum.stats().buffer_count, 0);
    }

    #[test]
    fn test_md5sum_controller_applies_at_exact_pts() {
        let t = ClockTime::from_millis(100);
        let mut timeline = TimelineSource::new();
        timeline.set(t, PropertyValue::Bool(true));
        let controller = Controller::new();
        controller.bind("silent", timeline);

        let (md5sum, reporter) = md5sum_with_log();
        let mut md5sum = md5sum.with_controller(controller);

        let before = create_test_buffer(b"a", 0).clone_with_pts(ClockTime::from_nanos(t.nanos() - 1));
        md5sum.process(before).unwrap();
        assert_eq!(reporter.marker_count(), 1);
        assert!(!md5sum.is_silent());

        md5sum.process(create_test_buffer(b"b", 1).clone_with_pts(t)).unwrap();
        assert_eq!(reporter.marker_count(), 1);
        assert!(md5sum.is_silent());
    }

    #[test]
    fn test_md5sum_controller_ignored_without_pts() {
        let mut timeline = TimelineSource::new();
        timeline.set(ClockTime::ZERO, PropertyValue::Bool(true));
        let controller = Controller::new();
        controller.bind("silent", timeline);

        let (md5sum, reporter) = md5sum_with_log();
        let mut md5sum = md5sum.with_controller(controller);

        md5sum.process(create_test_buffer(b"a", 0)).unwrap();
        assert_eq!(reporter.marker_count(), 1);
        assert!(!md5sum.is_silent());
    }

    #[test]
    fn test_md5sum_controller_rejects_bad_value() {
        let mut timeline = TimelineSource::new();
        timeline.set(ClockTime::ZERO, PropertyValue::Float(0.5));
        let controller = Controller::new();
        controller.bind("silent", timeline);

        let (md5sum, reporter) = md5sum_with_log();
        let mut md5sum = md5sum.with_controller(controller);

        let err = md5sum
            .process(create_test_buffer(b"a", 0).clone_with_pts(ClockTime::ZERO))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidProperty { .. }));
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_md5sum_alternate_algorithm() {
        let reporter = MemoryReporter::new();
        let mut md5sum = Md5Sum::new()
            .with_algorithm(Blake3)
            .with_reporter(reporter.clone());
        assert_eq!(md5sum.algorithm(), "blake3");

        md5sum.process(create_test_buffer(b"abc", 0)).unwrap();
        assert_eq!(reporter.records()[0].digest.len(), 64);
    }

    #[test]
    fn test_md5sum_stats() {
        let (mut md5sum, _) = md5sum_with_log();
        let control = md5sum.control();

        md5sum.process(create_test_buffer(&[0; 100], 0)).unwrap();
        md5sum.process(create_test_buffer(&[0; 200], 1)).unwrap();

        assert_eq!(
            control.stats(),
            Md5SumStats {
                buffer_count: 2,
                byte_count: 300
            }
        );

        control.reset_stats();
        assert_eq!(md5sum.stats().buffer_count, 0);
    }

    #[test]
    fn test_md5sum_control_properties() {
        let md5sum = Md5Sum::new();
        let control = md5sum.control();

        assert_eq!(control.property("silent"), Some(PropertyValue::Bool(false)));
        control
            .set_property("silent", &PropertyValue::String("yes".into()))
            .unwrap();
        assert!(md5sum.is_silent());

        assert!(control.set_property("volume", &PropertyValue::Integer(1)).is_err());
        assert_eq!(control.property("volume"), None);
    }

    #[test]
    fn test_md5sum_with_name() {
        let md5sum = Md5Sum::new().with_name("checksum0");
        assert_eq!(md5sum.name(), "checksum0");
    }

    trait WithPts {
        fn clone_with_pts(self, pts: ClockTime) -> Buffer;
    }

    impl WithPts for Buffer {
        fn clone_with_pts(mut self, pts: ClockTime) -> Buffer {
            self.metadata_mut().pts = pts;
            self
        }
    }
}
