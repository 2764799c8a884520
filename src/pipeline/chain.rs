//! Linear pipeline: one source, a chain of elements, one sink.

use super::factory::{ElementFactory, ElementHandle, FactoryElement};
use super::parser::parse_pipeline;
use crate::element::{Element, Sink, Source};
use crate::elements::{AppSinkHandle, Md5SumControl};
use crate::error::{Error, Result};
use crate::observability::{
    span_element, span_pipeline, trace_buffer_consumed, trace_buffer_produced, trace_eos,
    trace_error,
};

/// Counters for one [`Pipeline::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Buffers produced by the source.
    pub buffers_in: u64,
    /// Buffers delivered to the sink.
    pub buffers_out: u64,
    /// Buffers an element chose not to forward.
    pub buffers_dropped: u64,
    /// Bytes delivered to the sink.
    pub bytes_out: u64,
}

/// A source, zero or more elements, and a sink, run serially on the calling
/// thread.
///
/// Each buffer travels the whole chain before the next one is produced.
/// The first error from any stage aborts the run and is returned; buffers
/// already delivered stay delivered.
///
/// # Example
///
/// ```rust
/// use md5sum::pipeline::Pipeline;
///
/// let mut pipeline =
///     Pipeline::parse("datasrc data=hello chunk-size=2 ! md5sum name=check ! nullsink")?;
/// pipeline.md5sum_control("check").unwrap().set_silent(true);
///
/// let stats = pipeline.run()?;
/// assert_eq!(stats.buffers_out, 3);
/// assert_eq!(stats.bytes_out, 5);
/// # Ok::<(), md5sum::error::Error>(())
/// ```
pub struct Pipeline {
    name: String,
    source: Box<dyn Source>,
    elements: Vec<Box<dyn Element>>,
    sink: Box<dyn Sink>,
    handles: Vec<(String, ElementHandle)>,
}

impl Pipeline {
    /// Create a pipeline that feeds `source` straight into `sink`.
    pub fn new(source: impl Source + 'static, sink: impl Sink + 'static) -> Self {
        Self {
            name: "pipeline".to_string(),
            source: Box::new(source),
            elements: Vec::new(),
            sink: Box::new(sink),
            handles: Vec::new(),
        }
    }

    /// Build a pipeline from a launch line using the built-in elements.
    pub fn parse(description: &str) -> Result<Self> {
        Self::parse_with_factory(description, &ElementFactory::new())
    }

    /// Build a pipeline from a launch line using `factory`.
    ///
    /// The first element must be a source, the last a sink, and everything
    /// in between a transform.
    pub fn parse_with_factory(description: &str, factory: &ElementFactory) -> Result<Self> {
        let parsed = parse_pipeline(description)?;
        if parsed.elements.len() < 2 {
            return Err(Error::Pipeline(
                "a pipeline needs at least a source and a sink".into(),
            ));
        }

        let last = parsed.elements.len() - 1;
        let mut source = None;
        let mut sink = None;
        let mut elements = Vec::new();
        let mut handles = Vec::new();

        for (index, parsed_element) in parsed.elements.iter().enumerate() {
            let created = factory.create(parsed_element)?;
            if let Some(handle) = created.handle {
                handles.push((created.element.name().to_string(), handle));
            }

            match (created.element, index) {
                (FactoryElement::Source(s), 0) => source = Some(s),
                (FactoryElement::Sink(s), i) if i == last => sink = Some(s),
                (FactoryElement::Transform(e), i) if i != 0 && i != last => elements.push(e),
                (other, i) => {
                    let position = match i {
                        0 => "first element must be a source",
                        i if i == last => "last element must be a sink",
                        _ => "only transforms may sit between source and sink",
                    };
                    return Err(Error::Pipeline(format!(
                        "'{}' is a {:?}: {position}",
                        parsed_element.name,
                        other.element_type()
                    )));
                }
            }
        }

        match (source, sink) {
            (Some(source), Some(sink)) => Ok(Self {
                name: "pipeline".to_string(),
                source,
                elements,
                sink,
                handles,
            }),
            _ => Err(Error::Pipeline("missing source or sink".into())),
        }
    }

    /// Set a custom name, used in log spans.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append an element to the chain, after any already added.
    pub fn add_element(&mut self, element: impl Element + 'static) -> &mut Self {
        self.elements.push(Box::new(element));
        self
    }

    /// Name of the pipeline.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of all stages, from source to sink.
    pub fn element_names(&self) -> Vec<&str> {
        std::iter::once(self.source.name())
            .chain(self.elements.iter().map(|e| e.name()))
            .chain(std::iter::once(self.sink.name()))
            .collect()
    }

    /// Control handle of the `md5sum` named `name`, if the pipeline was
    /// built from a launch line. With duplicate names, the first one wins.
    pub fn md5sum_control(&self, name: &str) -> Option<Md5SumControl> {
        self.handles.iter().find_map(|(n, handle)| match handle {
            ElementHandle::Md5Sum(control) if n == name => Some(control.clone()),
            _ => None,
        })
    }

    /// Pull handle of the `appsink` named `name`, if the pipeline was built
    /// from a launch line.
    pub fn appsink_handle(&self, name: &str) -> Option<AppSinkHandle> {
        self.handles.iter().find_map(|(n, handle)| match handle {
            ElementHandle::AppSink(sink) if n == name => Some(sink.clone()),
            _ => None,
        })
    }

    /// Run until the source reaches end of stream.
    pub fn run(&mut self) -> Result<PipelineStats> {
        let span = span_pipeline(&self.name);
        let _guard = span.enter();
        let element_spans: Vec<_> = self
            .elements
            .iter()
            .map(|e| span_element(&self.name, e.name()))
            .collect();

        tracing::debug!(elements = ?self.element_names(), "pipeline started");
        let mut stats = PipelineStats::default();

        loop {
            let buffer = match self.source.produce() {
                Ok(Some(buffer)) => buffer,
                Ok(None) => break,
                Err(e) => {
                    trace_error(self.source.name(), &e);
                    return Err(e);
                }
            };
            trace_buffer_produced(self.source.name(), buffer.len(), buffer.metadata().sequence);
            stats.buffers_in += 1;

            let mut current = Some(buffer);
            for (element, span) in self.elements.iter_mut().zip(&element_spans) {
                let Some(buffer) = current.take() else {
                    break;
                };
                let _entered = span.enter();
                current = element
                    .process(buffer)
                    .inspect_err(|e| trace_error(element.name(), e))?;
            }

            let Some(buffer) = current else {
                stats.buffers_dropped += 1;
                continue;
            };

            let (len, sequence) = (buffer.len(), buffer.metadata().sequence);
            if let Err(e) = self.sink.consume(buffer) {
                trace_error(self.sink.name(), &e);
                return Err(e);
            }
            trace_buffer_consumed(self.sink.name(), len, sequence);
            stats.buffers_out += 1;
            stats.bytes_out += len as u64;
        }

        self.sink.finish()?;
        trace_eos(&self.name, stats.buffers_in);
        Ok(stats)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("elements", &self.element_names())
            .finish()
    }
}
