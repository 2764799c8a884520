//! Element factory for creating elements from parsed descriptions.

use crate::clock::ClockTime;
use crate::digest::DigestKind;
use crate::element::{Element, Sink, Source};
use crate::elements::{
    AppSink, AppSinkHandle, DataSrc, FileSrc, Md5Sum, Md5SumControl, NullSink,
};
use crate::error::{Error, Result};
use crate::pipeline::parser::{ParsedElement, PropertyValue};
use std::collections::HashMap;

/// Type alias for element constructor functions.
pub type ElementConstructor = fn(&Properties) -> Result<CreatedElement>;

/// Role of an element in a linear pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    /// Produces buffers.
    Source,
    /// Sits between a source and a sink.
    Transform,
    /// Consumes buffers.
    Sink,
}

/// An element built by the factory, boxed according to its role.
pub enum FactoryElement {
    /// A source.
    Source(Box<dyn Source>),
    /// A transform.
    Transform(Box<dyn Element>),
    /// A sink.
    Sink(Box<dyn Sink>),
}

impl FactoryElement {
    /// Role of this element.
    pub fn element_type(&self) -> ElementType {
        match self {
            FactoryElement::Source(_) => ElementType::Source,
            FactoryElement::Transform(_) => ElementType::Transform,
            FactoryElement::Sink(_) => ElementType::Sink,
        }
    }

    /// Name of the wrapped element.
    pub fn name(&self) -> &str {
        match self {
            FactoryElement::Source(e) => e.name(),
            FactoryElement::Transform(e) => e.name(),
            FactoryElement::Sink(e) => e.name(),
        }
    }
}

/// A runtime handle into an element, kept after the element is boxed.
#[derive(Debug, Clone)]
pub enum ElementHandle {
    /// Control handle of an `md5sum`.
    Md5Sum(Md5SumControl),
    /// Pull handle of an `appsink`.
    AppSink(AppSinkHandle),
}

/// Output of an [`ElementConstructor`].
pub struct CreatedElement {
    /// The element.
    pub element: FactoryElement,
    /// Handle for controlling or draining it, if it has one.
    pub handle: Option<ElementHandle>,
}

impl CreatedElement {
    /// Wrap an element that has no handle.
    pub fn new(element: FactoryElement) -> Self {
        Self {
            element,
            handle: None,
        }
    }

    /// Attach a handle.
    pub fn with_handle(mut self, handle: ElementHandle) -> Self {
        self.handle = Some(handle);
        self
    }
}

/// Properties of one element from a launch line, with typed accessors.
///
/// Accessors return `Ok(None)` for absent properties and
/// [`Error::InvalidProperty`] for values of the wrong type. When the same key
/// is given twice, the last value wins.
#[derive(Debug, Clone)]
pub struct Properties {
    element: String,
    values: HashMap<String, PropertyValue>,
}

impl Properties {
    /// Collect the properties of a parsed element.
    pub fn new(parsed: &ParsedElement) -> Self {
        Self {
            element: parsed.name.clone(),
            values: parsed.properties.iter().cloned().collect(),
        }
    }

    /// Raw value of a property.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    /// A property rendered as a string.
    pub fn string(&self, key: &str) -> Option<String> {
        self.values.get(key).map(PropertyValue::as_string)
    }

    /// A required string property.
    pub fn require_string(&self, key: &str) -> Result<String> {
        self.string(key)
            .ok_or_else(|| self.invalid(key, "required property is missing"))
    }

    /// A boolean property.
    pub fn bool(&self, key: &str) -> Result<Option<bool>> {
        self.typed(key, "a boolean", PropertyValue::as_bool)
    }

    /// A non-negative integer property.
    pub fn u64(&self, key: &str) -> Result<Option<u64>> {
        self.typed(key, "a non-negative integer", PropertyValue::as_u64)
    }

    /// A non-negative number property.
    pub fn non_negative_f64(&self, key: &str) -> Result<Option<f64>> {
        self.typed(key, "a non-negative number", |v| {
            v.as_f64().filter(|f| f.is_finite() && *f >= 0.0)
        })
    }

    /// Fail on any property not in `allowed`. `name` is always allowed.
    pub fn expect_only(&self, allowed: &[&str]) -> Result<()> {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        match keys
            .into_iter()
            .find(|k| k.as_str() != "name" && !allowed.contains(&k.as_str()))
        {
            Some(unknown) => Err(self.invalid(unknown, "no such property")),
            None => Ok(()),
        }
    }

    fn typed<T>(
        &self,
        key: &str,
        expected: &str,
        convert: impl Fn(&PropertyValue) -> Option<T>,
    ) -> Result<Option<T>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(value) => convert(value).map(Some).ok_or_else(|| {
                self.invalid(
                    key,
                    format!("expected {expected}, got '{}'", value.as_string()),
                )
            }),
        }
    }

    fn invalid(&self, key: &str, reason: impl Into<String>) -> Error {
        Error::invalid_property(self.element.clone(), key, reason)
    }
}

/// Registry of element constructors.
///
/// # Example
///
/// ```rust
/// use md5sum::pipeline::{ElementFactory, ElementType, parse_pipeline};
///
/// let factory = ElementFactory::new();
/// let parsed = parse_pipeline("md5sum silent=TRUE algorithm=blake3").unwrap();
/// let created = factory.create(&parsed.elements[0]).unwrap();
/// assert_eq!(created.element.element_type(), ElementType::Transform);
/// ```
pub struct ElementFactory {
    constructors: HashMap<String, ElementConstructor>,
}

impl ElementFactory {
    /// Create a new factory with built-in elements registered.
    pub fn new() -> Self {
        let mut factory = Self {
            constructors: HashMap::new(),
        };

        // Sources
        factory.register("datasrc", create_datasrc);
        factory.register("filesrc", create_filesrc);

        // Transforms
        factory.register("md5sum", create_md5sum);

        // Sinks
        factory.register("nullsink", create_nullsink);
        factory.register("appsink", create_appsink);

        factory
    }

    /// Register a custom element constructor.
    pub fn register(&mut self, name: &str, constructor: ElementConstructor) {
        self.constructors.insert(name.to_string(), constructor);
    }

    /// Create an element from a parsed description.
    pub fn create(&self, parsed: &ParsedElement) -> Result<CreatedElement> {
        let constructor = self
            .constructors
            .get(&parsed.name)
            .ok_or_else(|| Error::UnknownElement(parsed.name.clone()))?;
        constructor(&Properties::new(parsed))
    }

    /// Check if an element type is registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// List all available element names.
    pub fn list_elements(&self) -> Vec<String> {
        let mut names: Vec<String> = self.constructors.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for ElementFactory {
    fn default() -> Self {
        Self::new()
    }
}

// Built-in element constructors

fn create_datasrc(props: &Properties) -> Result<CreatedElement> {
    props.expect_only(&["data", "chunk-size", "pts-interval-ms"])?;

    let data = props.string("data").unwrap_or_default();
    let mut src = DataSrc::new(data.into_bytes());

    if let Some(size) = props.u64("chunk-size")? {
        src = src.with_chunk_size(size as usize);
    }
    if let Some(ms) = props.non_negative_f64("pts-interval-ms")? {
        src = src.with_pts_interval(ClockTime::from_nanos((ms * 1_000_000.0) as u64));
    }
    if let Some(name) = props.string("name") {
        src = src.with_name(name);
    }

    Ok(CreatedElement::new(FactoryElement::Source(Box::new(src))))
}

fn create_filesrc(props: &Properties) -> Result<CreatedElement> {
    props.expect_only(&["location", "blocksize"])?;

    let location = props.require_string("location")?;
    let mut src = FileSrc::new(location);

    if let Some(size) = props.u64("blocksize")? {
        src = src.with_blocksize(size as usize)?;
    }
    if let Some(name) = props.string("name") {
        src = src.with_name(name);
    }

    Ok(CreatedElement::new(FactoryElement::Source(Box::new(src))))
}

fn create_md5sum(props: &Properties) -> Result<CreatedElement> {
    props.expect_only(&["silent", "algorithm"])?;

    let mut md5sum = Md5Sum::new();

    if let Some(silent) = props.bool("silent")? {
        md5sum = md5sum.with_silent(silent);
    }
    if let Some(algorithm) = props.string("algorithm") {
        let kind: DigestKind = algorithm.parse()?;
        md5sum = md5sum.with_boxed_algorithm(kind.algorithm());
    }
    if let Some(name) = props.string("name") {
        md5sum = md5sum.with_name(name);
    }

    let control = md5sum.control();
    Ok(
        CreatedElement::new(FactoryElement::Transform(Box::new(md5sum)))
            .with_handle(ElementHandle::Md5Sum(control)),
    )
}

fn create_nullsink(props: &Properties) -> Result<CreatedElement> {
    props.expect_only(&[])?;

    let sink = match props.string("name") {
        Some(name) => NullSink::with_name(name),
        None => NullSink::new(),
    };
    Ok(CreatedElement::new(FactoryElement::Sink(Box::new(sink))))
}

fn create_appsink(props: &Properties) -> Result<CreatedElement> {
    props.expect_only(&[])?;

    let mut sink = AppSink::new();
    if let Some(name) = props.string("name") {
        sink = sink.with_name(name);
    }

    let handle = sink.handle();
    Ok(
        CreatedElement::new(FactoryElement::Sink(Box::new(sink)))
            .with_handle(ElementHandle::AppSink(handle)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(name: &str, properties: Vec<(&str, PropertyValue)>) -> ParsedElement {
        ParsedElement {
            name: name.to_string(),
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    #[test]
    fn test_factory_creation() {
        let factory = ElementFactory::new();
        assert_eq!(
            factory.list_elements(),
            vec!["appsink", "datasrc", "filesrc", "md5sum", "nullsink"]
        );
        assert!(!factory.is_registered("unknown"));
    }

    #[test]
    fn test_create_md5sum() {
        let factory = ElementFactory::new();
        let created = factory
            .create(&parsed(
                "md5sum",
                vec![
                    ("silent", PropertyValue::Bool(true)),
                    ("name", PropertyValue::String("check".into())),
                ],
            ))
            .unwrap();

        assert_eq!(created.element.element_type(), ElementType::Transform);
        assert_eq!(created.element.name(), "check");
        match created.handle {
            Some(ElementHandle::Md5Sum(control)) => assert!(control.silent()),
            other => panic!("unexpected handle: {other:?}"),
        }
    }

    #[test]
    fn test_create_md5sum_defaults_to_not_silent() {
        let factory = ElementFactory::new();
        let created = factory.create(&parsed("md5sum", vec![])).unwrap();
        match created.handle {
            Some(ElementHandle::Md5Sum(control)) => assert!(!control.silent()),
            other => panic!("unexpected handle: {other:?}"),
        }
    }

    #[test]
    fn test_create_md5sum_bad_values() {
        let factory = ElementFactory::new();

        let err = factory
            .create(&parsed("md5sum", vec![("silent", PropertyValue::Float(0.5))]))
            .err()
            .unwrap();
        assert!(matches!(err, Error::InvalidProperty { ref property, .. } if property == "silent"));

        let err = factory
            .create(&parsed(
                "md5sum",
                vec![("algorithm", PropertyValue::String("sha1".into()))],
            ))
            .err()
            .unwrap();
        assert!(matches!(err, Error::InvalidProperty { ref property, .. } if property == "algorithm"));
    }

    #[test]
    fn test_unknown_property() {
        let factory = ElementFactory::new();
        let err = factory
            .create(&parsed("nullsink", vec![("volume", PropertyValue::Integer(3))]))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            Error::InvalidProperty { ref element, ref property, .. }
                if element == "nullsink" && property == "volume"
        ));
    }

    #[test]
    fn test_create_filesrc_requires_location() {
        let factory = ElementFactory::new();
        let err = factory.create(&parsed("filesrc", vec![])).err().unwrap();
        assert!(matches!(err, Error::InvalidProperty { .. }));
    }

    #[test]
    fn test_create_filesrc_with_location() {
        let factory = ElementFactory::new();
        let created = factory
            .create(&parsed(
                "filesrc",
                vec![
                    ("location", PropertyValue::String("/path/to/file".into())),
                    ("blocksize", PropertyValue::Integer(512)),
                ],
            ))
            .unwrap();
        assert_eq!(created.element.element_type(), ElementType::Source);
        assert!(created.handle.is_none());
    }

    #[test]
    fn test_create_datasrc() {
        let factory = ElementFactory::new();
        let created = factory
            .create(&parsed(
                "datasrc",
                vec![
                    ("data", PropertyValue::String("hello".into())),
                    ("chunk-size", PropertyValue::Integer(2)),
                    ("pts-interval-ms", PropertyValue::Integer(20)),
                ],
            ))
            .unwrap();

        let FactoryElement::Source(mut src) = created.element else {
            panic!("datasrc is not a source");
        };
        let buffers: Vec<_> = std::iter::from_fn(|| src.produce().unwrap()).collect();
        assert_eq!(buffers.len(), 3);
        assert_eq!(buffers[2].pts(), ClockTime::from_millis(40));
    }

    #[test]
    fn test_create_datasrc_negative_chunk_size() {
        let factory = ElementFactory::new();
        let err = factory
            .create(&parsed("datasrc", vec![("chunk-size", PropertyValue::Integer(-1))]))
            .err()
            .unwrap();
        assert!(matches!(err, Error::InvalidProperty { .. }));
    }

    #[test]
    fn test_create_appsink_has_handle() {
        let factory = ElementFactory::new();
        let created = factory.create(&parsed("appsink", vec![])).unwrap();
        assert_eq!(created.element.element_type(), ElementType::Sink);
        assert!(matches!(created.handle, Some(ElementHandle::AppSink(_))));
    }

    #[test]
    fn test_unknown_element() {
        let factory = ElementFactory::new();
        let err = factory
            .create(&parsed("unknown_element", vec![]))
            .err()
            .unwrap();
        assert!(matches!(err, Error::UnknownElement(ref name) if name == "unknown_element"));
    }

    #[test]
    fn test_register_custom_element() {
        fn create_custom(_props: &Properties) -> Result<CreatedElement> {
            Ok(CreatedElement::new(FactoryElement::Sink(Box::new(
                NullSink::with_name("custom"),
            ))))
        }

        let mut factory = ElementFactory::new();
        factory.register("custom", create_custom);
        let created = factory.create(&parsed("custom", vec![])).unwrap();
        assert_eq!(created.element.name(), "custom");
    }
}
