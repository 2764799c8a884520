//! Pipeline construction and execution.
//!
//! - [`parse_pipeline`]: Parses a launch line into element descriptions
//! - [`ElementFactory`]: Builds elements from those descriptions
//! - [`Pipeline`]: Runs a source, a chain of elements and a sink
//!
//! # Example
//!
//! ```rust
//! use md5sum::elements::{DataSrc, Md5Sum, NullSink};
//! use md5sum::pipeline::Pipeline;
//!
//! let mut pipeline = Pipeline::new(DataSrc::new(b"abc".to_vec()), NullSink::new());
//! pipeline.add_element(Md5Sum::new());
//!
//! let stats = pipeline.run().unwrap();
//! assert_eq!(stats.buffers_out, 1);
//! ```

mod chain;
pub mod factory;
pub mod parser;

pub use chain::{Pipeline, PipelineStats};
pub use factory::{
    CreatedElement, ElementConstructor, ElementFactory, ElementHandle, ElementType,
    FactoryElement, Properties,
};
pub use parser::{ParsedElement, ParsedPipeline, PropertyValue, parse_pipeline};
