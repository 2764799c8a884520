//! Time-scheduled property changes.
//!
//! A [`Controller`] binds property names to [`ControlSource`]s. When an
//! element receives a timestamped buffer it calls
//! [`Controller::sync_at`], which writes every bound property's scheduled
//! value into a [`ControlTarget`] before the element reads its settings.
//!
//! # Example
//!
//! ```rust
//! use md5sum::clock::ClockTime;
//! use md5sum::control::{Controller, TimelineSource};
//! use md5sum::elements::Md5Sum;
//! use md5sum::pipeline::PropertyValue;
//!
//! let mut timeline = TimelineSource::new();
//! timeline.set(ClockTime::from_secs(2), PropertyValue::Bool(true));
//!
//! let controller = Controller::new();
//! controller.bind("silent", timeline);
//!
//! let md5sum = Md5Sum::new().with_controller(controller);
//! ```

mod controller;
mod source;

pub use controller::{ControlTarget, Controller};
pub use source::{ControlSource, TimelineSource};
