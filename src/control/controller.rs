//! Property bindings and timestamp synchronization.

use super::ControlSource;
use crate::clock::ClockTime;
use crate::error::Result;
use crate::pipeline::PropertyValue;
use std::sync::{Arc, Mutex};

/// Something whose properties a [`Controller`] can write.
pub trait ControlTarget {
    /// Set a property by name.
    ///
    /// Implementations reject unknown names and wrong value types with
    /// [`Error::InvalidProperty`](crate::error::Error::InvalidProperty).
    fn set_property(&self, name: &str, value: &PropertyValue) -> Result<()>;
}

struct Binding {
    property: String,
    source: Box<dyn ControlSource>,
    disabled: bool,
    /// Last value written to the target.
    last: Option<PropertyValue>,
}

/// Schedules property values against stream time.
///
/// The controller is a cheap, cloneable handle: clones share the same set of
/// bindings, so a control thread can rebind or disable properties while the
/// streaming thread keeps calling [`sync_at`](Self::sync_at).
///
/// A binding writes to its target only when its scheduled value differs from
/// the one it wrote last. Values set through other channels between two
/// control points therefore stick until the next point takes effect.
#[derive(Clone, Default)]
pub struct Controller {
    bindings: Arc<Mutex<Vec<Binding>>>,
}

impl Controller {
    /// Create a controller with no bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `property` to `source`, replacing any existing binding for it.
    pub fn bind(&self, property: impl Into<String>, source: impl ControlSource + 'static) {
        let property = property.into();
        let mut bindings = self.bindings.lock().unwrap();
        bindings.retain(|b| b.property != property);
        bindings.push(Binding {
            property,
            source: Box::new(source),
            disabled: false,
            last: None,
        });
    }

    /// Remove the binding for `property`. Returns whether one existed.
    pub fn unbind(&self, property: &str) -> bool {
        let mut bindings = self.bindings.lock().unwrap();
        let before = bindings.len();
        bindings.retain(|b| b.property != property);
        bindings.len() != before
    }

    /// Check whether `property` has a binding.
    pub fn is_bound(&self, property: &str) -> bool {
        self.bindings
            .lock()
            .unwrap()
            .iter()
            .any(|b| b.property == property)
    }

    /// Names of all bound properties, in binding order.
    pub fn bound_properties(&self) -> Vec<String> {
        self.bindings
            .lock()
            .unwrap()
            .iter()
            .map(|b| b.property.clone())
            .collect()
    }

    /// Suspend or resume a binding without removing it.
    ///
    /// Returns false if `property` is not bound.
    pub fn set_disabled(&self, property: &str, disabled: bool) -> bool {
        let mut bindings = self.bindings.lock().unwrap();
        match bindings.iter_mut().find(|b| b.property == property) {
            Some(binding) => {
                binding.disabled = disabled;
                if !disabled {
                    binding.last = None;
                }
                true
            }
            None => false,
        }
    }

    /// Apply every bound property's value scheduled at or before `timestamp`.
    ///
    /// Returns whether any property was written. Calling with
    /// [`ClockTime::NONE`] is a no-op.
    ///
    /// # Errors
    ///
    /// The first error returned by the target aborts the sync; bindings
    /// already applied in this call keep their new values.
    pub fn sync_at(&self, timestamp: ClockTime, target: &dyn ControlTarget) -> Result<bool> {
        if timestamp.is_none() {
            return Ok(false);
        }

        let mut bindings = self.bindings.lock().unwrap();
        let mut applied = false;

        for binding in bindings.iter_mut().filter(|b| !b.disabled) {
            let Some(value) = binding.source.value_at(timestamp) else {
                continue;
            };
            if binding.last.as_ref() == Some(&value) {
                continue;
            }

            tracing::trace!(
                property = %binding.property,
                value = %value.as_string(),
                timestamp = %timestamp,
                "applying controlled value"
            );
            target.set_property(&binding.property, &value)?;
            binding.last = Some(value);
            applied = true;
        }

        Ok(applied)
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("bindings", &self.bound_properties())
            .finish()
    }
}
