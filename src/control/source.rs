//! Control sources: where scheduled values come from.

use crate::clock::ClockTime;
use crate::pipeline::PropertyValue;
use std::collections::BTreeMap;

/// Supplies the value a property should have at a given stream time.
pub trait ControlSource: Send {
    /// Value at `timestamp`, or `None` if nothing is scheduled yet.
    fn value_at(&self, timestamp: ClockTime) -> Option<PropertyValue>;
}

/// A list of control points with step interpolation.
///
/// The value at `t` is the value of the latest point at or before `t`, held
/// until the next point. Before the first point there is no value and the
/// property is left alone.
///
/// ```rust
/// use md5sum::clock::ClockTime;
/// use md5sum::control::{ControlSource, TimelineSource};
/// use md5sum::pipeline::PropertyValue;
///
/// let mut timeline = TimelineSource::new();
/// timeline.set(ClockTime::from_nanos(100), PropertyValue::Bool(true));
///
/// assert_eq!(timeline.value_at(ClockTime::from_nanos(99)), None);
/// assert_eq!(
///     timeline.value_at(ClockTime::from_nanos(100)),
///     Some(PropertyValue::Bool(true))
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimelineSource {
    points: BTreeMap<ClockTime, PropertyValue>,
}

impl TimelineSource {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `value` at `timestamp`, replacing any point already there.
    ///
    /// Points at [`ClockTime::NONE`] are ignored.
    pub fn set(&mut self, timestamp: ClockTime, value: PropertyValue) -> &mut Self {
        if timestamp.is_some() {
            self.points.insert(timestamp, value);
        }
        self
    }

    /// Remove the point at `timestamp`. Returns whether one existed.
    pub fn unset(&mut self, timestamp: ClockTime) -> bool {
        self.points.remove(&timestamp).is_some()
    }

    /// Remove every point.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Number of control points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if no points are scheduled.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl ControlSource for TimelineSource {
    fn value_at(&self, timestamp: ClockTime) -> Option<PropertyValue> {
        if timestamp.is_none() {
            return None;
        }
        self.points
            .range(..=timestamp)
            .next_back()
            .map(|(_, value)| value.clone())
    }
}

impl<F> ControlSource for F
where
    F: Fn(ClockTime) -> Option<PropertyValue> + Send,
{
    fn value_at(&self, timestamp: ClockTime) -> Option<PropertyValue> {
        self(timestamp)
    }
}
