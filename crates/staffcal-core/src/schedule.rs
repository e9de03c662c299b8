//! Per-resource ordered view of normalized events.
//!
//! A [`ScheduleIndex`] is built fresh from one batch of events, queried, and
//! discarded; it is never mutated in place and owns no long-lived state.

use std::collections::HashMap;

use crate::event::NormalizedEvent;

/// Normalized events grouped by resource and ordered by start instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleIndex {
    by_resource: HashMap<String, Vec<NormalizedEvent>>,
}

impl ScheduleIndex {
    /// Groups events by resource and sorts each group ascending by start.
    ///
    /// O(n log n) overall. The sort is stable, so events with equal starts
    /// keep their submission order.
    pub fn build(events: impl IntoIterator<Item = NormalizedEvent>) -> Self {
        let mut by_resource: HashMap<String, Vec<NormalizedEvent>> = HashMap::new();
        for event in events {
            by_resource
                .entry(event.resource_id.clone())
                .or_default()
                .push(event);
        }
        for intervals in by_resource.values_mut() {
            intervals.sort_by_key(|event| event.start);
        }
        Self { by_resource }
    }

    /// Returns the ordered intervals for a resource.
    ///
    /// An unknown resource yields an empty slice, not an error.
    pub fn intervals_for(&self, resource_id: &str) -> &[NormalizedEvent] {
        self.by_resource
            .get(resource_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the resource identifiers present in the index.
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.by_resource.keys().map(String::as_str)
    }

    /// Number of resources with at least one event.
    pub fn resource_count(&self) -> usize {
        self.by_resource.len()
    }

    /// Total number of indexed events.
    pub fn event_count(&self) -> usize {
        self.by_resource.values().map(Vec::len).sum()
    }

    /// Returns true if the index holds no events.
    pub fn is_empty(&self) -> bool {
        self.by_resource.is_empty()
    }
}
