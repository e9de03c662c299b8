//! Availability probes against a schedule index.
//!
//! A resource is unavailable at a query instant iff the instant falls in the
//! half-open `[start, end)` of one of its events, so a booking exactly at
//! another event's end is not a conflict.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::NormalizedEvent;
use crate::schedule::ScheduleIndex;

/// The outcome of an availability probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability<'a> {
    /// Whether the resource is free at the query instant.
    pub available: bool,
    /// The earliest-starting conflicting event, if any.
    pub conflict: Option<&'a NormalizedEvent>,
}

impl Availability<'_> {
    /// Converts to the serializable boundary shape.
    pub fn report(&self) -> AvailabilityReport {
        AvailabilityReport {
            available: self.available,
            conflict_title: self.conflict.map(|event| event.title.clone()),
        }
    }
}

/// Serializable answer to "is this resource free at this time".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    /// Whether the resource is free at the query instant.
    pub available: bool,
    /// Title of the earliest-starting conflicting event, if any.
    pub conflict_title: Option<String>,
}

/// Checks whether a resource is free at the query instant.
///
/// Binary search on start bounds the candidates (only intervals starting at
/// or before the query can contain it); the bounded prefix is then scanned
/// in start order so that the earliest-starting conflict is reported when
/// intervals overlap. A resource with zero intervals is trivially available.
pub fn check_availability<'a>(
    index: &'a ScheduleIndex,
    resource_id: &str,
    query: DateTime<Utc>,
) -> Availability<'a> {
    let intervals = index.intervals_for(resource_id);
    let bound = intervals.partition_point(|event| event.start <= query);
    let conflict = intervals[..bound].iter().find(|event| query < event.end);
    Availability {
        available: conflict.is_none(),
        conflict,
    }
}
