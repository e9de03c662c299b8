//! Per-query schedule snapshot.
//!
//! A [`ScheduleSnapshot`] wires one batch of raw records through
//! normalization and indexing, answers the two boundary questions ("is this
//! resource free at this time", "what is the next commitment"), and exposes
//! the records that were excluded along the way. It replaces the page-level
//! mutable schedule state of the surrounding application with explicit
//! arguments and return values; build one per query and discard it.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::availability::{AvailabilityReport, check_availability};
use crate::error::RejectedRecord;
use crate::event::{NormalizedEvent, RawEventRecord};
use crate::normalize::{Normalizer, normalize_records};
use crate::schedule::ScheduleIndex;
use crate::upcoming::{UpcomingSummary, next_upcoming};

/// A transient, query-scoped view over one batch of raw records.
#[derive(Debug, Clone)]
pub struct ScheduleSnapshot {
    // Submission order, for the stable next-upcoming tie-break.
    events: Vec<NormalizedEvent>,
    index: ScheduleIndex,
    rejected: Vec<RejectedRecord>,
}

impl ScheduleSnapshot {
    /// Normalizes and indexes a batch of raw records.
    ///
    /// Malformed records are excluded and reported via [`rejected`]; they
    /// never abort the build and never surface in query answers.
    ///
    /// [`rejected`]: ScheduleSnapshot::rejected
    pub fn build(records: &[RawEventRecord], normalizer: &Normalizer) -> Self {
        let batch = normalize_records(records, normalizer);
        if !batch.rejected.is_empty() {
            warn!(
                excluded = batch.rejected.len(),
                submitted = records.len(),
                "some records were excluded from the schedule"
            );
        }
        let index = ScheduleIndex::build(batch.events.iter().cloned());
        Self {
            events: batch.events,
            index,
            rejected: batch.rejected,
        }
    }

    /// The normalized events in submission order.
    pub fn events(&self) -> &[NormalizedEvent] {
        &self.events
    }

    /// The per-resource ordered index.
    pub fn index(&self) -> &ScheduleIndex {
        &self.index
    }

    /// Records excluded during normalization, with reasons.
    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    /// Number of records excluded during normalization.
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// Answers whether a resource is free at the query instant.
    pub fn check_availability(
        &self,
        resource_id: &str,
        query: DateTime<Utc>,
    ) -> AvailabilityReport {
        check_availability(&self.index, resource_id, query).report()
    }

    /// Summarizes the soonest commitment starting strictly after `now`.
    pub fn next_upcoming(&self, now: DateTime<Utc>) -> Option<UpcomingSummary> {
        next_upcoming(&self.events, now).map(UpcomingSummary::from)
    }
}
