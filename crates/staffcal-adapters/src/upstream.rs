//! Upstream booking shapes.
//!
//! The scheduling front end submits bookings in two historically grown
//! shapes: group workshops (`consultant`/`event_date`/`topic` field names)
//! and individual sessions (`consultant_id`/`session_date`/`subject`). This
//! module models both as a tagged union and resolves either into the single
//! canonical [`RawEventRecord`] the core consumes, so the core stays
//! agnostic to a record's origin.
//!
//! Date and time fields accept either an RFC 3339 instant or loose text per
//! field; that distinction is carried through unchanged for the core's
//! normalizer to sort out.

use serde::{Deserialize, Serialize};
use staffcal_core::{RawEventRecord, RawTemporal};
use tracing::debug;

/// A group workshop booking as submitted by the events page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBooking {
    /// The consultant assigned to the workshop.
    pub consultant: String,
    /// The workshop date.
    pub event_date: Option<RawTemporal>,
    /// When the workshop starts.
    pub start_time: Option<RawTemporal>,
    /// When the workshop ends.
    pub end_time: Option<RawTemporal>,
    /// The workshop topic, used as the event title.
    pub topic: Option<String>,
}

/// An individual session booking as submitted by the sessions page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualBooking {
    /// The consultant the session is booked with.
    pub consultant_id: String,
    /// The session date.
    pub session_date: Option<RawTemporal>,
    /// When the session starts.
    pub session_start: Option<RawTemporal>,
    /// When the session ends.
    pub session_end: Option<RawTemporal>,
    /// The session subject, used as the event title.
    pub subject: Option<String>,
}

/// A booking in either upstream shape.
///
/// Deserialization is untagged: the required identifier field
/// (`consultant` vs `consultant_id`) decides the shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UpstreamRecord {
    /// Group workshop shape.
    Group(GroupBooking),
    /// Individual session shape.
    Individual(IndividualBooking),
}

impl UpstreamRecord {
    /// The consultant this booking is attached to, regardless of shape.
    pub fn resource_id(&self) -> &str {
        match self {
            Self::Group(booking) => &booking.consultant,
            Self::Individual(booking) => &booking.consultant_id,
        }
    }

    /// Resolves this booking into the canonical raw record.
    pub fn into_record(self) -> RawEventRecord {
        match self {
            Self::Group(booking) => RawEventRecord {
                resource_id: booking.consultant,
                date: booking.event_date,
                start_time: booking.start_time,
                end_time: booking.end_time,
                title: booking.topic,
            },
            Self::Individual(booking) => RawEventRecord {
                resource_id: booking.consultant_id,
                date: booking.session_date,
                start_time: booking.session_start,
                end_time: booking.session_end,
                title: booking.subject,
            },
        }
    }
}

impl From<UpstreamRecord> for RawEventRecord {
    fn from(record: UpstreamRecord) -> Self {
        record.into_record()
    }
}

/// Resolves a batch of upstream bookings into canonical raw records.
pub fn adapt_records(records: impl IntoIterator<Item = UpstreamRecord>) -> Vec<RawEventRecord> {
    let adapted: Vec<RawEventRecord> = records
        .into_iter()
        .map(UpstreamRecord::into_record)
        .collect();
    debug!(count = adapted.len(), "adapted upstream records");
    adapted
}
