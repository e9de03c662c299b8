//! Event record types for consultant schedules.
//!
//! This module provides the two ends of the normalization pipeline:
//! - [`RawEventRecord`]: an untrusted booking record as it arrives from
//!   upstream, with loosely-typed date/time fields
//! - [`NormalizedEvent`]: an event whose start and end have been resolved to
//!   unambiguous instants, with `start < end` guaranteed by construction

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InvalidIntervalError;

/// Index of a record within the batch it was submitted in.
///
/// Used to tie a [`NormalizedEvent`] (or a rejection) back to its source
/// record without keeping the raw record alive.
pub type SourceRef = usize;

/// A date or time value of uncertain shape.
///
/// Upstream systems send temporal fields either as an already-resolved
/// instant or as free-form text: a plain `YYYY-MM-DD` date, a full
/// timestamp, a bare time of day, or a timestamp standing in for a time of
/// day. No invariant holds on this type; the [`Normalizer`] is responsible
/// for making sense of it.
///
/// [`Normalizer`]: crate::normalize::Normalizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTemporal {
    /// An already-resolved instant (RFC 3339 with offset on the wire).
    Instant(DateTime<Utc>),
    /// Anything else: date, time, or combined text of unknown format.
    Text(String),
}

impl RawTemporal {
    /// Returns the instant if this value is already resolved.
    pub fn as_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Instant(dt) => Some(*dt),
            Self::Text(_) => None,
        }
    }

    /// Returns the raw text if this value is unresolved.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Instant(_) => None,
        }
    }
}

impl From<DateTime<Utc>> for RawTemporal {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Instant(dt)
    }
}

impl From<&str> for RawTemporal {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawTemporal {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl fmt::Display for RawTemporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instant(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// An untrusted booking record from upstream.
///
/// All temporal fields are optional and loosely typed; a record with a
/// missing or unparseable date is rejected during normalization rather than
/// failing the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEventRecord {
    /// The consultant (or other schedulable entity) this booking is for.
    pub resource_id: String,
    /// The booking date, possibly with an embedded time of day.
    pub date: Option<RawTemporal>,
    /// When the booking starts; midnight is assumed when absent.
    pub start_time: Option<RawTemporal>,
    /// When the booking ends; midnight is assumed when absent.
    pub end_time: Option<RawTemporal>,
    /// The booking title.
    pub title: Option<String>,
}

impl RawEventRecord {
    /// Creates a record for the given resource with all other fields unset.
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            date: None,
            start_time: None,
            end_time: None,
            title: None,
        }
    }

    /// Returns the effective title, falling back to "(untitled)" if blank.
    pub fn effective_title(&self) -> &str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("(untitled)")
    }

    /// Builder method to set the date.
    pub fn with_date(mut self, date: impl Into<RawTemporal>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Builder method to set the start time.
    pub fn with_start_time(mut self, start_time: impl Into<RawTemporal>) -> Self {
        self.start_time = Some(start_time.into());
        self
    }

    /// Builder method to set the end time.
    pub fn with_end_time(mut self, end_time: impl Into<RawTemporal>) -> Self {
        self.end_time = Some(end_time.into());
        self
    }

    /// Builder method to set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// An event whose start and end have been resolved to instants.
///
/// Invariant: `start < end`. The only constructor rejects violators, so a
/// `NormalizedEvent` can always be treated as a non-empty half-open interval
/// `[start, end)`. Deserialization is deliberately not provided; events are
/// rebuilt from raw records per query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedEvent {
    /// The resource this event is attached to.
    pub resource_id: String,
    /// When the event starts (inclusive).
    pub start: DateTime<Utc>,
    /// When the event ends (exclusive).
    pub end: DateTime<Utc>,
    /// The event title.
    pub title: String,
    /// Position of the source record in its batch.
    pub source_ref: SourceRef,
}

impl NormalizedEvent {
    /// Creates a normalized event, rejecting empty or inverted intervals.
    pub fn new(
        resource_id: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        title: impl Into<String>,
        source_ref: SourceRef,
    ) -> Result<Self, InvalidIntervalError> {
        if end <= start {
            return Err(InvalidIntervalError { start, end });
        }
        Ok(Self {
            resource_id: resource_id.into(),
            start,
            end,
            title: title.into(),
            source_ref,
        })
    }

    /// Checks whether an instant falls within this event's `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Checks whether this event starts strictly after the given instant.
    pub fn starts_after(&self, now: DateTime<Utc>) -> bool {
        self.start > now
    }

    /// Returns the duration of the event in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}
