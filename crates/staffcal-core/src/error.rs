//! Error types for record normalization.
//!
//! Both error kinds are non-fatal by design: the offending record is
//! excluded from the working set and reported next to the normal results,
//! and every query still answers over the remaining valid records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::SourceRef;

/// Why a raw date/time value could not be normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationReason {
    /// The record carries no date at all.
    MissingDate,
    /// The date portion could not be interpreted by any parsing attempt.
    UnparseableDate,
    /// The date was fine but the time portion could not be interpreted.
    UnparseableTime,
}

impl NormalizationReason {
    /// Returns a stable machine-readable name for this reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingDate => "missing_date",
            Self::UnparseableDate => "unparseable_date",
            Self::UnparseableTime => "unparseable_time",
        }
    }
}

impl fmt::Display for NormalizationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A date/time pair that could not be resolved to an instant.
///
/// Carries the original raw values so the surrounding application can log
/// or surface them; never thrown across the core's public boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("cannot normalize date/time: {reason} (date: {raw_date:?}, time: {raw_time:?})")]
pub struct NormalizationError {
    /// Why normalization failed.
    pub reason: NormalizationReason,
    /// The raw date value as submitted, if any.
    pub raw_date: Option<String>,
    /// The raw time value as submitted, if any.
    pub raw_time: Option<String>,
}

impl NormalizationError {
    /// Creates a normalization error from the raw values as submitted.
    pub fn new(
        reason: NormalizationReason,
        raw_date: Option<String>,
        raw_time: Option<String>,
    ) -> Self {
        Self {
            reason,
            raw_date,
            raw_time,
        }
    }
}

/// An event interval that is empty or inverted (`end <= start`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("event interval is empty or inverted: start {start}, end {end}")]
pub struct InvalidIntervalError {
    /// The resolved start instant.
    pub start: DateTime<Utc>,
    /// The resolved end instant.
    pub end: DateTime<Utc>,
}

/// Any reason a raw record was excluded from the working set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The record's date/time fields could not be normalized.
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
    /// The record normalized to an empty or inverted interval.
    #[error(transparent)]
    InvalidInterval(#[from] InvalidIntervalError),
}

impl RecordError {
    /// Returns a stable machine-readable name for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Normalization(e) => e.reason.as_str(),
            Self::InvalidInterval(_) => "invalid_interval",
        }
    }
}

/// A record excluded during batch normalization, with the reason why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Position of the record in the submitted batch.
    pub source_ref: SourceRef,
    /// Why the record was excluded.
    pub error: RecordError,
}
