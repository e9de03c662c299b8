//! Temporal normalization and conflict/next-event scheduling core.
//!
//! Given booking records whose date/time fields arrive in inconsistent,
//! loosely-typed representations, this crate normalizes them to unambiguous
//! instants, determines whether a proposed booking instant conflicts with a
//! resource's existing commitments, and deterministically selects the
//! nearest future commitment for display.
//!
//! Data flows one way:
//! raw records → [`Normalizer`] → [`NormalizedEvent`] → [`ScheduleIndex`] →
//! {[`check_availability`], [`next_upcoming`]}.
//!
//! Every operation is a pure, synchronous transformation of its arguments:
//! no I/O, no shared state, no long-lived schedule object. Concurrent calls
//! need no coordination; each builds and discards its own transient view
//! (see [`ScheduleSnapshot`]). Malformed records are excluded and reported,
//! never fatal.

pub mod availability;
pub mod error;
pub mod event;
pub mod normalize;
pub mod schedule;
pub mod snapshot;
pub mod tracing;
pub mod upcoming;

pub use availability::{Availability, AvailabilityReport, check_availability};
pub use error::{
    InvalidIntervalError, NormalizationError, NormalizationReason, RecordError, RejectedRecord,
};
pub use event::{NormalizedEvent, RawEventRecord, RawTemporal, SourceRef};
pub use normalize::{NormalizedBatch, Normalizer, normalize_records};
pub use schedule::ScheduleIndex;
pub use snapshot::ScheduleSnapshot;
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use upcoming::{UpcomingSummary, next_upcoming};
