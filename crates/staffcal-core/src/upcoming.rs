//! Next-commitment selection for dashboard summaries.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::event::NormalizedEvent;

/// Serializable summary of the nearest future commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingSummary {
    /// The event title.
    pub title: String,
    /// The start instant as an ISO 8601 string.
    pub start_instant: String,
    /// The resource the event is attached to.
    pub resource_id: String,
}

impl From<&NormalizedEvent> for UpcomingSummary {
    fn from(event: &NormalizedEvent) -> Self {
        Self {
            title: event.title.clone(),
            start_instant: event.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            resource_id: event.resource_id.clone(),
        }
    }
}

/// Picks the soonest event starting strictly after `now`.
///
/// Single O(n) pass; no sorting. Ties on start instant are broken by first
/// occurrence in the input sequence, so the result is stable under
/// reordering of non-winning events. Returns `None` when nothing qualifies.
pub fn next_upcoming<'a, I>(events: I, now: DateTime<Utc>) -> Option<&'a NormalizedEvent>
where
    I: IntoIterator<Item = &'a NormalizedEvent>,
{
    let mut best: Option<&NormalizedEvent> = None;
    for event in events {
        if !event.starts_after(now) {
            continue;
        }
        match best {
            Some(current) if event.start >= current.start => {}
            _ => best = Some(event),
        }
    }
    best
}
