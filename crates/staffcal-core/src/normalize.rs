//! Multi-attempt date/time normalization.
//!
//! Upstream date formats are not authoritatively fixed: the same field may
//! carry a plain `YYYY-MM-DD` date, a full timestamp with `T` or a space
//! separator, or a timestamp standing in for a bare time of day. The
//! [`Normalizer`] tries a direct instant parse first and falls back to a
//! manual field-by-field reconstruction, keeping both attempts explicit
//! rather than assuming one format is canonical.
//!
//! Date-only text is always resolved from explicit calendar fields in the
//! normalizer's business timezone. It is never handed to a generic parser
//! that assumes UTC for bare dates, which would shift the calendar day under
//! a non-UTC zone and corrupt both conflict and past/future decisions.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tracing::debug;

use crate::error::{NormalizationError, NormalizationReason, RecordError, RejectedRecord};
use crate::event::{NormalizedEvent, RawEventRecord, RawTemporal, SourceRef};

const DEFAULT_TIME: &str = "00:00:00";

/// Resolves loosely-typed date/time values into UTC instants.
///
/// The normalizer carries an explicit business timezone as a fixed offset.
/// Naive wall-clock text is interpreted in that zone; text with a trailing
/// `Z` or an explicit offset is taken at face value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    zone: FixedOffset,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::utc()
    }
}

impl Normalizer {
    /// Creates a normalizer resolving naive text in the given business zone.
    pub fn new(zone: FixedOffset) -> Self {
        Self { zone }
    }

    /// Creates a normalizer resolving naive text as UTC wall-clock time.
    pub fn utc() -> Self {
        Self {
            zone: FixedOffset::east_opt(0).expect("zero offset is valid"),
        }
    }

    /// Returns the business zone this normalizer resolves naive text in.
    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    /// Resolves a raw (date, time) pair into a UTC instant.
    ///
    /// Attempts, in order:
    /// 1. accept an already-resolved instant as-is
    /// 2. parse combined date-time text directly
    /// 3. split the date portion from combined text, canonicalize the time
    ///    portion, and construct from explicit calendar fields
    /// 4. reconstruct from integers split on `-` and `:`
    ///
    /// Failure is reported as a typed [`NormalizationError`] carrying the
    /// raw inputs, so batch callers can keep going past a bad record.
    pub fn normalize(
        &self,
        raw_date: Option<&RawTemporal>,
        raw_time: Option<&RawTemporal>,
    ) -> Result<DateTime<Utc>, NormalizationError> {
        let Some(date) = raw_date else {
            return Err(self.error(NormalizationReason::MissingDate, raw_date, raw_time));
        };

        let text = match date {
            RawTemporal::Instant(dt) => return Ok(*dt),
            RawTemporal::Text(s) => s.trim(),
        };
        if text.is_empty() {
            return Err(self.error(NormalizationReason::MissingDate, raw_date, raw_time));
        }

        // Combined date-time text may parse as a whole.
        if has_time_separator(text) {
            if let Some(instant) = self.parse_instant_text(text) {
                return Ok(instant);
            }
        }

        let date_part = date_part_of(text);
        let time_text = self.time_text(raw_time);

        if let Some(instant) = self.from_calendar_fields(date_part, &time_text) {
            return Ok(instant);
        }
        if let Some(instant) = self.from_split_integers(date_part, &time_text) {
            return Ok(instant);
        }

        let reason = if date_parses(date_part) {
            NormalizationReason::UnparseableTime
        } else {
            NormalizationReason::UnparseableDate
        };
        Err(self.error(reason, raw_date, raw_time))
    }

    /// Parses combined date-time text directly as an instant.
    ///
    /// RFC 3339 first; then naive `T`/space-separated forms, taken as UTC
    /// when suffixed with `Z` and as business-zone wall clock otherwise.
    fn parse_instant_text(&self, text: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.with_timezone(&Utc));
        }

        let (body, is_utc) = match text.strip_suffix('Z') {
            Some(stripped) => (stripped, true),
            None => (text, false),
        };
        for format in [
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M",
        ] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(body, format) {
                return if is_utc {
                    Some(naive.and_utc())
                } else {
                    self.resolve(naive)
                };
            }
        }
        None
    }

    /// Canonicalizes the raw time value into `HH:MM[:SS]` text.
    fn time_text(&self, raw_time: Option<&RawTemporal>) -> String {
        let Some(raw) = raw_time else {
            return DEFAULT_TIME.to_string();
        };
        match raw {
            // The instant stands in for a time of day; read its wall clock
            // in the business zone.
            RawTemporal::Instant(dt) => dt
                .with_timezone(&self.zone)
                .time()
                .format("%H:%M:%S")
                .to_string(),
            RawTemporal::Text(s) => canonical_time_text(s),
        }
    }

    /// Constructs an instant from strict `%Y-%m-%d` and `%H:%M:%S` fields.
    fn from_calendar_fields(&self, date_part: &str, time_text: &str) -> Option<DateTime<Utc>> {
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
        let time = NaiveTime::parse_from_str(time_text, "%H:%M:%S").ok()?;
        self.resolve(date.and_time(time))
    }

    /// Reconstructs an instant from integers split on `-` and `:`.
    ///
    /// Catches non-padded values (`2025-6-8`, `9:30`) that the strict
    /// formats reject.
    fn from_split_integers(&self, date_part: &str, time_text: &str) -> Option<DateTime<Utc>> {
        let date = date_from_split(date_part)?;
        let time = time_from_split(time_text)?;
        self.resolve(date.and_time(time))
    }

    /// Resolves a naive wall-clock value in the business zone.
    fn resolve(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        naive
            .and_local_timezone(self.zone)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn error(
        &self,
        reason: NormalizationReason,
        raw_date: Option<&RawTemporal>,
        raw_time: Option<&RawTemporal>,
    ) -> NormalizationError {
        NormalizationError::new(
            reason,
            raw_date.map(ToString::to_string),
            raw_time.map(ToString::to_string),
        )
    }
}

fn has_time_separator(text: &str) -> bool {
    text.contains('T') || text.contains(' ')
}

/// Returns the date portion of possibly-combined date-time text.
fn date_part_of(text: &str) -> &str {
    text.split(['T', ' ']).next().unwrap_or(text)
}

/// Canonicalizes loose time text into `HH:MM:SS` form.
///
/// Strips an embedded date prefix, a trailing `Z`, and fractional seconds;
/// pads `HH:MM` with `:00`; defaults blank text to midnight.
fn canonical_time_text(raw: &str) -> String {
    let mut text = raw.trim();
    if let Some(separator) = text.find(['T', ' ']) {
        text = text[separator + 1..].trim();
    }
    text = text.trim_end_matches('Z');
    let text = text.split('.').next().unwrap_or(text);
    if text.is_empty() {
        return DEFAULT_TIME.to_string();
    }
    if text.chars().filter(|c| *c == ':').count() == 1 {
        return format!("{text}:00");
    }
    text.to_string()
}

fn date_parses(date_part: &str) -> bool {
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").is_ok() || date_from_split(date_part).is_some()
}

fn date_from_split(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split('-');
    let year = parts.next()?.trim().parse().ok()?;
    let month = parts.next()?.trim().parse().ok()?;
    let day = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn time_from_split(text: &str) -> Option<NaiveTime> {
    let mut parts = text.split(':');
    let hour = parts.next()?.trim().parse().ok()?;
    let minute = parts.next()?.trim().parse().ok()?;
    let second = match parts.next() {
        Some(part) => part.trim().parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, second)
}

/// The outcome of normalizing a batch of raw records.
///
/// Valid events keep their submission order; rejected records are reported
/// alongside rather than aborting the batch.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// Successfully normalized events, in submission order.
    pub events: Vec<NormalizedEvent>,
    /// Records excluded from the working set, with reasons.
    pub rejected: Vec<RejectedRecord>,
}

impl NormalizedBatch {
    /// Number of records excluded from the working set.
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Normalizes a batch of raw records, partitioning valid events from
/// rejections.
///
/// A single malformed record never aborts the batch; it is excluded and
/// reported in [`NormalizedBatch::rejected`].
pub fn normalize_records(records: &[RawEventRecord], normalizer: &Normalizer) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    for (source_ref, record) in records.iter().enumerate() {
        match normalize_record(record, source_ref, normalizer) {
            Ok(event) => batch.events.push(event),
            Err(error) => {
                debug!(source_ref, %error, "excluding record from working set");
                batch.rejected.push(RejectedRecord { source_ref, error });
            }
        }
    }
    batch
}

fn normalize_record(
    record: &RawEventRecord,
    source_ref: SourceRef,
    normalizer: &Normalizer,
) -> Result<NormalizedEvent, RecordError> {
    let start = normalizer.normalize(record.date.as_ref(), record.start_time.as_ref())?;
    let end = normalizer.normalize(record.date.as_ref(), record.end_time.as_ref())?;
    let event = NormalizedEvent::new(
        &record.resource_id,
        start,
        end,
        record.effective_title(),
        source_ref,
    )?;
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn text(s: &str) -> RawTemporal {
        RawTemporal::from(s)
    }

    mod direct_instants {
        use super::*;

        #[test]
        fn accepts_resolved_instant_as_is() {
            let dt = utc(2025, 6, 18, 9, 30, 0);
            let normalizer = Normalizer::utc();
            let result = normalizer
                .normalize(Some(&RawTemporal::from(dt)), None)
                .unwrap();
            assert_eq!(result, dt);
        }

        #[test]
        fn parses_rfc3339_text() {
            let normalizer = Normalizer::utc();
            let result = normalizer
                .normalize(Some(&text("2025-06-18T09:30:00Z")), None)
                .unwrap();
            assert_eq!(result, utc(2025, 6, 18, 9, 30, 0));
        }

        #[test]
        fn parses_offset_text() {
            let normalizer = Normalizer::utc();
            let result = normalizer
                .normalize(Some(&text("2025-06-18T09:30:00+02:00")), None)
                .unwrap();
            assert_eq!(result, utc(2025, 6, 18, 7, 30, 0));
        }

        #[test]
        fn equivalent_combined_forms() {
            // The round-trip property: all three spellings are one instant.
            let normalizer = Normalizer::utc();
            let from_pair = normalizer
                .normalize(Some(&text("2025-06-18")), Some(&text("09:30")))
                .unwrap();
            let with_t = normalizer
                .normalize(Some(&text("2025-06-18T09:30:00")), None)
                .unwrap();
            let with_space = normalizer
                .normalize(Some(&text("2025-06-18 09:30:00")), None)
                .unwrap();

            assert_eq!(from_pair, utc(2025, 6, 18, 9, 30, 0));
            assert_eq!(with_t, from_pair);
            assert_eq!(with_space, from_pair);
        }
    }

    mod field_construction {
        use super::*;

        #[test]
        fn pads_short_time() {
            let normalizer = Normalizer::utc();
            let result = normalizer
                .normalize(Some(&text("2025-06-18")), Some(&text("09:30")))
                .unwrap();
            assert_eq!(result, utc(2025, 6, 18, 9, 30, 0));
        }

        #[test]
        fn accepts_full_time() {
            let normalizer = Normalizer::utc();
            let result = normalizer
                .normalize(Some(&text("2025-06-18")), Some(&text("09:30:45")))
                .unwrap();
            assert_eq!(result, utc(2025, 6, 18, 9, 30, 45));
        }

        #[test]
        fn missing_time_defaults_to_midnight() {
            let normalizer = Normalizer::utc();
            let result = normalizer.normalize(Some(&text("2025-06-18")), None).unwrap();
            assert_eq!(result, utc(2025, 6, 18, 0, 0, 0));
        }

        #[test]
        fn blank_time_defaults_to_midnight() {
            let normalizer = Normalizer::utc();
            let result = normalizer
                .normalize(Some(&text("2025-06-18")), Some(&text("  ")))
                .unwrap();
            assert_eq!(result, utc(2025, 6, 18, 0, 0, 0));
        }

        #[test]
        fn extracts_time_of_day_from_timestamp_text() {
            // Time embedded in a full timestamp with millis and trailing Z:
            // only the wall clock is taken, so the day never shifts.
            let normalizer = Normalizer::utc();
            let result = normalizer
                .normalize(
                    Some(&text("2025-06-18")),
                    Some(&text("2025-06-18T09:00:00.000Z")),
                )
                .unwrap();
            assert_eq!(result, utc(2025, 6, 18, 9, 0, 0));
        }

        #[test]
        fn extracts_time_of_day_from_resolved_instant() {
            let normalizer = Normalizer::utc();
            let result = normalizer
                .normalize(
                    Some(&text("2025-06-18")),
                    Some(&RawTemporal::from(utc(2024, 1, 1, 14, 15, 0))),
                )
                .unwrap();
            assert_eq!(result, utc(2025, 6, 18, 14, 15, 0));
        }

        #[test]
        fn trims_whitespace() {
            let normalizer = Normalizer::utc();
            let result = normalizer
                .normalize(Some(&text("  2025-06-18  ")), Some(&text(" 09:30 ")))
                .unwrap();
            assert_eq!(result, utc(2025, 6, 18, 9, 30, 0));
        }
    }

    mod business_zone {
        use super::*;

        fn lima() -> Normalizer {
            // UTC-5, no DST.
            Normalizer::new(FixedOffset::west_opt(5 * 3600).unwrap())
        }

        #[test]
        fn date_only_stays_on_its_calendar_day() {
            let normalizer = lima();
            let instant = normalizer.normalize(Some(&text("2025-06-18")), None).unwrap();

            // Midnight wall clock in the business zone, not midnight UTC.
            assert_eq!(instant, utc(2025, 6, 18, 5, 0, 0));
            let local = instant.with_timezone(&normalizer.zone());
            assert_eq!(
                local.date_naive(),
                NaiveDate::from_ymd_opt(2025, 6, 18).unwrap()
            );
        }

        #[test]
        fn equivalent_forms_in_non_utc_zone() {
            let normalizer = lima();
            let from_pair = normalizer
                .normalize(Some(&text("2025-06-18")), Some(&text("09:30")))
                .unwrap();
            let combined = normalizer
                .normalize(Some(&text("2025-06-18 09:30:00")), None)
                .unwrap();
            assert_eq!(from_pair, utc(2025, 6, 18, 14, 30, 0));
            assert_eq!(combined, from_pair);
        }

        #[test]
        fn zulu_suffix_overrides_business_zone() {
            let normalizer = lima();
            let result = normalizer
                .normalize(Some(&text("2025-06-18T09:30:00Z")), None)
                .unwrap();
            assert_eq!(result, utc(2025, 6, 18, 9, 30, 0));
        }
    }

    mod split_fallback {
        use super::*;

        #[test]
        fn accepts_non_padded_date() {
            let normalizer = Normalizer::utc();
            let result = normalizer
                .normalize(Some(&text("2025-6-8")), Some(&text("9:30")))
                .unwrap();
            assert_eq!(result, utc(2025, 6, 8, 9, 30, 0));
        }

        #[test]
        fn rejects_out_of_range_fields() {
            let normalizer = Normalizer::utc();
            let err = normalizer
                .normalize(Some(&text("2025-13-45")), None)
                .unwrap_err();
            assert_eq!(err.reason, NormalizationReason::UnparseableDate);
        }
    }

    mod failures {
        use super::*;

        #[test]
        fn missing_date() {
            let normalizer = Normalizer::utc();
            let err = normalizer.normalize(None, Some(&text("09:30"))).unwrap_err();
            assert_eq!(err.reason, NormalizationReason::MissingDate);
            assert_eq!(err.raw_date, None);
            assert_eq!(err.raw_time, Some("09:30".to_string()));
        }

        #[test]
        fn blank_date() {
            let normalizer = Normalizer::utc();
            let err = normalizer.normalize(Some(&text("   ")), None).unwrap_err();
            assert_eq!(err.reason, NormalizationReason::MissingDate);
        }

        #[test]
        fn unparseable_date_carries_raw_values() {
            let normalizer = Normalizer::utc();
            let err = normalizer
                .normalize(Some(&text("not-a-date")), Some(&text("09:30")))
                .unwrap_err();
            assert_eq!(err.reason, NormalizationReason::UnparseableDate);
            assert_eq!(err.raw_date, Some("not-a-date".to_string()));
            assert_eq!(err.raw_time, Some("09:30".to_string()));
        }

        #[test]
        fn unparseable_time_is_distinguished() {
            let normalizer = Normalizer::utc();
            let err = normalizer
                .normalize(Some(&text("2025-06-18")), Some(&text("half past nine")))
                .unwrap_err();
            assert_eq!(err.reason, NormalizationReason::UnparseableTime);
        }
    }

    mod batch {
        use super::*;
        use crate::event::RawEventRecord;

        fn records() -> Vec<RawEventRecord> {
            vec![
                RawEventRecord::new("C1")
                    .with_date("2025-06-18")
                    .with_start_time("09:00")
                    .with_end_time("11:00")
                    .with_title("Taller A"),
                // No date at all.
                RawEventRecord::new("C2").with_start_time("09:00"),
                // Inverted interval.
                RawEventRecord::new("C1")
                    .with_date("2025-06-18")
                    .with_start_time("15:00")
                    .with_end_time("14:00")
                    .with_title("Inverted"),
                RawEventRecord::new("C2")
                    .with_date("2025-06-19")
                    .with_start_time("10:00")
                    .with_end_time("12:00")
                    .with_title("Sesión B"),
            ]
        }

        #[test]
        fn partitions_events_and_rejections() {
            let batch = normalize_records(&records(), &Normalizer::utc());

            assert_eq!(batch.events.len(), 2);
            assert_eq!(batch.rejected_count(), 2);

            // Submission order is preserved on both sides.
            assert_eq!(batch.events[0].title, "Taller A");
            assert_eq!(batch.events[0].source_ref, 0);
            assert_eq!(batch.events[1].title, "Sesión B");
            assert_eq!(batch.events[1].source_ref, 3);

            assert_eq!(batch.rejected[0].source_ref, 1);
            assert_eq!(batch.rejected[0].error.code(), "missing_date");
            assert_eq!(batch.rejected[1].source_ref, 2);
            assert_eq!(batch.rejected[1].error.code(), "invalid_interval");
        }

        #[test]
        fn missing_end_time_collapses_to_midnight_and_rejects() {
            let records = vec![
                RawEventRecord::new("C1")
                    .with_date("2025-06-18")
                    .with_start_time("09:00"),
            ];
            let batch = normalize_records(&records, &Normalizer::utc());

            assert!(batch.events.is_empty());
            assert_eq!(batch.rejected[0].error.code(), "invalid_interval");
        }

        #[test]
        fn empty_batch() {
            let batch = normalize_records(&[], &Normalizer::utc());
            assert!(batch.events.is_empty());
            assert_eq!(batch.rejected_count(), 0);
        }
    }
}
