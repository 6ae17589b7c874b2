//! ISO-8601 instants as exchanged with the store.
//!
//! Canonical form is UTC with millisecond precision:
//! `1970-01-01T00:00:00.000Z`. Only four-digit years are representable, so
//! instants are bounded to `0000-01-01T00:00:00.000Z` through
//! `9999-12-31T23:59:59.999Z` in both directions.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Milliseconds since the epoch of `0000-01-01T00:00:00.000Z`.
const MIN_EPOCH_MILLIS: i64 = -62_167_219_200_000;

/// Milliseconds since the epoch of `9999-12-31T23:59:59.999Z`.
const MAX_EPOCH_MILLIS: i64 = 253_402_300_799_999;

fn in_range(dt: &DateTime<Utc>) -> bool {
    (MIN_EPOCH_MILLIS..=MAX_EPOCH_MILLIS).contains(&dt.timestamp_millis())
}

/// Parses an instant. Accepts RFC 3339 stamps with any offset, and
/// offset-less date-times or plain dates, which are read as UTC.
///
/// Instants whose UTC year falls outside `0000..=9999` are rejected.
pub(crate) fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    parse_any(s).filter(in_range)
}

fn parse_any(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) fn to_canonical(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Re-renders an ISO stamp canonically.
pub(crate) fn canonicalize(s: &str) -> Option<String> {
    parse_instant(s).map(|dt| to_canonical(&dt))
}

/// Renders Unix seconds (possibly fractional) as a canonical stamp.
/// Sub-millisecond precision is truncated.
pub(crate) fn epoch_seconds_to_iso(seconds: f64) -> Option<String> {
    let millis = (seconds * 1000.0).trunc();
    #[allow(clippy::cast_precision_loss)]
    let bounds = (MIN_EPOCH_MILLIS as f64)..=(MAX_EPOCH_MILLIS as f64);
    if !bounds.contains(&millis) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let millis = millis as i64;
    DateTime::<Utc>::from_timestamp_millis(millis)
        .filter(in_range)
        .map(|dt| to_canonical(&dt))
}

/// Parses a stamp into whole Unix seconds, rounding towards the past.
pub(crate) fn iso_to_epoch_seconds(s: &str) -> Option<i64> {
    parse_instant(s).map(|dt| dt.timestamp_millis().div_euclid(1000))
}
