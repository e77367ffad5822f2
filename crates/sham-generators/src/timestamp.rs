//! Timestamp value generators.
//!
//! Timestamps are produced as RFC 3339 strings in UTC with second precision,
//! e.g. `2017-03-08T19:04:11Z`.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;

/// Format a timestamp the way every generator in this module emits it.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Uniform timestamp between the Unix epoch and the current wall clock.
///
/// Only the upper bound depends on the clock; the draw itself comes from `rng`.
pub fn timestamp_until_now<R: Rng + ?Sized>(rng: &mut R) -> DateTime<Utc> {
    timestamp_between(rng, DateTime::UNIX_EPOCH, Utc::now())
}

/// Uniform timestamp in `[start, end]` at second precision.
///
/// An inverted range collapses to `start`.
pub fn timestamp_between<R: Rng + ?Sized>(
    rng: &mut R,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> DateTime<Utc> {
    let start_ts = start.timestamp();
    let end_ts = end.timestamp();

    if start_ts >= end_ts {
        return start;
    }

    let random_ts = rng.random_range(start_ts..=end_ts);
    DateTime::from_timestamp(random_ts, 0).unwrap_or(start)
}

/// Parse a timestamp given as RFC 3339 or as a plain `YYYY-MM-DD` date.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}
