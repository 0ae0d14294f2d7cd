//! Matching forecast samples to an observation time.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse an Open-Meteo timestamp.
///
/// With `timezone=auto` the API returns local times without an offset and
/// without seconds (`2024-03-01T14:00`). Full RFC 3339 input is accepted
/// too and reduced to its UTC wall time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
}

/// Parse a daily `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Index of the timestamp closest to `target`.
///
/// Scans every candidate; ties go to the first one. Unparseable entries
/// (`None`) never win. Returns 0 when the sequence is empty or nothing
/// is comparable.
pub fn closest_index(times: &[Option<NaiveDateTime>], target: NaiveDateTime) -> usize {
    let mut closest = 0;
    let mut smallest: Option<i64> = None;

    for (index, time) in times.iter().enumerate() {
        let Some(time) = time else { continue };
        let diff = (*time - target).num_milliseconds().abs();
        if smallest.map_or(true, |s| diff < s) {
            smallest = Some(diff);
            closest = index;
        }
    }

    closest
}
