/// Date and timestamp handling
///
/// Stored dates and timestamps are TEXT columns. Reads are lenient: a
/// timestamp may arrive date-only, or with seconds, or with fractional
/// seconds (SQLite's `CURRENT_TIMESTAMP` writes `YYYY-MM-DD HH:MM:SS`,
/// other writers sometimes include fractions). Anything unparseable reads
/// as absent rather than failing the row. Writes always use the canonical
/// formats: `YYYY-MM-DD` for dates, `YYYY-MM-DD HH:MM:SS` for timestamps.
use chrono::{NaiveDate, NaiveDateTime, Utc};

/// Canonical date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical timestamp format
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a stored date; unparseable values degrade to `None`
pub fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Parses a stored timestamp; unparseable values degrade to `None`
///
/// Accepted forms, tried in order: `YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DD HH:MM:SS.ffffff`, `YYYY-MM-DD` (midnight).
pub fn parse_datetime(value: Option<&str>) -> Option<NaiveDateTime> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(value, DATETIME_FORMAT) {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Formats a date canonically
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats a timestamp canonically
pub fn format_datetime(datetime: &NaiveDateTime) -> String {
    datetime.format(DATETIME_FORMAT).to_string()
}

/// Current UTC timestamp (used to stamp `updated_at`)
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
