//! Date/time parsing and calendar-part extraction

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Naive formats tried in order after RFC 3339
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Calendar parts emitted for every date/time column, in order
pub const DATE_PARTS: [&str; 6] = ["year", "month", "day", "hour", "weekday", "epoch_days"];

/// Parse a date/time string, `None` when it is not one
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    // plain integers are numbers, not years
    if s.len() < 8 {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Calendar parts of a timestamp, aligned with [`DATE_PARTS`]
pub fn date_parts(dt: &NaiveDateTime) -> [f64; 6] {
    let epoch_days = dt.and_utc().timestamp() as f64 / 86_400.0;
    [
        f64::from(dt.year()),
        f64::from(dt.month()),
        f64::from(dt.day()),
        f64::from(dt.hour()),
        f64::from(dt.weekday().num_days_from_monday()),
        epoch_days,
    ]
}
