//! Small helpers for timestamp formatting and log output.

use chrono::{DateTime, TimeZone};

/// Display format for story timestamps.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a Unix timestamp (seconds) in `tz` as `YYYY-MM-DD HH:MM:SS`.
///
/// Returns `None` if the timestamp is out of range for chrono or ambiguous
/// in `tz`.
pub fn format_timestamp<Tz>(secs: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let utc = DateTime::from_timestamp(secs, 0)?;
    Some(utc.with_timezone(tz).format(DATETIME_FORMAT).to_string())
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` bytes (backing off to a char boundary) with
/// an ellipsis and the number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}
