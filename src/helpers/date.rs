//! Date helper functions

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use thiserror::Error;

/// Output format of the `toDate` filter ("Jan 05, 2024")
const DISPLAY_FORMAT: &str = "%b %d, %Y";

/// Naive layouts accepted in front matter, tried in order
const NAIVE_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

#[derive(Debug, Error, PartialEq)]
pub enum DateError {
    /// The value cannot be read as a timestamp
    #[error("Invalid date: {0}")]
    Invalid(String),
}

/// Parse a date-like string.
///
/// Strings with an offset keep it; naive strings are read as UTC so the
/// result does not depend on the machine running the build.
pub fn parse_date_str(s: &str) -> Result<DateTime<FixedOffset>, DateError> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z") {
        return Ok(dt);
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&dt).fixed_offset());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(Utc.from_utc_datetime(&dt).fixed_offset());
            }
        }
    }

    Err(DateError::Invalid(s.to_string()))
}

/// Read milliseconds since the Unix epoch
pub fn from_epoch_millis(millis: i64) -> Result<DateTime<FixedOffset>, DateError> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| DateError::Invalid(millis.to_string()))
}

/// Parse a template or front-matter value into a timestamp.
///
/// Numbers are epoch milliseconds, strings go through [`parse_date_str`].
pub fn parse_date_value(value: &Value) -> Result<DateTime<FixedOffset>, DateError> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => {
            if let Some(millis) = n.as_i64() {
                from_epoch_millis(millis)
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() => from_epoch_millis(f.trunc() as i64),
                    _ => Err(DateError::Invalid(n.to_string())),
                }
            }
        }
        other => Err(DateError::Invalid(other.to_string())),
    }
}

/// Format a date for display, e.g. "Jan 05, 2024"
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format(DISPLAY_FORMAT).to_string()
}

/// The `toDate` filter body
pub fn to_date(value: &Value) -> Result<String, DateError> {
    parse_date_value(value).map(|dt| format_date(&dt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_date_iso_day() {
        assert_eq!(to_date(&json!("2024-01-05")).unwrap(), "Jan 05, 2024");
    }

    #[test]
    fn test_to_date_is_deterministic() {
        let value = json!("2023-11-30 08:15:00");
        assert_eq!(to_date(&value).unwrap(), to_date(&value).unwrap());
        assert_eq!(to_date(&value).unwrap(), "Nov 30, 2023");
    }

    #[test]
    fn test_to_date_keeps_offset() {
        // Late evening in New York is already the next day in UTC
        let value = json!("2024-01-05T23:30:00-05:00");
        assert_eq!(to_date(&value).unwrap(), "Jan 05, 2024");
    }

    #[test]
    fn test_to_date_epoch_millis() {
        // 2024-01-05T00:00:00Z
        assert_eq!(to_date(&json!(1_704_412_800_000i64)).unwrap(), "Jan 05, 2024");
        assert_eq!(to_date(&json!(1_704_412_800_000.5)).unwrap(), "Jan 05, 2024");
    }

    #[test]
    fn test_to_date_invalid() {
        assert_eq!(
            to_date(&json!("not a date")),
            Err(DateError::Invalid("not a date".to_string()))
        );
        assert!(to_date(&json!(null)).is_err());
        assert!(to_date(&json!(["2024-01-05"])).is_err());
        assert!(to_date(&json!("2024-02-30")).is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let dt = parse_date_str("2024/03/01 10:30").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-03-01 10:30");

        let dt = parse_date_str("2024-03-01T10:30:00Z").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 0);
    }
}
