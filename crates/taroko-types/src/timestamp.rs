//! Flexible timestamp parsing shared by the archive readers.
//!
//! Archive files written by different tool generations store `ts` either
//! as an epoch integer (raw source ticks, nanoseconds) or as formatted
//! local time. Numeric interpretation is always tried first.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::TimestampError;

/// Format of minute timestamps in archive files.
pub const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of daily timestamps in archive files.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Textual fallback formats accepted when a value is not numeric.
const TEXT_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Converts an epoch integer to a naive timestamp, classifying the unit
/// by magnitude (seconds, milliseconds, microseconds or nanoseconds).
///
/// Returns `None` when the value falls outside chrono's representable
/// range for its classified unit.
#[must_use]
pub fn epoch_to_datetime(value: i64) -> Option<NaiveDateTime> {
    let magnitude = value.unsigned_abs();
    let utc = if magnitude < 100_000_000_000 {
        DateTime::from_timestamp(value, 0)?
    } else if magnitude < 100_000_000_000_000 {
        DateTime::from_timestamp_millis(value)?
    } else if magnitude < 100_000_000_000_000_000 {
        DateTime::from_timestamp_micros(value)?
    } else {
        DateTime::from_timestamp_nanos(value)
    };
    Some(utc.naive_utc())
}

/// Parses a timestamp cell from an archive row.
///
/// Tries an epoch integer first (plain or float-formatted), then the
/// textual formats, then a bare date (midnight).
///
/// # Errors
///
/// Returns [`TimestampError::Unrecognized`] if no interpretation fits.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    let raw = raw.trim();

    if let Ok(value) = raw.parse::<i64>() {
        return epoch_to_datetime(value).ok_or_else(|| unrecognized(raw));
    }
    // Float-formatted epochs ("1.7044e18") occasionally survive a
    // round-trip through spreadsheet tools.
    if let Ok(value) = raw.parse::<f64>() {
        if value.is_finite() {
            return epoch_to_datetime(value as i64).ok_or_else(|| unrecognized(raw));
        }
        return Err(unrecognized(raw));
    }

    for format in TEXT_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(ts);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        if let Some(ts) = date.and_hms_opt(0, 0, 0) {
            return Ok(ts);
        }
    }

    Err(unrecognized(raw))
}

fn unrecognized(raw: &str) -> TimestampError {
    TimestampError::Unrecognized(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(9, 1, 0)
            .unwrap()
    }

    #[test]
    fn test_epoch_seconds() {
        assert_eq!(parse_timestamp("1704445260").unwrap(), expected());
    }

    #[test]
    fn test_epoch_milliseconds() {
        assert_eq!(parse_timestamp("1704445260000").unwrap(), expected());
    }

    #[test]
    fn test_epoch_microseconds() {
        assert_eq!(parse_timestamp("1704445260000000").unwrap(), expected());
    }

    #[test]
    fn test_epoch_nanoseconds() {
        assert_eq!(parse_timestamp("1704445260000000000").unwrap(), expected());
    }

    #[test]
    fn test_text_forms() {
        assert_eq!(parse_timestamp("2024-01-05 09:01:00").unwrap(), expected());
        assert_eq!(parse_timestamp("2024-01-05T09:01:00").unwrap(), expected());
        assert_eq!(parse_timestamp("2024-01-05 09:01").unwrap(), expected());
        assert_eq!(
            parse_timestamp("2024-01-05").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_whitespace_tolerated() {
        assert_eq!(parse_timestamp(" 2024-01-05 09:01:00\r").unwrap(), expected());
    }

    #[test]
    fn test_unrecognized() {
        assert!(parse_timestamp("not a time").is_err());
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("2024/01/05").is_err());
    }
}
