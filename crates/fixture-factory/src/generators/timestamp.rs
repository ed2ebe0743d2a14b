//! Timestamp value generators.

use chrono::{DateTime, TimeDelta, Utc};
use fixture_core::FieldValue;

use super::numeric::position;

/// Generate `start + sequence * interval_secs`.
///
/// Offsets that overflow the supported time range fall back to `start`.
pub fn generate_timestamp_sequence(
    start: DateTime<Utc>,
    interval_secs: i64,
    sequence: u64,
) -> FieldValue {
    let offset = position(sequence).saturating_mul(interval_secs);
    let dt = TimeDelta::try_seconds(offset)
        .and_then(|delta| start.checked_add_signed(delta))
        .unwrap_or(start);
    FieldValue::DateTime(dt)
}

/// Parse a timestamp string: RFC 3339, or a bare `YYYY-MM-DD` date at
/// midnight UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        let full = parse_timestamp("2024-03-01T12:00:00+02:00").unwrap();
        assert_eq!(full.to_rfc3339(), "2024-03-01T10:00:00+00:00");

        let date = parse_timestamp("2024-03-01").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-01T00:00:00+00:00");

        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_generate_timestamp_sequence() {
        let start = parse_timestamp("2024-01-01").unwrap();
        let value = generate_timestamp_sequence(start, 3600, 3);
        let expected = parse_timestamp("2024-01-01T03:00:00Z").unwrap();
        assert_eq!(value, FieldValue::DateTime(expected));
    }

    #[test]
    fn test_generate_timestamp_sequence_overflow_keeps_start() {
        let start = parse_timestamp("2024-01-01").unwrap();
        let value = generate_timestamp_sequence(start, i64::MAX, 2);
        assert_eq!(value, FieldValue::DateTime(start));
    }
}
