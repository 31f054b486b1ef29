//! oBIX `abstime` timestamps.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

/// An absolute point in time carrying the offset the server reported it in.
pub type Timestamp = DateTime<FixedOffset>;

/// Formats a timestamp as full ISO-8601 with millisecond precision and an
/// explicit signed offset, e.g. `2013-01-01T00:00:00.000-05:00`.
///
/// A zero offset is written as `+00:00`, never `Z`.
///
/// # Example
///
/// ```
/// use chrono::DateTime;
/// use gaslamp_types::format_timestamp;
///
/// let ts = DateTime::parse_from_rfc3339("2013-01-01T00:00:00-05:00").unwrap();
/// assert_eq!(format_timestamp(&ts), "2013-01-01T00:00:00.000-05:00");
/// ```
#[must_use]
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// Parses an ISO-8601 date-time with offset.
///
/// # Errors
///
/// Returns an error if the value is not a complete date-time with an offset.
pub fn parse_timestamp(value: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value.trim())
}

/// Returns the current wall-clock time as a [`Timestamp`] in UTC.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now().fixed_offset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_format_keeps_negative_offset() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let ts = tz.with_ymd_and_hms(2013, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2013-01-01T00:00:00.000-05:00");
    }

    #[test]
    fn test_format_utc_uses_signed_offset() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 30, 12, 30, 15).unwrap().fixed_offset();
        assert_eq!(format_timestamp(&ts), "2024-06-30T12:30:15.000+00:00");
    }

    #[test]
    fn test_parse_with_millis_and_offset() {
        let ts = parse_timestamp("2013-01-01T08:15:00.250-05:00").unwrap();
        assert_eq!(ts.hour(), 8);
        assert_eq!(ts.nanosecond(), 250_000_000);
        assert_eq!(ts.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_parse_rejects_missing_offset() {
        assert!(parse_timestamp("2013-01-01T00:00:00").is_err());
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parse_round_trips_format() {
        let text = "2020-02-29T23:59:59.999+01:00";
        assert_eq!(format_timestamp(&parse_timestamp(text).unwrap()), text);
    }
}
