//! History record decoding.

use gaslamp_types::{DecodeError, HistoryRecord, TimeSeries, Timestamp, now, parse_timestamp};
use tracing::{debug, warn};

use crate::document::Node;

/// Element holding a record's numeric value.
pub const VALUE_TAG: &str = "real";

/// Element holding a record's timestamp.
pub const TIMESTAMP_TAG: &str = "abstime";

/// Attribute carrying the value of `real` and `abstime` elements.
pub const VALUE_ATTR: &str = "val";

/// Reads the value of the first `real` element below `record`.
///
/// # Errors
///
/// Returns [`DecodeError::MissingValue`] if there is no `real` element, and
/// [`DecodeError::MalformedValue`] if its `val` is missing or not a number.
pub fn extract_value(record: Node<'_>) -> Result<f64, DecodeError> {
    let element = record
        .first_descendant(VALUE_TAG)
        .ok_or(DecodeError::MissingValue)?;
    let raw = element.attribute(VALUE_ATTR).unwrap_or_default();
    raw.trim()
        .parse()
        .map_err(|_| DecodeError::MalformedValue(raw.to_string()))
}

/// Reads the timestamp of the first `abstime` element below `record`.
///
/// A record without an `abstime` element is stamped with the current time.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedTimestamp`] if the element exists but its
/// `val` is missing or not an ISO-8601 date-time with offset.
pub fn extract_timestamp(record: Node<'_>) -> Result<Timestamp, DecodeError> {
    let Some(element) = record.first_descendant(TIMESTAMP_TAG) else {
        return Ok(now());
    };
    let raw = element.attribute(VALUE_ATTR).unwrap_or_default();
    parse_timestamp(raw).map_err(|source| DecodeError::MalformedTimestamp {
        value: raw.to_string(),
        source,
    })
}

/// Decodes one record, timestamp first.
///
/// # Errors
///
/// Returns the first field error encountered.
pub fn decode_record(record: Node<'_>) -> Result<HistoryRecord, DecodeError> {
    let timestamp = extract_timestamp(record)?;
    let value = extract_value(record)?;
    Ok(HistoryRecord::new(timestamp, value))
}

/// Decodes records in order and accumulates them into a series.
///
/// Records without a `real` element are logged and dropped. A malformed
/// timestamp or value aborts decoding.
///
/// # Errors
///
/// Returns the first fatal error: [`DecodeError::MalformedTimestamp`] or
/// [`DecodeError::MalformedValue`].
pub fn decode_series<'a>(
    records: impl IntoIterator<Item = Node<'a>>,
) -> Result<TimeSeries, DecodeError> {
    let mut series = TimeSeries::new();
    let mut dropped = 0usize;

    for record in records {
        match decode_record(record) {
            Ok(decoded) => {
                series.insert(decoded);
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                dropped += 1;
                warn!(error = %e, record = %record.to_xml(), "dropping history record");
            }
        }
    }

    debug!(records = series.len(), dropped, "decoded history series");
    Ok(series)
}
