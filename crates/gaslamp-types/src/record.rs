//! History record representation.

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// One timestamped numeric sample from a history query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// When the sample was taken.
    pub timestamp: Timestamp,
    /// The sampled value.
    pub value: f64,
}

impl HistoryRecord {
    /// Creates a new record.
    #[must_use]
    pub const fn new(timestamp: Timestamp, value: f64) -> Self {
        Self { timestamp, value }
    }
}

impl From<(Timestamp, f64)> for HistoryRecord {
    fn from((timestamp, value): (Timestamp, f64)) -> Self {
        Self::new(timestamp, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_iso_timestamp() {
        let ts = crate::parse_timestamp("2013-01-01T00:15:00-05:00").unwrap();
        let record = HistoryRecord::new(ts, 21.5);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"timestamp":"2013-01-01T00:15:00-05:00","value":21.5}"#);

        let back: HistoryRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
