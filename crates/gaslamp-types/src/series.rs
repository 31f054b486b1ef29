//! Insertion-ordered time series.

use indexmap::IndexMap;

use crate::{HistoryRecord, Timestamp};

/// An ordered mapping from timestamp to value.
///
/// Iteration follows first-insertion order. Inserting a timestamp that is
/// already present replaces its value but keeps its original position.
///
/// Timestamps compare as instants, so the same moment reported with two
/// different offsets is one key.
#[derive(Debug, Clone, Default)]
pub struct TimeSeries {
    values: IndexMap<Timestamp, f64>,
}

impl TimeSeries {
    /// Creates an empty series.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty series with room for `capacity` records.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: IndexMap::with_capacity(capacity),
        }
    }

    /// Inserts a record, returning the value it replaced, if any.
    pub fn insert(&mut self, record: HistoryRecord) -> Option<f64> {
        self.values.insert(record.timestamp, record.value)
    }

    /// Returns the value recorded at `timestamp`.
    #[must_use]
    pub fn get(&self, timestamp: &Timestamp) -> Option<f64> {
        self.values.get(timestamp).copied()
    }

    /// Returns true if the series has a value at `timestamp`.
    #[must_use]
    pub fn contains(&self, timestamp: &Timestamp) -> bool {
        self.values.contains_key(timestamp)
    }

    /// Returns the number of distinct timestamps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the series is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates records in series order.
    pub fn iter(&self) -> impl Iterator<Item = HistoryRecord> + '_ {
        self.values.iter().map(borrowed_record)
    }

    /// Iterates timestamps in series order.
    pub fn timestamps(&self) -> impl Iterator<Item = &Timestamp> + '_ {
        self.values.keys()
    }

    /// Returns the first record in series order.
    #[must_use]
    pub fn first(&self) -> Option<HistoryRecord> {
        self.values
            .first()
            .map(|(timestamp, value)| HistoryRecord::new(*timestamp, *value))
    }

    /// Returns the last record in series order.
    #[must_use]
    pub fn last(&self) -> Option<HistoryRecord> {
        self.values
            .last()
            .map(|(timestamp, value)| HistoryRecord::new(*timestamp, *value))
    }

    /// Collects the series into a vector of records.
    #[must_use]
    pub fn records(&self) -> Vec<HistoryRecord> {
        self.iter().collect()
    }
}

// IndexMap equality ignores order; a series is only equal if it iterates identically.
impl PartialEq for TimeSeries {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.values.iter().eq(other.values.iter())
    }
}

impl FromIterator<HistoryRecord> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = HistoryRecord>>(iter: I) -> Self {
        let mut series = Self::new();
        series.extend(iter);
        series
    }
}

impl Extend<HistoryRecord> for TimeSeries {
    fn extend<I: IntoIterator<Item = HistoryRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl IntoIterator for TimeSeries {
    type Item = HistoryRecord;
    type IntoIter = std::iter::Map<
        indexmap::map::IntoIter<Timestamp, f64>,
        fn((Timestamp, f64)) -> HistoryRecord,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.values
            .into_iter()
            .map(HistoryRecord::from as fn((Timestamp, f64)) -> HistoryRecord)
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = HistoryRecord;
    type IntoIter = std::iter::Map<
        indexmap::map::Iter<'a, Timestamp, f64>,
        fn((&'a Timestamp, &'a f64)) -> HistoryRecord,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.values
            .iter()
            .map(borrowed_record as fn((&'a Timestamp, &'a f64)) -> HistoryRecord)
    }
}

fn borrowed_record((timestamp, value): (&Timestamp, &f64)) -> HistoryRecord {
    HistoryRecord::new(*timestamp, *value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn ts(minute: u32) -> Timestamp {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 1, 0, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_insertion_order_not_sorted() {
        let series: TimeSeries = [
            HistoryRecord::new(ts(30), 3.0),
            HistoryRecord::new(ts(10), 1.0),
            HistoryRecord::new(ts(20), 2.0),
        ]
        .into_iter()
        .collect();

        let order: Vec<_> = series.timestamps().copied().collect();
        assert_eq!(order, vec![ts(30), ts(10), ts(20)]);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut series = TimeSeries::new();
        assert_eq!(series.insert(HistoryRecord::new(ts(1), 1.0)), None);
        series.insert(HistoryRecord::new(ts(2), 2.0));
        assert_eq!(series.insert(HistoryRecord::new(ts(1), 9.0)), Some(1.0));

        assert_eq!(series.len(), 2);
        assert_eq!(series.first(), Some(HistoryRecord::new(ts(1), 9.0)));
        assert_eq!(series.last(), Some(HistoryRecord::new(ts(2), 2.0)));
    }

    #[test]
    fn test_same_instant_different_offset_is_one_key() {
        let utc = ts(0);
        let shifted = utc.with_timezone(&FixedOffset::west_opt(5 * 3600).unwrap());

        let mut series = TimeSeries::new();
        series.insert(HistoryRecord::new(utc, 1.0));
        series.insert(HistoryRecord::new(shifted, 2.0));

        assert_eq!(series.len(), 1);
        assert_eq!(series.get(&utc), Some(2.0));
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let a: TimeSeries = [HistoryRecord::new(ts(1), 1.0), HistoryRecord::new(ts(2), 2.0)]
            .into_iter()
            .collect();
        let b: TimeSeries = [HistoryRecord::new(ts(2), 2.0), HistoryRecord::new(ts(1), 1.0)]
            .into_iter()
            .collect();

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_into_iter_yields_records() {
        let series: TimeSeries = [HistoryRecord::new(ts(5), 0.5)].into_iter().collect();
        assert!(series.contains(&ts(5)));
        let records: Vec<_> = series.into_iter().collect();
        assert_eq!(records, vec![HistoryRecord::new(ts(5), 0.5)]);
    }

    #[test]
    fn test_empty_series() {
        let series = TimeSeries::with_capacity(8);
        assert!(series.is_empty());
        assert_eq!(series.first(), None);
        assert!(series.records().is_empty());
    }
}
