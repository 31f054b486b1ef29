//! History query window.

use chrono::TimeDelta;

use crate::{QueryError, Timestamp, format_timestamp};

/// Parameters of one `~historyQuery` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Start of the window.
    pub start: Timestamp,
    /// End of the window.
    pub end: Timestamp,
    /// Maximum number of records the server should return.
    pub limit: u32,
}

impl HistoryQuery {
    /// Creates a new query, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: Timestamp, end: Timestamp, limit: u32) -> Result<Self, QueryError> {
        if start > end {
            return Err(QueryError::InvalidRange { start, end });
        }
        Ok(Self { start, end, limit })
    }

    /// Creates a query covering `window` up to and including `end`.
    ///
    /// # Errors
    ///
    /// Returns an error if `window` is negative.
    pub fn ending_at(end: Timestamp, window: TimeDelta, limit: u32) -> Result<Self, QueryError> {
        Self::new(end - window, end, limit)
    }

    /// Serializes the query as `start=..&end=..&limit=..`.
    ///
    /// Parameter order is fixed and timestamps are not percent-encoded;
    /// oBIX servers expect the colons and signs literally.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        format!(
            "start={}&end={}&limit={}",
            format_timestamp(&self.start),
            format_timestamp(&self.end),
            self.limit
        )
    }
}

impl std::fmt::Display for HistoryQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
