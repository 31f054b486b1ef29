//! Error types for gaslamp domain values.

use thiserror::Error;

use crate::Timestamp;

/// Error for invalid history query windows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Start is after end.
    #[error("Invalid history window: {start} > {end}")]
    InvalidRange {
        /// The requested start.
        start: Timestamp,
        /// The requested end.
        end: Timestamp,
    },
}

/// Errors raised while decoding a single history record.
///
/// Only [`DecodeError::MissingValue`] drops the offending record; the other
/// variants abort the retrieval.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The record has no numeric value element.
    #[error("record has no numeric value")]
    MissingValue,

    /// The numeric value element has no value, or it is not a decimal number.
    #[error("record value {0:?} is not a number")]
    MalformedValue(String),

    /// The timestamp attribute is not an ISO-8601 date-time with offset.
    #[error("malformed record timestamp {value:?}: {source}")]
    MalformedTimestamp {
        /// The raw attribute text.
        value: String,
        /// Why it failed to parse.
        #[source]
        source: chrono::ParseError,
    },
}

impl DecodeError {
    /// Returns true if this error must abort the whole retrieval.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::MissingValue)
    }
}
