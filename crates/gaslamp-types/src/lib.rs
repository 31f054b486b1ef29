//! Core types for the gaslamp oBIX history client.
//!
//! This crate provides the data structures shared by the gaslamp crates:
//!
//! - [`Timestamp`] - Absolute time with the server-reported offset
//! - [`HistoryQuery`] - Start/end/limit window for a history query
//! - [`HistoryRecord`] - A single timestamped sample
//! - [`TimeSeries`] - Insertion-ordered, timestamp-keyed samples
//! - [`Point`] - A named history point and its feed URL

#![doc(issue_tracker_base_url = "https://github.com/foundobjx/gaslamp/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod point;
mod query;
mod record;
mod series;
mod timestamp;

pub use error::{DecodeError, QueryError};
pub use point::{Point, normalize_href};
pub use query::HistoryQuery;
pub use record::HistoryRecord;
pub use series::TimeSeries;
pub use timestamp::{Timestamp, format_timestamp, now, parse_timestamp};
