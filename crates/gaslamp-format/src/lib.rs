//! Output formatters for gaslamp history series.
//!
//! This crate provides formatters for writing a
//! [`TimeSeries`](gaslamp_types::TimeSeries) to various output formats:
//!
//! - [`CsvFormatter`] - CSV or TSV
//! - [`JsonFormatter`] - JSON array or NDJSON

#![doc(issue_tracker_base_url = "https://github.com/foundobjx/gaslamp/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;

pub use crate::csv::CsvFormatter;
pub use formatter::{FormatError, Formatter, OutputFormat};
pub use json::{JsonFormatter, JsonStyle};
