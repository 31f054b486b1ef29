//! Blocking client library for oBIX history data.
//!
//! This is a facade crate that re-exports functionality from the gaslamp
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```no_run
//! use gaslamp_lib::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HistoryClient::new("obix", "secret", "http://192.168.1.23")?;
//!
//!     for location in client.locations()? {
//!         println!("{location}");
//!     }
//!
//!     let query = HistoryQuery::ending_at(now(), chrono::TimeDelta::days(1), 100)?;
//!     let series = client.history_values("site1/", "SolarPanelTemperature", &query)?;
//!     CsvFormatter::new().write_series(&series, std::io::stdout().lock())?;
//!
//!     Ok(())
//! }
//! ```

#![doc(issue_tracker_base_url = "https://github.com/foundobjx/gaslamp/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use gaslamp_types::*;

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use gaslamp_fetch::{
    BaseUrl, ClientConfig, Credentials, DEFAULT_TIMEOUT, FetchError, HistoryClient,
    HttpTransport, ObixError, ParseOptions, ReqwestTransport, RequestConfig, Result,
    TransportError, UrlError, XmlDocument, XmlError, XmlParser,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use gaslamp_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat,
};

/// Prelude module for convenient imports.
///
/// ```
/// use gaslamp_lib::prelude::*;
/// ```
pub mod prelude {
    pub use gaslamp_types::{
        DecodeError, HistoryQuery, HistoryRecord, Point, QueryError, TimeSeries, Timestamp,
        now, parse_timestamp,
    };

    #[cfg(feature = "fetch")]
    pub use gaslamp_fetch::{ClientConfig, Credentials, HistoryClient, ObixError};

    #[cfg(feature = "format")]
    pub use gaslamp_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};
}
