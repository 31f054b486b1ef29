//! oBIX retrieval and decoding for the gaslamp history client.
//!
//! This crate provides the history pipeline:
//!
//! - [`url`] - History tree URL construction
//! - [`ReqwestTransport`] - Blocking HTTP transport with Basic authentication
//! - [`XmlParser`] - XML parsing that never resolves external entities
//! - [`NodePath`] - Structural selection of references and records
//! - [`decode_series`] - Record decoding into a [`TimeSeries`](gaslamp_types::TimeSeries)
//! - [`HistoryClient`] - Location, point and history retrieval

#![doc(issue_tracker_base_url = "https://github.com/foundobjx/gaslamp/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod decode;
mod document;
mod error;
mod fetch;
mod history;
mod select;
pub mod url;

pub use client::{
    ClientConfig, Credentials, DEFAULT_TIMEOUT, HttpTransport, ReqwestTransport, RequestConfig,
    TransportError,
};
pub use decode::{
    TIMESTAMP_TAG, VALUE_ATTR, VALUE_TAG, decode_record, decode_series, extract_timestamp,
    extract_value,
};
pub use document::{
    Descendants, EntityPolicy, Node, NodeId, NodeKind, ParseOptions, XmlDocument, XmlError,
    XmlParser,
};
pub use error::{ObixError, Result};
pub use fetch::{DocumentFetcher, FetchError};
pub use history::HistoryClient;
pub use select::{
    HREF_ATTR, LIST_TAG, NodePath, RECORD_TAG, REF_TAG, history_record_nodes, record_path,
    reference_hrefs, reference_path,
};
pub use url::{BaseUrl, UrlError};
