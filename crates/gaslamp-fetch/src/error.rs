//! Error type for history client operations.

use gaslamp_types::{DecodeError, QueryError};
use thiserror::Error;

use crate::client::TransportError;
use crate::fetch::FetchError;
use crate::url::UrlError;

/// Result type alias for history client operations.
pub type Result<T> = std::result::Result<T, ObixError>;

/// Errors that abort a history client operation.
///
/// Per-item problems (an unusable href, a record without a value) are logged
/// and skipped instead and never surface here.
#[derive(Error, Debug)]
pub enum ObixError {
    /// The base URL or a request URL is invalid.
    #[error(transparent)]
    InvalidUrl(#[from] UrlError),

    /// The request failed or the response could not be parsed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A record could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The query window is invalid.
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl From<TransportError> for ObixError {
    fn from(error: TransportError) -> Self {
        Self::Fetch(FetchError::Transport(error))
    }
}

impl ObixError {
    /// Returns true if the server could not be reached or answered with an
    /// error status.
    #[must_use]
    pub const fn is_connectivity(&self) -> bool {
        matches!(self, Self::Fetch(FetchError::Transport(_)))
    }
}
