//! Authenticated document retrieval.

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::client::{Credentials, HttpTransport, RequestConfig, TransportError};
use crate::document::{XmlDocument, XmlError, XmlParser};

/// Errors that can occur while fetching a document.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request did not complete.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body is not a well-formed document.
    #[error("Malformed XML from {url}: {source}")]
    MalformedXml {
        /// The requested URL.
        url: String,
        /// Why parsing failed.
        #[source]
        source: XmlError,
    },
}

/// Performs one authenticated GET per call and parses the body.
///
/// The fetcher is immutable after construction; it is `Send + Sync` whenever
/// its transport is.
#[derive(Clone)]
pub struct DocumentFetcher<T> {
    transport: T,
    auth_header: String,
    timeout: Duration,
    parser: XmlParser,
}

impl<T: HttpTransport> DocumentFetcher<T> {
    /// Creates a fetcher using the secure parser.
    #[must_use]
    pub fn new(transport: T, credentials: &Credentials, timeout: Duration) -> Self {
        Self {
            transport,
            auth_header: credentials.auth_header(),
            timeout,
            parser: XmlParser::default(),
        }
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Describes the GET request for `url`.
    #[must_use]
    pub fn request(&self, url: &Url) -> RequestConfig {
        RequestConfig {
            url: url.clone(),
            auth_header: self.auth_header.clone(),
            timeout: self.timeout,
            body: None,
        }
    }

    /// Fetches and parses the document at `url`.
    ///
    /// The response body is fully read and the connection released before
    /// parsing starts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be parsed.
    pub fn fetch(&self, url: &Url) -> Result<XmlDocument, FetchError> {
        let body = self.transport.get(&self.request(url))?;
        debug!(url = %url, bytes = body.len(), "fetched document");

        self.parser
            .parse(&body)
            .map_err(|source| FetchError::MalformedXml {
                url: url.to_string(),
                source,
            })
    }
}

impl<T> std::fmt::Debug for DocumentFetcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentFetcher")
            .field("timeout", &self.timeout)
            .field("parser", &self.parser)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        body: &'static str,
        status: Option<u16>,
        requests: Mutex<Vec<RequestConfig>>,
    }

    impl HttpTransport for Recording {
        fn get(&self, request: &RequestConfig) -> Result<Bytes, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            match self.status {
                Some(status) => Err(TransportError::Status {
                    status,
                    url: request.url.to_string(),
                }),
                None => Ok(Bytes::from_static(self.body.as_bytes())),
            }
        }
    }

    fn url() -> Url {
        Url::parse("http://h/obix/histories/").unwrap()
    }

    #[test]
    fn test_fetch_sends_one_authenticated_get() {
        let transport = Recording {
            body: r#"<obj><ref href="site1/"/></obj>"#,
            ..Default::default()
        };
        let fetcher = DocumentFetcher::new(
            &transport,
            &Credentials::new("Aladdin", "open sesame"),
            Duration::from_secs(20),
        );

        let doc = fetcher.fetch(&url()).unwrap();
        assert_eq!(doc.root().name(), Some("obj"));

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, url());
        assert_eq!(requests[0].auth_header, "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
        assert_eq!(requests[0].timeout, Duration::from_secs(20));
        assert_eq!(requests[0].body, None);
    }

    #[test]
    fn test_fetch_transport_error_propagates() {
        let transport = Recording {
            status: Some(401),
            ..Default::default()
        };
        let fetcher = DocumentFetcher::new(&transport, &Credentials::new("u", "p"), Duration::from_secs(1));
        let err = fetcher.fetch(&url()).unwrap_err();
        assert!(matches!(
            err,
            FetchError::Transport(TransportError::Status { status: 401, .. })
        ));
    }

    #[test]
    fn test_fetch_malformed_body_is_typed_error() {
        let transport = Recording {
            body: "<obj><ref></obj>",
            ..Default::default()
        };
        let fetcher = DocumentFetcher::new(&transport, &Credentials::new("u", "p"), Duration::from_secs(1));
        let err = fetcher.fetch(&url()).unwrap_err();
        assert!(matches!(err, FetchError::MalformedXml { ref url, .. } if url == "http://h/obix/histories/"));
    }

    #[test]
    fn test_debug_hides_auth_header() {
        let transport = Recording::default();
        let fetcher = DocumentFetcher::new(&transport, &Credentials::new("u", "secret"), Duration::from_secs(1));
        let debug = format!("{fetcher:?}");
        assert!(!debug.contains(&Credentials::new("u", "secret").auth_header()));
    }
}
