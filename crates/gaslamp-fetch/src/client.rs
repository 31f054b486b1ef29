//! Blocking HTTP transport for oBIX requests.

use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use reqwest::redirect::Policy;
use std::time::Duration;
use thiserror::Error;

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout, covering connect and read.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("gaslamp/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP Basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    password: String,
}

impl Credentials {
    /// Creates credentials for `user`.
    #[must_use]
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Returns the user name.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the `Authorization` header value: `Basic base64(user:password)`.
    #[must_use]
    pub fn auth_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.user, self.password));
        format!("Basic {token}")
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One HTTP request, fully described.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestConfig {
    /// Absolute target URL.
    pub url: Url,
    /// Value of the `Authorization` header.
    pub auth_header: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Optional request body. Always `None` for history reads.
    pub body: Option<Bytes>,
}

impl std::fmt::Debug for RequestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestConfig")
            .field("url", &self.url.as_str())
            .field("auth_header", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("body", &self.body.as_ref().map(Bytes::len))
            .finish()
    }
}

/// Errors that can occur while talking to the server.
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout {
        /// The requested URL.
        url: String,
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// Server answered with a non-success status (redirects are not followed).
    #[error("Server returned {status} for {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The requested URL.
        url: String,
    },
}

/// A synchronous GET capability.
///
/// Implementations must be safe to call from several threads at once.
pub trait HttpTransport: Send + Sync {
    /// Performs one GET and returns the full response body.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure, timeout, or a non-success
    /// status.
    fn get(&self, request: &RequestConfig) -> Result<Bytes, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn get(&self, request: &RequestConfig) -> Result<Bytes, TransportError> {
        (**self).get(request)
    }
}

impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    fn get(&self, request: &RequestConfig) -> Result<Bytes, TransportError> {
        (**self).get(request)
    }
}

/// [`HttpTransport`] backed by a blocking reqwest client.
///
/// Redirects are never followed. The client is reentrant and cheap to clone.
/// It must not be driven from inside an async runtime.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    config: ClientConfig,
}

impl ReqwestTransport {
    /// Creates a new transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a transport with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, TransportError> {
        Self::new(ClientConfig::default())
    }

    /// Returns the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn classify(error: reqwest::Error, request: &RequestConfig) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout {
                url: request.url.to_string(),
                timeout: request.timeout,
            }
        } else {
            TransportError::Http(error)
        }
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, request: &RequestConfig) -> Result<Bytes, TransportError> {
        let mut builder = self
            .client
            .get(request.url.clone())
            .header(AUTHORIZATION, request.auth_header.as_str())
            .timeout(request.timeout);
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        // The response owns the connection; it is released when dropped on any path.
        let response = builder.send().map_err(|e| Self::classify(e, request))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: request.url.to_string(),
            });
        }

        response.bytes().map_err(|e| Self::classify(e, request))
    }
}
