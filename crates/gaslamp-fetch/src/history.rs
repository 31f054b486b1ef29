//! oBIX history client.

use gaslamp_types::{HistoryQuery, Point, TimeSeries};
use reqwest::Url;
use tracing::{debug, warn};

use crate::client::{ClientConfig, Credentials, HttpTransport, ReqwestTransport};
use crate::decode::decode_series;
use crate::document::XmlDocument;
use crate::error::Result;
use crate::fetch::DocumentFetcher;
use crate::select::{history_record_nodes, reference_hrefs};
use crate::url::{
    BaseUrl, HISTORY_PATH, history_root, location_url, parse_url, point_history_url, query_url,
    resource_name,
};

/// Client for the history tree of one oBIX server.
///
/// Every operation performs exactly one GET; nothing is cached between
/// calls. The client only holds immutable configuration, so a single
/// instance can be shared across threads when its transport is
/// `Send + Sync` (as [`ReqwestTransport`] is).
///
/// # Example
///
/// ```no_run
/// use chrono::{TimeDelta, Utc};
/// use gaslamp_fetch::HistoryClient;
/// use gaslamp_types::HistoryQuery;
///
/// let client = HistoryClient::new("obix", "secret", "http://192.168.1.23")?;
/// for location in client.locations()? {
///     println!("{location}");
/// }
///
/// let query = HistoryQuery::ending_at(Utc::now().fixed_offset(), TimeDelta::days(1), 100)?;
/// let series = client.history_values("site1/", "SolarPanelTemperature", &query)?;
/// println!("{} samples", series.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct HistoryClient<T = ReqwestTransport> {
    base: BaseUrl,
    fetcher: DocumentFetcher<T>,
}

impl HistoryClient {
    /// Creates a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL or the HTTP client
    /// cannot be created.
    pub fn new(user: &str, password: &str, base_url: &str) -> Result<Self> {
        Self::with_config(Credentials::new(user, password), base_url, ClientConfig::default())
    }

    /// Creates a client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL or the HTTP client
    /// cannot be created.
    pub fn with_config(credentials: Credentials, base_url: &str, config: ClientConfig) -> Result<Self> {
        let base = BaseUrl::parse(base_url)?;
        let timeout = config.timeout;
        let transport = ReqwestTransport::new(config)?;
        Ok(Self {
            base,
            fetcher: DocumentFetcher::new(transport, &credentials, timeout),
        })
    }
}

impl<T: HttpTransport> HistoryClient<T> {
    /// Creates a client over a custom transport.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL.
    pub fn with_transport(
        transport: T,
        credentials: Credentials,
        base_url: &str,
        config: &ClientConfig,
    ) -> Result<Self> {
        Ok(Self {
            base: BaseUrl::parse(base_url)?,
            fetcher: DocumentFetcher::new(transport, &credentials, config.timeout),
        })
    }

    /// Returns the server base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base
    }

    /// Lists the URL of every location below the history root.
    ///
    /// Location URLs end with `/`. Entries that do not form a valid URL are
    /// logged and left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the history root cannot be fetched or parsed.
    pub fn locations(&self) -> Result<Vec<Url>> {
        let document = self.fetch(&history_root(&self.base))?;

        let mut locations = Vec::new();
        for href in reference_hrefs(&document) {
            let name = resource_name(href, HISTORY_PATH);
            if name.is_empty() {
                debug!(href, "skipping reference to the history root itself");
                continue;
            }
            if let Some(url) = checked_url(location_url(&self.base, &format!("{name}/"))) {
                locations.push(url);
            }
        }
        Ok(locations)
    }

    /// Lists the names of the points in `location`.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be fetched or parsed.
    pub fn point_names(&self, location: &str) -> Result<Vec<String>> {
        let document = self.fetch(&location_url(&self.base, location))?;
        Ok(point_names_in(&document, location))
    }

    /// Lists the history feed URL of every point in `location`.
    ///
    /// Entries that do not form a valid URL are logged and left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be fetched or parsed.
    pub fn point_urls(&self, location: &str) -> Result<Vec<Url>> {
        Ok(self
            .resolve_points(location)?
            .into_iter()
            .map(|(_, url)| url)
            .collect())
    }

    /// Lists the points in `location` with their feed URLs.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be fetched or parsed.
    pub fn points(&self, location: &str) -> Result<Vec<Point>> {
        Ok(self
            .resolve_points(location)?
            .into_iter()
            .map(|(name, url)| Point::new(name, url))
            .collect())
    }

    /// Retrieves the history of `point` in `location` for the query window.
    ///
    /// Records without a numeric value element are logged and skipped. Records that
    /// share a timestamp collapse to the later value at the earlier position.
    ///
    /// # Errors
    ///
    /// Returns an error if the query URL is invalid, the request fails, the
    /// response cannot be parsed, or any record carries a malformed
    /// timestamp or value.
    pub fn history_values(&self, location: &str, point: &str, query: &HistoryQuery) -> Result<TimeSeries> {
        let document = self.fetch(&query_url(&self.base, location, point, query))?;
        let series = decode_series(history_record_nodes(&document))?;
        debug!(location, point, records = series.len(), "retrieved history");
        Ok(series)
    }

    fn resolve_points(&self, location: &str) -> Result<Vec<(String, Url)>> {
        let document = self.fetch(&location_url(&self.base, location))?;
        Ok(point_names_in(&document, location)
            .into_iter()
            .filter_map(|name| {
                let url = checked_url(point_history_url(&self.base, location, &name))?;
                Some((name, url))
            })
            .collect())
    }

    fn fetch(&self, url: &str) -> Result<XmlDocument> {
        let url = parse_url(url)?;
        Ok(self.fetcher.fetch(&url)?)
    }
}

fn point_names_in(document: &XmlDocument, location: &str) -> Vec<String> {
    let parent = format!("{HISTORY_PATH}{location}");
    reference_hrefs(document)
        .into_iter()
        .map(|href| resource_name(href, &parent))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validates a built URL, logging and discarding it if invalid.
fn checked_url(candidate: String) -> Option<Url> {
    match parse_url(&candidate) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(error = %e, "excluding entry with invalid URL");
            None
        }
    }
}
