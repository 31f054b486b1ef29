//! oBIX history URL construction.
//!
//! Every builder here is plain string concatenation over a validated
//! [`BaseUrl`]; callers validate the result with [`parse_url`] before use.

use gaslamp_types::{HistoryQuery, normalize_href};
use reqwest::Url;
use thiserror::Error;

/// Path of the history root below the server base.
pub const HISTORY_PATH: &str = "/obix/histories/";

/// Name of the history query operation on a point feed.
pub const HISTORY_QUERY: &str = "~historyQuery";

/// Error for strings that are not valid absolute URLs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    /// The string could not be parsed as a URL.
    #[error("Invalid URL {url:?}: {reason}")]
    Invalid {
        /// The offending string.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Parses an absolute URL.
///
/// # Errors
///
/// Returns an error if `url` is not an absolute URL.
pub fn parse_url(url: &str) -> Result<Url, UrlError> {
    Url::parse(url).map_err(|e| UrlError::Invalid {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// A validated server base URL, e.g. `http://192.168.1.23`.
///
/// Trailing slashes are dropped so that appending [`HISTORY_PATH`] never
/// produces `//`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Validates a base URL string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not an absolute, hierarchical URL.
    pub fn parse(base: &str) -> Result<Self, UrlError> {
        let trimmed = base.trim().trim_end_matches('/');
        let url = parse_url(trimmed)?;
        if url.cannot_be_a_base() {
            return Err(UrlError::Invalid {
                url: base.to_string(),
                reason: "not a hierarchical URL".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for BaseUrl {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds the history root URL.
///
/// URL format: `{base}/obix/histories/`
#[must_use]
pub fn history_root(base: &BaseUrl) -> String {
    format!("{base}{HISTORY_PATH}")
}

/// Builds the URL of a location listing.
///
/// URL format: `{base}/obix/histories/{location}`
#[must_use]
pub fn location_url(base: &BaseUrl, location: &str) -> String {
    format!("{base}{HISTORY_PATH}{location}")
}

/// Builds the history feed URL of a point.
///
/// URL format: `{base}/obix/histories/{location}{point}/`
///
/// The location is used as given, so it normally carries its own trailing
/// slash (`site1/`).
#[must_use]
pub fn point_history_url(base: &BaseUrl, location: &str, point: &str) -> String {
    format!("{base}{HISTORY_PATH}{location}{point}/")
}

/// Builds a history query URL.
///
/// URL format:
/// `{base}/obix/histories/{location}{point}/~historyQuery?start={iso}&end={iso}&limit={n}`
///
/// # Example
///
/// ```
/// use chrono::DateTime;
/// use gaslamp_fetch::url::{BaseUrl, query_url};
/// use gaslamp_types::HistoryQuery;
///
/// let base = BaseUrl::parse("http://h").unwrap();
/// let start = DateTime::parse_from_rfc3339("2013-01-01T00:00:00-05:00").unwrap();
/// let end = DateTime::parse_from_rfc3339("2013-01-02T00:00:00-05:00").unwrap();
/// let query = HistoryQuery::new(start, end, 100).unwrap();
///
/// assert_eq!(
///     query_url(&base, "site1/", "Temp", &query),
///     "http://h/obix/histories/site1/Temp/~historyQuery\
///      ?start=2013-01-01T00:00:00.000-05:00&end=2013-01-02T00:00:00.000-05:00&limit=100"
/// );
/// ```
#[must_use]
pub fn query_url(base: &BaseUrl, location: &str, point: &str, query: &HistoryQuery) -> String {
    format!(
        "{}{HISTORY_QUERY}?{}",
        point_history_url(base, location, point),
        query.to_query_string()
    )
}

/// Reduces an `href` to the name of a resource below `parent`.
///
/// The href is normalized first. Hrefs given as absolute URLs or absolute
/// paths (`/obix/histories/Building1/`) lose everything up to and including
/// the `parent` path; relative hrefs (`Building1/`) only lose their outer
/// slashes. An href naming `parent` itself yields an empty string.
#[must_use]
pub fn resource_name<'a>(href: &'a str, parent: &str) -> &'a str {
    let path = normalize_href(strip_origin(href));
    let parent = normalize_href(parent);
    if parent.is_empty() {
        return path;
    }

    let step = parent.chars().next().map_or(1, char::len_utf8);
    let mut offset = 0;
    while let Some(found) = path[offset..].find(parent) {
        let start = offset + found;
        let end = start + parent.len();
        let at_segment_start = start == 0 || path.as_bytes()[start - 1] == b'/';
        let rest = &path[end..];
        if at_segment_start && (rest.is_empty() || rest.starts_with('/')) {
            return normalize_href(rest);
        }
        offset = start + step;
    }
    path
}

/// Drops `scheme://authority` from an absolute URL, leaving its path.
fn strip_origin(href: &str) -> &str {
    href.find("://").map_or(href, |scheme_end| {
        let after = &href[scheme_end + 3..];
        after.find('/').map_or("", |path_start| &after[path_start..])
    })
}
