//! History points and endpoint references.

use serde::{Deserialize, Serialize};

/// A history point: its name within a location and its feed URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    name: String,
    url: String,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Returns the point name, e.g. `SolarPanelTemperature`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the absolute history feed URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.url)
    }
}

/// Strips every leading and trailing `/` from an `href`.
///
/// Internal slashes are left alone.
///
/// ```
/// use gaslamp_types::normalize_href;
///
/// assert_eq!(normalize_href("//site1/Temp/"), "site1/Temp");
/// ```
#[must_use]
pub fn normalize_href(href: &str) -> &str {
    href.trim_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_outer_slashes_only() {
        for leading in 0..4 {
            for trailing in 0..4 {
                let href = format!("{}a/b//c{}", "/".repeat(leading), "/".repeat(trailing));
                assert_eq!(normalize_href(&href), "a/b//c", "href {href:?}");
            }
        }
    }

    #[test]
    fn test_normalize_degenerate() {
        assert_eq!(normalize_href(""), "");
        assert_eq!(normalize_href("///"), "");
        assert_eq!(normalize_href("Temp"), "Temp");
    }

    #[test]
    fn test_point_accessors() {
        let point = Point::new("Temp", "http://h/obix/histories/site1/Temp/");
        assert_eq!(point.name(), "Temp");
        assert_eq!(point.url(), "http://h/obix/histories/site1/Temp/");
        assert_eq!(point.to_string(), "Temp (http://h/obix/histories/site1/Temp/)");
    }
}
