//! History command implementation.
//!
//! This module handles querying the history of a point and writing it to
//! various output formats.

use super::{connect, location_dir};
use crate::ServerArgs;
use crate::display::{Format, write_series};
use anyhow::{Context, Result};
use chrono::TimeDelta;
use gaslamp_lib::prelude::*;
use std::path::PathBuf;
use tracing::info;

/// Query the history of a point and write it out.
#[allow(clippy::too_many_arguments)]
pub(crate) fn export_history(
    server: &ServerArgs,
    location: &str,
    point: &str,
    start_str: Option<&str>,
    end_str: Option<&str>,
    limit: u32,
    format: Format,
    output: Option<PathBuf>,
) -> Result<()> {
    let query = build_query(start_str, end_str, limit)?;
    let client = connect(server)?;
    let location = location_dir(location);

    info!(%query, "querying {location}{point}");
    let series = client
        .history_values(&location, point, &query)
        .with_context(|| format!("Cannot retrieve history of {location}{point}"))?;

    if series.is_empty() {
        info!("query returned no records");
    }

    write_series(&series, output.as_deref(), format)
}

/// Build the query window, defaulting to the 24 hours before `end`.
fn build_query(start_str: Option<&str>, end_str: Option<&str>, limit: u32) -> Result<HistoryQuery> {
    let end = match end_str {
        Some(s) => parse_timestamp(s).with_context(|| format!("Invalid end time: {s}"))?,
        None => now(),
    };
    let start = match start_str {
        Some(s) => parse_timestamp(s).with_context(|| format!("Invalid start time: {s}"))?,
        None => end - TimeDelta::days(1),
    };

    Ok(HistoryQuery::new(start, end, limit)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_explicit_window() {
        let query = build_query(
            Some("2013-01-01T00:00:00-05:00"),
            Some("2013-01-02T00:00:00-05:00"),
            50,
        )
        .unwrap();
        assert_eq!(
            query.to_query_string(),
            "start=2013-01-01T00:00:00.000-05:00&end=2013-01-02T00:00:00.000-05:00&limit=50"
        );
    }

    #[test]
    fn test_build_query_default_start() {
        let query = build_query(None, Some("2013-01-02T00:00:00Z"), 100).unwrap();
        assert_eq!(query.end - query.start, TimeDelta::days(1));
    }

    #[test]
    fn test_build_query_rejects_bad_input() {
        assert!(build_query(Some("yesterday"), None, 100).is_err());
        assert!(
            build_query(
                Some("2013-01-03T00:00:00Z"),
                Some("2013-01-02T00:00:00Z"),
                100
            )
            .is_err()
        );
    }
}
