//! CLI command implementations.

pub(crate) mod history;
pub(crate) mod locations;
pub(crate) mod points;

use crate::ServerArgs;
use anyhow::{Context, Result};
use gaslamp_lib::prelude::*;
use std::time::Duration;

/// Build a client from the connection arguments.
pub(crate) fn connect(server: &ServerArgs) -> Result<HistoryClient> {
    let url = server
        .url
        .as_deref()
        .context("No server URL given. Pass --url or set GASLAMP_URL")?;
    let config = ClientConfig {
        timeout: Duration::from_secs(server.timeout),
        ..Default::default()
    };
    HistoryClient::with_config(Credentials::new(&server.user, &server.password), url, config)
        .with_context(|| format!("Cannot create client for {url}"))
}

/// Location names are addressed as directories on the server.
pub(crate) fn location_dir(location: &str) -> String {
    let trimmed = location.trim_matches('/');
    format!("{trimmed}/")
}
