//! Locations command implementation.

use super::connect;
use crate::ServerArgs;
use anyhow::{Context, Result};

/// Print the URL of every history location on the server.
pub(crate) fn list_locations(server: &ServerArgs) -> Result<()> {
    let client = connect(server)?;
    let locations = client
        .locations()
        .with_context(|| format!("Cannot list locations on {}", client.base_url()))?;

    if locations.is_empty() {
        println!("No locations found.");
        return Ok(());
    }

    for location in &locations {
        println!("{location}");
    }

    println!("\nTotal: {} locations", locations.len());
    Ok(())
}
