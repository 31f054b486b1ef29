//! Points command implementation.
//!
//! Lists the points of one location, either as a name table or as feed URLs.

use super::{connect, location_dir};
use crate::ServerArgs;
use anyhow::{Context, Result};

/// Print the points of a location.
pub(crate) fn list_points(server: &ServerArgs, location: &str, urls: bool) -> Result<()> {
    let client = connect(server)?;
    let location = location_dir(location);
    let points = client
        .points(&location)
        .with_context(|| format!("Cannot list points of {location}"))?;

    if points.is_empty() {
        println!("No points found.");
        return Ok(());
    }

    if urls {
        for point in &points {
            println!("{}", point.url());
        }
        return Ok(());
    }

    let width = points.iter().map(|p| p.name().len()).max().unwrap_or(0).max(4);
    println!("{:<width$}  URL", "NAME");
    println!("{}", "-".repeat(width + 40));
    for point in &points {
        println!("{:<width$}  {}", point.name(), point.url());
    }

    println!("\nTotal: {} points", points.len());
    Ok(())
}
