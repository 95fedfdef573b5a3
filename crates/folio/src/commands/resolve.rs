use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::registry::Registry;
use crate::resolve::{StartQuery, resolve};

pub fn run(slides: Option<&Path>, query: &StartQuery) -> Result<()> {
    let registry = Registry::open(slides).context("Failed to load slides")?;
    let index = resolve(query, registry.records());
    let title = registry
        .get(index)
        .map(|r| r.display_title().to_string())
        .unwrap_or_default();

    println!(
        "{} {} {}",
        format!("{index:02}").bold(),
        "/".dimmed(),
        title.cyan()
    );
    Ok(())
}
