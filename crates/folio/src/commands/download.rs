use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::download::{DownloadOutcome, default_dir, download_or_fallback};
use crate::registry::Registry;

pub fn run(index: usize, slides: Option<&Path>, output_dir: Option<PathBuf>) -> Result<()> {
    let registry = Registry::open(slides).context("Failed to load slides")?;
    let Some(record) = registry.get(index) else {
        anyhow::bail!(
            "Slide {index} is out of range (deck has {} slides)",
            registry.len()
        );
    };

    let asset = registry.to_abs(record.download());
    let name = asset.file_name();
    let dir = output_dir.unwrap_or_else(default_dir);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    println!("Downloading {} ...", asset.to_string().cyan());
    match download_or_fallback(&asset, &name, &dir) {
        DownloadOutcome::Saved(path) => {
            println!("{}", format!("Saved to {}", path.display()).green());
        }
        DownloadOutcome::OpenExternally(url) => {
            println!("{}", "Could not save the file directly.".yellow());
            println!("Open it here instead: {url}");
        }
    }
    Ok(())
}
