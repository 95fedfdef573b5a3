use anyhow::{Context, Result};
use colored::Colorize;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::registry::{Registry, SlideRecord};

static TAG_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\s]+").expect("valid tag separator regex"));

/// Normalize a filter argument. `None` means every slide is shown.
pub fn normalize_filter(filter: &str) -> Option<String> {
    let f = filter.trim().to_lowercase();
    match f.as_str() {
        "" | "all" | "*" | "everything" => None,
        _ => Some(f),
    }
}

/// Lowercased individual tags of a record. A single tag entry may itself hold
/// several comma or space separated tags.
pub fn record_tags(record: &SlideRecord) -> Vec<String> {
    record
        .tags
        .iter()
        .flat_map(|t| {
            TAG_SPLIT
                .split(&t.to_lowercase())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn matches_filter(record: &SlideRecord, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(f) => record_tags(record).iter().any(|t| t == f),
    }
}

/// 1-based indices and records that pass the filter.
pub fn filter_records<'a>(
    records: &'a [SlideRecord],
    filter: Option<&str>,
) -> Vec<(usize, &'a SlideRecord)> {
    let filter = filter.and_then(normalize_filter);
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| matches_filter(r, filter.as_deref()))
        .map(|(i, r)| (i + 1, r))
        .collect()
}

pub fn run(slides: Option<&Path>, filter: Option<&str>) -> Result<()> {
    let registry = Registry::open(slides).context("Failed to load slides")?;
    let shown = filter_records(registry.records(), filter);

    if shown.is_empty() {
        println!(
            "{}",
            format!("No slides tagged '{}'.", filter.unwrap_or_default()).yellow()
        );
        return Ok(());
    }

    let total = registry.len();
    for (index, record) in &shown {
        let slug = record
            .slug
            .as_deref()
            .map(|s| format!(" ({s})"))
            .unwrap_or_default();
        println!(
            "{} {} {}{}",
            format!("{index:02}").bold(),
            format!("/ {total:02}").dimmed(),
            record.display_title().cyan(),
            slug.dimmed()
        );
        if !record.tags.is_empty() {
            println!("     {}", record.tags.join(", ").dimmed());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, tags: &[&str]) -> SlideRecord {
        SlideRecord {
            title: title.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_filter_keywords() {
        assert_eq!(normalize_filter("all"), None);
        assert_eq!(normalize_filter("*"), None);
        assert_eq!(normalize_filter(" Everything "), None);
        assert_eq!(normalize_filter(""), None);
        assert_eq!(normalize_filter("Branding"), Some("branding".into()));
    }

    #[test]
    fn test_tags_split_on_commas_and_whitespace() {
        let r = record("Toner", &["Branding, Print", "web  motion"]);
        assert_eq!(record_tags(&r), vec!["branding", "print", "web", "motion"]);
    }

    #[test]
    fn test_filter_records_keeps_one_based_indices() {
        let records = vec![
            record("A", &["web"]),
            record("B", &["Branding"]),
            record("C", &["print, branding"]),
        ];
        let hits: Vec<usize> = filter_records(&records, Some("BRANDING"))
            .into_iter()
            .map(|(i, _)| i)
            .collect();
        assert_eq!(hits, vec![2, 3]);
        assert_eq!(filter_records(&records, Some("everything")).len(), 3);
        assert_eq!(filter_records(&records, None).len(), 3);
        assert!(filter_records(&records, Some("video")).is_empty());
    }
}
