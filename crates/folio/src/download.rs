//! Save an asset to disk, falling back to opening it externally.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::registry::AssetRef;

/// Largest body accepted from a remote asset.
const MAX_DOWNLOAD_BYTES: u64 = 256 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved(PathBuf),
    /// Fetch failed; the caller should hand this URL to the platform opener.
    OpenExternally(String),
}

/// The user's download directory, or the working directory.
pub fn default_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Read the asset's bytes. Remote assets bypass caches.
pub fn fetch(asset: &AssetRef) -> Result<Vec<u8>> {
    match asset {
        AssetRef::Local(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        AssetRef::Remote(url) => {
            let mut response = ureq::get(url)
                .header("Cache-Control", "no-store")
                .call()
                .with_context(|| format!("Failed to fetch {url}"))?;
            response
                .body_mut()
                .with_config()
                .limit(MAX_DOWNLOAD_BYTES)
                .read_to_vec()
                .with_context(|| format!("Failed to read body of {url}"))
        }
    }
}

/// Write `bytes` into `dir` as `name`, adding ` (n)` before the extension
/// if the name is taken.
pub fn save_to(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = unique_path(dir, sanitize(name).as_str());
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "download".to_string()
    } else {
        cleaned
    }
}

fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let first = dir.join(name);
    if !first.exists() {
        return first;
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((s, e)) if !s.is_empty() => (s, Some(e)),
        _ => (name, None),
    };
    (1..)
        .map(|n| match ext {
            Some(e) => dir.join(format!("{stem} ({n}).{e}")),
            None => dir.join(format!("{stem} ({n})")),
        })
        .find(|p| !p.exists())
        .unwrap_or(first)
}

/// Fetch and save; any failure degrades to opening the asset URL.
pub fn download_or_fallback(asset: &AssetRef, name: &str, dir: &Path) -> DownloadOutcome {
    match fetch(asset).and_then(|bytes| save_to(dir, name, &bytes)) {
        Ok(path) => {
            info!(asset = %asset, path = %path.display(), "download saved");
            DownloadOutcome::Saved(path)
        }
        Err(e) => {
            warn!(asset = %asset, error = %format!("{e:#}"), "download failed, opening externally");
            DownloadOutcome::OpenExternally(asset.to_url())
        }
    }
}

/// Run [`download_or_fallback`] on a worker thread. `notify` fires once the
/// outcome is ready.
pub fn spawn(
    asset: AssetRef,
    name: String,
    dir: PathBuf,
    notify: impl FnOnce() + Send + 'static,
) -> mpsc::Receiver<DownloadOutcome> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let outcome = download_or_fallback(&asset, &name, &dir);
        let _ = tx.send(outcome);
        notify();
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("folio-dl-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_save_avoids_overwrite() {
        let dir = temp_dir("unique");
        let a = save_to(&dir, "resume.png", b"one").unwrap();
        let b = save_to(&dir, "resume.png", b"two").unwrap();
        assert_eq!(a.file_name().unwrap(), "resume.png");
        assert_eq!(b.file_name().unwrap(), "resume (1).png");
        assert_eq!(std::fs::read(&a).unwrap(), b"one");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("../etc/passwd"), "_etc_passwd");
        assert_eq!(sanitize("  "), "download");
        assert_eq!(sanitize("a:b.png"), "a_b.png");
    }

    #[test]
    fn test_local_copy() {
        let dir = temp_dir("local");
        let src = dir.join("src.bin");
        std::fs::write(&src, [1u8, 2, 3]).unwrap();
        let out = dir.join("out");
        let outcome = download_or_fallback(&AssetRef::Local(src), "copy.bin", &out);
        let DownloadOutcome::Saved(path) = outcome else {
            panic!("expected a saved file");
        };
        assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_asset_falls_back_to_url() {
        let dir = temp_dir("missing");
        let asset = AssetRef::Local(dir.join("nope.png"));
        let outcome = download_or_fallback(&asset, "nope.png", &dir);
        assert_eq!(outcome, DownloadOutcome::OpenExternally(asset.to_url()));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_spawn_reports_outcome() {
        let dir = temp_dir("spawn");
        let asset = AssetRef::Local(dir.join("absent.txt"));
        let rx = spawn(asset, "absent.txt".into(), dir.clone(), || {});
        let outcome = rx.recv().unwrap();
        assert!(matches!(outcome, DownloadOutcome::OpenExternally(_)));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
