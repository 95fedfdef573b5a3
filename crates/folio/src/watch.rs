use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use anyhow::{Context, Result};
use notify_debouncer_mini::notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use tracing::{debug, warn};

const DEBOUNCE: Duration = Duration::from_millis(250);

/// Watches a deck file for changes. The parent directory is watched so
/// editors that save by rename are still seen.
pub struct RegistryWatcher {
    path: PathBuf,
    rx: Receiver<DebounceEventResult>,
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl RegistryWatcher {
    pub fn new(path: &Path) -> Result<Self> {
        let path = path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", path.display()))?;
        let dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        let (tx, rx) = mpsc::channel();
        let mut debouncer = new_debouncer(DEBOUNCE, tx).context("Failed to start file watcher")?;
        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;
        debug!(path = %path.display(), "watching deck file");

        Ok(Self {
            path,
            rx,
            _debouncer: debouncer,
        })
    }

    /// Drain pending events. True when the deck file changed since the
    /// last call.
    pub fn poll(&self) -> bool {
        let mut changed = false;
        for result in self.rx.try_iter() {
            match result {
                Ok(events) => {
                    changed |= events.iter().any(|e| same_file(&e.path, &self.path));
                }
                Err(e) => warn!(error = %e, "file watcher error"),
            }
        }
        changed
    }
}

fn same_file(event: &Path, watched: &Path) -> bool {
    event == watched || event.file_name().is_some_and(|n| Some(n) == watched.file_name())
}
