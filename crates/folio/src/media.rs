use std::collections::HashMap;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::registry::{AssetRef, Registry, SlideRecord};

/// Playback rate applied to slide videos once their metadata is known.
pub const VIDEO_RATE: f32 = 1.2;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "m4v", "ogv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Still,
}

impl MediaKind {
    /// Pick the element type from the asset's file extension.
    pub fn sniff(asset: &AssetRef) -> Self {
        match asset.extension() {
            Some(ext) if VIDEO_EXTENSIONS.contains(&ext.as_str()) => Self::Video,
            _ => Self::Still,
        }
    }
}

/// Answers whether an asset can be loaded. Swapped out in tests.
pub trait MediaProbe {
    fn available(&self, asset: &AssetRef) -> bool;
}

/// Local files must exist. Remote assets are assumed reachable here and
/// checked later by [`VideoChecks`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl MediaProbe for FsProbe {
    fn available(&self, asset: &AssetRef) -> bool {
        match asset {
            AssetRef::Local(path) => Path::new(path).is_file(),
            AssetRef::Remote(_) => true,
        }
    }
}

/// The media element of one slide.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideMedia {
    /// Looping, muted video. Frames are not decoded; the poster stands in.
    Video {
        asset: AssetRef,
        poster: AssetRef,
        alt: String,
        playing: bool,
        rate: f32,
    },
    Still { asset: AssetRef, alt: String },
}

impl SlideMedia {
    /// Build the media for `record`, preferring its video and falling back
    /// to the still image when the video cannot be loaded.
    pub fn for_record(record: &SlideRecord, registry: &Registry, probe: &dyn MediaProbe) -> Self {
        let alt = record.display_title().to_string();
        let poster = registry.to_abs(record.image());

        if record.video_path.is_empty() {
            return Self::Still { asset: poster, alt };
        }

        let video = registry.to_abs(&record.video_path);
        if MediaKind::sniff(&video) != MediaKind::Video {
            warn!(asset = %video, "unsupported video format, using still image");
            return Self::Still { asset: poster, alt };
        }
        if !probe.available(&video) {
            warn!(asset = %video, "video load failed, using still image");
            return Self::Still { asset: poster, alt };
        }

        Self::Video {
            asset: video,
            poster,
            alt,
            playing: true,
            rate: VIDEO_RATE,
        }
    }

    /// Replace a video with its still fallback, keeping the alt text.
    pub fn fail(&mut self) {
        if let Self::Video {
            asset, poster, alt, ..
        } = self
        {
            warn!(asset = %asset, "video playback failed, using still image");
            *self = Self::Still {
                asset: poster.clone(),
                alt: std::mem::take(alt),
            };
        }
    }

    pub fn pause(&mut self) {
        if let Self::Video { playing, .. } = self {
            *playing = false;
        }
    }

    pub fn resume(&mut self) {
        if let Self::Video { playing, .. } = self {
            *playing = true;
        }
    }

    #[cfg(test)]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Video { playing: true, .. })
    }

    #[cfg(test)]
    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Video { .. } => MediaKind::Video,
            Self::Still { .. } => MediaKind::Still,
        }
    }

    /// The video URL still waiting on a reachability check, if any.
    pub fn remote_video(&self) -> Option<&AssetRef> {
        match self {
            Self::Video {
                asset: asset @ AssetRef::Remote(_),
                ..
            } => Some(asset),
            _ => None,
        }
    }

    pub fn alt(&self) -> &str {
        match self {
            Self::Video { alt, .. } | Self::Still { alt, .. } => alt,
        }
    }

    /// Image to draw for this frame.
    pub fn frame_source(&self) -> &AssetRef {
        match self {
            Self::Video { poster, .. } => poster,
            Self::Still { asset, .. } => asset,
        }
    }
}

/// `HEAD` the video URL; any transport error or error status counts as a
/// failed load.
pub fn head_check(asset: &AssetRef) -> Result<()> {
    match asset {
        AssetRef::Local(path) => {
            anyhow::ensure!(path.is_file(), "{} does not exist", path.display());
            Ok(())
        }
        AssetRef::Remote(url) => {
            ureq::head(url)
                .header("Cache-Control", "no-store")
                .call()
                .with_context(|| format!("Failed to reach {url}"))?;
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Check {
    Pending,
    Reachable,
    Failed,
}

type Checked = (AssetRef, Result<(), String>);

/// Reachability checks for remote slide videos, run on worker threads.
/// Results are cached per URL for the session, so a video that failed once
/// falls back straight away when its slide is mounted again.
pub struct VideoChecks {
    checks: HashMap<AssetRef, Check>,
    checker: fn(&AssetRef) -> Result<()>,
    tx: Sender<Checked>,
    rx: Receiver<Checked>,
}

impl Default for VideoChecks {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoChecks {
    pub fn new() -> Self {
        Self::with_checker(head_check)
    }

    pub fn with_checker(checker: fn(&AssetRef) -> Result<()>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            checks: HashMap::new(),
            checker,
            tx,
            rx,
        }
    }

    /// Record results that arrived since the last call.
    pub fn poll(&mut self) {
        for (asset, result) in self.rx.try_iter() {
            let check = match result {
                Ok(()) => {
                    debug!(asset = %asset, "video reachable");
                    Check::Reachable
                }
                Err(e) => {
                    warn!(asset = %asset, error = %e, "video load failed");
                    Check::Failed
                }
            };
            self.checks.insert(asset, check);
        }
    }

    /// Start a check for `media`'s remote video, or apply a finished one.
    /// `notify` runs on the worker once its result is ready.
    pub fn settle(&mut self, media: &mut SlideMedia, notify: impl FnOnce() + Send + 'static) {
        let Some(asset) = media.remote_video() else {
            return;
        };
        match self.checks.get(asset).copied() {
            Some(Check::Failed) => media.fail(),
            Some(Check::Pending | Check::Reachable) => {}
            None => {
                let asset = asset.clone();
                self.checks.insert(asset.clone(), Check::Pending);
                let tx = self.tx.clone();
                let checker = self.checker;
                std::thread::spawn(move || {
                    let result = checker(&asset).map_err(|e| format!("{e:#}"));
                    let _ = tx.send((asset, result));
                    notify();
                });
            }
        }
    }

    /// Forget cached results, e.g. after the deck was reloaded.
    pub fn clear(&mut self) {
        self.checks.clear();
    }
}
