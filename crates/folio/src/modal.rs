//! Resume and project dialogs, sharing one open/close choreography.

use std::time::Duration;

use tracing::{debug, info};

use crate::deck::{DeckController, DeckTiming};
use crate::media::MediaKind;
use crate::registry::{AssetRef, FALLBACK_IMAGE, Registry};
use crate::render::transition::{Ease, progress};

/// Title shown when a project link points at no record.
pub const UNKNOWN_PROJECT_TITLE: &str = "Project";

const SHEET_HIDDEN_Y_PERCENT: f32 = -4.0;
const SHEET_HIDDEN_SCALE: f32 = 0.98;

/// Whatever sits behind the dialog. Locked while a dialog is up: pointer
/// interaction on the slider is suspended and deck media pauses.
pub trait Backdrop {
    fn lock(&mut self);
    fn unlock(&mut self);
}

/// Full-resolution content of a project dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum HiRes {
    Image(AssetRef),
    Video(AssetRef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDialog {
    pub title: String,
    /// Low-resolution placeholder, shown immediately.
    pub thumb: AssetRef,
    pub hi: HiRes,
    /// Set once the sheet has settled; the renderer may then load `hi` and
    /// swap it in when ready.
    pub swap_requested: bool,
    pub download: AssetRef,
    pub download_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogContent {
    Resume {
        image: AssetRef,
        download: AssetRef,
        download_name: String,
    },
    Project(ProjectDialog),
}

impl DialogContent {
    pub fn download(&self) -> (&AssetRef, &str) {
        match self {
            Self::Resume {
                download,
                download_name,
                ..
            } => (download, download_name),
            Self::Project(p) => (&p.download, &p.download_name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetPhase {
    Hidden,
    Opening { since: Duration },
    Shown { since: Duration, focused: bool },
    Closing { since: Duration, from_alpha: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEvent {
    /// Entrance finished; hi-res swap may start.
    Shown,
    /// The close button should take focus.
    FocusClose,
    /// Exit finished; the deck gets its input back after the grace period.
    Closed,
}

/// Transform of the dialog sheet at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetPose {
    pub y_percent: f32,
    pub scale: f32,
    pub alpha: f32,
}

impl SheetPose {
    fn at(visible: f32) -> Self {
        Self {
            y_percent: SHEET_HIDDEN_Y_PERCENT * (1.0 - visible),
            scale: SHEET_HIDDEN_SCALE + (1.0 - SHEET_HIDDEN_SCALE) * visible,
            alpha: visible,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModalSubsystem {
    timing: DeckTiming,
    phase: SheetPhase,
    content: Option<DialogContent>,
}

impl ModalSubsystem {
    pub fn new(timing: DeckTiming) -> Self {
        Self {
            timing,
            phase: SheetPhase::Hidden,
            content: None,
        }
    }

    pub fn phase(&self) -> SheetPhase {
        self.phase
    }

    pub fn content(&self) -> Option<&DialogContent> {
        self.content.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.phase != SheetPhase::Hidden
    }

    pub fn open_resume(
        &mut self,
        registry: &Registry,
        deck: &mut DeckController,
        backdrop: &mut dyn Backdrop,
        now: Duration,
    ) -> bool {
        let resume = registry.resume();
        let content = DialogContent::Resume {
            download_name: resume.file_name(),
            download: resume.clone(),
            image: resume,
        };
        self.open(content, deck, backdrop, now)
    }

    /// Open the dialog for the record a call-to-action points at.
    /// `density` picks among the record's `srcset` candidates.
    pub fn open_project(
        &mut self,
        source_index: usize,
        density: f32,
        registry: &Registry,
        deck: &mut DeckController,
        backdrop: &mut dyn Backdrop,
        now: Duration,
    ) -> bool {
        let content = DialogContent::Project(project_dialog(registry, source_index, density));
        self.open(content, deck, backdrop, now)
    }

    fn open(
        &mut self,
        content: DialogContent,
        deck: &mut DeckController,
        backdrop: &mut dyn Backdrop,
        now: Duration,
    ) -> bool {
        if self.is_visible() || deck.open_modal().is_none() {
            debug!("dialog already open or deck busy");
            return false;
        }
        backdrop.lock();
        self.content = Some(content);
        self.phase = SheetPhase::Opening { since: now };
        true
    }

    /// Start the exit animation. Ignored when already closing or hidden.
    pub fn request_close(&mut self, now: Duration) -> bool {
        let from_alpha = match self.sheet_pose(now) {
            Some(pose) => pose.alpha,
            None => return false,
        };
        match self.phase {
            SheetPhase::Opening { .. } | SheetPhase::Shown { .. } => {
                self.phase = SheetPhase::Closing {
                    since: now,
                    from_alpha,
                };
                debug!("dialog closing");
                true
            }
            _ => false,
        }
    }

    /// Advance the sheet's phases. Finishing the exit unlocks the backdrop
    /// and hands input back to the deck.
    pub fn tick(
        &mut self,
        now: Duration,
        deck: &mut DeckController,
        backdrop: &mut dyn Backdrop,
    ) -> Vec<ModalEvent> {
        let mut events = Vec::new();
        loop {
            match self.phase {
                SheetPhase::Opening { since } if now >= since + self.timing.modal_open => {
                    let shown_at = since + self.timing.modal_open;
                    self.phase = SheetPhase::Shown {
                        since: shown_at,
                        focused: false,
                    };
                    if let Some(DialogContent::Project(p)) = self.content.as_mut() {
                        p.swap_requested = true;
                    }
                    events.push(ModalEvent::Shown);
                }
                SheetPhase::Shown {
                    since,
                    focused: false,
                } if now >= since + self.timing.focus_delay => {
                    self.phase = SheetPhase::Shown {
                        since,
                        focused: true,
                    };
                    events.push(ModalEvent::FocusClose);
                }
                SheetPhase::Closing { since, .. } if now >= since + self.timing.modal_close => {
                    let closed_at = since + self.timing.modal_close;
                    self.phase = SheetPhase::Hidden;
                    self.content = None;
                    backdrop.unlock();
                    deck.modal_closed(closed_at);
                    info!("dialog hidden");
                    events.push(ModalEvent::Closed);
                }
                _ => break,
            }
        }
        events
    }

    pub fn sheet_pose(&self, now: Duration) -> Option<SheetPose> {
        match self.phase {
            SheetPhase::Hidden => None,
            SheetPhase::Opening { since } => {
                let p = progress(now.saturating_sub(since), self.timing.modal_open);
                Some(SheetPose::at(Ease::Power2Out.apply(p)))
            }
            SheetPhase::Shown { .. } => Some(SheetPose::at(1.0)),
            SheetPhase::Closing { since, from_alpha } => {
                let p = progress(now.saturating_sub(since), self.timing.modal_close);
                Some(SheetPose::at(from_alpha * (1.0 - Ease::Power2In.apply(p))))
            }
        }
    }
}

fn project_dialog(registry: &Registry, source_index: usize, density: f32) -> ProjectDialog {
    let Some(record) = registry.by_source_index(source_index) else {
        debug!(source_index, "project link points past the deck");
        let fallback = registry.to_abs(FALLBACK_IMAGE);
        return ProjectDialog {
            title: UNKNOWN_PROJECT_TITLE.to_string(),
            thumb: fallback.clone(),
            hi: HiRes::Image(fallback.clone()),
            swap_requested: false,
            download_name: fallback.file_name(),
            download: fallback,
        };
    };

    let title = if record.title.is_empty() {
        UNKNOWN_PROJECT_TITLE.to_string()
    } else {
        record.title.clone()
    };
    let hi_path = record
        .srcset
        .as_deref()
        .and_then(|set| pick_srcset(set, density))
        .unwrap_or_else(|| record.image().to_string());
    let hi_asset = registry.to_abs(&hi_path);
    let hi = match MediaKind::sniff(&hi_asset) {
        MediaKind::Video => HiRes::Video(hi_asset),
        MediaKind::Still => HiRes::Image(hi_asset),
    };
    let download = registry.to_abs(record.download());

    ProjectDialog {
        title,
        thumb: registry.to_abs(record.thumb()),
        hi,
        swap_requested: false,
        download_name: download.file_name(),
        download,
    }
}

/// Choose the candidate of a `srcset` best matching `density`
/// (physical pixels per point): the smallest `Nx` at or above it, else the
/// largest available. Width descriptors are ignored.
pub fn pick_srcset(srcset: &str, density: f32) -> Option<String> {
    let mut candidates: Vec<(f32, &str)> = srcset
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split_whitespace();
            let url = parts.next()?;
            let scale = match parts.next() {
                None => 1.0,
                Some(d) => d.strip_suffix('x')?.parse::<f32>().ok()?,
            };
            Some((scale, url))
        })
        .collect();
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

    candidates
        .iter()
        .find(|(scale, _)| *scale >= density)
        .or(candidates.last())
        .map(|(_, url)| url.to_string())
}
