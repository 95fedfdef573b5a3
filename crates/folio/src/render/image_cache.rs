use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use eframe::egui;
use tracing::{debug, warn};

use crate::download;
use crate::registry::AssetRef;

/// Decodes running at once. Further requests wait in a queue.
const MAX_WORKERS: usize = 4;
/// A failed remote image is fetched again after this long, at most
/// `MAX_ATTEMPTS` times in total. Local failures are final.
const RETRY_AFTER: Duration = Duration::from_secs(5);
const MAX_ATTEMPTS: u32 = 3;

pub enum ImageState<'a> {
    Loading,
    Ready(&'a egui::TextureHandle),
    Failed,
}

enum Entry {
    Loading { attempts: u32 },
    Ready(egui::TextureHandle),
    Failed { attempts: u32, at: Instant },
}

type Decoded = (AssetRef, Result<egui::ColorImage, String>);

/// Textures keyed by asset. Decoding happens on a small pool of worker
/// threads; `poll` uploads finished images on the UI thread.
pub struct ImageCache {
    entries: HashMap<AssetRef, Entry>,
    queue: VecDeque<AssetRef>,
    in_flight: usize,
    tx: Sender<Decoded>,
    rx: Receiver<Decoded>,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCache {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            entries: HashMap::new(),
            queue: VecDeque::new(),
            in_flight: 0,
            tx,
            rx,
        }
    }

    /// Start loading `asset` unless it is loaded, loading, or failed too
    /// recently to retry.
    pub fn request(&mut self, ctx: &egui::Context, asset: &AssetRef) {
        let attempts = match self.entries.get(asset) {
            None => 0,
            Some(Entry::Failed { attempts, at })
                if retryable(asset, *attempts, at.elapsed()) =>
            {
                debug!(asset = %asset, attempt = attempts + 1, "retrying image");
                *attempts
            }
            Some(_) => return,
        };
        self.entries
            .insert(asset.clone(), Entry::Loading { attempts: attempts + 1 });
        self.queue.push_back(asset.clone());
        self.pump(ctx);
    }

    fn pump(&mut self, ctx: &egui::Context) {
        while self.in_flight < MAX_WORKERS {
            let Some(asset) = self.queue.pop_front() else {
                break;
            };
            self.in_flight += 1;
            let tx = self.tx.clone();
            let ctx = ctx.clone();
            std::thread::spawn(move || {
                let decoded = decode(&asset);
                let _ = tx.send((asset, decoded));
                ctx.request_repaint();
            });
        }
    }

    /// Upload any images decoded since the last frame.
    pub fn poll(&mut self, ctx: &egui::Context) {
        let finished: Vec<Decoded> = self.rx.try_iter().collect();
        for (asset, decoded) in finished {
            self.in_flight = self.in_flight.saturating_sub(1);
            // Dropped by `clear` while the worker ran.
            let Some(Entry::Loading { attempts }) = self.entries.get(&asset) else {
                continue;
            };
            let attempts = *attempts;
            let entry = match decoded {
                Ok(image) => {
                    debug!(asset = %asset, "image loaded");
                    Entry::Ready(ctx.load_texture(
                        asset.to_string(),
                        image,
                        egui::TextureOptions::LINEAR,
                    ))
                }
                Err(e) => {
                    warn!(asset = %asset, attempts, error = %e, "image load failed");
                    Entry::Failed {
                        attempts,
                        at: Instant::now(),
                    }
                }
            };
            self.entries.insert(asset, entry);
        }
        self.pump(ctx);
    }

    pub fn get(&self, asset: &AssetRef) -> Option<&egui::TextureHandle> {
        match self.entries.get(asset) {
            Some(Entry::Ready(t)) => Some(t),
            _ => None,
        }
    }

    pub fn state(&self, asset: &AssetRef) -> ImageState<'_> {
        match self.entries.get(asset) {
            Some(Entry::Ready(t)) => ImageState::Ready(t),
            Some(Entry::Failed { .. }) => ImageState::Failed,
            Some(Entry::Loading { .. }) | None => ImageState::Loading,
        }
    }

    /// Forget everything, e.g. after the deck was reloaded.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.queue.clear();
    }
}

fn retryable(asset: &AssetRef, attempts: u32, since: Duration) -> bool {
    matches!(asset, AssetRef::Remote(_)) && attempts < MAX_ATTEMPTS && since >= RETRY_AFTER
}

fn decode(asset: &AssetRef) -> Result<egui::ColorImage, String> {
    let bytes = download::fetch(asset).map_err(|e| format!("{e:#}"))?;
    let image = image::load_from_memory(&bytes).map_err(|e| e.to_string())?;
    let rgba = image.into_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        rgba.as_flat_samples().as_slice(),
    ))
}
