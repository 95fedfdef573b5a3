use anyhow::Context;
use eframe::egui;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::deck::{DeckController, DeckEvent, Phase};
use crate::download::{self, DownloadOutcome};
use crate::input::{InputRouter, NavKey, Routed};
use crate::media::{FsProbe, VideoChecks};
use crate::modal::{Backdrop, DialogContent, HiRes, ModalEvent, ModalSubsystem, SheetPhase};
use crate::registry::Registry;
use crate::render;
use crate::render::image_cache::ImageCache;
use crate::render::modal::DialogHits;
use crate::render::transition::{SlidePose, entry_pose, exit_pose};
use crate::resolve::{StartQuery, resolve};
use crate::theme::Theme;
use crate::view::SlideView;
use crate::watch::RegistryWatcher;

/// How the viewer was asked to start.
pub struct LaunchOptions {
    pub slides: Option<PathBuf>,
    pub query: StartQuery,
    pub windowed: bool,
}

/// The slides attached to the viewport, plus the lock a dialog puts on them.
#[derive(Default)]
struct Slider {
    current: Option<SlideView>,
    exiting: Option<SlideView>,
    locked: bool,
}

impl Slider {
    fn mount(&mut self, registry: &Registry, index: usize) {
        let Some(mut view) = SlideView::from_registry(registry, index, &FsProbe) else {
            warn!(index, "no slide record to mount");
            self.current = None;
            return;
        };
        if self.locked {
            view.media.pause();
        }
        self.current = Some(view);
    }

    /// The mounted slide starts leaving; the next one is built later.
    fn begin_exit(&mut self) {
        self.exiting = self.current.take();
    }

    fn views_mut(&mut self) -> impl Iterator<Item = &mut SlideView> {
        self.current.iter_mut().chain(self.exiting.iter_mut())
    }

    /// Check attached remote videos; swap in the still for any that failed.
    fn settle_videos(
        &mut self,
        checks: &mut VideoChecks,
        notify: impl Fn() + Clone + Send + 'static,
    ) {
        checks.poll();
        for view in self.views_mut() {
            checks.settle(&mut view.media, notify.clone());
        }
    }
}

impl Backdrop for Slider {
    fn lock(&mut self) {
        self.locked = true;
        for view in self.views_mut() {
            view.media.pause();
        }
    }

    fn unlock(&mut self) {
        self.locked = false;
        for view in self.views_mut() {
            view.media.resume();
        }
    }
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: String) -> Self {
        Self {
            message,
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        let duration = 1.5;
        let fade_start = 1.0;
        if elapsed < fade_start {
            1.0
        } else if elapsed < duration {
            1.0 - (elapsed - fade_start) / (duration - fade_start)
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= 1.5
    }
}

/// Clickable regions from the last drawn frame.
#[derive(Default)]
struct FrameHits {
    cta: Option<(egui::Rect, usize)>,
    resume: Option<egui::Rect>,
    dialog: Option<DialogHits>,
}

/// Input gathered inside `ctx.input` and applied afterwards.
#[derive(Default)]
struct FrameInput {
    wheel: Vec<f32>,
    touches: Vec<(egui::TouchPhase, f32)>,
    keys: Vec<egui::Key>,
    click: Option<egui::Pos2>,
    hover: Option<egui::Pos2>,
    fullscreen: bool,
}

struct FolioApp {
    registry: Registry,
    query: StartQuery,
    origin: Instant,
    deck: DeckController,
    router: InputRouter,
    modal: ModalSubsystem,
    slider: Slider,
    images: ImageCache,
    watcher: Option<RegistryWatcher>,
    download_rx: Option<mpsc::Receiver<DownloadOutcome>>,
    theme: Theme,
    toast: Option<Toast>,
    show_hud: bool,
    hits: FrameHits,
    videos: VideoChecks,
}

impl FolioApp {
    fn new(registry: Registry, query: StartQuery, config: &Config) -> Self {
        let origin = Instant::now();
        let timing = config.timing();
        let start = resolve(&query, registry.records());
        let deck = DeckController::new(registry.len(), start, timing, Duration::ZERO);

        let mut slider = Slider::default();
        slider.mount(&registry, deck.current_index());

        let watcher = registry
            .source()
            .and_then(|path| match RegistryWatcher::new(path) {
                Ok(w) => Some(w),
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "deck file will not be reloaded on change");
                    None
                }
            });

        info!(start, total = registry.len(), "deck ready");
        Self {
            registry,
            query,
            origin,
            deck,
            router: InputRouter::new(),
            modal: ModalSubsystem::new(timing),
            slider,
            images: ImageCache::new(),
            watcher,
            download_rx: None,
            theme: Theme::from_name(config.theme()),
            toast: None,
            show_hud: false,
            hits: FrameHits::default(),
            videos: VideoChecks::new(),
        }
    }

    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.toast = Some(Toast::new(format!("Theme: {}", self.theme.name)));

        let mut config = Config::load_or_default();
        let saved = config
            .set("defaults.theme", &self.theme.name)
            .and_then(|()| config.save());
        if let Err(e) = saved {
            warn!(error = %format!("{e:#}"), "could not persist theme");
        }
    }

    fn on_routed(&mut self, routed: Routed) {
        if routed.accepted() {
            self.slider.begin_exit();
        }
    }

    fn apply_deck_events(&mut self, events: Vec<DeckEvent>) {
        for event in events {
            match event {
                DeckEvent::Mounted { index, .. } => self.slider.mount(&self.registry, index),
                DeckEvent::Detached { .. } => self.slider.exiting = None,
                other => debug!(?other, "deck event"),
            }
        }
    }

    fn reload(&mut self, now: Duration) {
        let Some(path) = self.registry.source().map(Path::to_path_buf) else {
            return;
        };
        match Registry::load(&path) {
            Ok(registry) => {
                self.registry = registry;
                self.images.clear();
                self.videos.clear();
                let index = resolve(&self.query, self.registry.records());
                let events = self.deck.restore(self.registry.len(), index, now);
                self.apply_deck_events(events);
                self.toast = Some(Toast::new("Slides reloaded".to_string()));
            }
            Err(e) => {
                warn!(error = %e, "reload failed, keeping previous slides");
                self.toast = Some(Toast::new("Reload failed".to_string()));
            }
        }
    }

    fn open_resume(&mut self, now: Duration) {
        self.modal
            .open_resume(&self.registry, &mut self.deck, &mut self.slider, now);
    }

    fn open_project(&mut self, source_index: usize, density: f32, now: Duration) {
        self.modal.open_project(
            source_index,
            density,
            &self.registry,
            &mut self.deck,
            &mut self.slider,
            now,
        );
    }

    fn start_download(&mut self, ctx: &egui::Context) {
        if self.download_rx.is_some() {
            self.toast = Some(Toast::new("Download in progress".to_string()));
            return;
        }
        let Some(content) = self.modal.content() else {
            return;
        };
        let (asset, name) = content.download();
        let repaint = ctx.clone();
        self.download_rx = Some(download::spawn(
            asset.clone(),
            name.to_string(),
            download::default_dir(),
            move || repaint.request_repaint(),
        ));
        self.toast = Some(Toast::new(format!("Downloading {name}")));
    }

    fn poll_download(&mut self, ctx: &egui::Context) {
        let Some(rx) = &self.download_rx else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(mpsc::TryRecvError::Empty) => return,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.download_rx = None;
                return;
            }
        };
        self.download_rx = None;
        match outcome {
            DownloadOutcome::Saved(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.toast = Some(Toast::new(format!("Saved {name}")));
            }
            DownloadOutcome::OpenExternally(url) => {
                ctx.open_url(egui::OpenUrl::new_tab(url));
            }
        }
    }

    fn close_focused(&self) -> bool {
        matches!(
            self.modal.phase(),
            SheetPhase::Shown { focused: true, .. }
        )
    }

    fn gather_input(ctx: &egui::Context) -> FrameInput {
        ctx.input(|i| {
            let mut input = FrameInput {
                click: if i.pointer.primary_clicked() {
                    i.pointer.interact_pos()
                } else {
                    None
                },
                hover: i.pointer.hover_pos(),
                fullscreen: i.viewport().fullscreen.unwrap_or(false),
                ..Default::default()
            };
            for event in &i.events {
                match event {
                    // egui reports wheel-down as negative.
                    egui::Event::MouseWheel { delta, .. } if delta.y != 0.0 => {
                        input.wheel.push(-delta.y);
                    }
                    egui::Event::Touch { phase, pos, .. } => input.touches.push((*phase, pos.y)),
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        ..
                    } => input.keys.push(*key),
                    _ => {}
                }
            }
            input
        })
    }

    fn handle_input(&mut self, ctx: &egui::Context, input: &FrameInput, now: Duration) {
        // Collect viewport commands to send after the input closure.
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();

        for key in &input.keys {
            let nav = match key {
                egui::Key::ArrowDown => Some(NavKey::Down),
                egui::Key::ArrowUp => Some(NavKey::Up),
                egui::Key::PageDown => Some(NavKey::PageDown),
                egui::Key::PageUp => Some(NavKey::PageUp),
                egui::Key::Space => Some(NavKey::Space),
                _ => None,
            };
            if let Some(nav) = nav {
                let routed = self.router.key(nav, &mut self.deck, now);
                self.on_routed(routed);
                continue;
            }
            match key {
                egui::Key::Q => viewport_cmds.push(egui::ViewportCommand::Close),
                egui::Key::F => {
                    viewport_cmds.push(egui::ViewportCommand::Fullscreen(!input.fullscreen));
                }
                egui::Key::D => self.toggle_theme(),
                egui::Key::H => self.show_hud = !self.show_hud,
                egui::Key::R => self.open_resume(now),
                egui::Key::Escape => {
                    self.modal.request_close(now);
                }
                egui::Key::Enter if self.close_focused() => {
                    self.modal.request_close(now);
                }
                _ => {}
            }
        }

        for delta_y in &input.wheel {
            let routed = self.router.wheel(*delta_y, &mut self.deck, now);
            self.on_routed(routed);
        }

        for (phase, y) in &input.touches {
            match phase {
                egui::TouchPhase::Start => {
                    self.router.touch_start(*y, &self.deck);
                }
                egui::TouchPhase::Move => {
                    let routed = self.router.touch_move(*y, &mut self.deck, now);
                    self.on_routed(routed);
                }
                egui::TouchPhase::End | egui::TouchPhase::Cancel => self.router.touch_end(),
            }
        }

        if let Some(pos) = input.click {
            self.handle_click(ctx, pos, now);
        }

        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }
    }

    fn handle_click(&mut self, ctx: &egui::Context, pos: egui::Pos2, now: Duration) {
        if self.modal.is_visible() {
            let Some(hits) = self.hits.dialog else {
                return;
            };
            if hits.download.contains(pos) {
                self.start_download(ctx);
            } else if hits.close.contains(pos) || !hits.sheet.contains(pos) {
                self.modal.request_close(now);
            }
            return;
        }
        if self.slider.locked {
            return;
        }
        if self.hits.resume.is_some_and(|r| r.contains(pos)) {
            self.open_resume(now);
        } else if let Some((rect, source_index)) = self.hits.cta {
            if rect.contains(pos) {
                self.open_project(source_index, ctx.pixels_per_point(), now);
            }
        }
    }

    fn request_images(&mut self, ctx: &egui::Context) {
        let mut wanted = Vec::new();
        for view in [&self.slider.current, &self.slider.exiting]
            .into_iter()
            .flatten()
        {
            wanted.push(view.media.frame_source().clone());
        }
        match self.modal.content() {
            Some(DialogContent::Resume { image, .. }) => wanted.push(image.clone()),
            Some(DialogContent::Project(p)) => {
                wanted.push(p.thumb.clone());
                if let (true, HiRes::Image(hi)) = (p.swap_requested, &p.hi) {
                    wanted.push(hi.clone());
                }
            }
            None => {}
        }
        for asset in &wanted {
            self.images.request(ctx, asset);
        }
    }

    /// Whether anything on screen is still moving.
    fn is_moving(&self, now: Duration) -> bool {
        if self.deck.is_animating() || self.deck.exiting().is_some() {
            return true;
        }
        if !matches!(self.deck.phase(), Phase::Idle) {
            return true;
        }
        if matches!(
            self.modal.phase(),
            SheetPhase::Opening { .. }
                | SheetPhase::Closing { .. }
                | SheetPhase::Shown { focused: false, .. }
        ) {
            return true;
        }
        match (self.deck.mounted(), &self.slider.current) {
            (Some(m), Some(view)) if m.entered_from.is_some() => {
                now.saturating_sub(m.mounted_at).as_secs_f32() <= view.timeline.end()
            }
            _ => false,
        }
    }

    fn draw(&mut self, ui: &egui::Ui, now: Duration, hover: Option<egui::Pos2>) {
        let rect = ui.max_rect();
        let painter = ui.painter();
        painter.rect_filled(rect, 0.0, self.theme.background);
        let scale = render::compute_scale(rect);
        let timing = *self.deck.timing();

        let mut hits = FrameHits::default();

        if let (Some(view), Some(exiting)) = (&self.slider.exiting, self.deck.exiting()) {
            let pose = exit_pose(
                exiting.direction,
                now.saturating_sub(exiting.started_at),
                &timing,
            );
            render::draw_slide(painter, view, &pose, None, rect, &self.theme, &self.images);
        }

        if let (Some(view), Some(mounted)) = (&self.slider.current, self.deck.mounted()) {
            let (pose, reveal) = match mounted.entered_from {
                Some(direction) => {
                    let elapsed = now.saturating_sub(mounted.mounted_at);
                    (entry_pose(direction, elapsed, &timing), Some(elapsed))
                }
                None => (SlidePose::REST, None),
            };
            let slide_hits =
                render::draw_slide(painter, view, &pose, reveal, rect, &self.theme, &self.images);
            hits.cta = slide_hits.cta.map(|r| (r, view.cta.source_index));
        }

        hits.resume = Some(self.draw_chrome(painter, rect, scale));

        hits.dialog = render::modal::draw_dialog(
            painter,
            &self.modal,
            now,
            rect,
            &self.theme,
            &self.images,
            hover,
            self.close_focused(),
        );

        if self.show_hud {
            draw_hud(painter, &self.theme, rect, scale);
        }

        if let Some(ref toast) = self.toast {
            draw_toast(painter, toast, &self.theme, rect, scale);
            ui.ctx().request_repaint();
        }

        self.hits = hits;
    }

    /// Counter and the resume link. Returns the resume link's rect.
    fn draw_chrome(&self, painter: &egui::Painter, rect: egui::Rect, scale: f32) -> egui::Rect {
        let counter_text = format!("{} / {}", self.deck.current_index(), self.deck.total());
        let counter_color = Theme::with_opacity(self.theme.foreground, 0.3);
        let counter_galley = painter.layout_no_wrap(
            counter_text,
            egui::FontId::monospace(14.0 * scale),
            counter_color,
        );
        let counter_pos = egui::pos2(
            rect.center().x - counter_galley.rect.width() / 2.0,
            rect.bottom() - 30.0 * scale,
        );
        painter.galley(counter_pos, counter_galley, counter_color);

        let resume_color = Theme::with_opacity(self.theme.accent, 0.9);
        let resume_galley = painter.layout_no_wrap(
            "Resume".to_string(),
            egui::FontId::proportional(self.theme.small_size * 1.2 * scale),
            resume_color,
        );
        let resume_pos = egui::pos2(
            rect.right() - resume_galley.rect.width() - 64.0 * scale,
            rect.top() + 36.0 * scale,
        );
        let resume_rect = egui::Rect::from_min_size(resume_pos, resume_galley.rect.size());
        painter.galley(resume_pos, resume_galley, resume_color);
        resume_rect.expand(6.0 * scale)
    }
}

impl eframe::App for FolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = self.now();

        if self.watcher.as_ref().is_some_and(|w| w.poll()) {
            info!("deck file changed, reloading");
            self.reload(now);
        }

        let input = Self::gather_input(ctx);
        self.handle_input(ctx, &input, now);

        let events = self.deck.tick(now);
        self.apply_deck_events(events);

        for event in self.modal.tick(now, &mut self.deck, &mut self.slider) {
            match event {
                ModalEvent::Shown => debug!("dialog shown"),
                ModalEvent::FocusClose => debug!("close button focused"),
                ModalEvent::Closed => debug!("deck input returns after grace"),
            }
        }

        self.poll_download(ctx);
        let repaint = ctx.clone();
        self.slider
            .settle_videos(&mut self.videos, move || repaint.request_repaint());
        self.images.poll(ctx);
        self.request_images(ctx);

        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }

        let bg = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                self.draw(ui, now, input.hover);
            });

        if self.is_moving(now) {
            ctx.request_repaint();
        } else if self.watcher.is_some() {
            ctx.request_repaint_after(Duration::from_millis(500));
        }
    }
}

fn draw_toast(painter: &egui::Painter, toast: &Toast, theme: &Theme, rect: egui::Rect, scale: f32) {
    let opacity = toast.opacity();
    if opacity <= 0.0 {
        return;
    }
    let toast_color = Theme::with_opacity(theme.foreground, opacity * 0.9);
    let toast_bg = Theme::with_opacity(theme.sheet_background, opacity * 0.9);
    let galley = painter.layout_no_wrap(
        toast.message.clone(),
        egui::FontId::proportional(20.0 * scale),
        toast_color,
    );
    let padding = 16.0 * scale;
    let toast_rect = egui::Rect::from_min_size(
        egui::pos2(
            rect.center().x - galley.rect.width() / 2.0 - padding,
            rect.bottom() - 110.0 * scale,
        ),
        egui::vec2(
            galley.rect.width() + padding * 2.0,
            galley.rect.height() + padding * 2.0,
        ),
    );
    painter.rect_filled(toast_rect, 8.0 * scale, toast_bg);
    let text_pos = egui::pos2(toast_rect.left() + padding, toast_rect.top() + padding);
    painter.galley(text_pos, galley, toast_color);
}

fn draw_hud(painter: &egui::Painter, theme: &Theme, rect: egui::Rect, scale: f32) {
    let shortcuts = [
        ("\u{2193} / PgDn / Space", "Next project"),
        ("\u{2191} / PgUp", "Previous project"),
        ("Wheel / Swipe", "Next / previous project"),
        ("Click link", "Open project details"),
        ("R", "Open resume"),
        ("Esc", "Close dialog"),
        ("D", "Toggle theme"),
        ("F", "Toggle fullscreen"),
        ("H", "Toggle this HUD"),
        ("Q", "Quit"),
    ];

    let bg = Theme::with_opacity(theme.sheet_background, 0.9);
    let text_color = Theme::with_opacity(theme.foreground, 0.9);
    let key_color = Theme::with_opacity(theme.accent, 0.9);

    let padding = 24.0 * scale;
    let line_height = 32.0 * scale;
    let hud_height = shortcuts.len() as f32 * line_height + padding * 2.0 + 40.0 * scale;
    let hud_width = 400.0 * scale;

    let hud_rect = egui::Rect::from_center_size(rect.center(), egui::vec2(hud_width, hud_height));
    painter.rect_filled(hud_rect, 12.0 * scale, bg);

    let title_galley = painter.layout_no_wrap(
        "Keyboard Shortcuts".to_string(),
        egui::FontId::proportional(20.0 * scale),
        text_color,
    );
    let title_pos = egui::pos2(hud_rect.left() + padding, hud_rect.top() + padding);
    painter.galley(title_pos, title_galley, text_color);

    let mut y = hud_rect.top() + padding + 40.0 * scale;
    for (key, desc) in &shortcuts {
        let key_galley = painter.layout_no_wrap(
            key.to_string(),
            egui::FontId::monospace(15.0 * scale),
            key_color,
        );
        painter.galley(egui::pos2(hud_rect.left() + padding, y), key_galley, key_color);

        let desc_galley = painter.layout_no_wrap(
            desc.to_string(),
            egui::FontId::proportional(15.0 * scale),
            text_color,
        );
        painter.galley(
            egui::pos2(hud_rect.left() + padding + 190.0 * scale, y),
            desc_galley,
            text_color,
        );
        y += line_height;
    }
}

pub fn run(opts: LaunchOptions) -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let registry = Registry::open(opts.slides.as_deref()).context("Failed to load slides")?;

    let title = match registry.source() {
        Some(path) => format!(
            "folio - {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        ),
        None => "folio".to_string(),
    };

    let windowed = opts.windowed || config.windowed();
    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let app = FolioApp::new(registry, opts.query, &config);
    eframe::run_native(&title, options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SlideRecord;

    fn registry() -> Registry {
        Registry::from_records(
            ["Toner", "Salad", "Pine"]
                .iter()
                .map(|t| SlideRecord {
                    title: t.to_string(),
                    video_path: format!("https://cdn.example.com/{}.mp4", t.to_lowercase()),
                    image_path: format!("img/{}.png", t.to_lowercase()),
                    ..Default::default()
                })
                .collect(),
        )
    }

    #[test]
    fn test_slider_exit_and_mount() {
        let reg = registry();
        let mut slider = Slider::default();
        slider.mount(&reg, 2);
        assert_eq!(slider.current.as_ref().map(|v| v.index), Some(2));

        slider.begin_exit();
        assert!(slider.current.is_none());
        assert_eq!(slider.exiting.as_ref().map(|v| v.index), Some(2));

        slider.mount(&reg, 3);
        assert_eq!(slider.current.as_ref().map(|v| v.index), Some(3));
        assert_eq!(slider.exiting.as_ref().map(|v| v.index), Some(2));

        slider.mount(&reg, 9);
        assert!(slider.current.is_none());
    }

    #[test]
    fn test_slider_lock_pauses_media() {
        let reg = registry();
        let mut slider = Slider::default();
        slider.mount(&reg, 1);
        assert!(slider.current.as_ref().is_some_and(|v| v.media.is_playing()));
        slider.lock();
        assert!(slider.locked);
        assert!(!slider.current.as_ref().is_some_and(|v| v.media.is_playing()));

        slider.mount(&reg, 2);
        assert!(!slider.current.as_ref().is_some_and(|v| v.media.is_playing()));
        slider.unlock();
        assert!(!slider.locked);
        assert!(slider.current.as_ref().is_some_and(|v| v.media.is_playing()));
    }

    #[test]
    fn test_slider_swaps_unreachable_videos_for_stills() {
        let reg = registry();
        let mut slider = Slider::default();
        slider.mount(&reg, 1);
        slider.begin_exit();
        slider.mount(&reg, 2);

        let mut checks = VideoChecks::with_checker(|asset| match asset.to_string() {
            u if u.ends_with("salad.mp4") => anyhow::bail!("status 404"),
            _ => Ok(()),
        });
        let (tx, rx) = mpsc::channel();
        slider.settle_videos(&mut checks, move || {
            let _ = tx.send(());
        });
        for _ in 0..2 {
            rx.recv_timeout(Duration::from_secs(10)).unwrap();
        }
        slider.settle_videos(&mut checks, || {});

        let current = slider.current.as_ref().unwrap();
        assert_eq!(current.media.kind(), crate::media::MediaKind::Still);
        assert_eq!(current.media.alt(), "Salad");
        let exiting = slider.exiting.as_ref().unwrap();
        assert!(exiting.media.is_playing());
    }

    #[test]
    fn test_toast_fades_out() {
        let toast = Toast {
            message: "Theme: light".into(),
            start: Instant::now(),
        };
        assert_eq!(toast.opacity(), 1.0);
        assert!(!toast.is_expired());
    }
}
