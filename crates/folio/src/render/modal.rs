use std::time::Duration;

use eframe::egui;
use eframe::egui::{FontId, Pos2, Rect};

use crate::modal::{DialogContent, HiRes, ModalSubsystem};
use crate::registry::AssetRef;
use crate::theme::Theme;

use super::compute_scale;
use super::image_cache::ImageCache;

/// Clickable regions of the dialog as drawn this frame.
#[derive(Debug, Clone, Copy)]
pub struct DialogHits {
    pub sheet: Rect,
    pub close: Rect,
    pub download: Rect,
}

/// Asset the dialog body should show right now: the placeholder until the
/// full-resolution still has loaded.
pub fn body_asset<'a>(content: &'a DialogContent, images: &ImageCache) -> &'a AssetRef {
    match content {
        DialogContent::Resume { image, .. } => image,
        DialogContent::Project(p) => match &p.hi {
            HiRes::Image(hi) if p.swap_requested && images.get(hi).is_some() => hi,
            _ => &p.thumb,
        },
    }
}

/// Width of the sheet: 60% of wide viewports, 90% of narrow ones.
fn sheet_width(viewport: Rect, scale: f32) -> f32 {
    if viewport.width() >= 768.0 * scale.max(0.5) {
        viewport.width() * 0.6
    } else {
        viewport.width() * 0.9
    }
}

#[allow(clippy::too_many_arguments)]
pub fn draw_dialog(
    painter: &egui::Painter,
    modal: &ModalSubsystem,
    now: Duration,
    viewport: Rect,
    theme: &Theme,
    images: &ImageCache,
    hover: Option<Pos2>,
    close_focused: bool,
) -> Option<DialogHits> {
    let pose = modal.sheet_pose(now)?;
    let content = modal.content()?;
    let scale = compute_scale(viewport).max(0.4);

    painter.rect_filled(viewport, 0.0, Theme::with_opacity(theme.backdrop, pose.alpha));

    let w = sheet_width(viewport, scale);
    let h = viewport.height() * 0.82;
    let base = Rect::from_center_size(viewport.center(), egui::vec2(w, h));
    let sheet = Rect::from_center_size(
        base.center() + egui::vec2(0.0, base.height() * pose.y_percent / 100.0),
        base.size() * pose.scale,
    );
    let alpha = pose.alpha;
    let pad = 28.0 * scale;

    painter.rect_filled(
        sheet,
        14.0 * scale,
        Theme::with_opacity(theme.sheet_background, alpha),
    );

    let title = match content {
        DialogContent::Resume { .. } => "Resume",
        DialogContent::Project(p) => p.title.as_str(),
    };
    let title_galley = painter.layout_no_wrap(
        title.to_string(),
        FontId::proportional(theme.body_size * 1.3 * scale),
        Theme::with_opacity(theme.foreground, alpha),
    );
    let title_pos = egui::pos2(sheet.left() + pad, sheet.top() + pad);
    let header_h = title_galley.size().y;
    painter.galley(title_pos, title_galley, theme.foreground);

    let close = button(
        painter,
        "Close",
        egui::pos2(sheet.right() - pad, sheet.top() + pad),
        ButtonAnchor::TopRight,
        theme,
        alpha,
        scale,
        hover,
    );
    if close_focused {
        painter.rect_stroke(
            close.expand(3.0 * scale),
            8.0 * scale,
            egui::Stroke::new(2.0 * scale, Theme::with_opacity(theme.accent, alpha)),
            egui::StrokeKind::Outside,
        );
    }
    let download = button(
        painter,
        "Download",
        egui::pos2(sheet.right() - pad, sheet.bottom() - pad),
        ButtonAnchor::BottomRight,
        theme,
        alpha,
        scale,
        hover,
    );

    let body = Rect::from_min_max(
        egui::pos2(sheet.left() + pad, title_pos.y + header_h + pad * 0.75),
        egui::pos2(sheet.right() - pad, download.top() - pad * 0.75),
    );
    draw_body(painter, content, body, theme, images, alpha, scale);

    Some(DialogHits {
        sheet,
        close,
        download,
    })
}

fn draw_body(
    painter: &egui::Painter,
    content: &DialogContent,
    body: Rect,
    theme: &Theme,
    images: &ImageCache,
    alpha: f32,
    scale: f32,
) {
    if !body.is_positive() {
        return;
    }
    let asset = body_asset(content, images);
    match images.get(asset) {
        Some(texture) => {
            let size = texture.size_vec2();
            let fit = (body.width() / size.x).min(body.height() / size.y);
            let rect = Rect::from_center_size(body.center(), size * fit);
            let uv = Rect::from_min_max(Pos2::ZERO, egui::pos2(1.0, 1.0));
            painter.image(
                texture.id(),
                rect,
                uv,
                Theme::with_opacity(egui::Color32::WHITE, alpha),
            );
        }
        None => {
            painter.rect_filled(body, 8.0 * scale, Theme::with_opacity(theme.background, alpha));
        }
    }

    if let DialogContent::Project(p) = content {
        if let HiRes::Video(_) = p.hi {
            let badge = painter.layout_no_wrap(
                "\u{25B6} video".to_string(),
                FontId::proportional(theme.small_size * scale),
                Theme::with_opacity(theme.foreground, alpha),
            );
            let pos = egui::pos2(body.left() + 12.0 * scale, body.bottom() - 12.0 * scale)
                - egui::vec2(0.0, badge.size().y);
            painter.galley(pos, badge, theme.foreground);
        }
    }
}

#[derive(Clone, Copy)]
enum ButtonAnchor {
    TopRight,
    BottomRight,
}

#[allow(clippy::too_many_arguments)]
fn button(
    painter: &egui::Painter,
    label: &str,
    anchor_pos: Pos2,
    anchor: ButtonAnchor,
    theme: &Theme,
    alpha: f32,
    scale: f32,
    hover: Option<Pos2>,
) -> Rect {
    let galley = painter.layout_no_wrap(
        label.to_string(),
        FontId::proportional(theme.small_size * 1.1 * scale),
        Theme::with_opacity(theme.foreground, alpha),
    );
    let size = galley.size() + egui::vec2(28.0, 14.0) * scale;
    let min = match anchor {
        ButtonAnchor::TopRight => egui::pos2(anchor_pos.x - size.x, anchor_pos.y),
        ButtonAnchor::BottomRight => egui::pos2(anchor_pos.x - size.x, anchor_pos.y - size.y),
    };
    let rect = Rect::from_min_size(min, size);
    let hovered = hover.is_some_and(|p| rect.contains(p));
    let fill = if hovered {
        Theme::with_opacity(theme.accent, alpha * 0.25)
    } else {
        Theme::with_opacity(theme.background, alpha)
    };
    painter.rect_filled(rect, 6.0 * scale, fill);
    painter.galley(
        rect.center() - galley.size() / 2.0,
        galley,
        theme.foreground,
    );
    rect
}
