pub mod image_cache;
pub mod modal;
pub mod transition;

use std::time::Duration;

use eframe::egui;
use eframe::egui::{Color32, FontId, Pos2, Rect, Vec2, emath::Rot2, epaint::TextShape};

use crate::reveal::{RevealGroup, RevealTimeline};
use crate::theme::Theme;
use crate::view::SlideView;

use image_cache::{ImageCache, ImageState};
use transition::SlidePose;

/// Reference resolution the layout is designed at.
pub fn compute_scale(rect: Rect) -> f32 {
    let ref_w = 1920.0;
    let ref_h = 1080.0;
    (rect.width() / ref_w).min(rect.height() / ref_h)
}

/// Maps slide-local points into screen space for one pose: scale and
/// rotate around the viewport center, then shift vertically.
#[derive(Debug, Clone, Copy)]
struct Placement {
    center: Pos2,
    shift: Vec2,
    scale: f32,
    rot: Rot2,
    angle: f32,
}

impl Placement {
    fn new(viewport: Rect, pose: &SlidePose) -> Self {
        let angle = pose.rotation_deg.to_radians();
        Self {
            center: viewport.center(),
            shift: egui::vec2(0.0, pose.offset_y * viewport.height()),
            scale: pose.scale,
            rot: Rot2::from_angle(angle),
            angle,
        }
    }

    fn map(&self, p: Pos2) -> Pos2 {
        self.center + self.shift + self.rot * ((p - self.center) * self.scale)
    }

    fn corners(&self, r: Rect) -> [Pos2; 4] {
        [
            self.map(r.left_top()),
            self.map(r.right_top()),
            self.map(r.left_bottom()),
            self.map(r.right_bottom()),
        ]
    }

    /// Axis-aligned bounds of a mapped rect.
    fn bounds(&self, r: Rect) -> Rect {
        Rect::from_points(&self.corners(r))
    }

    fn is_rotated(&self) -> bool {
        self.angle.abs() > f32::EPSILON
    }
}

/// Screen regions of a drawn slide that accept clicks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlideHits {
    pub cta: Option<Rect>,
}

/// Draw one slide at `pose`. `reveal` is the time since the slide was
/// mounted with an entry animation; `None` draws all text in place.
pub fn draw_slide(
    painter: &egui::Painter,
    view: &SlideView,
    pose: &SlidePose,
    reveal: Option<Duration>,
    viewport: Rect,
    theme: &Theme,
    images: &ImageCache,
) -> SlideHits {
    let place = Placement::new(viewport, pose);
    let clip_local = Rect::from_min_max(
        viewport.lerp_inside(egui::vec2(pose.clip.left, pose.clip.top)),
        viewport.lerp_inside(egui::vec2(pose.clip.right, pose.clip.bottom)),
    );
    let clip = place.bounds(clip_local).intersect(viewport);
    if !clip.is_positive() || pose.opacity <= 0.0 {
        return SlideHits::default();
    }
    let painter = painter.with_clip_rect(clip);
    let scale = compute_scale(viewport);

    draw_media(&painter, view, &place, viewport, pose.opacity, theme, images);

    let ctx = TextCtx {
        painter: &painter,
        place: &place,
        clip,
        opacity: pose.opacity,
        timeline: &view.timeline,
        reveal,
    };

    let pad = 64.0 * scale;
    let left = viewport.left() + pad;
    let right_col = viewport.left() + viewport.width() * 0.62;

    // Header: title flows on the left, description and link on the right.
    let title_font = FontId::proportional(theme.title_size * scale);
    ctx.flow(
        RevealGroup::TitleWords,
        &view.title_words,
        &title_font,
        theme.foreground,
        egui::pos2(left, viewport.top() + pad),
        right_col - pad - left,
    );

    let body_font = FontId::proportional(theme.body_size * scale);
    let mut y = viewport.top() + pad;
    let mut cta = None;
    for (i, line) in view.description_lines.iter().enumerate() {
        let r = ctx.unit(
            RevealGroup::Description,
            i,
            line,
            &body_font,
            theme.muted,
            egui::pos2(right_col, y),
        );
        y = r.bottom() + 2.0 * scale;
    }
    y += 24.0 * scale;
    let link = ctx.unit(
        RevealGroup::Link,
        0,
        &view.cta.label,
        &body_font,
        theme.accent,
        egui::pos2(right_col, y),
    );
    if !place.is_rotated() {
        let underline_y = link.bottom() + 2.0 * scale;
        let a = place.map(egui::pos2(link.left(), underline_y));
        let b = place.map(egui::pos2(link.right(), underline_y));
        painter.line_segment(
            [a, b],
            egui::Stroke::new(
                1.5 * scale,
                Theme::with_opacity(theme.accent, pose.opacity * ctx.visibility(RevealGroup::Link, 0)),
            ),
        );
        cta = Some(place.bounds(link.expand(6.0 * scale)));
    }

    // Footer: index on the left, tags stacked on the right.
    let small_font = FontId::proportional(theme.small_size * scale);
    let bottom = viewport.bottom() - pad;
    let mut x = left;
    for (i, text) in view.index_lines.iter().enumerate() {
        let size = ctx.measure(text, &small_font);
        let r = ctx.unit(
            RevealGroup::Index,
            i,
            text,
            &small_font,
            theme.foreground,
            egui::pos2(x, bottom - size.y),
        );
        x = r.right() + 8.0 * scale;
    }

    let line_h = ctx.measure("Tags", &small_font).y + 4.0 * scale;
    let mut ty = bottom - line_h * view.tag_lines.len() as f32;
    for (i, tag) in view.tag_lines.iter().enumerate() {
        let color = if i == 0 { theme.muted } else { theme.foreground };
        ctx.unit(RevealGroup::Tags, i, tag, &small_font, color, egui::pos2(right_col, ty));
        ty += line_h;
    }

    SlideHits { cta }
}

fn draw_media(
    painter: &egui::Painter,
    view: &SlideView,
    place: &Placement,
    viewport: Rect,
    opacity: f32,
    theme: &Theme,
    images: &ImageCache,
) {
    let source = view.media.frame_source();
    match images.state(source) {
        ImageState::Ready(texture) => {
            let uv = cover_uv(texture.size_vec2(), viewport.size());
            let tint = Theme::with_opacity(Color32::WHITE, opacity);
            quad(painter, place.corners(viewport), tint, texture.id(), uv);
        }
        ImageState::Loading | ImageState::Failed => {
            let bg = Theme::with_opacity(theme.sheet_background, opacity);
            quad(painter, place.corners(viewport), bg, egui::TextureId::default(), Rect::ZERO);
            let alt = painter.layout_no_wrap(
                view.media.alt().to_string(),
                FontId::proportional(theme.small_size * compute_scale(viewport) * place.scale),
                Theme::with_opacity(theme.muted, opacity),
            );
            let pos = place.map(viewport.center() - alt.size() / 2.0);
            painter.add(TextShape::new(pos, alt, theme.muted).with_angle(place.angle));
        }
    }
    let shade = Theme::with_opacity(theme.media_shade, opacity);
    quad(painter, place.corners(viewport), shade, egui::TextureId::default(), Rect::ZERO);
}

/// UV rect that crops a texture to fill `target` without distortion.
pub fn cover_uv(texture: Vec2, target: Vec2) -> Rect {
    if texture.x <= 0.0 || texture.y <= 0.0 || target.x <= 0.0 || target.y <= 0.0 {
        return Rect::from_min_max(Pos2::ZERO, egui::pos2(1.0, 1.0));
    }
    let tex_aspect = texture.x / texture.y;
    let target_aspect = target.x / target.y;
    if tex_aspect > target_aspect {
        let w = target_aspect / tex_aspect;
        Rect::from_min_max(egui::pos2((1.0 - w) / 2.0, 0.0), egui::pos2((1.0 + w) / 2.0, 1.0))
    } else {
        let h = tex_aspect / target_aspect;
        Rect::from_min_max(egui::pos2(0.0, (1.0 - h) / 2.0), egui::pos2(1.0, (1.0 + h) / 2.0))
    }
}

/// Textured or flat quad from corners in top-left, top-right, bottom-left,
/// bottom-right order.
fn quad(painter: &egui::Painter, c: [Pos2; 4], color: Color32, texture: egui::TextureId, uv: Rect) {
    let mut mesh = egui::Mesh::with_texture(texture);
    let uvs = [uv.left_top(), uv.right_top(), uv.left_bottom(), uv.right_bottom()];
    for (pos, uv) in c.into_iter().zip(uvs) {
        mesh.vertices.push(egui::epaint::Vertex { pos, uv, color });
    }
    mesh.add_triangle(0, 2, 1);
    mesh.add_triangle(1, 2, 3);
    painter.add(egui::Shape::mesh(mesh));
}

struct TextCtx<'a> {
    painter: &'a egui::Painter,
    place: &'a Placement,
    clip: Rect,
    opacity: f32,
    timeline: &'a RevealTimeline,
    reveal: Option<Duration>,
}

impl TextCtx<'_> {
    fn measure(&self, text: &str, font: &FontId) -> Vec2 {
        self.painter
            .layout_no_wrap(text.to_string(), font.clone(), Color32::WHITE)
            .size()
    }

    /// 0.0 while hidden below its mask, 1.0 once in place.
    fn visibility(&self, group: RevealGroup, index: usize) -> f32 {
        1.0 - self.offset(group, index)
    }

    fn offset(&self, group: RevealGroup, index: usize) -> f32 {
        match self.reveal {
            Some(elapsed) => self.timeline.offset(group, index, elapsed),
            None => 0.0,
        }
    }

    /// Draw one reveal unit with its top-left at `at` (slide-local).
    /// Returns its slide-local rect.
    fn unit(
        &self,
        group: RevealGroup,
        index: usize,
        text: &str,
        font: &FontId,
        color: Color32,
        at: Pos2,
    ) -> Rect {
        let size = self.measure(text, font);
        let local = Rect::from_min_size(at, size);
        let offset = self.offset(group, index);
        if offset >= 1.0 {
            return local;
        }

        let color = Theme::with_opacity(color, self.opacity);
        let scaled = FontId::new(font.size * self.place.scale, font.family.clone());
        let galley = self.painter.layout_no_wrap(text.to_string(), scaled, color);

        if offset > 0.0 {
            // Mask: only the unit's own line box shows.
            let mask = self.place.bounds(local).intersect(self.clip);
            let shifted = self.place.map(at + egui::vec2(0.0, offset * size.y));
            self.painter
                .with_clip_rect(mask)
                .add(TextShape::new(shifted, galley, color).with_angle(self.place.angle));
        } else {
            let pos = self.place.map(at);
            self.painter
                .add(TextShape::new(pos, galley, color).with_angle(self.place.angle));
        }
        local
    }

    /// Lay out words left to right, wrapping at `max_width`.
    fn flow(
        &self,
        group: RevealGroup,
        words: &[String],
        font: &FontId,
        color: Color32,
        origin: Pos2,
        max_width: f32,
    ) -> Rect {
        let space = self.measure(" ", font).x.max(font.size * 0.25);
        let mut cursor = origin;
        let mut line_h: f32 = 0.0;
        let mut bounds = Rect::from_min_size(origin, Vec2::ZERO);
        for (i, word) in words.iter().enumerate() {
            let size = self.measure(word, font);
            if cursor.x > origin.x && cursor.x + size.x > origin.x + max_width {
                cursor = egui::pos2(origin.x, cursor.y + line_h * 0.95);
                line_h = 0.0;
            }
            let r = self.unit(group, i, word, font, color, cursor);
            bounds = bounds.union(r);
            line_h = line_h.max(size.y);
            cursor.x = r.right() + space;
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{DeckTiming, Direction};

    #[test]
    fn test_compute_scale() {
        let r = Rect::from_min_size(Pos2::ZERO, egui::vec2(1920.0, 1080.0));
        assert_eq!(compute_scale(r), 1.0);
        let r = Rect::from_min_size(Pos2::ZERO, egui::vec2(960.0, 1080.0));
        assert_eq!(compute_scale(r), 0.5);
    }

    #[test]
    fn test_cover_uv_crops_wide_texture() {
        let uv = cover_uv(egui::vec2(2000.0, 500.0), egui::vec2(1000.0, 500.0));
        assert!((uv.width() - 0.5).abs() < 1e-6);
        assert_eq!(uv.height(), 1.0);
        assert!((uv.center().x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_cover_uv_crops_tall_texture() {
        let uv = cover_uv(egui::vec2(500.0, 1000.0), egui::vec2(1000.0, 500.0));
        assert_eq!(uv.width(), 1.0);
        assert!((uv.height() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_placement_at_rest_is_identity() {
        let viewport = Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0));
        let place = Placement::new(viewport, &SlidePose::REST);
        let p = egui::pos2(120.0, 40.0);
        assert!((place.map(p) - p).length() < 1e-4);
    }

    #[test]
    fn test_exit_moves_off_canvas() {
        let timing = DeckTiming::default();
        let viewport = Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0));
        let pose = transition::exit_pose(Direction::Next, timing.exit, &timing);
        let place = Placement::new(viewport, &pose);
        let moved = place.bounds(viewport);
        assert!(!moved.intersects(viewport));
        assert!(moved.center().y < viewport.top());
    }
}
