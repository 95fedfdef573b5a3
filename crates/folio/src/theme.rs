use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    /// Secondary text: index, tags, description.
    pub muted: Color32,
    pub accent: Color32,
    /// Scrim drawn over the deck behind a dialog.
    pub backdrop: Color32,
    pub sheet_background: Color32,
    /// Darkens media so slide text stays legible.
    pub media_shade: Color32,
    pub title_size: f32,
    pub body_size: f32,
    pub small_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x0E, 0x0E, 0x0E),
            foreground: Color32::from_rgb(0xF2, 0xF2, 0xF2),
            muted: Color32::from_rgb(0xA8, 0xA8, 0xA8),
            accent: Color32::from_rgb(0xFF, 0x5C, 0x39),
            backdrop: Color32::from_rgba_unmultiplied(0, 0, 0, 170),
            sheet_background: Color32::from_rgb(0x1C, 0x1C, 0x1C),
            media_shade: Color32::from_rgba_unmultiplied(0, 0, 0, 110),
            title_size: 88.0,
            body_size: 20.0,
            small_size: 14.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::from_rgb(0xF4, 0xF1, 0xEC),
            foreground: Color32::from_rgb(0x14, 0x14, 0x14),
            muted: Color32::from_rgb(0x55, 0x55, 0x55),
            accent: Color32::from_rgb(0xD9, 0x3D, 0x1A),
            backdrop: Color32::from_rgba_unmultiplied(0x14, 0x14, 0x14, 120),
            sheet_background: Color32::WHITE,
            media_shade: Color32::from_rgba_unmultiplied(0xF4, 0xF1, 0xEC, 90),
            title_size: 88.0,
            body_size: 20.0,
            small_size: 14.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn toggled(&self) -> Self {
        if self.name == "dark" {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        let alpha = color.a() as f32 * opacity.clamp(0.0, 1.0);
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_defaults_to_dark() {
        assert_eq!(Theme::from_name("light").name, "light");
        assert_eq!(Theme::from_name("dark").name, "dark");
        assert_eq!(Theme::from_name("solarized").name, "dark");
    }

    #[test]
    fn test_toggle_round_trip() {
        let t = Theme::dark();
        assert_eq!(t.toggled().name, "light");
        assert_eq!(t.toggled().toggled().name, "dark");
    }

    #[test]
    fn test_with_opacity() {
        let c = Theme::with_opacity(Color32::WHITE, 0.5);
        assert_eq!(c.a(), 127);
        assert_eq!(Theme::with_opacity(Color32::WHITE, 2.0).a(), 255);
    }
}
