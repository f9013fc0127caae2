//! Layout constants for the card generator.
//!
//! Everything that controls card geometry lives here so the layout engine and
//! the renderer can never disagree about a margin. The defaults reproduce the
//! dynamic-height dark-theme card: a fixed 1200 px width with the height
//! growing with the message, clamped to a sane range.

use std::time::Duration;

/// Configuration for card geometry, fonts, and fetching.
#[derive(Debug, Clone, PartialEq)]
pub struct CardConfig {
    /// Fixed card width in pixels.
    pub width: u32,
    /// Lower clamp for the computed card height.
    pub min_height: u32,
    /// Upper clamp for the computed card height.
    pub max_height: u32,
    /// Padding between the card panel edge and its content.
    pub padding: u32,
    /// Margin between the canvas edge and the card panel.
    pub margin: u32,
    /// Avatar diameter in pixels (the avatar is always square).
    pub avatar_size: u32,
    /// Total extra diameter of the border disc behind the avatar.
    pub avatar_border: u32,
    /// Horizontal gap between the avatar and the text area.
    pub avatar_text_gap: u32,
    /// Corner radius of the card panel.
    pub corner_radius: u32,
    /// Message font size in pixels.
    pub text_size: f32,
    /// Author name font size in pixels.
    pub name_size: f32,
    /// Initials font size for synthesized avatars.
    pub initials_size: f32,
    /// Vertical advance per wrapped message line.
    pub line_height: u32,
    /// Height reserved for the author name row.
    pub name_row_height: u32,
    /// Spacing between the name row and the message text.
    pub name_text_spacing: u32,
    /// Vertical offset of the name row below the avatar top.
    pub name_offset: u32,
    /// Ordered font family preferences, tried before any generic sans face.
    pub font_families: Vec<String>,
    /// Timeout for the avatar fetch; errors degrade to initials synthesis.
    pub fetch_timeout: Duration,
    /// Maximum avatar response body size; larger bodies degrade to initials.
    pub max_avatar_bytes: u64,
    /// Pixels-per-meter written into the PNG pHYs chunk (11811 = 300 DPI).
    pub pixels_per_meter: u32,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            // Minimal-content height: avatar row plus margins and padding.
            // Anything lower is unreachable, so the clamp floor sits here.
            min_height: 440,
            max_height: 1000,
            padding: 60,
            margin: 60,
            avatar_size: 200,
            avatar_border: 8,
            avatar_text_gap: 40,
            corner_radius: 25,
            text_size: 48.0,
            name_size: 52.0,
            initials_size: 100.0,
            line_height: 60,
            name_row_height: 65,
            name_text_spacing: 20,
            name_offset: 10,
            font_families: vec![
                "DejaVu Sans".to_string(),
                "Arial".to_string(),
                "Liberation Sans".to_string(),
            ],
            fetch_timeout: Duration::from_secs(10),
            max_avatar_bytes: 10 * 1024 * 1024,
            pixels_per_meter: 11811,
        }
    }
}

impl CardConfig {
    /// X (and Y) coordinate of the avatar's top-left corner.
    pub const fn avatar_origin(&self) -> u32 {
        self.margin + self.padding
    }

    /// X coordinate where the text area begins.
    pub const fn text_area_x(&self) -> u32 {
        self.avatar_origin() + self.avatar_size + self.avatar_text_gap
    }

    /// Width of the text area for a card of `card_width` pixels.
    pub const fn text_area_width_at(&self, card_width: u32) -> u32 {
        card_width
            .saturating_sub(self.text_area_x())
            .saturating_sub(self.margin + self.padding)
    }

    /// Width of the text area at the configured card width.
    pub const fn text_area_width(&self) -> u32 {
        self.text_area_width_at(self.width)
    }

    /// Y coordinate of the first message line.
    pub const fn text_start_y(&self) -> u32 {
        self.avatar_origin() + self.name_offset + self.name_row_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry_is_consistent() {
        let cfg = CardConfig::default();
        assert_eq!(cfg.avatar_origin(), 120);
        assert_eq!(cfg.text_area_x(), 360);
        // 1200 - 360 - 60 - 60
        assert_eq!(cfg.text_area_width(), 720);
        assert_eq!(cfg.text_start_y(), 195);
    }

    #[test]
    fn test_text_area_width_tracks_card_width() {
        let cfg = CardConfig::default();
        assert_eq!(cfg.text_area_width_at(cfg.width), cfg.text_area_width());
        assert_eq!(cfg.text_area_width_at(cfg.width + 100), cfg.text_area_width() + 100);
    }

    #[test]
    fn test_text_area_never_underflows() {
        let cfg = CardConfig {
            width: 100,
            ..CardConfig::default()
        };
        assert_eq!(cfg.text_area_width(), 0);
    }
}
