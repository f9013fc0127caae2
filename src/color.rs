//! The named color palette and color token resolution.
//!
//! Resolution is total: any token — palette name, `#rrggbb` hex, or garbage —
//! resolves to some color. Unrecognized tokens fall back to the default
//! palette entry rather than erroring, so a bad token from a chat command can
//! never fail a render.

use once_cell::sync::Lazy;
use regex::Regex;

/// The token used when the caller gives no color.
///
/// Note the asymmetry: the renderer treats this exact token as a sentinel for
/// its dark theme background, which is *not* the palette's `blue` hex. See
/// [`crate::card`].
pub const DEFAULT_TOKEN: &str = "blue";

/// Soft palette of named colors, as `(name, hex)` pairs.
const PALETTE: &[(&str, &str)] = &[
    ("red", "#FF6B6B"),
    ("pink", "#FF8CC8"),
    ("purple", "#9B59B6"),
    ("blue", "#74B9FF"),
    ("cyan", "#00CEC9"),
    ("green", "#55A3FF"),
    ("yellow", "#FDCB6E"),
    ("orange", "#E17055"),
    ("brown", "#8D6E63"),
    ("gray", "#B2BEC3"),
    ("grey", "#B2BEC3"),
    ("black", "#2D3436"),
    ("white", "#FFFFFF"),
];

static HEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9a-f]{6}$").unwrap());

/// An 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lighten each channel by `amount`, saturating at 255.
    pub const fn lighten(self, amount: u8) -> Self {
        Self {
            r: self.r.saturating_add(amount),
            g: self.g.saturating_add(amount),
            b: self.b.saturating_add(amount),
        }
    }

    /// CSS `rgb(r,g,b)` form, for SVG fills.
    pub fn css(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Resolve a color token to an RGB triple.
///
/// Accepts palette names and `#rrggbb` hex (case-insensitive, surrounding
/// whitespace ignored). Anything else resolves to the default palette color.
pub fn resolve(token: &str) -> Rgb {
    let token = token.trim().to_lowercase();

    if HEX_RE.is_match(&token) {
        if let Some(rgb) = decode_hex(&token[1..]) {
            return rgb;
        }
    }

    for (name, hex) in PALETTE {
        if *name == token {
            return decode_hex(&hex[1..]).unwrap_or(Rgb::new(0, 0, 0));
        }
    }

    resolve(DEFAULT_TOKEN)
}

/// True if `token` is the default sentinel (after trimming and lowercasing).
pub fn is_default_token(token: &str) -> bool {
    token.trim().eq_ignore_ascii_case(DEFAULT_TOKEN)
}

/// Palette names, in declaration order.
pub fn available_colors() -> Vec<&'static str> {
    PALETTE.iter().map(|(name, _)| *name).collect()
}

fn decode_hex(hex: &str) -> Option<Rgb> {
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgb::new(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_hex_exact() {
        assert_eq!(resolve("#ff5733"), Rgb::new(0xFF, 0x57, 0x33));
        assert_eq!(resolve("#FF5733"), Rgb::new(0xFF, 0x57, 0x33));
        assert_eq!(resolve("  #00ff00  "), Rgb::new(0, 255, 0));
    }

    #[test]
    fn test_resolve_palette_names() {
        assert_eq!(resolve("red"), Rgb::new(0xFF, 0x6B, 0x6B));
        assert_eq!(resolve("BLUE"), Rgb::new(0x74, 0xB9, 0xFF));
        assert_eq!(resolve("grey"), resolve("gray"));
    }

    #[test]
    fn test_unrecognized_falls_back_to_default() {
        let default = resolve(DEFAULT_TOKEN);
        assert_eq!(resolve("not-a-color"), default);
        assert_eq!(resolve("#xyzxyz"), default);
        assert_eq!(resolve("#fff"), default);
        assert_eq!(resolve(""), default);
    }

    #[test]
    fn test_is_default_token() {
        assert!(is_default_token("blue"));
        assert!(is_default_token(" Blue "));
        assert!(!is_default_token("#74b9ff"));
        assert!(!is_default_token("red"));
    }

    #[test]
    fn test_lighten_saturates() {
        assert_eq!(Rgb::new(240, 10, 255).lighten(30), Rgb::new(255, 40, 255));
    }

    #[test]
    fn test_available_colors_contains_palette() {
        let names = available_colors();
        assert!(names.contains(&"red"));
        assert!(names.contains(&"white"));
        assert_eq!(names.len(), 13);
    }
}
