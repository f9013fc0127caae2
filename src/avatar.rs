//! Avatar resolution: fetch a profile image or synthesize an initials badge.
//!
//! Resolution never fails. Every error on the remote path — unreachable host,
//! timeout, HTTP error status, undecodable bytes — degrades to the
//! synthesized-initials avatar and the render continues. A single fetch
//! attempt is made per render; there are no retries.

use std::io::Read;

use image::{Rgba, RgbaImage, imageops};
use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::color::Rgb;
use crate::config::CardConfig;
use crate::fonts::FontStore;
use crate::raster;

/// Background of the synthesized initials square.
const INITIALS_BG: Rgb = Rgb::new(60, 60, 60);
/// Initials text color.
const INITIALS_FG: Rgb = Rgb::new(200, 200, 200);

/// Resolves avatars for the card renderer.
pub struct AvatarResolver {
    client: Option<Client>,
    fonts: FontStore,
    config: CardConfig,
}

impl AvatarResolver {
    /// Build a resolver sharing the renderer's fonts and config.
    pub fn new(fonts: FontStore, config: CardConfig) -> Self {
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|err| {
                warn!(error = %err, "http client unavailable; avatars will be synthesized");
                err
            })
            .ok();
        Self {
            client,
            fonts,
            config,
        }
    }

    /// Produce a circular avatar, exactly `avatar_size` square with alpha.
    ///
    /// `fallback_bg` only shows through on the last-resort path where even
    /// initials synthesis fails and a plain disc is returned.
    pub fn resolve(
        &self,
        avatar_url: Option<&str>,
        author_name: &str,
        fallback_bg: Rgb,
    ) -> RgbaImage {
        if let Some(url) = avatar_url {
            match self.fetch(url) {
                Ok(avatar) => return avatar,
                Err(err) => {
                    warn!(url, error = %err, "avatar fetch failed; synthesizing initials");
                }
            }
        }
        self.synthesize(author_name, fallback_bg)
    }

    fn fetch(&self, url: &str) -> anyhow::Result<RgbaImage> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("http client unavailable"))?;
        let response = client.get(url).send()?.error_for_status()?;

        // Bound the body: reject a declared oversize up front, and cap the
        // read in case the server lies or omits Content-Length.
        let limit = self.config.max_avatar_bytes;
        if let Some(len) = response.content_length() {
            anyhow::ensure!(len <= limit, "avatar body too large: {len} bytes");
        }
        let mut bytes = Vec::new();
        response.take(limit + 1).read_to_end(&mut bytes)?;
        anyhow::ensure!(
            bytes.len() as u64 <= limit,
            "avatar body exceeds {limit} bytes"
        );
        debug!(url, len = bytes.len(), "fetched avatar");

        let size = self.config.avatar_size;
        let decoded = image::load_from_memory(&bytes)?.to_rgba8();
        let mut avatar = imageops::resize(&decoded, size, size, imageops::FilterType::Lanczos3);
        apply_circle_mask(&mut avatar);
        Ok(avatar)
    }

    fn synthesize(&self, author_name: &str, fallback_bg: Rgb) -> RgbaImage {
        let size = self.config.avatar_size;
        let text = initials(author_name);

        match self.rasterize_initials(&text) {
            Ok(mut avatar) => {
                apply_circle_mask(&mut avatar);
                avatar
            }
            Err(err) => {
                warn!(error = %err, "initials synthesis failed; using plain disc");
                let mut disc = RgbaImage::from_pixel(
                    size,
                    size,
                    Rgba([fallback_bg.r, fallback_bg.g, fallback_bg.b, 255]),
                );
                apply_circle_mask(&mut disc);
                disc
            }
        }
    }

    /// Draw the initials centered by measured bounding box on a themed square.
    fn rasterize_initials(&self, text: &str) -> Result<RgbaImage, crate::error::RenderError> {
        let size = self.config.avatar_size;
        let px = self.config.initials_size;
        let font = self.fonts.bold();

        let text_width = font.text_width(text, px);
        let x = ((size as f32 - text_width) / 2.0).max(0.0);
        let baseline = (size as f32 + font.cap_height_px(px)) / 2.0;

        let svg = format!(
            concat!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{s}\" height=\"{s}\">",
                "<rect width=\"{s}\" height=\"{s}\" fill=\"{bg}\"/>",
                "<text x=\"{x:.2}\" y=\"{y:.2}\" font-family=\"{family}\" ",
                "font-weight=\"bold\" font-size=\"{px}\" fill=\"{fg}\">{text}</text>",
                "</svg>"
            ),
            s = size,
            bg = INITIALS_BG.css(),
            x = x,
            y = baseline,
            family = raster::escape_xml(font.family()),
            px = px,
            fg = INITIALS_FG.css(),
            text = raster::escape_xml(text),
        );

        raster::render_svg_to_rgba(&svg, size, size, self.fonts.database())
    }
}

/// First letter (uppercased) of up to the first two words; `"U"` when empty.
fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "U".to_string()
    } else {
        letters
    }
}

/// Multiply the alpha channel by an inscribed-circle mask, feathered one
/// pixel at the rim.
fn apply_circle_mask(image: &mut RgbaImage) {
    let size = image.width() as f32;
    let center = (size - 1.0) / 2.0;
    let radius = size / 2.0;

    for (x, y, px) in image.enumerate_pixels_mut() {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        let coverage = (radius - dx.hypot(dy) + 0.5).clamp(0.0, 1.0);
        px.0[3] = (f32::from(px.0[3]) * coverage) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials_two_words() {
        assert_eq!(initials("John Doe"), "JD");
        assert_eq!(initials("alice"), "A");
        assert_eq!(initials("  mary   jane   watson "), "MJ");
    }

    #[test]
    fn test_initials_empty_name_placeholder() {
        assert_eq!(initials(""), "U");
        assert_eq!(initials("   "), "U");
    }

    #[test]
    fn test_initials_uppercase_multibyte() {
        assert_eq!(initials("émile zola"), "ÉZ");
    }

    #[test]
    fn test_circle_mask_corners_and_center() {
        let mut img = RgbaImage::from_pixel(64, 64, Rgba([10, 20, 30, 255]));
        apply_circle_mask(&mut img);
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
        assert_eq!(img.get_pixel(63, 63).0[3], 0);
        assert_eq!(img.get_pixel(32, 32).0[3], 255);
    }

    fn resolver() -> Option<AvatarResolver> {
        let config = CardConfig::default();
        let fonts = FontStore::load(&config).ok()?;
        Some(AvatarResolver::new(fonts, config))
    }

    #[test]
    fn test_resolve_without_url_synthesizes_fixed_size() {
        let Some(resolver) = resolver() else {
            eprintln!("no system fonts available; skipping");
            return;
        };
        let avatar = resolver.resolve(None, "John Doe", Rgb::new(45, 45, 55));
        assert_eq!(avatar.width(), 200);
        assert_eq!(avatar.height(), 200);
        // Opaque inside the circle, transparent at the corners.
        assert_eq!(avatar.get_pixel(100, 100).0[3], 255);
        assert_eq!(avatar.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_resolve_unreachable_url_falls_back() {
        let Some(resolver) = resolver() else {
            eprintln!("no system fonts available; skipping");
            return;
        };
        // Discard port: nothing listens there, connection is refused.
        let avatar = resolver.resolve(
            Some("http://127.0.0.1:9/avatar.png"),
            "Bob Smith",
            Rgb::new(45, 45, 55),
        );
        assert_eq!(avatar.width(), 200);
        assert_eq!(avatar.get_pixel(100, 100).0[3], 255);
    }
}
