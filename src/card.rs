//! The card renderer: composition, rasterization, and PNG encoding.
//!
//! A card is composed back to front as SVG — background fill, rounded panel,
//! border disc, author name, message lines — and rasterized with `resvg` over
//! the shared font database. The avatar raster is then alpha-composited on
//! top of its border disc, and the opaque result is encoded as an RGB PNG
//! with 300 DPI pHYs metadata.

use image::RgbaImage;
use tracing::debug;

use crate::avatar::AvatarResolver;
use crate::color::{self, Rgb};
use crate::config::CardConfig;
use crate::error::RenderError;
use crate::fonts::FontStore;
use crate::layout::{self, CardLayout};
use crate::raster;

/// Dark blue-gray used when the color token is the default sentinel.
///
/// This is deliberately *not* the palette's `blue` (`#74B9FF`): the default
/// token selects the dark theme background, while an explicit `#74b9ff`
/// still gets the palette color. Preserved as a documented special case.
const THEME_BACKGROUND: Rgb = Rgb::new(45, 45, 55);
/// Card panel fill.
const PANEL_COLOR: Rgb = Rgb::new(35, 35, 40);
/// Author name text color.
const NAME_COLOR: Rgb = Rgb::new(220, 220, 220);
/// Message text color.
const TEXT_COLOR: Rgb = Rgb::new(190, 190, 190);
/// Per-channel lightening of the background for the avatar border disc.
const BORDER_LIGHTEN: u8 = 30;

/// Immutable input to one render. Owned by the caller for its duration.
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    /// The quoted message text.
    pub message_text: String,
    /// The author's display name.
    pub author_name: String,
    /// Optional profile image URL; failures degrade to initials.
    pub avatar_url: Option<String>,
    /// Color token: palette name or `#rrggbb`. Unrecognized tokens fall back.
    pub background_color: String,
}

/// Renders quote cards. Holds the process-wide font resources; renders are
/// independent and the renderer may be shared across threads.
pub struct QuoteCardRenderer {
    fonts: FontStore,
    config: CardConfig,
    avatars: AvatarResolver,
}

impl QuoteCardRenderer {
    /// Build a renderer with default card geometry.
    ///
    /// # Errors
    ///
    /// Fails only when no usable font can be resolved.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_config(CardConfig::default())
    }

    /// Build a renderer with explicit card geometry.
    ///
    /// # Errors
    ///
    /// Fails only when no usable font can be resolved.
    pub fn with_config(config: CardConfig) -> Result<Self, RenderError> {
        let fonts = FontStore::load(&config)?;
        let avatars = AvatarResolver::new(fonts.clone(), config.clone());
        Ok(Self {
            fonts,
            config,
            avatars,
        })
    }

    pub const fn config(&self) -> &CardConfig {
        &self.config
    }

    /// Render a request to encoded PNG bytes.
    pub fn generate(&self, request: &RenderRequest) -> Result<Vec<u8>, RenderError> {
        let background = if color::is_default_token(&request.background_color) {
            THEME_BACKGROUND
        } else {
            color::resolve(&request.background_color)
        };

        let layout = layout::compute_layout(
            &request.message_text,
            &request.author_name,
            self.config.width,
            &self.fonts,
            &self.config,
        );
        let avatar = self
            .avatars
            .resolve(request.avatar_url.as_deref(), &request.author_name, background);

        debug!(
            width = layout.width,
            height = layout.height,
            lines = layout.lines.len(),
            "rendering card"
        );
        self.render(&layout, &avatar, background)
    }

    /// Rasterize a computed layout with a resolved avatar.
    pub fn render(
        &self,
        layout: &CardLayout,
        avatar: &RgbaImage,
        background: Rgb,
    ) -> Result<Vec<u8>, RenderError> {
        let svg = self.compose_svg(layout, background);
        let mut canvas =
            raster::render_svg_to_rgba(&svg, layout.width, layout.height, self.fonts.database())?;

        let origin = i64::from(self.config.avatar_origin());
        image::imageops::overlay(&mut canvas, avatar, origin, origin);

        encode_png(canvas, self.config.pixels_per_meter)
    }

    fn compose_svg(&self, layout: &CardLayout, background: Rgb) -> String {
        let cfg = &self.config;
        let width = layout.width;
        let height = layout.height;

        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\">"
        );

        // Background fill, then the rounded card panel inset by the margin.
        svg.push_str(&format!(
            "<rect width=\"{width}\" height=\"{height}\" fill=\"{}\"/>",
            background.css()
        ));
        svg.push_str(&format!(
            "<rect x=\"{m}\" y=\"{m}\" width=\"{w}\" height=\"{h}\" rx=\"{r}\" ry=\"{r}\" fill=\"{fill}\"/>",
            m = cfg.margin,
            w = width - 2 * cfg.margin,
            h = height - 2 * cfg.margin,
            r = cfg.corner_radius,
            fill = PANEL_COLOR.css(),
        ));

        // Border disc behind the avatar; the avatar raster lands on top of it
        // after rasterization.
        let avatar_center = cfg.avatar_origin() + cfg.avatar_size / 2;
        svg.push_str(&format!(
            "<circle cx=\"{c}\" cy=\"{c}\" r=\"{r}\" fill=\"{fill}\"/>",
            c = avatar_center,
            r = (cfg.avatar_size + cfg.avatar_border) / 2,
            fill = background.lighten(BORDER_LIGHTEN).css(),
        ));

        // Author name, then the wrapped message lines.
        let (text_x, text_start_y) = layout.text_origin;
        let name_font = self.fonts.bold();
        let name_baseline = (cfg.avatar_origin() + cfg.name_offset) as f32
            + name_font.ascent_px(cfg.name_size);
        svg.push_str(&format!(
            "<text x=\"{text_x}\" y=\"{name_baseline:.2}\" font-family=\"{family}\" \
             font-weight=\"bold\" font-size=\"{size}\" fill=\"{fill}\">{name}</text>",
            family = raster::escape_xml(name_font.family()),
            size = cfg.name_size,
            fill = NAME_COLOR.css(),
            name = raster::escape_xml(&layout.name),
        ));

        let text_font = self.fonts.regular();
        let ascent = text_font.ascent_px(cfg.text_size);
        for (i, line) in layout.lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let baseline = (text_start_y + i as u32 * layout.line_height) as f32 + ascent;
            svg.push_str(&format!(
                "<text x=\"{text_x}\" y=\"{baseline:.2}\" font-family=\"{family}\" \
                 font-size=\"{size}\" fill=\"{fill}\">{line}</text>",
                family = raster::escape_xml(text_font.family()),
                size = cfg.text_size,
                fill = TEXT_COLOR.css(),
                line = raster::escape_xml(line),
            ));
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Encode an opaque RGBA canvas as an RGB PNG with pHYs resolution metadata.
fn encode_png(canvas: RgbaImage, pixels_per_meter: u32) -> Result<Vec<u8>, RenderError> {
    // The canvas is fully opaque (background fill plus alpha-blended pastes),
    // so dropping the alpha channel is the flatten.
    let rgb = image::DynamicImage::ImageRgba8(canvas).to_rgb8();

    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, rgb.width(), rgb.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: pixels_per_meter,
        yppu: pixels_per_meter,
        unit: png::Unit::Meter,
    }));

    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgb.as_raw())?;
    writer.finish()?;
    Ok(out)
}
