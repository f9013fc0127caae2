//! Shared SVG rasterization.
//!
//! Both the card renderer and the initials-avatar synthesis compose SVG and
//! rasterize it here, over the same font database the layout measured with.

use std::sync::Arc;

use image::RgbaImage;
use resvg::usvg::fontdb;

use crate::error::RenderError;

/// Rasterize an SVG string onto a `width`×`height` RGBA canvas.
pub(crate) fn render_svg_to_rgba(
    svg: &str,
    width: u32,
    height: u32,
    fontdb: Arc<fontdb::Database>,
) -> Result<RgbaImage, RenderError> {
    let opts = resvg::usvg::Options {
        fontdb,
        ..Default::default()
    };

    let tree = resvg::usvg::Tree::from_str(svg, &opts)
        .map_err(|err| RenderError::Svg(err.to_string()))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or(RenderError::Canvas { width, height })?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );

    // Pixmap data is premultiplied; convert back to straight alpha.
    let mut data = pixmap.take();
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
        } else if a < 255 {
            let a = u16::from(a);
            px[0] = ((u16::from(px[0]) * 255) / a).min(255) as u8;
            px[1] = ((u16::from(px[1]) * 255) / a).min(255) as u8;
            px[2] = ((u16::from(px[2]) * 255) / a).min(255) as u8;
        }
    }

    RgbaImage::from_raw(width, height, data).ok_or(RenderError::Canvas { width, height })
}

/// Escape text for use inside SVG elements and attribute values.
pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_db() -> Arc<fontdb::Database> {
        Arc::new(fontdb::Database::new())
    }

    #[test]
    fn test_rasterize_solid_rect() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
            <rect width="10" height="10" fill="rgb(255,0,0)"/>
        </svg>"#;
        let img = render_svg_to_rgba(svg, 10, 10, empty_db()).unwrap();
        let px = img.get_pixel(5, 5);
        assert_eq!(px.0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_unpainted_area_is_transparent() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
            <rect width="2" height="2" fill="rgb(0,0,255)"/>
        </svg>"#;
        let img = render_svg_to_rgba(svg, 10, 10, empty_db()).unwrap();
        assert_eq!(img.get_pixel(8, 8).0[3], 0);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_invalid_svg_is_an_error() {
        let err = render_svg_to_rgba("<svg", 10, 10, empty_db());
        assert!(matches!(err, Err(RenderError::Svg(_))));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(
            escape_xml(r#"a<b & "c" 'd'>"#),
            "a&lt;b &amp; &quot;c&quot; &apos;d&apos;&gt;"
        );
    }
}
