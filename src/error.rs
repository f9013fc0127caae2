//! Render error taxonomy.
//!
//! Almost everything degrades gracefully: a failed avatar fetch falls back to
//! initials, a bad color token falls back to the default. The variants here
//! are the cases where no meaningful image can be produced at all.

use thiserror::Error;

/// Failure to produce a card.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No usable font face could be resolved at startup.
    #[error("no usable font found (empty font database)")]
    FontsUnavailable,

    /// The composed card SVG failed to parse.
    #[error("failed to parse card svg: {0}")]
    Svg(String),

    /// The raster canvas could not be allocated.
    #[error("failed to allocate {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    /// PNG encoding failed.
    #[error("png encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}
