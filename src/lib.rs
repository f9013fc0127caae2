// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. card::CardLayout)
    clippy::module_name_repetitions
)]

//! # Quotecard
//!
//! A quote card image generator for chat bots.
//!
//! Given a message, an author name, an optional avatar URL and a color token,
//! quotecard produces a finished PNG: a dark rounded panel with a circular
//! avatar (fetched, or synthesized from the author's initials), the author
//! name in bold, and the message word-wrapped to fit, truncated with an
//! ellipsis line when it would overflow the card.
//!
//! ## Pipeline
//!
//! Each render is a pure function of its request (the avatar fetch aside):
//! text is measured and wrapped by the layout engine, the card is composed as
//! SVG and rasterized with `resvg` over a process-wide font database, the
//! avatar raster is composited on top, and the result is encoded as an RGB
//! PNG with 300 DPI metadata.
//!
//! ## Modules
//!
//! - [`card`]: Render requests and the card renderer
//! - [`layout`]: Word wrapping and card dimension computation
//! - [`avatar`]: Avatar fetching and initials synthesis
//! - [`fonts`]: Font resolution and text measurement
//! - [`color`]: The named palette and color token resolution
//! - [`config`]: Layout constants

pub mod avatar;
pub mod card;
pub mod color;
pub mod config;
pub mod error;
pub mod fonts;
pub mod layout;
mod raster;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::card::{QuoteCardRenderer, RenderRequest};
    pub use crate::color::Rgb;
    pub use crate::config::CardConfig;
    pub use crate::error::RenderError;
    pub use crate::fonts::FontStore;
}
