//! Font resolution and text measurement.
//!
//! A [`FontStore`] is built once at startup: one `fontdb` database loaded
//! from system fonts, with a regular and a bold face resolved through an
//! ordered family preference list. The same database is handed to `resvg`
//! for rasterization and the same face bytes back the measurement used by
//! the layout engine, so the size estimate and the drawn text can't drift.
//!
//! Measurement sums horizontal glyph advances scaled by `px / units_per_em`.
//! Kerning is ignored; the layout invariants are defined against this
//! function, not against the shaped output.

use std::sync::Arc;

use resvg::usvg::fontdb;
use tracing::debug;

use crate::config::CardConfig;
use crate::error::RenderError;

/// A resolved face: raw font bytes plus the metrics layout needs.
#[derive(Clone)]
pub struct FontSlot {
    data: Arc<Vec<u8>>,
    index: u32,
    family: String,
    units_per_em: f32,
    ascent: f32,
    cap_height: f32,
}

impl std::fmt::Debug for FontSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSlot")
            .field("family", &self.family)
            .field("index", &self.index)
            .field("units_per_em", &self.units_per_em)
            .finish_non_exhaustive()
    }
}

impl FontSlot {
    /// Measured pixel width of `text` at `px`.
    pub fn text_width(&self, text: &str, px: f32) -> f32 {
        let scale = px / self.units_per_em;
        ttf_parser::Face::parse(&self.data, self.index).map_or_else(
            // The face parsed at load time; if it somehow fails now, estimate.
            |_| text.chars().count() as f32 * px * 0.55,
            |face| {
                let mut units = 0.0_f32;
                for ch in text.chars() {
                    let advance = face
                        .glyph_index(ch)
                        .and_then(|gid| face.glyph_hor_advance(gid))
                        .map_or(self.units_per_em * 0.5, f32::from);
                    units += advance;
                }
                units * scale
            },
        )
    }

    /// Baseline offset from the top of a text row at `px`.
    pub fn ascent_px(&self, px: f32) -> f32 {
        self.ascent * px / self.units_per_em
    }

    /// Capital letter height at `px`, for vertical centering.
    pub fn cap_height_px(&self, px: f32) -> f32 {
        self.cap_height * px / self.units_per_em
    }

    /// Family name as registered in the database, for SVG `font-family`.
    pub fn family(&self) -> &str {
        &self.family
    }
}

/// Process-wide font resources: shared database plus resolved faces.
///
/// Loaded once and treated as immutable; renders may share it freely.
#[derive(Clone)]
pub struct FontStore {
    db: Arc<fontdb::Database>,
    regular: FontSlot,
    bold: FontSlot,
}

impl std::fmt::Debug for FontStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontStore")
            .field("regular", &self.regular)
            .field("bold", &self.bold)
            .finish_non_exhaustive()
    }
}

impl FontStore {
    /// Load system fonts and resolve the regular and bold slots.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::FontsUnavailable`] when no face at all can be
    /// resolved — the single unrecoverable failure in the pipeline.
    pub fn load(config: &CardConfig) -> Result<Self, RenderError> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        let db = Arc::new(db);

        let regular = resolve_slot(&db, &config.font_families, fontdb::Weight::NORMAL)?;
        let bold = resolve_slot(&db, &config.font_families, fontdb::Weight::BOLD)?;
        debug!(
            regular = %regular.family,
            bold = %bold.family,
            faces = db.len(),
            "resolved fonts"
        );

        Ok(Self { db, regular, bold })
    }

    /// The shared database, for `usvg::Options`.
    pub fn database(&self) -> Arc<fontdb::Database> {
        Arc::clone(&self.db)
    }

    pub const fn regular(&self) -> &FontSlot {
        &self.regular
    }

    pub const fn bold(&self) -> &FontSlot {
        &self.bold
    }
}

/// Resolve one face: preferred families in order, then any sans-serif face,
/// then whatever the database has first. Only an empty database fails.
fn resolve_slot(
    db: &fontdb::Database,
    families: &[String],
    weight: fontdb::Weight,
) -> Result<FontSlot, RenderError> {
    let mut candidates: Vec<fontdb::Family<'_>> = families
        .iter()
        .map(|name| fontdb::Family::Name(name.as_str()))
        .collect();
    candidates.push(fontdb::Family::SansSerif);

    let query = fontdb::Query {
        families: &candidates,
        weight,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };

    let id = db
        .query(&query)
        .or_else(|| db.faces().next().map(|info| info.id))
        .ok_or(RenderError::FontsUnavailable)?;

    let family = db
        .face(id)
        .and_then(|info| info.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_else(|| "sans-serif".to_string());

    db.with_face_data(id, |data, index| {
        let face = ttf_parser::Face::parse(data, index).ok()?;
        let units_per_em = f32::from(face.units_per_em());
        let ascent = f32::from(face.ascender());
        let cap_height = face
            .capital_height()
            .map_or(ascent * 0.7, f32::from);
        Some(FontSlot {
            data: Arc::new(data.to_vec()),
            index,
            family,
            units_per_em,
            ascent,
            cap_height,
        })
    })
    .flatten()
    .ok_or(RenderError::FontsUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Option<FontStore> {
        FontStore::load(&CardConfig::default()).ok()
    }

    #[test]
    fn test_load_resolves_both_weights() {
        let Some(store) = store() else {
            eprintln!("no system fonts available; skipping");
            return;
        };
        assert!(!store.regular().family().is_empty());
        assert!(!store.bold().family().is_empty());
    }

    #[test]
    fn test_width_grows_with_text() {
        let Some(store) = store() else {
            eprintln!("no system fonts available; skipping");
            return;
        };
        let slot = store.regular();
        let short = slot.text_width("hi", 48.0);
        let long = slot.text_width("hi there, longer line", 48.0);
        assert!(short > 0.0);
        assert!(long > short);
    }

    #[test]
    fn test_empty_text_measures_zero() {
        let Some(store) = store() else {
            eprintln!("no system fonts available; skipping");
            return;
        };
        assert_eq!(store.regular().text_width("", 48.0), 0.0);
    }

    #[test]
    fn test_width_scales_with_size() {
        let Some(store) = store() else {
            eprintln!("no system fonts available; skipping");
            return;
        };
        let slot = store.regular();
        let at_24 = slot.text_width("scaling", 24.0);
        let at_48 = slot.text_width("scaling", 48.0);
        assert!((at_48 - at_24 * 2.0).abs() < 0.01);
    }
}
