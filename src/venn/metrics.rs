//! Text measurement for label sizing.
//!
//! Widths are returned in inches for a given font family and point size.

use std::sync::Arc;

use resvg::usvg::fontdb::{self, Database, Family, Query};
use unicode_width::UnicodeWidthChar;

/// Average advance of one terminal cell, as a fraction of the em size.
const CELL_EM: f64 = 0.6;

/// Measures rendered text widths.
pub trait TextMeasurer {
    /// Width of each text in inches, in input order.
    fn widths(&self, texts: &[&str], family: &str, size_pt: f64) -> Vec<f64>;

    fn width(&self, text: &str, family: &str, size_pt: f64) -> f64 {
        self.widths(&[text], family, size_pt)
            .first()
            .copied()
            .unwrap_or(0.0)
    }
}

/// Font-free estimate: every display cell is `0.6` em wide, so full-width
/// characters count double. Deterministic across machines.
#[derive(Debug, Default, Clone, Copy)]
pub struct CellMetrics;

impl CellMetrics {
    fn cells(text: &str) -> usize {
        text.chars()
            .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
            .sum()
    }
}

impl TextMeasurer for CellMetrics {
    fn widths(&self, texts: &[&str], _family: &str, size_pt: f64) -> Vec<f64> {
        texts
            .iter()
            .map(|text| Self::cells(text) as f64 * CELL_EM * size_pt / 72.0)
            .collect()
    }
}

/// Measures with real glyph advances from the font database.
///
/// Text whose family has no matching face falls back to [`CellMetrics`];
/// characters missing from the face are estimated the same way.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    db: Arc<Database>,
}

impl FontMetrics {
    /// Load every font installed on the system.
    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self { db: Arc::new(db) }
    }

    pub fn with_database(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// The font database, shared with the rasterizer so both see the same faces.
    pub fn database(&self) -> Arc<Database> {
        Arc::clone(&self.db)
    }

    /// Width of `text` in em units, or `None` when no face matches.
    fn advance_em(&self, text: &str, family: &str) -> Option<f64> {
        let families = [family_for(family), Family::SansSerif];
        let query = Query {
            families: &families,
            weight: fontdb::Weight::NORMAL,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let id = self.db.query(&query)?;
        self.db
            .with_face_data(id, |data, index| {
                let face = ttf_parser::Face::parse(data, index).ok()?;
                let units_per_em = f64::from(face.units_per_em());
                let total: f64 = text
                    .chars()
                    .map(|ch| {
                        face.glyph_index(ch)
                            .and_then(|glyph| face.glyph_hor_advance(glyph))
                            .map_or_else(
                                || {
                                    UnicodeWidthChar::width(ch).unwrap_or(0) as f64
                                        * CELL_EM
                                        * units_per_em
                                },
                                f64::from,
                            )
                    })
                    .sum();
                Some(total / units_per_em)
            })
            .flatten()
    }
}

impl TextMeasurer for FontMetrics {
    fn widths(&self, texts: &[&str], family: &str, size_pt: f64) -> Vec<f64> {
        texts
            .iter()
            .map(|text| match self.advance_em(text, family) {
                Some(em) => em * size_pt / 72.0,
                None => {
                    tracing::debug!(family, "no matching font face; estimating label width");
                    CellMetrics.width(text, family, size_pt)
                }
            })
            .collect()
    }
}

fn family_for(name: &str) -> Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "sans-serif" | "sans" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" | "mono" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        _ => Family::Name(name),
    }
}
