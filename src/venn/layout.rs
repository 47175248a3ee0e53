//! Canvas sizing.
//!
//! The canvas grows with the longest set label so names never get clipped.
//! All sizes are in inches.

use super::VennError;
use super::metrics::TextMeasurer;

/// Narrowest canvas ever produced.
pub const MIN_CANVAS_WIDTH: f64 = 8.0;

/// Full-width character whose rendered width stands in for one line of
/// label height.
pub const REFERENCE_GLYPH: &str = "\u{4E2D}";

/// Width and height reserved for the diagram, in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    /// Size in points (1/72 inch), the SVG user unit.
    pub fn points(self) -> (f64, f64) {
        (self.width * 72.0, self.height * 72.0)
    }
}

/// Compute the canvas for `set_count` sets.
///
/// `text_max_length` is the widest set label and `glyph_height` the width of
/// [`REFERENCE_GLYPH`], both at the base label size.
///
/// # Errors
///
/// Returns [`VennError::UnsupportedSetCount`] unless `set_count` is 2, 3 or 4.
pub fn canvas_size(
    set_count: usize,
    text_max_length: f64,
    glyph_height: f64,
) -> Result<CanvasSize, VennError> {
    let (width, height) = match set_count {
        2 => (2.0 * text_max_length + 4.0, glyph_height + 7.0),
        3 => (2.0 * text_max_length + 4.0, 2.0 * glyph_height + 7.0),
        4 => (2.0 * text_max_length + 7.0, 2.0 * glyph_height + 7.0),
        n => return Err(VennError::UnsupportedSetCount(n)),
    };
    Ok(CanvasSize {
        width: width.max(MIN_CANVAS_WIDTH),
        height,
    })
}

/// Label metrics feeding [`canvas_size`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelMetrics {
    pub text_max_length: f64,
    pub glyph_height: f64,
}

/// Measure the set names and the reference glyph.
pub fn measure_labels(
    names: &[&str],
    measurer: &dyn TextMeasurer,
    family: &str,
    size_pt: f64,
) -> LabelMetrics {
    let text_max_length = measurer
        .widths(names, family, size_pt)
        .into_iter()
        .fold(0.0, f64::max);
    let glyph_height = measurer.width(REFERENCE_GLYPH, family, size_pt);
    LabelMetrics {
        text_max_length,
        glyph_height,
    }
}
