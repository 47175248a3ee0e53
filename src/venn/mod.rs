//! Venn diagrams for 2 to 4 sets.
//!
//! [`draw_venn_plot`] runs the whole job for one input table:
//! - validate that the table is rectangular
//! - turn each column into a [`NamedSet`] (blank cells dropped)
//! - size the canvas from the widest set label
//! - render an SVG with a fixed color per set position
//! - save it in each requested format
//! - tabulate the sets side by side, padded to equal length
//!
//! [`VennEngine`] exposes the same steps with the text measurer, renderer,
//! and font database swapped out, which keeps tests off the system fonts.

mod export;
mod layout;
mod metrics;
mod palette;
mod regions;
mod render;

pub use export::{OutputFormat, output_path, save_svg};
pub use layout::{
    CanvasSize, LabelMetrics, MIN_CANVAS_WIDTH, REFERENCE_GLYPH, canvas_size, measure_labels,
};
pub use metrics::{CellMetrics, FontMetrics, TextMeasurer};
pub use palette::{PALETTE, palette};
pub use regions::{Ellipse, Geometry, Region, partition};
pub use render::{DiagramRenderer, RenderRequest, SvgRenderer};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use resvg::usvg::fontdb::Database;
use thiserror::Error;

use crate::logger::Logger;
use crate::table::{Table, TableError};

/// Errors from drawing a Venn diagram.
#[derive(Debug, Error)]
pub enum VennError {
    #[error("input is not a rectangular table of sets: {0}")]
    InvalidInputKind(String),

    #[error("Venn diagrams need 2 to 4 non-empty sets, got {0}")]
    UnsupportedSetCount(usize),

    #[error("failed to render diagram: {0}")]
    Render(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<TableError> for VennError {
    fn from(err: TableError) -> Self {
        Self::InvalidInputKind(err.to_string())
    }
}

/// A labeled list of elements taken from one table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSet {
    pub name: String,
    pub elements: Vec<String>,
}

impl NamedSet {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }
}

/// Turn each column into a set, dropping missing and empty cells.
///
/// Values are kept verbatim, so `" A"` and `"A"` are different members.
///
/// Empty sets are kept so callers can report which columns were dropped.
pub fn collect_sets(table: &Table) -> Vec<NamedSet> {
    table
        .headers
        .iter()
        .zip(&table.columns)
        .map(|(name, column)| NamedSet {
            name: name.clone(),
            elements: column
                .iter()
                .flatten()
                .filter(|cell| !cell.is_empty())
                .cloned()
                .collect(),
        })
        .collect()
}

/// Lay the sets out side by side, padding short columns with `None`.
pub fn tabulate(sets: &[NamedSet]) -> Table {
    let rows = sets.iter().map(NamedSet::len).max().unwrap_or(0);
    Table {
        headers: sets.iter().map(|set| set.name.clone()).collect(),
        columns: sets
            .iter()
            .map(|set| {
                let mut column = set.elements.iter().cloned().map(Some).collect::<Vec<_>>();
                column.resize(rows, None);
                column
            })
            .collect(),
    }
}

/// Drawing options. Sizes are in points.
#[derive(Debug, Clone, PartialEq)]
pub struct VennOptions {
    pub formats: Vec<OutputFormat>,
    pub font_family: String,
    /// Set label size; also the size labels are measured at.
    pub label_size: f64,
    /// Region count size.
    pub text_size: f64,
    pub fill_opacity: f64,
    pub dpi: u32,
    pub show_percentage: bool,
}

impl Default for VennOptions {
    fn default() -> Self {
        Self {
            formats: vec![OutputFormat::Png, OutputFormat::Svg],
            font_family: "sans-serif".to_string(),
            label_size: 12.0,
            text_size: 10.0,
            fill_opacity: 0.4,
            dpi: 300,
            show_percentage: false,
        }
    }
}

/// The rendered diagram and what went into it.
#[derive(Debug, Clone, PartialEq)]
pub struct VennPlot {
    pub svg: String,
    pub canvas: CanvasSize,
    pub colors: Vec<&'static str>,
    pub regions: Vec<Region>,
}

/// Output of [`draw_venn_plot`].
#[derive(Debug, Clone, PartialEq)]
pub struct VennResult {
    pub plot: VennPlot,
    /// Sets side by side, padded with `None` to the longest set.
    pub table: Table,
    /// Files written, in the order of [`VennOptions::formats`].
    pub saved: Vec<PathBuf>,
}

/// Draw, save and tabulate a Venn diagram using the system fonts.
///
/// # Errors
///
/// See [`VennEngine::draw`].
pub fn draw_venn_plot(
    table: &Table,
    output_stem: &Path,
    options: &VennOptions,
    logger: Option<&Logger>,
) -> Result<VennResult, VennError> {
    VennEngine::new(options.clone()).draw(table, output_stem, logger)
}

/// Venn pipeline with pluggable measurement and rendering.
pub struct VennEngine {
    options: VennOptions,
    measurer: Box<dyn TextMeasurer>,
    renderer: Box<dyn DiagramRenderer>,
    fonts: Arc<Database>,
}

impl VennEngine {
    /// Engine backed by the system fonts and the SVG renderer.
    pub fn new(options: VennOptions) -> Self {
        let metrics = FontMetrics::system();
        let fonts = metrics.database();
        Self {
            options,
            measurer: Box::new(metrics),
            renderer: Box::new(SvgRenderer),
            fonts,
        }
    }

    /// Engine that never touches installed fonts: labels are measured with
    /// [`CellMetrics`] and PNGs are rasterized without text faces.
    pub fn offline(options: VennOptions) -> Self {
        Self {
            options,
            measurer: Box::new(CellMetrics),
            renderer: Box::new(SvgRenderer),
            fonts: Arc::new(Database::new()),
        }
    }

    #[must_use]
    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Box::new(measurer);
        self
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: impl DiagramRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    #[must_use]
    pub fn with_fonts(mut self, fonts: Arc<Database>) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn options(&self) -> &VennOptions {
        &self.options
    }

    /// Normalize `table` into 2 to 4 non-empty sets.
    ///
    /// # Errors
    ///
    /// [`VennError::InvalidInputKind`] for a malformed table (logged as an
    /// error when `logger` is given) and [`VennError::UnsupportedSetCount`]
    /// for a bad set count (returned without logging).
    pub fn prepare_sets(
        &self,
        table: &Table,
        logger: Option<&Logger>,
    ) -> Result<Vec<NamedSet>, VennError> {
        if let Err(err) = table.validate() {
            let err = VennError::from(err);
            return Err(match logger {
                Some(logger) => logger.fail(err),
                None => err,
            });
        }

        let (sets, dropped): (Vec<_>, Vec<_>) =
            collect_sets(table).into_iter().partition(|set| !set.is_empty());
        if let Some(logger) = logger {
            for set in &dropped {
                logger.warning(format!("Column {} has no values; skipping it", set.name));
            }
        }

        if !(2..=4).contains(&sets.len()) {
            return Err(VennError::UnsupportedSetCount(sets.len()));
        }
        Ok(sets)
    }

    /// Measure the labels and size the canvas for `sets`.
    ///
    /// # Errors
    ///
    /// [`VennError::UnsupportedSetCount`] unless there are 2 to 4 sets.
    pub fn layout(&self, sets: &[NamedSet]) -> Result<(CanvasSize, LabelMetrics), VennError> {
        let names = sets.iter().map(|set| set.name.as_str()).collect::<Vec<_>>();
        let metrics = measure_labels(
            &names,
            self.measurer.as_ref(),
            &self.options.font_family,
            self.options.label_size,
        );
        let canvas = canvas_size(sets.len(), metrics.text_max_length, metrics.glyph_height)?;
        Ok((canvas, metrics))
    }

    /// Render `sets` without saving anything.
    ///
    /// # Errors
    ///
    /// Propagates layout and renderer errors.
    pub fn render(&self, sets: &[NamedSet]) -> Result<VennPlot, VennError> {
        let (canvas, metrics) = self.layout(sets)?;
        let colors = palette(sets.len());
        let regions = partition(sets);
        let svg = self.renderer.render(&RenderRequest {
            sets,
            regions: &regions,
            colors: &colors,
            canvas,
            label_width: metrics.text_max_length,
            options: &self.options,
        })?;
        tracing::debug!(
            sets = sets.len(),
            width = canvas.width,
            height = canvas.height,
            "rendered venn diagram"
        );
        Ok(VennPlot {
            svg,
            canvas,
            colors,
            regions,
        })
    }

    /// Validate, render, save and tabulate.
    ///
    /// One info line is logged per saved file.
    ///
    /// # Errors
    ///
    /// - [`VennError::InvalidInputKind`] if `table` is not rectangular
    /// - [`VennError::UnsupportedSetCount`] unless 2 to 4 columns have values
    /// - [`VennError::Render`] / [`VennError::Io`] from rendering and saving
    pub fn draw(
        &self,
        table: &Table,
        output_stem: &Path,
        logger: Option<&Logger>,
    ) -> Result<VennResult, VennError> {
        let sets = self.prepare_sets(table, logger)?;
        let plot = self.render(&sets)?;
        let saved = save_svg(
            &plot.svg,
            output_stem,
            &self.options.formats,
            self.options.dpi,
            &self.fonts,
        )?;
        if let Some(logger) = logger {
            for path in &saved {
                logger.info(format!("Venn diagram saved to {}", path.display()));
            }
        }
        Ok(VennResult {
            plot,
            table: tabulate(&sets),
            saved,
        })
    }
}
