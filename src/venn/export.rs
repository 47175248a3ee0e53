//! Saving rendered diagrams to disk.
//!
//! SVG output is written as-is; PNG output is rasterized with `resvg` at the
//! requested DPI. The SVG user unit is the point, so the scale factor is
//! `dpi / 72`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use resvg::usvg::fontdb::Database;

use super::VennError;

/// File formats a diagram can be saved in.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }
}

/// `<stem>.<ext>`, keeping any dots already in the stem.
pub fn output_path(stem: &Path, format: OutputFormat) -> PathBuf {
    let mut name = OsString::from(stem.as_os_str());
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}

/// Write `svg` once per format and return the written paths in order.
///
/// # Errors
///
/// Returns [`VennError::Io`] when a file or its directory cannot be
/// written, and [`VennError::Render`] when rasterization fails.
pub fn save_svg(
    svg: &str,
    stem: &Path,
    formats: &[OutputFormat],
    dpi: u32,
    fonts: &Arc<Database>,
) -> Result<Vec<PathBuf>, VennError> {
    if let Some(parent) = stem.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| VennError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut saved = Vec::with_capacity(formats.len());
    for &format in formats {
        let path = output_path(stem, format);
        if saved.contains(&path) {
            continue;
        }
        match format {
            OutputFormat::Svg => std::fs::write(&path, svg).map_err(|source| VennError::Io {
                path: path.clone(),
                source,
            })?,
            OutputFormat::Png => {
                let image = rasterize_svg(svg, dpi, fonts)?;
                image
                    .save_with_format(&path, image::ImageFormat::Png)
                    .map_err(|e| VennError::Render(format!("{}: {e}", path.display())))?;
            }
        }
        tracing::debug!(path = %path.display(), "saved diagram");
        saved.push(path);
    }
    Ok(saved)
}

/// Rasterize an SVG string at `dpi`.
fn rasterize_svg(svg: &str, dpi: u32, fonts: &Arc<Database>) -> Result<image::RgbaImage, VennError> {
    let opts = resvg::usvg::Options {
        fontdb: Arc::clone(fonts),
        ..Default::default()
    };

    let tree = resvg::usvg::Tree::from_str(svg, &opts)
        .map_err(|e| VennError::Render(format!("invalid SVG: {e}")))?;
    let size = tree.size();

    let scale = dpi as f32 / 72.0;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let width = (size.width() * scale).ceil() as u32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let height = (size.height() * scale).ceil() as u32;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| VennError::Render(format!("failed to create pixmap {width}x{height}")))?;

    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    // The white background rect makes every pixel opaque, so premultiplied
    // and straight alpha agree.
    image::RgbaImage::from_raw(width, height, pixmap.take())
        .ok_or_else(|| VennError::Render("failed to create image from pixmap data".to_string()))
}
