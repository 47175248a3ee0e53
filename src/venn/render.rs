//! SVG drawing of a sized Venn diagram.

use std::fmt::Write;

use super::layout::CanvasSize;
use super::palette::rgb;
use super::regions::{Geometry, Region};
use super::{NamedSet, VennError, VennOptions};

/// Tallest diagram area, in inches. The label bands sit above and below.
const DIAGRAM_SIDE: f64 = 7.0;

/// Everything a renderer needs for one diagram.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub sets: &'a [NamedSet],
    pub regions: &'a [Region],
    pub colors: &'a [&'static str],
    pub canvas: CanvasSize,
    /// Widest set label, in inches.
    pub label_width: f64,
    pub options: &'a VennOptions,
}

/// Turns a sized diagram into an SVG document.
pub trait DiagramRenderer {
    /// # Errors
    ///
    /// Returns [`VennError::Render`] when the request cannot be drawn.
    fn render(&self, request: &RenderRequest<'_>) -> Result<String, VennError>;
}

/// Default renderer: translucent ellipses, region counts, set labels.
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgRenderer;

/// Maps unit-square coordinates (y up) onto the canvas in points (y down).
#[derive(Debug, Clone, Copy)]
struct Frame {
    x0: f64,
    y0: f64,
    side: f64,
}

impl Frame {
    fn new(canvas: CanvasSize, label_width: f64) -> Self {
        let (width, height) = canvas.points();
        let side = (canvas.width - 2.0 * label_width)
            .clamp(0.0, DIAGRAM_SIDE)
            .max(canvas.width.min(DIAGRAM_SIDE) / 2.0)
            * 72.0;
        Self {
            x0: (width - side) / 2.0,
            y0: (height - side) / 2.0,
            side,
        }
    }

    fn point(self, (x, y): (f64, f64)) -> (f64, f64) {
        (self.x0 + x * self.side, self.y0 + (1.0 - y) * self.side)
    }

    fn length(self, unit: f64) -> f64 {
        unit * self.side
    }
}

impl DiagramRenderer for SvgRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<String, VennError> {
        let count = request.sets.len();
        let geometry = Geometry::for_set_count(count)
            .ok_or(VennError::UnsupportedSetCount(count))?;
        if request.colors.len() < count {
            return Err(VennError::Render(format!(
                "{} colors for {count} sets",
                request.colors.len()
            )));
        }

        let options = request.options;
        let frame = Frame::new(request.canvas, request.label_width);
        let (width, height) = request.canvas.points();
        let total = request.regions.iter().map(Region::count).sum::<usize>();

        let mut svg = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.2}" height="{height:.2}" viewBox="0 0 {width:.2} {height:.2}">"#
        );
        let _ = writeln!(
            svg,
            r#"<rect width="{width:.2}" height="{height:.2}" fill="white"/>"#
        );

        for (shape, color) in geometry.shapes.iter().zip(request.colors) {
            let (cx, cy) = frame.point((shape.cx, shape.cy));
            let _ = writeln!(
                svg,
                r#"<ellipse cx="{cx:.2}" cy="{cy:.2}" rx="{:.2}" ry="{:.2}" transform="rotate({:.1} {cx:.2} {cy:.2})" fill="{color}" fill-opacity="{:.2}" stroke="{}" stroke-width="1.5"/>"#,
                frame.length(shape.rx),
                frame.length(shape.ry),
                -shape.rotation,
                options.fill_opacity,
                darken(color),
            );
        }

        let anchors = geometry.region_anchors();
        for region in request.regions {
            let Some(&anchor) = anchors.get(&region.mask) else {
                continue;
            };
            let (x, y) = frame.point(anchor);
            let text = region_text(region.count(), total, options.show_percentage);
            let _ = writeln!(
                svg,
                r#"<text x="{x:.2}" y="{y:.2}" font-family="{}" font-size="{:.1}" text-anchor="middle" dominant-baseline="central">{text}</text>"#,
                escape(&options.font_family),
                options.text_size,
            );
        }

        for (set, &position) in request.sets.iter().zip(&geometry.labels) {
            let (x, y) = frame.point(position);
            let _ = writeln!(
                svg,
                r#"<text x="{x:.2}" y="{y:.2}" font-family="{}" font-size="{:.1}" font-weight="bold" text-anchor="middle" dominant-baseline="central">{}</text>"#,
                escape(&options.font_family),
                options.label_size,
                escape(&set.name),
            );
        }

        svg.push_str("</svg>\n");
        Ok(svg)
    }
}

fn region_text(count: usize, total: usize, show_percentage: bool) -> String {
    if show_percentage && total > 0 {
        format!("{count} ({:.1}%)", count as f64 * 100.0 / total as f64)
    } else {
        count.to_string()
    }
}

/// Outline color: the fill at 70% brightness.
fn darken(hex: &str) -> String {
    rgb(hex).map_or_else(
        || hex.to_string(),
        |(r, g, b)| {
            let scale = |c: u8| (u16::from(c) * 7 / 10) as u8;
            format!("#{:02X}{:02X}{:02X}", scale(r), scale(g), scale(b))
        },
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venn::palette::palette;
    use crate::venn::regions::partition;

    fn set(name: &str, elements: &[&str]) -> NamedSet {
        NamedSet {
            name: name.to_string(),
            elements: elements.iter().map(|e| (*e).to_string()).collect(),
        }
    }

    fn render(sets: &[NamedSet], options: &VennOptions) -> Result<String, VennError> {
        let regions = partition(sets);
        let colors = palette(sets.len());
        SvgRenderer.render(&RenderRequest {
            sets,
            regions: &regions,
            colors: &colors,
            canvas: CanvasSize {
                width: 8.0,
                height: 7.4,
            },
            label_width: 0.4,
            options,
        })
    }

    #[test]
    fn test_svg_has_one_shape_per_set_in_palette_order() {
        let sets = vec![set("a", &["1"]), set("b", &["1", "2"]), set("c", &["3"])];
        let svg = render(&sets, &VennOptions::default()).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<ellipse").count(), 3);
        let first = svg.find("#1F77B4").unwrap();
        let second = svg.find("#FF7F0E").unwrap();
        let third = svg.find("#2CA02C").unwrap();
        assert!(first < second && second < third);
        assert!(svg.contains(r#"width="576.00""#));
    }

    #[test]
    fn test_svg_prints_region_counts_without_percentages() {
        let sets = vec![set("a", &["1", "2"]), set("b", &["2", "3", "4"])];
        let svg = render(&sets, &VennOptions::default()).unwrap();

        assert!(svg.contains(">1</text>"));
        assert!(svg.contains(">2</text>"));
        assert!(!svg.contains('%'));
    }

    #[test]
    fn test_svg_percentages_when_requested() {
        let sets = vec![set("a", &["1", "2"]), set("b", &["2", "3", "4"])];
        let options = VennOptions {
            show_percentage: true,
            ..VennOptions::default()
        };
        let svg = render(&sets, &options).unwrap();
        assert!(svg.contains(">2 (50.0%)</text>"));
    }

    #[test]
    fn test_labels_are_escaped() {
        let sets = vec![set("up & <down>", &["1"]), set("b", &["1"])];
        let svg = render(&sets, &VennOptions::default()).unwrap();
        assert!(svg.contains("up &amp; &lt;down&gt;"));
    }

    #[test]
    fn test_one_set_is_rejected() {
        let sets = vec![set("a", &["1"])];
        assert!(matches!(
            render(&sets, &VennOptions::default()),
            Err(VennError::UnsupportedSetCount(1))
        ));
    }

    #[test]
    fn test_darken_scales_channels() {
        assert_eq!(darken("#FFFFFF"), "#B2B2B2");
        assert_eq!(darken("not a color"), "not a color");
    }

    #[test]
    fn test_frame_keeps_diagram_inside_canvas() {
        let canvas = CanvasSize {
            width: 9.0,
            height: 7.5,
        };
        let frame = Frame::new(canvas, 2.5);
        let (width, height) = canvas.points();
        let (left, top) = frame.point((0.0, 1.0));
        let (right, bottom) = frame.point((1.0, 0.0));
        assert!(left >= 0.0 && top >= 0.0);
        assert!(right <= width && bottom <= height);
        assert!((frame.side - 4.0 * 72.0).abs() < 1e-9);
    }
}
