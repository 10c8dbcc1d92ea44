use std::path::{Path, PathBuf};

use plotters::backend::SVGBackend;
use plotters::prelude::*;
use thiserror::Error;

use crate::figure::{Figure, FRAME_WIDTH, LEGEND_INSET, MARGIN, X_TITLE};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unsupported export format '.{0}' (use .png, .svg or .pdf)")]
    UnsupportedFormat(String),

    #[error("drawing figure: {0}")]
    Render(String),

    #[error("parsing rendered SVG: {0}")]
    Svg(#[from] usvg::Error),

    #[error("converting to PDF: {0}")]
    Pdf(String),

    #[error("encoding PNG: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("export canvas has zero size")]
    EmptyCanvas,
}

fn render_err<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Render(e.to_string())
}

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Svg,
    Pdf,
}

impl ExportFormat {
    /// In save-dialog order; the first one is the default.
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Png, ExportFormat::Svg, ExportFormat::Pdf];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn filter_name(self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG files",
            ExportFormat::Svg => "SVG files",
            ExportFormat::Pdf => "PDF files",
        }
    }

    /// Pick the format from the path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.extension() == ext)
            .ok_or(ExportError::UnsupportedFormat(ext))
    }
}

/// Append `.png` when the path has no extension.
pub fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(ExportFormat::Png.extension())
    }
}

// ---------------------------------------------------------------------------
// Saving
// ---------------------------------------------------------------------------

/// Draw `figure` on a `width` x `height` canvas and write it to `path`.
/// Raster and PDF output are enlarged by `scale`; SVG stays at base size.
pub fn save_figure(
    figure: &Figure,
    path: &Path,
    format: ExportFormat,
    width: u32,
    height: u32,
    scale: u32,
) -> Result<(), ExportError> {
    let svg = render_svg(figure, width, height)?;
    write_document(&svg, path, format, width, height, scale)?;
    log::info!(
        "Saved {} plot to {} ({}x{} px, scale {scale})",
        format.extension(),
        path.display(),
        width,
        height
    );
    Ok(())
}

/// Write an SVG document in the requested format.
fn write_document(
    svg: &str,
    path: &Path,
    format: ExportFormat,
    width: u32,
    height: u32,
    scale: u32,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Svg => std::fs::write(path, svg)?,
        ExportFormat::Png => {
            let tree = parse_svg(svg)?;
            let img = rasterize(&tree, width * scale, height * scale, scale)?;
            img.save_with_format(path, image::ImageFormat::Png)?;
        }
        ExportFormat::Pdf => {
            let tree = parse_svg(svg)?;
            let page = svg2pdf::PageOptions {
                dpi: 72.0 / scale as f32,
            };
            let pdf = svg2pdf::to_pdf(&tree, svg2pdf::ConversionOptions::default(), page)
                .map_err(|e| ExportError::Pdf(e.to_string()))?;
            std::fs::write(path, pdf)?;
        }
    }
    Ok(())
}

fn parse_svg(svg: &str) -> Result<usvg::Tree, ExportError> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    Ok(usvg::Tree::from_str(svg, &options)?)
}

fn rasterize(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
    scale: u32,
) -> Result<image::RgbaImage, ExportError> {
    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or(ExportError::EmptyCanvas)?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(
        tree,
        tiny_skia::Transform::from_scale(scale as f32, scale as f32),
        &mut pixmap.as_mut(),
    );

    let mut img = image::RgbaImage::new(width, height);
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(img)
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Draw the figure into an SVG document of `width` x `height` pixels.
pub fn render_svg(figure: &Figure, width: u32, height: u32) -> Result<String, ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyCanvas);
    }

    let grey = RGBColor(128, 128, 128);
    let text = RGBColor(40, 40, 40);
    let (x0, x1) = non_degenerate(figure.layout.x_range);
    let (y0, y1) = non_degenerate(figure.layout.y_range);
    let (margin_left, margin_right, margin_top, margin_bottom) = MARGIN;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin_left(margin_left as i32)
            .margin_right(margin_right as i32)
            .margin_top((margin_top + FRAME_WIDTH) as i32)
            .margin_bottom(margin_bottom as i32)
            .x_label_area_size(48)
            .y_label_area_size(0)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .y_labels(0)
            .x_desc(X_TITLE)
            .axis_desc_style(("sans-serif", 16).into_font().color(&text))
            .label_style(("sans-serif", 13).into_font().color(&text))
            .axis_style(grey.stroke_width(FRAME_WIDTH))
            .draw()
            .map_err(render_err)?;

        for trace in &figure.traces {
            let color = RGBColor(trace.color.r(), trace.color.g(), trace.color.b());
            let data: Vec<(f64, f64)> = trace
                .points()
                .filter(|(x, y)| y.is_finite() && *x >= x0 && *x <= x1)
                .collect();
            chart
                .draw_series(LineSeries::new(data, color.stroke_width(2)))
                .map_err(render_err)?
                .label(trace.name.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }

        // Mirrored frame on all four sides.
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x0, y0), (x1, y1)],
                grey.stroke_width(FRAME_WIDTH),
            )))
            .map_err(render_err)?;

        if !figure.traces.is_empty() {
            let (plot_w, _) = chart.plotting_area().dim_in_pixel();
            let inset = (plot_w as f64 * LEGEND_INSET).round() as i32;
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .margin(inset)
                .background_style(WHITE)
                .border_style(grey)
                .label_font(("sans-serif", 13).into_font().color(&text))
                .draw()
                .map_err(render_err)?;
        }

        root.present().map_err(render_err)?;
    }
    Ok(svg)
}

/// Widen an empty range so the coordinate mapping stays finite.
fn non_degenerate((lo, hi): (f64, f64)) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        (lo, lo + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="5">
        <rect x="0" y="0" width="5" height="5" fill="rgb(255,0,0)"/>
    </svg>"#;

    #[test]
    fn format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("a.png")).unwrap(), ExportFormat::Png);
        assert_eq!(ExportFormat::from_path(Path::new("a.SVG")).unwrap(), ExportFormat::Svg);
        assert_eq!(ExportFormat::from_path(Path::new("dir/a.b.pdf")).unwrap(), ExportFormat::Pdf);
        assert!(matches!(
            ExportFormat::from_path(Path::new("a.jpg")),
            Err(ExportError::UnsupportedFormat(ext)) if ext == "jpg"
        ));
    }

    #[test]
    fn png_is_the_default_extension() {
        assert_eq!(ExportFormat::ALL[0], ExportFormat::Png);
        assert_eq!(with_default_extension(Path::new("out/plot")), PathBuf::from("out/plot.png"));
        assert_eq!(with_default_extension(Path::new("plot.svg")), PathBuf::from("plot.svg"));
    }

    #[test]
    fn png_is_rasterised_at_scale() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("square.png");
        write_document(SQUARE, &path, ExportFormat::Png, 10, 5, 6).expect("png");

        let img = image::open(&path).expect("decode").to_rgba8();
        assert_eq!(img.dimensions(), (60, 30));
        assert_eq!(img.get_pixel(5, 5).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(55, 25).0, [255, 255, 255, 255]);
    }

    #[test]
    fn svg_is_written_verbatim() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("square.svg");
        write_document(SQUARE, &path, ExportFormat::Svg, 10, 5, 6).expect("svg");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SQUARE);
    }

    #[test]
    fn pdf_has_pdf_header() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("square.pdf");
        write_document(SQUARE, &path, ExportFormat::Pdf, 10, 5, 6).expect("pdf");
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        let tree = parse_svg(SQUARE).unwrap();
        assert!(matches!(rasterize(&tree, 0, 30, 6), Err(ExportError::EmptyCanvas)));
    }

    #[test]
    fn degenerate_ranges_are_widened() {
        assert_eq!(non_degenerate((20.0, 20.0)), (20.0, 21.0));
        assert_eq!(non_degenerate((20.0, 60.0)), (20.0, 60.0));
    }
}
