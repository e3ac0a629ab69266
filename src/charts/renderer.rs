//! Static Chart Renderer
//! Draws a donut figure to SVG or PNG with plotters.
//!
//! Layout:
//! 1. Donut centered in whatever space the legend leaves
//! 2. Slice text at the middle of the ring, white on dark colors
//! 3. Legend on the side the variant asks for
//! 4. Title centered along the bottom edge

use crate::charts::figure::{polar_to_xy, ring_segment, DonutFigure};
use crate::charts::palette::Rgb;
use crate::charts::variant::LegendPlacement;
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

// Layout dimensions (pixels)
const TITLE_H: i32 = 48;
const LEGEND_COL_W: i32 = 260;
const LEGEND_ROW_H: i32 = 44;
const LEGEND_BOX: i32 = 14;
const LEGEND_SPACING: i32 = 26;
const MARGIN: i32 = 16;
const SEGMENTS_PER_TURN: usize = 180;

const TITLE_FONT: f64 = 18.0;
const SLICE_FONT: f64 = 14.0;
const LEGEND_FONT: f64 = 13.0;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to write chart: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported output format '{0}' (use .svg or .png)")]
    UnsupportedFormat(String),
    #[error("Chart size {0}x{1} is too small")]
    TooSmall(u32, u32),
    #[error("Chart size {0}x{1} is too large")]
    TooLarge(u32, u32),
}

fn draw_err<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Draw(err.to_string())
}

/// Bytes in an RGB8 buffer of the given size, or `None` if it cannot be addressed.
fn pixel_buffer_len(width: u32, height: u32) -> Option<usize> {
    (width as usize).checked_mul(height as usize)?.checked_mul(3)
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Renders donut figures to image formats.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the figure as an SVG document.
    pub fn render_svg(figure: &DonutFigure, width: u32, height: u32) -> Result<String, RenderError> {
        Self::check_size(width, height)?;

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
            Self::draw_figure(&root, figure)?;
            root.present().map_err(draw_err)?;
        }
        Ok(svg)
    }

    /// Render the figure as PNG bytes.
    pub fn render_png(figure: &DonutFigure, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        Self::check_size(width, height)?;

        let len = pixel_buffer_len(width, height).ok_or(RenderError::TooLarge(width, height))?;
        let mut buffer = vec![0u8; len];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            Self::draw_figure(&root, figure)?;
            root.present().map_err(draw_err)?;
        }

        let img = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| RenderError::Draw("pixel buffer size mismatch".to_string()))?;
        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, ImageFormat::Png)?;
        Ok(png.into_inner())
    }

    /// Write the figure to `path`, picking SVG or PNG from the extension.
    pub fn save(figure: &DonutFigure, path: &Path, width: u32, height: u32) -> Result<(), RenderError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "svg" => std::fs::write(path, Self::render_svg(figure, width, height)?)?,
            "png" => std::fs::write(path, Self::render_png(figure, width, height)?)?,
            other => return Err(RenderError::UnsupportedFormat(other.to_string())),
        }

        tracing::info!(variant = %figure.variant, path = %path.display(), "chart written");
        Ok(())
    }

    fn check_size(width: u32, height: u32) -> Result<(), RenderError> {
        let min_w = (LEGEND_COL_W + 4 * MARGIN + 80) as u32;
        let min_h = (TITLE_H + 2 * LEGEND_ROW_H + 4 * MARGIN + 80) as u32;
        if width < min_w || height < min_h {
            return Err(RenderError::TooSmall(width, height));
        }
        Ok(())
    }

    fn draw_figure<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        figure: &DonutFigure,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(draw_err)?;

        let (width, height) = root.dim_in_pixel();
        let (width, height) = (width as i32, height as i32);

        // Plot area left over once the legend and title are placed
        let (mut left, mut top, mut right, mut bottom) = (0, 0, width, height - TITLE_H);
        match figure.legend {
            LegendPlacement::Right => right -= LEGEND_COL_W,
            LegendPlacement::Left => left += LEGEND_COL_W,
            LegendPlacement::Top => top += LEGEND_ROW_H,
            LegendPlacement::Bottom => bottom -= LEGEND_ROW_H,
        }

        let center = ((left + right) / 2, (top + bottom) / 2);
        let radius = (((right - left).min(bottom - top) - 2 * MARGIN) / 2) as f64;

        Self::draw_ring(root, figure, center, radius)?;
        Self::draw_slice_text(root, figure, center, radius)?;
        Self::draw_legend(root, figure, (top, right, bottom), width)?;
        Self::draw_title(root, &figure.title, width, height)?;

        Ok(())
    }

    fn to_pixel(center: (i32, i32), radius: f64, (x, y): (f64, f64)) -> (i32, i32) {
        (
            center.0 + (x * radius).round() as i32,
            center.1 - (y * radius).round() as i32,
        )
    }

    fn draw_ring<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        figure: &DonutFigure,
        center: (i32, i32),
        radius: f64,
    ) -> Result<(), RenderError> {
        for slice in figure.slices.iter().filter(|s| s.sweep() > 0.0) {
            let points: Vec<(i32, i32)> = ring_segment(
                slice.start_angle,
                slice.end_angle,
                figure.hole,
                1.0,
                SEGMENTS_PER_TURN,
            )
            .into_iter()
            .map(|p| Self::to_pixel(center, radius, p))
            .collect();

            root.draw(&Polygon::new(points, rgb(slice.color).filled()))
                .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_slice_text<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        figure: &DonutFigure,
        center: (i32, i32),
        radius: f64,
    ) -> Result<(), RenderError> {
        let line_h = SLICE_FONT as i32 + 2;
        let text_r = (figure.hole + 1.0) / 2.0;

        for slice in figure.slices.iter().filter(|s| s.sweep() > 0.0) {
            let anchor = Self::to_pixel(center, radius, polar_to_xy(slice.mid_angle(), text_r));
            let color = if slice.color.is_dark() { &WHITE } else { &BLACK };
            let style = ("sans-serif", SLICE_FONT)
                .into_font()
                .color(color)
                .pos(Pos::new(HPos::Center, VPos::Center));

            let lines: Vec<&str> = slice.text.lines().collect();
            let first_y = anchor.1 - (lines.len() as i32 - 1) * line_h / 2;
            for (i, line) in lines.iter().enumerate() {
                root.draw(&Text::new(
                    line.to_string(),
                    (anchor.0, first_y + i as i32 * line_h),
                    style.clone(),
                ))
                .map_err(draw_err)?;
            }
        }
        Ok(())
    }

    fn draw_legend<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        figure: &DonutFigure,
        (top, right, bottom): (i32, i32, i32),
        width: i32,
    ) -> Result<(), RenderError> {
        let style = ("sans-serif", LEGEND_FONT)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));

        // Top-left corner of each entry's color box
        let n = figure.slices.len() as i32;
        let origins: Vec<(i32, i32)> = if figure.legend.is_horizontal() {
            let widths: Vec<i32> = figure
                .slices
                .iter()
                .map(|s| LEGEND_BOX + 6 + s.label.chars().count() as i32 * 7 + 18)
                .collect();
            let total: i32 = widths.iter().sum();
            let y = match figure.legend {
                LegendPlacement::Top => (LEGEND_ROW_H - LEGEND_BOX) / 2,
                _ => bottom + (LEGEND_ROW_H - LEGEND_BOX) / 2,
            };
            let mut x = ((width - total) / 2).max(MARGIN);
            widths
                .iter()
                .map(|w| {
                    let origin = (x, y);
                    x += w;
                    origin
                })
                .collect()
        } else {
            let x = match figure.legend {
                LegendPlacement::Left => MARGIN,
                _ => right + MARGIN,
            };
            let block_h = n * LEGEND_SPACING;
            let y0 = (top + bottom - block_h) / 2;
            (0..n).map(|i| (x, y0 + i * LEGEND_SPACING)).collect()
        };

        for (slice, (x, y)) in figure.slices.iter().zip(origins) {
            root.draw(&Rectangle::new(
                [(x, y), (x + LEGEND_BOX, y + LEGEND_BOX)],
                rgb(slice.color).filled(),
            ))
            .map_err(draw_err)?;
            root.draw(&Text::new(
                slice.label.clone(),
                (x + LEGEND_BOX + 6, y + LEGEND_BOX / 2),
                style.clone(),
            ))
            .map_err(draw_err)?;
        }

        Ok(())
    }

    fn draw_title<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
        width: i32,
        height: i32,
    ) -> Result<(), RenderError> {
        let style = ("sans-serif", TITLE_FONT)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));

        root.draw(&Text::new(
            title.to_string(),
            (width / 2, height - TITLE_H / 2),
            style,
        ))
        .map_err(draw_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartVariant;
    use crate::data::LandUseShares;

    fn figure(variant: ChartVariant) -> DonutFigure {
        let shares = LandUseShares {
            labels: vec![
                "Production grassland".to_string(),
                "Wetland".to_string(),
                "Cropland".to_string(),
            ],
            values: vec![500.0, 300.0, 200.0],
        };
        DonutFigure::build(&shares, variant)
    }

    #[test]
    fn svg_contains_title_legend_and_segments() {
        let svg = StaticChartRenderer::render_svg(&figure(ChartVariant::Forest), 900, 700).unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Land uses converted from forestland since 1990"));
        assert!(svg.contains("Production grassland"));
        assert!(svg.contains("50%"));
        assert_eq!(svg.matches("<polygon").count(), 3);
    }

    #[test]
    fn svg_uses_variant_label_format() {
        let svg = StaticChartRenderer::render_svg(&figure(ChartVariant::Slate), 900, 700).unwrap();
        assert!(svg.contains("500 ha"));
    }

    #[test]
    fn tiny_canvas_is_rejected() {
        let err = StaticChartRenderer::render_svg(&figure(ChartVariant::Forest), 100, 100).unwrap_err();
        assert!(matches!(err, RenderError::TooSmall(100, 100)));
    }

    #[test]
    fn png_has_signature_and_requested_size() {
        let png = StaticChartRenderer::render_png(&figure(ChartVariant::Pastel), 900, 700).unwrap();
        assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));

        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (900, 700));
    }

    #[test]
    fn buffer_len_does_not_wrap() {
        assert_eq!(pixel_buffer_len(900, 700), Some(900 * 700 * 3));
        assert_eq!(pixel_buffer_len(0, 700), Some(0));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn buffer_len_beyond_u32() {
        // 40000 * 40000 * 3 overflows u32 arithmetic.
        assert_eq!(pixel_buffer_len(40_000, 40_000), Some(4_800_000_000));
        assert_eq!(pixel_buffer_len(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn save_writes_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forest.png");
        StaticChartRenderer::save(&figure(ChartVariant::Forest), &path, 900, 700).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 900);
    }

    #[test]
    fn save_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.gif");
        let err = StaticChartRenderer::save(&figure(ChartVariant::Forest), &path, 900, 700).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedFormat(ext) if ext == "gif"));
    }

    #[test]
    fn save_writes_svg_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forest.svg");
        StaticChartRenderer::save(&figure(ChartVariant::Earth), &path, 900, 700).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Wetland"));
    }
}
