//! Donut View Widget
//! Draws the figure with egui_plot polygons and shows hover details.

use crate::charts::figure::polar_to_xy;
use crate::charts::{DonutFigure, LegendPlacement, Rgb};
use egui::{Color32, RichText};
use egui_plot::{Corner, Legend, Plot, PlotPoint, PlotPoints, Polygon, Text};

/// Angular resolution of each drawn ring piece.
const SEGMENTS_PER_TURN: usize = 180;

pub fn color32(color: Rgb) -> Color32 {
    Color32::from_rgb(color.0, color.1, color.2)
}

/// egui_plot only offers corner legends; side placements pin to the top.
pub fn legend_corner(placement: LegendPlacement) -> Corner {
    match placement {
        LegendPlacement::Right => Corner::RightTop,
        LegendPlacement::Left => Corner::LeftTop,
        LegendPlacement::Top => Corner::LeftTop,
        LegendPlacement::Bottom => Corner::LeftBottom,
    }
}

/// Split one ring segment into narrow quads.
///
/// egui fills polygons as convex shapes, and a long ring segment is not.
fn convex_pieces(start: f64, end: f64, inner: f64) -> Vec<Vec<[f64; 2]>> {
    let step = std::f64::consts::TAU / SEGMENTS_PER_TURN as f64;
    let n = ((end - start) / step - 1e-9).ceil().max(1.0) as usize;
    let width = (end - start) / n as f64;
    let point = |angle: f64, r: f64| {
        let (x, y) = polar_to_xy(angle, r);
        [x, y]
    };

    (0..n)
        .map(|i| {
            let a = start + width * i as f64;
            let b = a + width;
            vec![point(a, 1.0), point(b, 1.0), point(b, inner), point(a, inner)]
        })
        .collect()
}

/// Central panel content: the donut, its title and the hover tooltip.
pub struct DonutView {
    pub figure: Option<DonutFigure>,
}

impl Default for DonutView {
    fn default() -> Self {
        Self { figure: None }
    }
}

impl DonutView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_figure(&mut self, figure: DonutFigure) {
        self.figure = Some(figure);
    }

    pub fn clear(&mut self) {
        self.figure = None;
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(figure) = &self.figure else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        let title_h = 40.0;
        let plot_h = (ui.available_height() - title_h).max(200.0);

        let response = Plot::new(format!("donut_{}", figure.variant))
            .height(plot_h)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .show_x(false)
            .show_y(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .include_x(-1.6)
            .include_x(1.6)
            .include_y(-1.1)
            .include_y(1.1)
            .legend(Legend::default().position(legend_corner(figure.legend)))
            .show(ui, |plot_ui| {
                for slice in figure.slices.iter().filter(|s| s.sweep() > 0.0) {
                    let color = color32(slice.color);
                    for piece in convex_pieces(slice.start_angle, slice.end_angle, figure.hole) {
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::from(piece))
                                .fill_color(color)
                                .stroke(egui::Stroke::new(0.5, color))
                                .name(&slice.label),
                        );
                    }

                    let (x, y) = polar_to_xy(slice.mid_angle(), (figure.hole + 1.0) / 2.0);
                    let text_color = if slice.color.is_dark() {
                        Color32::WHITE
                    } else {
                        Color32::BLACK
                    };
                    plot_ui.text(Text::new(
                        PlotPoint::new(x, y),
                        RichText::new(&slice.text).size(13.0).color(text_color),
                    ));
                }

                plot_ui.pointer_coordinate()
            });

        if let Some(pointer) = response.inner {
            if let Some(slice) = figure.slice_at(pointer.x, pointer.y) {
                let hover = slice.hover.clone();
                response.response.on_hover_ui_at_pointer(|ui| {
                    let mut lines = hover.lines();
                    if let Some(label) = lines.next() {
                        ui.label(RichText::new(label).strong());
                    }
                    for line in lines {
                        ui.label(line);
                    }
                });
            }
        }

        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&figure.title).size(16.0));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    #[test]
    fn pieces_cover_the_segment() {
        let pieces = convex_pieces(0.0, TAU / 4.0, 0.6);
        assert_eq!(pieces.len(), SEGMENTS_PER_TURN / 4);
        assert!(pieces.iter().all(|p| p.len() == 4));
    }

    #[test]
    fn tiny_segment_is_one_piece() {
        assert_eq!(convex_pieces(1.0, 1.001, 0.6).len(), 1);
    }

    #[test]
    fn corners_follow_placement() {
        assert!(matches!(legend_corner(LegendPlacement::Right), Corner::RightTop));
        assert!(matches!(legend_corner(LegendPlacement::Bottom), Corner::LeftBottom));
    }
}
