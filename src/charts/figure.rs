//! Donut Figure Module
//! Turns land-use shares into positioned, colored ring segments.
//!
//! Angles are radians measured counterclockwise from 12 o'clock, so the
//! first (largest) slice starts at the top of the ring and runs down the left.

use crate::charts::format::{self, LabelFormat};
use crate::charts::palette::Rgb;
use crate::charts::variant::{ChartVariant, LegendPlacement, CHART_TITLE, HOLE_RATIO};
use crate::data::LandUseShares;
use serde::Serialize;
use std::cmp::Ordering;
use std::f64::consts::TAU;

/// One ring segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub fraction: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: Rgb,
    pub text: String,
    pub hover: String,
}

impl Slice {
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// Everything needed to draw one variant of the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutFigure {
    pub variant: String,
    pub title: String,
    pub hole: f64,
    pub legend: LegendPlacement,
    pub label_format: LabelFormat,
    pub total: f64,
    pub slices: Vec<Slice>,
}

impl DonutFigure {
    /// Build the figure for `variant`. Slices are ordered largest first.
    pub fn build(shares: &LandUseShares, variant: ChartVariant) -> Self {
        let colors = variant.palette().colors_for(&shares.labels);
        let label_format = variant.label_format();
        let total = shares.total();

        let mut entries: Vec<(&String, f64, Rgb)> = shares
            .labels
            .iter()
            .zip(shares.values.iter().copied())
            .zip(colors)
            .map(|((label, value), color)| (label, value, color))
            .collect();
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let mut angle = 0.0;
        let slices = entries
            .into_iter()
            .map(|(label, value, color)| {
                let fraction = if total > 0.0 { value / total } else { 0.0 };
                let start_angle = angle;
                angle += fraction * TAU;

                Slice {
                    label: label.clone(),
                    value,
                    fraction,
                    start_angle,
                    end_angle: angle,
                    color,
                    text: label_format.render(label, value, fraction),
                    hover: format::hover_text(label, value, fraction),
                }
            })
            .collect();

        Self {
            variant: variant.name().to_string(),
            title: CHART_TITLE.to_string(),
            hole: HOLE_RATIO,
            legend: variant.legend(),
            label_format,
            total,
            slices,
        }
    }

    /// Find the slice under a point given relative to the center, in units
    /// of the outer radius with y pointing up. Points in the hole or outside
    /// the ring hit nothing.
    pub fn slice_at(&self, x: f64, y: f64) -> Option<&Slice> {
        let r = x.hypot(y);
        if r < self.hole || r > 1.0 {
            return None;
        }

        let angle = (-x).atan2(y).rem_euclid(TAU);
        self.slices
            .iter()
            .find(|s| s.sweep() > 0.0 && angle >= s.start_angle && angle < s.end_angle)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Point on a circle of radius `r` at `angle`, in y-up coordinates.
pub fn polar_to_xy(angle: f64, r: f64) -> (f64, f64) {
    (-r * angle.sin(), r * angle.cos())
}

/// Sample points along a ring segment's outline: outer arc counterclockwise, then
/// inner arc back. `steps` is per full turn.
pub fn ring_segment(start: f64, end: f64, inner: f64, outer: f64, steps: usize) -> Vec<(f64, f64)> {
    let n = ((((end - start) / TAU) * steps as f64).ceil() as usize).max(1);
    let step = (end - start) / n as f64;

    let outer_arc = (0..=n).map(|i| polar_to_xy(start + step * i as f64, outer));
    let inner_arc = (0..=n).rev().map(|i| polar_to_xy(start + step * i as f64, inner));
    outer_arc.chain(inner_arc).collect()
}
