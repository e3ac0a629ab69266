//! Dashboard variants: palette, legend placement and slice text per chart.

use crate::charts::format::LabelFormat;
use crate::charts::palette::{self, Palette};
use serde::Serialize;
use thiserror::Error;

pub const CHART_TITLE: &str = "Land uses converted from forestland since 1990";

/// Inner radius as a fraction of the outer radius.
pub const HOLE_RATIO: f64 = 0.6;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VariantError {
    #[error("Unknown chart variant '{0}' (expected one of: forest, earth, pastel, slate)")]
    Unknown(String),
}

/// Where the legend sits relative to the donut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPlacement {
    Right,
    Left,
    Top,
    Bottom,
}

impl LegendPlacement {
    /// Whether entries run in a single row rather than a column.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, LegendPlacement::Top | LegendPlacement::Bottom)
    }
}

/// One of the four dashboard flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartVariant {
    Forest,
    Earth,
    Pastel,
    Slate,
}

impl ChartVariant {
    pub const ALL: [ChartVariant; 4] = [
        ChartVariant::Forest,
        ChartVariant::Earth,
        ChartVariant::Pastel,
        ChartVariant::Slate,
    ];

    /// Look up a variant by name, ignoring case.
    pub fn from_name(name: &str) -> Result<Self, VariantError> {
        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| VariantError::Unknown(name.to_string()))
    }

    pub fn name(&self) -> &'static str {
        self.palette().name
    }

    pub fn palette(&self) -> Palette {
        match self {
            ChartVariant::Forest => palette::FOREST,
            ChartVariant::Earth => palette::EARTH,
            ChartVariant::Pastel => palette::PASTEL,
            ChartVariant::Slate => palette::SLATE,
        }
    }

    pub fn legend(&self) -> LegendPlacement {
        match self {
            ChartVariant::Forest => LegendPlacement::Right,
            ChartVariant::Earth => LegendPlacement::Bottom,
            ChartVariant::Pastel => LegendPlacement::Left,
            ChartVariant::Slate => LegendPlacement::Top,
        }
    }

    pub fn label_format(&self) -> LabelFormat {
        match self {
            ChartVariant::Forest => LabelFormat::Percent { decimals: 0 },
            ChartVariant::Earth => LabelFormat::Percent { decimals: 1 },
            ChartVariant::Pastel => LabelFormat::LabelAndPercent { decimals: 0 },
            ChartVariant::Slate => LabelFormat::Value,
        }
    }
}

impl Default for ChartVariant {
    fn default() -> Self {
        ChartVariant::Forest
    }
}

impl std::fmt::Display for ChartVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ChartVariant {
    type Err = VariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_case_insensitively() {
        for variant in ChartVariant::ALL {
            assert_eq!(ChartVariant::from_name(variant.name()), Ok(variant));
        }
        assert_eq!(ChartVariant::from_name("EARTH"), Ok(ChartVariant::Earth));
        assert_eq!(" pastel ".parse::<ChartVariant>(), Ok(ChartVariant::Pastel));
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert_eq!(
            ChartVariant::from_name("neon"),
            Err(VariantError::Unknown("neon".to_string()))
        );
    }

    #[test]
    fn variants_differ_in_presentation_only() {
        let legends: Vec<_> = ChartVariant::ALL.iter().map(|v| v.legend()).collect();
        assert_eq!(
            legends,
            vec![
                LegendPlacement::Right,
                LegendPlacement::Bottom,
                LegendPlacement::Left,
                LegendPlacement::Top
            ]
        );
        assert_eq!(
            ChartVariant::Forest.label_format(),
            LabelFormat::Percent { decimals: 0 }
        );
        assert_eq!(ChartVariant::default(), ChartVariant::Forest);
    }
}
