//! Charts module - donut figure construction and rendering

pub mod figure;
pub mod format;
pub mod palette;
mod renderer;
pub mod variant;

pub use figure::DonutFigure;
pub use palette::Rgb;
pub use renderer::StaticChartRenderer;
pub use variant::{ChartVariant, LegendPlacement};
