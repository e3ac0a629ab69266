//! GUI module - desktop viewer

mod app;
mod control_panel;
mod donut_view;

pub use app::ForestDashApp;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use donut_view::DonutView;

use crate::charts::ChartVariant;
use eframe::egui;
use std::path::PathBuf;

/// Settings the window starts with, taken from config and CLI flags.
pub struct InitialState {
    pub csv_path: PathBuf,
    pub row: usize,
    pub variant: ChartVariant,
    pub export_size: (u32, u32),
}

/// Open the viewer window and block until it closes.
pub fn run(initial: InitialState) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Forest Land Use"),
        ..Default::default()
    };

    eframe::run_native(
        "Forest Land Use",
        options,
        Box::new(|cc| Ok(Box::new(ForestDashApp::new(cc, initial)))),
    )
}
