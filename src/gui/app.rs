//! Forest Dash desktop window
//! Control panel on the left, donut chart in the center.

use crate::charts::{DonutFigure, StaticChartRenderer};
use crate::data::{read_csv, DataLoader, LandUseProcessor};
use crate::gui::{ControlPanel, ControlPanelAction, DonutView};
use egui::SidePanel;
use polars::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// CSV loading result from background thread
enum LoadResult {
    Complete { df: DataFrame, path: PathBuf },
    Error(String),
}

/// Main application window.
pub struct ForestDashApp {
    loader: DataLoader,
    control_panel: ControlPanel,
    donut_view: DonutView,
    export_size: (u32, u32),

    // Background CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl ForestDashApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        initial: crate::gui::InitialState,
    ) -> Self {
        let mut app = Self {
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(),
            donut_view: DonutView::new(),
            export_size: initial.export_size,
            load_rx: None,
            is_loading: false,
        };
        app.control_panel.settings.variant = initial.variant;
        app.control_panel.settings.row = initial.row;

        if initial.csv_path.is_file() {
            app.start_loading(initial.csv_path);
        }
        app
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.control_panel.settings.row = 0;
            self.start_loading(path);
        }
    }

    fn start_loading(&mut self, path: PathBuf) {
        self.donut_view.clear();
        self.control_panel.settings.csv_path = Some(path.clone());
        self.control_panel.set_status("Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let result = match read_csv(&path) {
                Ok(df) => LoadResult::Complete { df, path },
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete { df, path }) => {
                tracing::info!(path = %path.display(), rows = df.height(), "table loaded in viewer");
                self.control_panel
                    .update_rows(LandUseProcessor::row_labels(&df));
                self.loader.set_dataframe(df, Some(path));
                self.is_loading = false;
                self.rebuild_figure();
            }
            Ok(LoadResult::Error(error)) => {
                self.control_panel.set_status(&format!("Error: {}", error));
                self.is_loading = false;
            }
            Err(_) => {
                // Still loading
                self.load_rx = Some(rx);
            }
        }
    }

    /// Rebuild the figure from the loaded table and current settings
    fn rebuild_figure(&mut self) {
        let Some(df) = self.loader.get_dataframe() else {
            return;
        };
        let settings = &self.control_panel.settings;

        match LandUseProcessor::prepare_chart_data(df, settings.row) {
            Ok(shares) => {
                let figure = DonutFigure::build(&shares, settings.variant);
                let status = format!(
                    "{} categories, {} ha total",
                    figure.slices.len(),
                    crate::charts::format::format_value(figure.total)
                );
                self.donut_view.set_figure(figure);
                self.control_panel.export_enabled = true;
                self.control_panel.set_status(&status);
            }
            Err(e) => {
                self.donut_view.clear();
                self.control_panel.export_enabled = false;
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Save the current figure, asking the user where
    fn handle_export(&mut self, extension: &str) {
        let Some(figure) = &self.donut_view.figure else {
            self.control_panel.set_status("No chart to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter(extension.to_uppercase(), &[extension])
            .set_file_name(format!("forest_land_use_{}.{}", figure.variant, extension))
            .save_file()
        else {
            return; // User cancelled
        };

        let (width, height) = self.export_size;
        match StaticChartRenderer::save(figure, &path, width, height) {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Exported {}", path.display()));
                if let Err(e) = open::that(&path) {
                    tracing::warn!("could not open exported chart: {}", e);
                }
            }
            Err(e) => {
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for ForestDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::RowChanged | ControlPanelAction::VariantChanged => {
                            self.rebuild_figure()
                        }
                        ControlPanelAction::ExportSvg => self.handle_export("svg"),
                        ControlPanelAction::ExportPng => self.handle_export("png"),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Donut
        egui::CentralPanel::default().show(ctx, |ui| {
            self.donut_view.show(ui);
        });
    }
}
