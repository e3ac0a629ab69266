//! Control Panel Widget
//! Left side panel with data source, variant and export controls.

use crate::charts::ChartVariant;
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// User settings for the chart
#[derive(Default, Clone)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    pub variant: ChartVariant,
    pub row: usize,
}

/// Left side control panel with file selection and chart options.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub row_labels: Vec<String>,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            row_labels: Vec::new(),
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the selectable rows after a CSV load
    pub fn update_rows(&mut self, row_labels: Vec<String>) {
        if self.settings.row >= row_labels.len() {
            self.settings.row = 0;
        }
        self.row_labels = row_labels;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌲 Forest Land Use")
                    .size(22.0)
                    .color(Color32::from_rgb(26, 168, 129)),
            );
            ui.label(
                RichText::new("Conversions since 1990")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(10.0);

        // Row selection
        ui.horizontal(|ui| {
            ui.add_sized([60.0, 20.0], egui::Label::new("Row:"));
            let selected = self
                .row_labels
                .get(self.settings.row)
                .cloned()
                .unwrap_or_default();
            ComboBox::from_id_salt("row")
                .width(200.0)
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for (i, label) in self.row_labels.iter().enumerate() {
                        if ui
                            .selectable_label(self.settings.row == i, label)
                            .clicked()
                            && self.settings.row != i
                        {
                            self.settings.row = i;
                            action = ControlPanelAction::RowChanged;
                        }
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Variant Section =====
        ui.label(RichText::new("🎨 Chart Variant").size(14.0).strong());
        ui.add_space(5.0);

        for variant in ChartVariant::ALL {
            let text = format!("{} (legend {:?})", variant.name(), variant.legend()).to_lowercase();
            if ui
                .radio_value(&mut self.settings.variant, variant, text)
                .changed()
            {
                action = ControlPanelAction::VariantChanged;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let svg_button = egui::Button::new(RichText::new("💾 Export SVG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(svg_button).clicked() {
                    action = ControlPanelAction::ExportSvg;
                }

                ui.add_space(8.0);

                let png_button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(png_button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    RowChanged,
    VariantChanged,
    ExportSvg,
    ExportPng,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_resets_when_table_shrinks() {
        let mut panel = ControlPanel::new();
        panel.settings.row = 3;
        panel.update_rows(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(panel.settings.row, 0);

        panel.settings.row = 1;
        panel.update_rows(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(panel.settings.row, 1);
    }
}
