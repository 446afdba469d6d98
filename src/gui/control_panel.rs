//! Control Panel Widget
//! Left sidebar with the data source and the three filter multi-selects.

use crate::data::{FilterSelection, FlightDataset};
use egui::{Color32, RichText, ScrollArea};
use std::collections::HashSet;
use std::path::PathBuf;

/// A multi-select list of observed values. Everything starts selected.
#[derive(Debug, Clone, Default)]
pub struct FilterList {
    pub options: Vec<String>,
    pub selected: Vec<bool>,
}

impl FilterList {
    pub fn set_options(&mut self, options: Vec<String>) {
        self.selected = vec![true; options.len()];
        self.options = options;
    }

    pub fn selected_values(&self) -> HashSet<String> {
        self.options
            .iter()
            .zip(self.selected.iter())
            .filter(|(_, &selected)| selected)
            .map(|(value, _)| value.clone())
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|&&s| s).count()
    }

    pub fn set_all(&mut self, value: bool) {
        self.selected.iter_mut().for_each(|v| *v = value);
    }

    /// Draw the list; returns true when the selection changed.
    fn show(&mut self, ui: &mut egui::Ui, id: &str) -> bool {
        let mut changed = false;

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt(id)
                    .max_height(140.0)
                    .show(ui, |ui| {
                        for (option, selected) in self.options.iter().zip(self.selected.iter_mut())
                        {
                            let label = if option.is_empty() { "(blank)" } else { option.as_str() };
                            changed |= ui.checkbox(selected, label).changed();
                        }
                    });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                self.set_all(true);
                changed = true;
            }
            if ui.small_button("Clear All").clicked() {
                self.set_all(false);
                changed = true;
            }
            ui.label(
                RichText::new(format!("{}/{}", self.selected_count(), self.options.len()))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });

        changed
    }
}

/// Left side panel with data source info and filter controls.
pub struct ControlPanel {
    pub data_path: Option<PathBuf>,
    pub airlines: FilterList,
    pub departures: FilterList,
    pub arrivals: FilterList,
    pub loaded_rows: usize,
    pub dropped_rows: usize,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            data_path: None,
            airlines: FilterList::default(),
            departures: FilterList::default(),
            arrivals: FilterList::default(),
            loaded_rows: 0,
            dropped_rows: 0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the filter lists from a freshly loaded dataset.
    pub fn update_options(&mut self, dataset: &FlightDataset) {
        self.airlines.set_options(dataset.airlines());
        self.departures.set_options(dataset.departure_codes());
        self.arrivals.set_options(dataset.arrival_codes());
        self.loaded_rows = dataset.len();
        self.dropped_rows = dataset.dropped_rows();
        self.export_enabled = true;
    }

    /// Current widget state as a filter selection.
    pub fn selection(&self) -> FilterSelection {
        FilterSelection {
            airlines: self.airlines.selected_values(),
            departures: self.departures.selected_values(),
            arrivals: self.arrivals.selected_values(),
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("✈ Filters")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let path_text = self
                    .data_path
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "No file".to_string());
                ui.label(RichText::new(&path_text).size(12.0));
                ui.label(
                    RichText::new(format!(
                        "{} flights loaded, {} rows skipped",
                        self.loaded_rows, self.dropped_rows
                    ))
                    .size(11.0)
                    .color(Color32::GRAY),
                );
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Sections =====
        let sections = [
            ("Select Airline(s)", "airlines", &mut self.airlines),
            ("Select Departure Airport(s)", "departures", &mut self.departures),
            ("Select Arrival Airport(s)", "arrivals", &mut self.arrivals),
        ];
        for (title, id, list) in sections {
            ui.label(RichText::new(title).size(14.0).strong());
            ui.add_space(5.0);
            if list.show(ui, id) {
                action = ControlPanelAction::SelectionChanged;
            }
            ui.add_space(12.0);
        }

        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
    ExportCharts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FlightRecord;

    fn dataset() -> FlightDataset {
        let time = crate::data::parse_timestamp("2024-01-01 08:00").unwrap();
        let record = |airline: &str, dep: &str, arr: &str| FlightRecord {
            airline: airline.into(),
            departure_airport: format!("{dep} Airport"),
            arrival_airport: format!("{arr} Airport"),
            departure_iata: dep.into(),
            arrival_iata: arr.into(),
            departure_time: time,
            arrival_time: time,
        };
        FlightDataset::new(vec![
            record("AA", "JFK", "LAX"),
            record("BB", "SFO", "ORD"),
        ])
    }

    #[test]
    fn test_options_default_to_all_selected() {
        let dataset = dataset();
        let mut panel = ControlPanel::new();
        panel.update_options(&dataset);

        assert_eq!(panel.airlines.options, vec!["AA", "BB"]);
        assert_eq!(panel.selection(), FilterSelection::all(&dataset));
        assert_eq!(panel.loaded_rows, 2);
        assert!(panel.export_enabled);
    }

    #[test]
    fn test_unchecking_narrows_selection() {
        let dataset = dataset();
        let mut panel = ControlPanel::new();
        panel.update_options(&dataset);
        panel.airlines.selected[0] = false;

        let selection = panel.selection();
        assert_eq!(selection.airlines.len(), 1);
        assert!(selection.airlines.contains("BB"));
        assert_eq!(selection.apply(dataset.records()).len(), 1);
    }

    #[test]
    fn test_clear_all_selects_nothing() {
        let dataset = dataset();
        let mut panel = ControlPanel::new();
        panel.update_options(&dataset);
        panel.departures.set_all(false);

        assert_eq!(panel.departures.selected_count(), 0);
        assert!(panel.selection().apply(dataset.records()).is_empty());
    }
}
