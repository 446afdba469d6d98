//! Chart Viewer Widget
//! Central scrollable panel with the three dashboard sections and the raw rows.

use crate::charts::ChartPlotter;
use crate::data::FlightDataset;
use crate::stats::DashboardSummary;
use egui::{Color32, RichText, ScrollArea};
use std::sync::Arc;

const SECTION_SPACING: f32 = 20.0;

/// Displays the aggregates for the current selection.
pub struct ChartViewer {
    dataset: Option<Arc<FlightDataset>>,
    route_limit: usize,
    pub summary: DashboardSummary,
    /// Dataset positions of the filtered rows.
    pub rows: Vec<usize>,
}

impl ChartViewer {
    pub fn new(route_limit: usize) -> Self {
        Self {
            dataset: None,
            route_limit,
            summary: DashboardSummary::default(),
            rows: Vec::new(),
        }
    }

    pub fn set_dataset(&mut self, dataset: Arc<FlightDataset>) {
        self.dataset = Some(dataset);
    }

    /// Replace the displayed results after a recompute.
    pub fn set_results(&mut self, summary: DashboardSummary, rows: Vec<usize>) {
        self.summary = summary;
        self.rows = rows;
    }

    fn section_header(ui: &mut egui::Ui, text: &str) {
        ui.add_space(SECTION_SPACING);
        ui.label(RichText::new(text).size(20.0).strong());
        ui.add_space(8.0);
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(dataset) = self.dataset.clone() else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(
                    RichText::new("✈ Airline Market Demand Dashboard")
                        .size(26.0)
                        .strong(),
                );
                ui.label(
                    RichText::new(format!(
                        "{} of {} flights match the current filters",
                        self.summary.total_flights,
                        dataset.len()
                    ))
                    .size(12.0)
                    .color(Color32::GRAY),
                );

                Self::section_header(
                    ui,
                    &format!("📌 Top {} Most Frequent Routes", self.route_limit),
                );
                ChartPlotter::draw_routes_chart(ui, &self.summary.top_routes);

                Self::section_header(ui, "🛩 Airline Market Share");
                ChartPlotter::draw_share_chart(ui, &self.summary.airline_share);

                Self::section_header(ui, "📈 Flights Over Time");
                ChartPlotter::draw_daily_chart(ui, &self.summary.daily_volume);

                ui.add_space(SECTION_SPACING);
                egui::CollapsingHeader::new("🔍 Show Raw Data")
                    .default_open(false)
                    .show(ui, |ui| {
                        ChartPlotter::draw_raw_table(ui, dataset.records(), &self.rows);
                    });
                ui.add_space(SECTION_SPACING);
            });
    }
}
