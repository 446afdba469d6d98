//! Dashboard Main Application
//! Filter sidebar on the left, charts and raw data on the right.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::{DataLoader, FlightDataset};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::stats::Aggregator;
use egui::SidePanel;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info};

/// Dataset loading result from background thread
enum LoadResult {
    Complete(Arc<FlightDataset>),
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    loader: Arc<DataLoader>,
    config: DashboardConfig,
    dataset: Option<Arc<FlightDataset>>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        loader: Arc<DataLoader>,
        config: DashboardConfig,
    ) -> Self {
        let mut app = Self::with_loader(loader, config);
        app.start_loading();
        app
    }

    fn with_loader(loader: Arc<DataLoader>, config: DashboardConfig) -> Self {
        let mut control_panel = ControlPanel::new();
        control_panel.data_path = Some(loader.file_path().to_path_buf());

        Self {
            chart_viewer: ChartViewer::new(config.top_routes),
            loader,
            config,
            dataset: None,
            control_panel,
            load_rx: None,
            is_loading: false,
        }
    }

    /// Load the dataset on a background thread.
    fn start_loading(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(dataset) = self.loader.cached() {
            self.apply_load_result(LoadResult::Complete(dataset));
            return;
        }

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        self.control_panel.set_status("Loading flight data...");

        let loader = Arc::clone(&self.loader);
        thread::spawn(move || {
            let result = match loader.load() {
                Ok(dataset) => LoadResult::Complete(dataset),
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(result) => self.apply_load_result(result),
            // Still loading
            Err(std::sync::mpsc::TryRecvError::Empty) => self.load_rx = Some(rx),
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.apply_load_result(LoadResult::Error("loader thread exited".to_string()))
            }
        }
    }

    fn apply_load_result(&mut self, result: LoadResult) {
        self.is_loading = false;
        match result {
            LoadResult::Complete(dataset) => {
                self.control_panel.update_options(&dataset);
                self.control_panel
                    .set_status(format!("Loaded {} flights", dataset.len()));
                self.chart_viewer.set_dataset(Arc::clone(&dataset));
                self.dataset = Some(dataset);
                self.recompute();
            }
            LoadResult::Error(message) => {
                error!(%message, "failed to load flight data");
                self.control_panel.set_status(format!("Error: {message}"));
            }
        }
    }

    /// Filter and aggregate from scratch for the current selection.
    fn recompute(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };

        let selection = self.control_panel.selection();
        let view = selection.apply(dataset.records());
        if view.is_empty() {
            debug!("no flights match the current filters");
        }
        let summary = Aggregator::summarize(&view, self.config.top_routes);
        debug!(
            matched = view.len(),
            routes = summary.top_routes.len(),
            airlines = summary.airline_share.len(),
            days = summary.daily_volume.len(),
            "recomputed dashboard"
        );

        self.chart_viewer.set_results(summary, view.into_indices());
    }

    /// Ask for a folder and write the chart PNGs there.
    fn handle_export_charts(&mut self) {
        let Some(out_dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        let size = (self.config.export_width, self.config.export_height);
        match StaticChartRenderer::export_all(&out_dir, &self.chart_viewer.summary, size) {
            Ok(files) => {
                info!(count = files.len(), dir = %out_dir.display(), "charts exported");
                self.control_panel
                    .set_status(format!("Exported {} charts to {}", files.len(), out_dir.display()));
            }
            Err(e) => {
                error!(error = %e, "chart export failed");
                self.control_panel.set_status(format!("Error: {e}"));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::SelectionChanged => self.recompute(),
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CSV: &str = "airline,departure_airport,arrival_airport,departure_iata,arrival_iata,departure_time,arrival_time\n\
        AA,John F Kennedy,Los Angeles,JFK,LAX,2024-01-01 08:00:00,2024-01-01 11:00:00\n\
        AA,John F Kennedy,Los Angeles,JFK,LAX,2024-01-02 08:00:00,2024-01-02 11:00:00\n\
        BB,San Francisco,Chicago O'Hare,SFO,ORD,2024-01-01 09:00:00,2024-01-01 15:00:00\n\
        CC,,Miami,BOS,MIA,2024-01-03 09:00:00,2024-01-03 12:00:00\n";

    fn loaded_app(dir: &TempDir) -> DashboardApp {
        let path = dir.path().join("flights.csv");
        fs::write(&path, CSV).unwrap();

        let loader = Arc::new(DataLoader::new(path));
        let dataset = loader.load().unwrap();
        let mut app = DashboardApp::with_loader(loader, DashboardConfig::default());
        app.apply_load_result(LoadResult::Complete(dataset));
        app
    }

    #[test]
    fn test_load_populates_filters_and_charts() {
        let dir = TempDir::new().unwrap();
        let app = loaded_app(&dir);

        assert_eq!(app.control_panel.loaded_rows, 3);
        assert_eq!(app.control_panel.dropped_rows, 1);
        assert_eq!(app.chart_viewer.summary.total_flights, 3);
        assert_eq!(app.chart_viewer.rows, vec![0, 1, 2]);
        assert_eq!(app.chart_viewer.summary.top_routes[0].route, "JFK → LAX");
        // The skipped row never reaches any aggregate
        assert!(app
            .chart_viewer
            .summary
            .airline_share
            .iter()
            .all(|a| a.airline != "CC"));
    }

    #[test]
    fn test_selection_change_recomputes() {
        let dir = TempDir::new().unwrap();
        let mut app = loaded_app(&dir);

        let aa = app
            .control_panel
            .airlines
            .options
            .iter()
            .position(|a| a == "AA")
            .unwrap();
        app.control_panel.airlines.selected[aa] = false;
        app.recompute();

        let summary = &app.chart_viewer.summary;
        assert_eq!(summary.total_flights, 1);
        assert_eq!(summary.top_routes[0].route, "SFO → ORD");
        assert_eq!(app.chart_viewer.rows, vec![2]);

        app.control_panel.arrivals.set_all(false);
        app.recompute();
        assert!(app.chart_viewer.summary.is_empty());
        assert!(app.chart_viewer.summary.daily_volume.is_empty());
    }

    #[test]
    fn test_cached_dataset_applied_without_thread() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("flights.csv");
        fs::write(&path, CSV).unwrap();
        let loader = Arc::new(DataLoader::new(path));
        loader.load().unwrap();

        let mut app = DashboardApp::with_loader(loader, DashboardConfig::default());
        app.start_loading();

        assert!(!app.is_loading);
        assert!(app.load_rx.is_none());
        assert_eq!(app.chart_viewer.summary.total_flights, 3);
    }

    #[test]
    fn test_load_error_shown_in_status() {
        let dir = TempDir::new().unwrap();
        let loader = Arc::new(DataLoader::new(dir.path().join("missing.csv")));
        let mut app = DashboardApp::with_loader(loader, DashboardConfig::default());

        app.start_loading();
        // Wait for the background thread to report back
        let result = app.load_rx.take().unwrap().recv().unwrap();
        app.apply_load_result(result);

        assert!(!app.is_loading);
        assert!(app.control_panel.status.starts_with("Error:"));
        assert!(app.dataset.is_none());
    }
}
