//! Airline Market Demand Dashboard
//!
//! Loads flight records from CSV and shows the busiest routes, the airline
//! market share and the daily flight volume for a user-chosen filter.

mod charts;
mod cli;
mod config;
mod data;
mod gui;
mod logging;
mod stats;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command, FilterArgs};
use config::DashboardConfig;
use data::{DataLoader, LoaderError};
use eframe::egui;
use gui::DashboardApp;
use stats::{Aggregator, DashboardSummary};
use std::sync::Arc;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbosity());

    let mut config = DashboardConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(data) = cli.data.clone() {
        config.data_path = data;
    }

    let loader = Arc::new(DataLoader::new(config.data_path.clone()));

    match cli.command {
        None => run_dashboard(loader, config),
        Some(Command::Summary { filters, json }) => {
            let summary = summarize(&loader, &filters, config.top_routes)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", format_summary(&summary));
            }
            Ok(())
        }
        Some(Command::Export { out, filters }) => {
            let summary = summarize(&loader, &filters, config.top_routes)?;
            let files = charts::StaticChartRenderer::export_all(
                &out,
                &summary,
                (config.export_width, config.export_height),
            )
            .context("failed to export charts")?;
            for file in files {
                println!("{}", file.display());
            }
            Ok(())
        }
    }
}

fn run_dashboard(loader: Arc<DataLoader>, config: DashboardConfig) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Airline Market Demand Dashboard"),
        ..Default::default()
    };

    info!(data = %config.data_path.display(), "starting dashboard");
    eframe::run_native(
        "Airline Market Demand Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, loader, config)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard window failed: {e}"))
}

fn summarize(
    loader: &DataLoader,
    filters: &FilterArgs,
    route_limit: usize,
) -> anyhow::Result<DashboardSummary> {
    let dataset = loader.load().map_err(|err| load_failure(loader, err))?;
    let selection = filters.to_selection(&dataset);
    let view = selection.apply(dataset.records());
    Ok(Aggregator::summarize(&view, route_limit))
}

fn load_failure(loader: &DataLoader, err: LoaderError) -> anyhow::Error {
    let path = loader.file_path().display();
    if err.is_parse_error() {
        anyhow::Error::new(err).context(format!("malformed timestamps in {path}"))
    } else {
        anyhow::Error::new(err).context(format!("failed to load {path}"))
    }
}

fn format_summary(summary: &DashboardSummary) -> String {
    let mut out = format!("Flights matching filters: {}\n", summary.total_flights);
    if summary.is_empty() {
        out.push_str("No flights match the current filters.\n");
        return out;
    }

    out.push_str("\nTop routes\n");
    for route in &summary.top_routes {
        out.push_str(&format!("  {:<24} {:>8}\n", route.route, route.count));
    }

    out.push_str("\nAirline share\n");
    for share in &summary.airline_share {
        out.push_str(&format!(
            "  {:<24} {:>8} {:>6.1}%\n",
            share.airline,
            share.flights,
            share.share_of(summary.total_flights)
        ));
    }

    out.push_str("\nDaily volume\n");
    for day in &summary.daily_volume {
        out.push_str(&format!("  {:<24} {:>8}\n", day.date.format("%Y-%m-%d"), day.flights));
    }
    out
}
