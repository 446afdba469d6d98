//! Static Chart Renderer
//! Writes the dashboard charts to PNG files with plotters.
//!
//! Files:
//! - `top_routes.png`: bar chart of the most frequent routes
//! - `airline_share.png`: pie chart of flights per airline
//! - `daily_volume.png`: line chart of flights per departure date

use crate::charts::layout::{self, day_number, palette_color};
use crate::stats::{AirlineShare, DailyVolume, DashboardSummary, RouteCount};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const ROUTES_FILE: &str = "top_routes.png";
pub const SHARE_FILE: &str = "airline_share.png";
pub const DAILY_FILE: &str = "daily_volume.png";

const FONT: &str = "sans-serif";
const EMPTY_TEXT: &str = "No data for the current filters";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("chart drawing failed: {0}")]
    Draw(String),
}

fn draw_err(err: impl Display) -> RenderError {
    RenderError::Draw(err.to_string())
}

fn rgb(index: usize) -> RGBColor {
    let (r, g, b) = palette_color(index);
    RGBColor(r, g, b)
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render all three charts into `out_dir`, returning the written files.
    pub fn export_all(
        out_dir: &Path,
        summary: &DashboardSummary,
        size: (u32, u32),
    ) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(out_dir).map_err(|source| RenderError::CreateDir {
            path: out_dir.to_path_buf(),
            source,
        })?;

        let routes_path = out_dir.join(ROUTES_FILE);
        let share_path = out_dir.join(SHARE_FILE);
        let daily_path = out_dir.join(DAILY_FILE);

        Self::render_routes(&routes_path, &summary.top_routes, size)?;
        Self::render_share(&share_path, &summary.airline_share, size)?;
        Self::render_daily(&daily_path, &summary.daily_volume, size)?;

        info!(dir = %out_dir.display(), flights = summary.total_flights, "exported charts");
        Ok(vec![routes_path, share_path, daily_path])
    }

    fn draw_empty(root: &Area<'_>, title: &str) -> Result<(), RenderError> {
        let area = root.titled(title, (FONT, 28)).map_err(draw_err)?;
        let (w, h) = area.dim_in_pixel();
        area.draw(&Text::new(
            EMPTY_TEXT,
            (w as i32 / 2 - 140, h as i32 / 2),
            (FONT, 22).into_font().color(&RGBColor(128, 128, 128)),
        ))
        .map_err(draw_err)?;
        Ok(())
    }

    pub fn render_routes(
        path: &Path,
        routes: &[RouteCount],
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        const TITLE: &str = "Most Popular Flight Routes";

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        if routes.is_empty() {
            Self::draw_empty(&root, TITLE)?;
            return root.present().map_err(draw_err);
        }

        let max = routes.iter().map(|r| r.count).max().unwrap_or(1) as f64;
        let n = routes.len() as i32;

        let mut chart = ChartBuilder::on(&root)
            .caption(TITLE, (FONT, 28))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d((0..n).into_segmented(), 0f64..max * 1.1)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Route")
            .y_desc("Count")
            .x_label_formatter(&|v: &SegmentValue<i32>| match v {
                SegmentValue::CenterOf(i) => routes
                    .get(*i as usize)
                    .map(|r| r.route.clone())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(routes.iter().enumerate().map(|(i, route)| {
                let x = i as i32;
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(x), 0.0),
                        (SegmentValue::Exact(x + 1), route.count as f64),
                    ],
                    rgb(i).filled(),
                );
                bar.set_margin(0, 0, 8, 8);
                bar
            }))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)
    }

    pub fn render_share(
        path: &Path,
        shares: &[AirlineShare],
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        const TITLE: &str = "Airline Distribution";

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let slices = layout::pie_slices(shares);
        if slices.is_empty() {
            Self::draw_empty(&root, TITLE)?;
            return root.present().map_err(draw_err);
        }

        let area = root.titled(TITLE, (FONT, 28)).map_err(draw_err)?;
        let (w, h) = area.dim_in_pixel();
        let (pie_area, legend_area) = area.split_horizontally(w * 3 / 5);

        let center = (f64::from(w * 3 / 10), f64::from(h / 2));
        let radius = f64::from((w * 3 / 10).min(h / 2)) * 0.85;

        for (i, slice) in slices.iter().enumerate() {
            for piece in layout::wedge_polygons(center, radius, slice) {
                let points: Vec<(i32, i32)> = piece
                    .into_iter()
                    .map(|(x, y)| (x.round() as i32, y.round() as i32))
                    .collect();
                pie_area
                    .draw(&Polygon::new(points, rgb(i).filled()))
                    .map_err(draw_err)?;
            }
        }

        for (i, (slice, share)) in slices.iter().zip(shares).enumerate() {
            let y = 20 + i as i32 * 28;
            legend_area
                .draw(&Rectangle::new([(10, y), (28, y + 18)], rgb(i).filled()))
                .map_err(draw_err)?;
            legend_area
                .draw(&Text::new(
                    format!("{} ({}, {:.1}%)", slice.label, share.flights, slice.percent),
                    (36, y),
                    (FONT, 18).into_font(),
                ))
                .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)
    }

    pub fn render_daily(
        path: &Path,
        daily: &[DailyVolume],
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        const TITLE: &str = "Flight Trends Over Time";

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let (Some(first), Some(last)) = (daily.first(), daily.last()) else {
            Self::draw_empty(&root, TITLE)?;
            return root.present().map_err(draw_err);
        };

        let points: Vec<(i32, f64)> = daily
            .iter()
            .map(|d| (day_number(d.date), d.flights as f64))
            .collect();
        let max = daily.iter().map(|d| d.flights).max().unwrap_or(1) as f64;
        let (start, end) = (day_number(first.date), day_number(last.date));
        // A single day still needs a non-empty axis
        let x_range = if start == end {
            (start - 1)..(end + 1)
        } else {
            start..end
        };

        let mut chart = ChartBuilder::on(&root)
            .caption(TITLE, (FONT, 28))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, 0f64..max * 1.1)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_labels(8)
            .x_desc("departure_date")
            .y_desc("Total Flights")
            .x_label_formatter(&|day: &i32| layout::day_label(*day))
            .draw()
            .map_err(draw_err)?;

        let color = rgb(0);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(draw_err)?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&point| Circle::new(point, 4, color.filled())),
            )
            .map_err(draw_err)?;

        root.present().map_err(draw_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn three_flight_summary() -> DashboardSummary {
        let day = |d| chrono::NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        DashboardSummary {
            total_flights: 3,
            top_routes: vec![
                RouteCount { route: "JFK → LAX".into(), count: 2 },
                RouteCount { route: "SFO → ORD".into(), count: 1 },
            ],
            airline_share: vec![
                AirlineShare { airline: "AA".into(), flights: 2 },
                AirlineShare { airline: "BB".into(), flights: 1 },
            ],
            daily_volume: vec![
                DailyVolume { date: day(1), flights: 2 },
                DailyVolume { date: day(2), flights: 1 },
            ],
        }
    }

    fn assert_pngs_written(out_dir: &Path, files: &[PathBuf]) {
        let expected: Vec<PathBuf> = [ROUTES_FILE, SHARE_FILE, DAILY_FILE]
            .iter()
            .map(|name| out_dir.join(name))
            .collect();
        assert_eq!(files, expected.as_slice());
        for file in files {
            let size = std::fs::metadata(file).unwrap().len();
            assert!(size > 0, "{} is empty", file.display());
        }
    }

    #[test]
    fn test_export_writes_three_charts() {
        let dir = TempDir::new().unwrap();
        let out_dir = dir.path().join("charts");

        let files =
            StaticChartRenderer::export_all(&out_dir, &three_flight_summary(), (600, 400)).unwrap();
        assert_pngs_written(&out_dir, &files);
    }

    #[test]
    fn test_export_empty_summary_writes_placeholders() {
        let dir = TempDir::new().unwrap();

        let files =
            StaticChartRenderer::export_all(dir.path(), &DashboardSummary::default(), (600, 400))
                .unwrap();
        assert_pngs_written(dir.path(), &files);
    }

    #[test]
    fn test_export_into_file_path_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "x").unwrap();

        let err = StaticChartRenderer::export_all(
            &blocker.join("charts"),
            &DashboardSummary::default(),
            (400, 300),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::CreateDir { .. }));
        assert!(err.to_string().contains("not_a_dir"));
    }
}
