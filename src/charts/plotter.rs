//! Chart Plotter Module
//! Interactive dashboard charts drawn with egui_plot and the egui painter.

use crate::charts::layout::{self, day_number, palette_color};
use crate::data::FlightRecord;
use crate::stats::{AirlineShare, DailyVolume, RouteCount};
use egui::{Color32, RichText, Stroke};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};

const CHART_HEIGHT: f32 = 300.0;
const PIE_SIZE: f32 = 260.0;
const RAW_ROW_HEIGHT: f32 = 18.0;

/// Raw-data columns: header and width in points.
const RAW_COLUMNS: [(&str, f32); 7] = [
    ("airline", 140.0),
    ("departure_airport", 200.0),
    ("arrival_airport", 200.0),
    ("departure_iata", 95.0),
    ("arrival_iata", 85.0),
    ("departure_time", 140.0),
    ("arrival_time", 140.0),
];

pub fn to_color32((r, g, b): (u8, u8, u8)) -> Color32 {
    Color32::from_rgb(r, g, b)
}

/// Label for an axis mark that falls on an integer category index.
fn category_label(labels: &[String], value: f64) -> String {
    if value < 0.0 || (value - value.round()).abs() > 1e-6 {
        return String::new();
    }
    labels.get(value.round() as usize).cloned().unwrap_or_default()
}

fn day_label(value: f64) -> String {
    if (value - value.round()).abs() > 1e-6 {
        return String::new();
    }
    layout::day_label(value.round() as i32)
}

/// Draws the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Shown in place of a chart that has nothing to plot.
    pub fn draw_placeholder(ui: &mut egui::Ui, text: &str) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_min_height(80.0);
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new(text).size(14.0).color(Color32::GRAY));
                });
            });
    }

    /// Bar chart of the most frequent routes.
    pub fn draw_routes_chart(ui: &mut egui::Ui, routes: &[RouteCount]) {
        if routes.is_empty() {
            Self::draw_placeholder(ui, "No routes match the current filters");
            return;
        }

        let labels: Vec<String> = routes.iter().map(|r| r.route.clone()).collect();

        Plot::new("top_routes")
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label("Route")
            .y_axis_label("Count")
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = routes
                    .iter()
                    .enumerate()
                    .map(|(i, route)| {
                        Bar::new(i as f64, route.count as f64)
                            .width(0.6)
                            .fill(to_color32(palette_color(i)))
                            .name(&route.route)
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name("Flights"));
            });
    }

    /// Pie chart of flights per airline with a percentage legend.
    pub fn draw_share_chart(ui: &mut egui::Ui, shares: &[AirlineShare]) {
        let slices = layout::pie_slices(shares);
        if slices.is_empty() {
            Self::draw_placeholder(ui, "No airlines match the current filters");
            return;
        }

        ui.horizontal(|ui| {
            let (response, painter) =
                ui.allocate_painter(egui::vec2(PIE_SIZE, PIE_SIZE), egui::Sense::hover());
            let rect = response.rect;
            let center = (rect.center().x as f64, rect.center().y as f64);
            let radius = (PIE_SIZE / 2.0 - 6.0) as f64;

            for (i, slice) in slices.iter().enumerate() {
                let fill = to_color32(palette_color(i));
                for piece in layout::wedge_polygons(center, radius, slice) {
                    let points = piece
                        .into_iter()
                        .map(|(x, y)| egui::pos2(x as f32, y as f32))
                        .collect();
                    painter.add(egui::Shape::convex_polygon(points, fill, Stroke::NONE));
                }
            }

            ui.add_space(20.0);

            ui.vertical(|ui| {
                egui::Grid::new("airline_share_legend")
                    .striped(true)
                    .spacing([10.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("").size(11.0));
                        ui.label(RichText::new("Airline").strong().size(11.0));
                        ui.label(RichText::new("Flights").strong().size(11.0));
                        ui.label(RichText::new("Share").strong().size(11.0));
                        ui.end_row();

                        for (i, (slice, share)) in slices.iter().zip(shares).enumerate() {
                            let (swatch, _) = ui.allocate_exact_size(
                                egui::vec2(12.0, 12.0),
                                egui::Sense::hover(),
                            );
                            ui.painter()
                                .rect_filled(swatch, 2.0, to_color32(palette_color(i)));
                            ui.label(RichText::new(&slice.label).size(11.0));
                            ui.label(RichText::new(share.flights.to_string()).size(11.0));
                            ui.label(RichText::new(format!("{:.1}%", slice.percent)).size(11.0));
                            ui.end_row();
                        }
                    });
            });
        });
    }

    /// Line chart of flights per departure date.
    pub fn draw_daily_chart(ui: &mut egui::Ui, daily: &[DailyVolume]) {
        if daily.is_empty() {
            Self::draw_placeholder(ui, "No flights in the selected period");
            return;
        }

        let points: Vec<[f64; 2]> = daily
            .iter()
            .map(|d| [day_number(d.date) as f64, d.flights as f64])
            .collect();

        Plot::new("daily_volume")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Departure date")
            .y_axis_label("Total Flights")
            .include_y(0.0)
            .x_axis_formatter(|mark, _range| day_label(mark.value))
            .label_formatter(|_name, value| {
                format!("{}\n{} flights", day_label(value.x.round()), value.y)
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(to_color32(palette_color(0)))
                        .width(2.0)
                        .name("Total Flights"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(3.0)
                        .color(to_color32(palette_color(0))),
                );
            });
    }

    /// Filtered rows, only the visible part is laid out.
    pub fn draw_raw_table(ui: &mut egui::Ui, records: &[FlightRecord], rows: &[usize]) {
        if rows.is_empty() {
            Self::draw_placeholder(ui, "No rows");
            return;
        }

        egui::ScrollArea::horizontal().show(ui, |ui| {
            ui.horizontal(|ui| {
                for (name, width) in RAW_COLUMNS {
                    ui.add_sized(
                        [width, RAW_ROW_HEIGHT],
                        egui::Label::new(RichText::new(name).strong().size(11.0)),
                    );
                }
            });
            ui.separator();

            egui::ScrollArea::vertical()
                .max_height(320.0)
                .auto_shrink([false, true])
                .show_rows(ui, RAW_ROW_HEIGHT, rows.len(), |ui, range| {
                    for &row in &rows[range] {
                        let record = &records[row];
                        let departure = record.departure_time.to_string();
                        let arrival = record.arrival_time.to_string();
                        let cells = [
                            record.airline.as_str(),
                            record.departure_airport.as_str(),
                            record.arrival_airport.as_str(),
                            record.departure_iata.as_str(),
                            record.arrival_iata.as_str(),
                            departure.as_str(),
                            arrival.as_str(),
                        ];
                        ui.horizontal(|ui| {
                            for (cell, (_, width)) in cells.iter().zip(RAW_COLUMNS) {
                                ui.add_sized(
                                    [width, RAW_ROW_HEIGHT],
                                    egui::Label::new(RichText::new(*cell).size(11.0)).truncate(),
                                );
                            }
                        });
                    }
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label_only_on_integer_marks() {
        let labels = vec!["JFK → LAX".to_string(), "SFO → ORD".to_string()];
        assert_eq!(category_label(&labels, 0.0), "JFK → LAX");
        assert_eq!(category_label(&labels, 1.0), "SFO → ORD");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 2.0), "");
    }

    #[test]
    fn test_day_label_only_on_whole_days() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(day_label(day_number(date) as f64), "2024-01-02");
        assert_eq!(day_label(738_000.5), "");
    }
}
