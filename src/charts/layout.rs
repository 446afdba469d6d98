//! Chart layout helpers shared by the interactive and static charts.

use crate::stats::AirlineShare;
use chrono::{Datelike, NaiveDate};
use std::f64::consts::TAU;

/// Series colors as RGB triples.
pub const PALETTE: [(u8, u8, u8); 10] = [
    (52, 152, 219),  // Blue
    (231, 76, 60),   // Red
    (46, 204, 113),  // Green
    (155, 89, 182),  // Purple
    (243, 156, 18),  // Orange
    (26, 188, 156),  // Teal
    (233, 30, 99),   // Pink
    (0, 188, 212),   // Cyan
    (121, 85, 72),   // Brown
    (96, 125, 139),  // Blue Grey
];

pub fn palette_color(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

/// Dates are plotted as days since the common era.
pub fn day_number(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
}

pub fn day_label(day: i32) -> String {
    NaiveDate::from_num_days_from_ce_opt(day)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// One pie wedge, angles in radians measured clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub percent: f64,
    pub start: f64,
    pub end: f64,
}

/// Wedges for the market-share pie, in input order.
pub fn pie_slices(shares: &[AirlineShare]) -> Vec<PieSlice> {
    let total: usize = shares.iter().map(|s| s.flights).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut start = 0.0;
    shares
        .iter()
        .map(|share| {
            let fraction = share.flights as f64 / total as f64;
            let end = start + fraction * TAU;
            let slice = PieSlice {
                label: share.airline.clone(),
                percent: share.share_of(total),
                start,
                end,
            };
            start = end;
            slice
        })
        .collect()
}

/// Outline of a wedge as a fan of convex pieces, each spanning at most a
/// quarter turn. Points are `(x, y)` with y growing downwards.
pub fn wedge_polygons(
    center: (f64, f64),
    radius: f64,
    slice: &PieSlice,
) -> Vec<Vec<(f64, f64)>> {
    const MAX_SPAN: f64 = TAU / 4.0;
    const STEPS_PER_PIECE: usize = 16;

    let mut pieces = Vec::new();
    let mut from = slice.start;
    while slice.end - from > 1e-9 {
        let to = (from + MAX_SPAN).min(slice.end);
        let mut points = vec![center];
        for step in 0..=STEPS_PER_PIECE {
            let angle = from + (to - from) * step as f64 / STEPS_PER_PIECE as f64;
            points.push(point_on_circle(center, radius, angle));
        }
        pieces.push(points);
        from = to;
    }
    pieces
}

/// Point on a circle, angle clockwise from 12 o'clock, screen coordinates.
pub fn point_on_circle(center: (f64, f64), radius: f64, angle: f64) -> (f64, f64) {
    (
        center.0 + radius * angle.sin(),
        center.1 - radius * angle.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share(airline: &str, flights: usize) -> AirlineShare {
        AirlineShare {
            airline: airline.to_string(),
            flights,
        }
    }

    #[test]
    fn test_pie_slices_cover_full_circle() {
        let slices = pie_slices(&[share("AA", 2), share("BB", 1), share("CC", 1)]);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].start, 0.0);
        assert!((slices[0].end - TAU / 2.0).abs() < 1e-9);
        assert!((slices[2].end - TAU).abs() < 1e-9);
        assert!((slices[0].percent - 50.0).abs() < 1e-9);
        for pair in slices.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_pie_slices_empty() {
        assert!(pie_slices(&[]).is_empty());
    }

    #[test]
    fn test_full_wedge_split_into_quarters() {
        let slices = pie_slices(&[share("AA", 1)]);
        let pieces = wedge_polygons((0.0, 0.0), 10.0, &slices[0]);
        assert_eq!(pieces.len(), 4);
        // First arc point is straight up in screen coordinates
        let top = pieces[0][1];
        assert!(top.0.abs() < 1e-9);
        assert!((top.1 + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_day_label() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(day_label(day_number(date)), "2024-02-29");
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(palette_color(0), palette_color(PALETTE.len()));
    }
}
