//! Aggregation Module
//! Frequency counts behind the dashboard charts: top routes, airline share
//! and daily flight volume.

use crate::data::{FilteredView, FlightRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Number of routes shown in the top-routes chart.
pub const TOP_ROUTES_LIMIT: usize = 10;

/// Separator between departure and arrival codes in a route key.
pub const ROUTE_SEPARATOR: &str = " → ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteCount {
    pub route: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AirlineShare {
    pub airline: String,
    pub flights: usize,
}

impl AirlineShare {
    /// Percentage of `total` flights operated by this airline.
    pub fn share_of(&self, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.flights as f64 * 100.0 / total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyVolume {
    pub date: NaiveDate,
    pub flights: usize,
}

/// All aggregate outputs for one filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_flights: usize,
    pub top_routes: Vec<RouteCount>,
    pub airline_share: Vec<AirlineShare>,
    pub daily_volume: Vec<DailyVolume>,
}

impl DashboardSummary {
    pub fn is_empty(&self) -> bool {
        self.total_flights == 0
    }
}

/// Route key for a record, e.g. "JFK → LAX".
pub fn route_key(record: &FlightRecord) -> String {
    format!(
        "{}{}{}",
        record.departure_iata, ROUTE_SEPARATOR, record.arrival_iata
    )
}

/// Single-pass group-and-count aggregations over a filtered view.
pub struct Aggregator;

impl Aggregator {
    /// Count keys, keeping first-encountered order, then sort by count
    /// descending. The sort is stable so ties stay in encounter order.
    fn count_descending<K: Eq + Hash + Clone>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
        let mut positions: HashMap<K, usize> = HashMap::new();
        let mut counts: Vec<(K, usize)> = Vec::new();

        for key in keys {
            match positions.get(&key) {
                Some(&pos) => counts[pos].1 += 1,
                None => {
                    positions.insert(key.clone(), counts.len());
                    counts.push((key, 1));
                }
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// Most frequent routes, at most `limit` entries.
    pub fn top_routes(view: &FilteredView<'_>, limit: usize) -> Vec<RouteCount> {
        let mut counts = Self::count_descending(view.iter().map(route_key));
        counts.truncate(limit);
        counts
            .into_iter()
            .map(|(route, count)| RouteCount { route, count })
            .collect()
    }

    /// Flights per airline, every airline in the view included.
    pub fn airline_share(view: &FilteredView<'_>) -> Vec<AirlineShare> {
        Self::count_descending(view.iter().map(|r| r.airline.as_str()))
            .into_iter()
            .map(|(airline, flights)| AirlineShare {
                airline: airline.to_string(),
                flights,
            })
            .collect()
    }

    /// Flights per departure date in chronological order. Dates without
    /// flights are absent.
    pub fn daily_volume(view: &FilteredView<'_>) -> Vec<DailyVolume> {
        let mut by_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for record in view.iter() {
            *by_day.entry(record.departure_date()).or_default() += 1;
        }

        by_day
            .into_iter()
            .map(|(date, flights)| DailyVolume { date, flights })
            .collect()
    }

    /// Compute every dashboard aggregate for the view.
    pub fn summarize(view: &FilteredView<'_>, route_limit: usize) -> DashboardSummary {
        // The three counts are independent of each other
        let (top_routes, (airline_share, daily_volume)) = rayon::join(
            || Self::top_routes(view, route_limit),
            || rayon::join(|| Self::airline_share(view), || Self::daily_volume(view)),
        );

        DashboardSummary {
            total_flights: view.len(),
            top_routes,
            airline_share,
            daily_volume,
        }
    }
}
