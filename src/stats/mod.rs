//! Stats module - dashboard aggregations

mod aggregator;

pub use aggregator::{
    Aggregator, AirlineShare, DailyVolume, DashboardSummary, RouteCount, TOP_ROUTES_LIMIT,
};
