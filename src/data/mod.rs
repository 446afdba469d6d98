//! Data module - flight CSV loading and filtering

mod filter;
mod loader;

pub use filter::{FilterSelection, FilteredView};
pub use loader::{DataLoader, FlightDataset, FlightRecord, LoaderError};

#[cfg(test)]
pub use loader::parse_timestamp;
