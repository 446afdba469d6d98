//! Filter Engine Module
//! Conjunctive set-membership filtering over airline, departure and arrival codes.

use crate::data::{FlightDataset, FlightRecord};
use std::collections::HashSet;

/// Allowed values for each filterable field.
///
/// An empty set matches nothing; there is no implicit "select all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub airlines: HashSet<String>,
    pub departures: HashSet<String>,
    pub arrivals: HashSet<String>,
}

impl FilterSelection {
    /// Selection containing every value observed in the dataset.
    pub fn all(dataset: &FlightDataset) -> Self {
        Self {
            airlines: dataset.airlines().into_iter().collect(),
            departures: dataset.departure_codes().into_iter().collect(),
            arrivals: dataset.arrival_codes().into_iter().collect(),
        }
    }

    /// Selection that matches no record.
    #[cfg(test)]
    pub fn none() -> Self {
        Self::default()
    }

    pub fn matches(&self, record: &FlightRecord) -> bool {
        self.airlines.contains(&record.airline)
            && self.departures.contains(&record.departure_iata)
            && self.arrivals.contains(&record.arrival_iata)
    }

    /// Componentwise subset check.
    #[cfg(test)]
    pub fn is_subset_of(&self, other: &FilterSelection) -> bool {
        self.airlines.is_subset(&other.airlines)
            && self.departures.is_subset(&other.departures)
            && self.arrivals.is_subset(&other.arrivals)
    }

    /// Apply this selection to a record slice.
    pub fn apply<'a>(&self, records: &'a [FlightRecord]) -> FilteredView<'a> {
        let indices = records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.matches(record))
            .map(|(i, _)| i)
            .collect();

        FilteredView {
            source: records,
            indices,
        }
    }
}

/// Records that satisfy a selection, in their original order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    source: &'a [FlightRecord],
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Positions of the surviving records in the source slice.
    #[cfg(test)]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a FlightRecord> + '_ {
        let source = self.source;
        self.indices.iter().map(move |&i| &source[i])
    }
}
