//! Flight CSV Loader Module
//! Reads the flight-records file with Polars and converts it into typed rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::OnceCell;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const COL_AIRLINE: &str = "airline";
pub const COL_DEPARTURE_AIRPORT: &str = "departure_airport";
pub const COL_ARRIVAL_AIRPORT: &str = "arrival_airport";
pub const COL_DEPARTURE_IATA: &str = "departure_iata";
pub const COL_ARRIVAL_IATA: &str = "arrival_iata";
pub const COL_DEPARTURE_TIME: &str = "departure_time";
pub const COL_ARRIVAL_TIME: &str = "arrival_time";

/// Columns that must be present in the input file.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_AIRLINE,
    COL_DEPARTURE_AIRPORT,
    COL_ARRIVAL_AIRPORT,
    COL_DEPARTURE_IATA,
    COL_ARRIVAL_IATA,
    COL_DEPARTURE_TIME,
    COL_ARRIVAL_TIME,
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Unparsable timestamp in column '{column}' at row {row}: '{value}'")]
    Timestamp {
        column: &'static str,
        row: usize,
        value: String,
    },
}

impl LoaderError {
    /// True for timestamp failures; everything else is a load failure.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, LoaderError::Timestamp { .. })
    }
}

/// One row of the flight dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightRecord {
    pub airline: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_iata: String,
    pub arrival_iata: String,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
}

impl FlightRecord {
    /// Calendar date of departure, time of day discarded.
    pub fn departure_date(&self) -> NaiveDate {
        self.departure_time.date()
    }
}

/// Immutable set of valid flight records.
#[derive(Debug, Clone, Default)]
pub struct FlightDataset {
    records: Vec<FlightRecord>,
    dropped_rows: usize,
}

impl FlightDataset {
    pub fn new(records: Vec<FlightRecord>) -> Self {
        Self {
            records,
            dropped_rows: 0,
        }
    }

    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows excluded at load time because a key field was missing.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn airlines(&self) -> Vec<String> {
        Self::unique_in_order(self.records.iter().map(|r| r.airline.as_str()))
    }

    pub fn departure_codes(&self) -> Vec<String> {
        Self::unique_in_order(self.records.iter().map(|r| r.departure_iata.as_str()))
    }

    pub fn arrival_codes(&self) -> Vec<String> {
        Self::unique_in_order(self.records.iter().map(|r| r.arrival_iata.as_str()))
    }

    /// Distinct values in first-seen order.
    fn unique_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        values
            .filter(|v| seen.insert(*v))
            .map(str::to_string)
            .collect()
    }
}

/// Loads the flight file once and hands out the cached dataset afterwards.
pub struct DataLoader {
    file_path: PathBuf,
    cache: OnceCell<Arc<FlightDataset>>,
}

impl DataLoader {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            cache: OnceCell::new(),
        }
    }

    /// Get file path.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Load the dataset, reading the file only on the first successful call.
    pub fn load(&self) -> Result<Arc<FlightDataset>, LoaderError> {
        self.cache
            .get_or_try_init(|| Self::read_flights(&self.file_path).map(Arc::new))
            .cloned()
    }

    /// Cached dataset, if a load has already succeeded.
    pub fn cached(&self) -> Option<Arc<FlightDataset>> {
        self.cache.get().cloned()
    }

    /// Read and validate the CSV file at `file_path`.
    pub fn read_flights(file_path: &Path) -> Result<FlightDataset, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::FileNotFound(file_path.to_path_buf()));
        }

        debug!(path = %file_path.display(), "reading flight CSV");

        // Schema inference disabled: every column arrives as a string
        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        let dataset = Self::from_dataframe(&df)?;

        info!(
            path = %file_path.display(),
            rows = df.height(),
            kept = dataset.len(),
            "loaded flight data"
        );
        if dataset.is_empty() {
            warn!(path = %file_path.display(), "no usable flight rows");
        }
        if dataset.dropped_rows > 0 {
            warn!(
                dropped = dataset.dropped_rows,
                "skipped rows missing airline, departure_airport or arrival_airport"
            );
        }

        Ok(dataset)
    }

    /// Convert a string DataFrame into flight records.
    ///
    /// Rows missing a key field are dropped; a kept row whose timestamps
    /// cannot be parsed fails the whole load. Every string field is trimmed.
    pub fn from_dataframe(df: &DataFrame) -> Result<FlightDataset, LoaderError> {
        if let Some(missing) = REQUIRED_COLUMNS
            .into_iter()
            .find(|name| df.column(name).is_err())
        {
            return Err(LoaderError::MissingColumn(missing.to_string()));
        }

        let airline_col = Self::string_column(df, COL_AIRLINE)?;
        let dep_airport_col = Self::string_column(df, COL_DEPARTURE_AIRPORT)?;
        let arr_airport_col = Self::string_column(df, COL_ARRIVAL_AIRPORT)?;
        let dep_iata = Self::string_column(df, COL_DEPARTURE_IATA)?;
        let arr_iata = Self::string_column(df, COL_ARRIVAL_IATA)?;
        let dep_time = Self::string_column(df, COL_DEPARTURE_TIME)?;
        let arr_time = Self::string_column(df, COL_ARRIVAL_TIME)?;

        let mut records = Vec::with_capacity(df.height());
        let mut dropped_rows = 0;

        for i in 0..df.height() {
            let (Some(airline), Some(dep_airport), Some(arr_airport)) = (
                present(airline_col.get(i)),
                present(dep_airport_col.get(i)),
                present(arr_airport_col.get(i)),
            ) else {
                dropped_rows += 1;
                continue;
            };

            let departure_time = Self::timestamp_at(&dep_time, COL_DEPARTURE_TIME, i)?;
            let arrival_time = Self::timestamp_at(&arr_time, COL_ARRIVAL_TIME, i)?;

            records.push(FlightRecord {
                airline: airline.to_string(),
                departure_airport: dep_airport.to_string(),
                arrival_airport: arr_airport.to_string(),
                departure_iata: present(dep_iata.get(i)).unwrap_or_default().to_string(),
                arrival_iata: present(arr_iata.get(i)).unwrap_or_default().to_string(),
                departure_time,
                arrival_time,
            });
        }

        let mut dataset = FlightDataset::new(records);
        dataset.dropped_rows = dropped_rows;
        Ok(dataset)
    }

    fn string_column(df: &DataFrame, name: &str) -> Result<StringChunked, LoaderError> {
        let column = df
            .column(name)
            .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
        let strings = column.cast(&DataType::String)?;
        Ok(strings.str()?.clone())
    }

    fn timestamp_at(
        ca: &StringChunked,
        column: &'static str,
        row: usize,
    ) -> Result<NaiveDateTime, LoaderError> {
        let raw = ca.get(row).unwrap_or_default();
        present(Some(raw))
            .and_then(parse_timestamp).ok_or_else(|| LoaderError::Timestamp {
            column,
            // 1-based data row, header excluded
            row: row + 1,
            value: raw.to_string(),
        })
    }
}

/// Cell values read as missing, on top of null and blank cells.
const NA_TOKENS: [&str; 19] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "",
];

/// Trimmed cell text, or `None` when the cell is missing.
fn present(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !NA_TOKENS.contains(v))
}

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"];

/// Parse a timestamp cell. Offsets are dropped, keeping the local wall clock.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.naive_local());
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
