//! Command-line interface.
//!
//! Without a subcommand the desktop dashboard starts. `summary` and `export`
//! run headless against the same filters.

use crate::data::{FilterSelection, FlightDataset};
use crate::logging::Verbosity;
use clap::{Args, Parser, Subcommand};
use std::collections::HashSet;
use std::path::PathBuf;

/// Airline market demand dashboard
#[derive(Debug, Parser)]
#[command(name = "flight_demand_dashboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Flight records CSV (overrides the config file)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print top routes, airline share and daily volume
    Summary {
        #[command(flatten)]
        filters: FilterArgs,

        /// Emit JSON instead of text tables
        #[arg(long)]
        json: bool,
    },

    /// Render the three charts to PNG files
    Export {
        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,
    },
}

/// Filter flags; a field with no values selects everything observed.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Airline to include (repeatable)
    #[arg(long = "airline", value_name = "NAME")]
    pub airlines: Vec<String>,

    /// Departure IATA code to include (repeatable)
    #[arg(long = "departure", value_name = "IATA")]
    pub departures: Vec<String>,

    /// Arrival IATA code to include (repeatable)
    #[arg(long = "arrival", value_name = "IATA")]
    pub arrivals: Vec<String>,
}

impl FilterArgs {
    pub fn to_selection(&self, dataset: &FlightDataset) -> FilterSelection {
        let all = FilterSelection::all(dataset);
        FilterSelection {
            airlines: Self::or_all(&self.airlines, all.airlines),
            departures: Self::or_all(&self.departures, all.departures),
            arrivals: Self::or_all(&self.arrivals, all.arrivals),
        }
    }

    fn or_all(values: &[String], all: HashSet<String>) -> HashSet<String> {
        if values.is_empty() {
            all
        } else {
            values.iter().cloned().collect()
        }
    }
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FlightRecord;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_launches_gui() {
        let cli = Cli::try_parse_from(["flight_demand_dashboard"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn test_parse_summary_filters() {
        let cli = Cli::try_parse_from([
            "flight_demand_dashboard",
            "-d",
            "data/flights.csv",
            "summary",
            "--airline",
            "AA",
            "--airline",
            "BB",
            "--arrival",
            "LAX",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.data, Some(PathBuf::from("data/flights.csv")));
        match cli.command {
            Some(Command::Summary { filters, json }) => {
                assert!(json);
                assert_eq!(filters.airlines, vec!["AA", "BB"]);
                assert!(filters.departures.is_empty());
                assert_eq!(filters.arrivals, vec!["LAX"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_export_requires_out() {
        assert!(Cli::try_parse_from(["flight_demand_dashboard", "export"]).is_err());

        let cli =
            Cli::try_parse_from(["flight_demand_dashboard", "export", "--out", "charts"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Export { ref out, .. }) if out == &PathBuf::from("charts")));
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::try_parse_from(["flight_demand_dashboard", "-vv"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Trace);
        let cli = Cli::try_parse_from(["flight_demand_dashboard", "-v"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Verbose);
        let cli = Cli::try_parse_from(["flight_demand_dashboard", "-q", "-v"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_omitted_filters_select_all() {
        let time = crate::data::parse_timestamp("2024-01-01 08:00").unwrap();
        let dataset = FlightDataset::new(vec![FlightRecord {
            airline: "AA".into(),
            departure_airport: "JFK Airport".into(),
            arrival_airport: "LAX Airport".into(),
            departure_iata: "JFK".into(),
            arrival_iata: "LAX".into(),
            departure_time: time,
            arrival_time: time,
        }]);

        let args = FilterArgs {
            departures: vec!["SFO".into()],
            ..Default::default()
        };
        let selection = args.to_selection(&dataset);
        assert!(selection.airlines.contains("AA"));
        assert!(selection.arrivals.contains("LAX"));
        assert_eq!(selection.departures.len(), 1);
        assert!(selection.apply(dataset.records()).is_empty());
    }
}
