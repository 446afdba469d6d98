//! Dashboard configuration.
//!
//! Settings come from an optional JSON file; any field left out falls back to
//! its default. Command-line flags are applied on top by `main`.

use crate::stats::TOP_ROUTES_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default flight data file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "flights.csv";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Flight records CSV.
    pub data_path: PathBuf,
    /// Number of routes in the top-routes chart.
    pub top_routes: usize,
    /// Exported PNG size in pixels.
    pub export_width: u32,
    pub export_height: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            top_routes: TOP_ROUTES_LIMIT,
            export_width: 1200,
            export_height: 800,
        }
    }
}

impl DashboardConfig {
    /// Load from `path`, or defaults when no file is given.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_json(&text)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_routes == 0 {
            return Err(ConfigError::Invalid("top_routes must be at least 1".into()));
        }
        if self.export_width == 0 || self.export_height == 0 {
            return Err(ConfigError::Invalid(
                "export_width and export_height must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::load_from(None).unwrap();
        assert_eq!(config.data_path, PathBuf::from("flights.csv"));
        assert_eq!(config.top_routes, 10);
        assert_eq!((config.export_width, config.export_height), (1200, 800));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{ "data_path": "data/2024.csv", "top_routes": 5 }"#).unwrap();

        let config = DashboardConfig::load_from(Some(&path)).unwrap();
        assert_eq!(config.data_path, PathBuf::from("data/2024.csv"));
        assert_eq!(config.top_routes, 5);
        assert_eq!(config.export_width, 1200);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = DashboardConfig::load_from(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_bad_json() {
        let err = DashboardConfig::from_json("{ top_routes: }").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_validation() {
        let config = DashboardConfig {
            top_routes: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = DashboardConfig {
            export_height: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
