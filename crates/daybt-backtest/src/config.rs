//! Backtest configuration: exactly the knobs the step loop needs. Split
//! into `test_defaults`/`conservative_defaults` so unit tests never
//! share numbers with a real evaluation run by accident.

use std::fs;
use std::path::Path;

use daybt_status::{Result, Status};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub initial_cash: f64,
    pub commission_per_share: f64,
    pub commission_minimum: f64,
    pub risk_free_rate: f64,
}

impl BacktestConfig {
    /// Zero-friction defaults for unit tests: no commission, so expected
    /// cash deltas come out as exact round numbers. Not meant for a real
    /// evaluation run — use [`BacktestConfig::conservative_defaults`].
    pub fn test_defaults() -> Self {
        Self {
            initial_cash: 10_000.0,
            commission_per_share: 0.0,
            commission_minimum: 0.0,
            risk_free_rate: 0.0,
        }
    }

    /// Defaults for a real evaluation run: a per-share commission with a
    /// one-dollar minimum floor, zero risk-free rate unless the caller
    /// supplies one.
    pub fn conservative_defaults() -> Self {
        Self {
            initial_cash: 100_000.0,
            commission_per_share: 0.005,
            commission_minimum: 1.0,
            risk_free_rate: 0.0,
        }
    }

    /// Load a config from a JSON file, e.g. for a CLI `--config` flag.
    /// `NotFound` if the file does not exist, `Internal` if it cannot be
    /// parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            Status::not_found(format!("reading config file {}: {e}", path.display()))
        })?;
        serde_json::from_str(&contents)
            .map_err(|e| Status::internal(format!("parsing config file {}: {e}", path.display())))
    }
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self::conservative_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_file_round_trips_a_written_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backtest.json");
        let config = BacktestConfig {
            initial_cash: 50_000.0,
            commission_per_share: 0.01,
            commission_minimum: 2.0,
            risk_free_rate: 0.02,
        };
        fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        let loaded = BacktestConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn from_file_missing_path_is_not_found() {
        let err = BacktestConfig::from_file("/nonexistent/backtest.json").unwrap_err();
        assert_eq!(err.code, daybt_status::Code::NotFound);
    }

    #[test]
    fn from_file_malformed_json_is_internal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backtest.json");
        fs::write(&path, "not json").unwrap();

        let err = BacktestConfig::from_file(&path).unwrap_err();
        assert_eq!(err.code, daybt_status::Code::Internal);
    }
}
