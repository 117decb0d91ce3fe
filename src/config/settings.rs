//! User settings for budget-forecast
//!
//! Manages forecast defaults, synchronization cadence, and the heuristic
//! thresholds used by the analysis reports.

use serde::{Deserialize, Serialize};

use super::paths::ForecastPaths;
use crate::error::ForecastError;

/// Thresholds behind the advisory analyses
///
/// These are product heuristics rather than derived values, so every one of
/// them can be overridden in `config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisThresholds {
    /// An account is at risk when linked monthly expenses exceed this share of its balance
    pub expense_to_balance_ratio: f64,
    /// Minimum months of runway before a negative-flow account is at risk
    pub runway_months: f64,
    /// Rate spread (decimal) above which moving funds is suggested
    pub rate_spread: f64,
    /// Highest rate must exceed lowest rate by this factor to suggest reallocation
    pub reallocation_multiplier: f64,
    /// Depletion horizons shorter than this are called out
    pub depletion_warning_months: f64,
    /// Savings rates (percent) below this are called out
    pub low_savings_rate: f64,
    /// Monthly interest below this share of total balance is below market
    pub below_market_monthly_yield: f64,
    /// A single linked expense above this share of the balance is flagged
    pub large_expense_ratio: f64,
    /// A single expense above this share (percent) of all expenses dominates spending
    pub dominant_expense_share: f64,
    /// Largest balance above this multiple of the smallest suggests rebalancing
    pub rebalancing_balance_ratio: f64,
}

impl Default for AnalysisThresholds {
    fn default() -> Self {
        Self {
            expense_to_balance_ratio: 0.8,
            runway_months: 6.0,
            rate_spread: 0.01,
            reallocation_multiplier: 1.5,
            depletion_warning_months: 12.0,
            low_savings_rate: 10.0,
            below_market_monthly_yield: 0.003,
            large_expense_ratio: 0.5,
            dominant_expense_share: 50.0,
            rebalancing_balance_ratio: 10.0,
        }
    }
}

/// User settings for budget-forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Months projected when none are requested
    #[serde(default = "default_forecast_months")]
    pub default_forecast_months: u32,

    /// Starting balance used when no bank accounts exist
    #[serde(default)]
    pub fallback_starting_balance: f64,

    /// Seconds between periodic synchronization passes
    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,

    /// Interest items within this many currency units are considered in sync
    #[serde(default = "default_sync_tolerance")]
    pub sync_tolerance: f64,

    #[serde(default)]
    pub thresholds: AnalysisThresholds,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_forecast_months() -> u32 {
    12
}

fn default_sync_interval_secs() -> u64 {
    5 * 60
}

fn default_sync_tolerance() -> f64 {
    0.01
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            default_forecast_months: default_forecast_months(),
            fallback_starting_balance: 0.0,
            sync_interval_secs: default_sync_interval_secs(),
            sync_tolerance: default_sync_tolerance(),
            thresholds: AnalysisThresholds::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &ForecastPaths) -> Result<Self, ForecastError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| ForecastError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| ForecastError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ForecastPaths) -> Result<(), ForecastError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ForecastError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| ForecastError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.default_forecast_months, 12);
        assert_eq!(settings.sync_interval_secs, 300);
        assert_eq!(settings.sync_tolerance, 0.01);
        assert_eq!(settings.thresholds.runway_months, 6.0);
        assert_eq!(settings.thresholds.expense_to_balance_ratio, 0.8);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ForecastPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.fallback_starting_balance = 8236.0;
        settings.thresholds.runway_months = 3.0;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.fallback_starting_balance, 8236.0);
        assert_eq!(loaded.thresholds.runway_months, 3.0);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ForecastPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.settings_file(),
            r#"{"currency_symbol": "EUR ", "thresholds": {"rate_spread": 0.02}}"#,
        )
        .unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "EUR ");
        assert_eq!(loaded.thresholds.rate_spread, 0.02);
        assert_eq!(loaded.thresholds.reallocation_multiplier, 1.5);
        assert_eq!(loaded.default_forecast_months, 12);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ForecastPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "not json").unwrap();

        assert!(matches!(
            Settings::load_or_create(&paths),
            Err(ForecastError::Config(_))
        ));
    }
}
