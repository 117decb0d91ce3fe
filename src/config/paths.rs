//! Path management for budget-forecast
//!
//! ## Path Resolution Order
//!
//! 1. `BUDGET_FORECAST_DATA_DIR` environment variable (if set)
//! 2. The platform config directory for `budget-forecast`
//!    (`~/.config/budget-forecast` on Linux, `%APPDATA%` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::ForecastError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "BUDGET_FORECAST_DATA_DIR";

/// Manages all paths used by budget-forecast
#[derive(Debug, Clone)]
pub struct ForecastPaths {
    base_dir: PathBuf,
}

impl ForecastPaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, ForecastError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the backup directory
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to the persisted budget items and bank accounts
    pub fn data_file(&self) -> PathBuf {
        self.base_dir.join("financial_data.json")
    }

    /// Ensure the base and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), ForecastError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| ForecastError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| ForecastError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, ForecastError> {
    ProjectDirs::from("", "", "budget-forecast")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ForecastError::Config("Could not determine a home directory".into()))
}
