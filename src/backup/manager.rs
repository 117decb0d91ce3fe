//! Backup manager for budget-forecast
//!
//! Writes bank backups as timestamped JSON files and finds them again.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::paths::ForecastPaths;
use crate::error::{ForecastError, ForecastResult};
use crate::models::{BankAccount, BudgetItem};
use crate::storage::EntityStore;

/// Version written into bank backups
pub const BACKUP_VERSION: &str = "1.2";

const FILE_PREFIX: &str = "bank-backup-";

/// Metadata about a backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// When the backup was created
    pub created_at: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Bank accounts and their interest items at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankBackup {
    pub banks: Vec<BankAccount>,
    /// Auto-generated interest items only
    pub budget_items: Vec<BudgetItem>,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl BankBackup {
    pub fn from_store(store: &EntityStore, timestamp: DateTime<Utc>) -> Self {
        Self {
            banks: store.banks().to_vec(),
            budget_items: store
                .budget_items()
                .iter()
                .filter(|i| i.is_auto_generated)
                .cloned()
                .collect(),
            timestamp,
            version: BACKUP_VERSION.to_string(),
        }
    }
}

/// Manages backup files
pub struct BackupManager {
    backup_dir: PathBuf,
}

impl BackupManager {
    pub fn new(paths: &ForecastPaths) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
        }
    }

    /// Back up the bank accounts of `store`
    ///
    /// Returns the path to the created backup file.
    pub fn create_backup(&self, store: &EntityStore) -> ForecastResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            ForecastError::Backup(format!("Failed to create backup directory: {}", e))
        })?;

        let now = Utc::now();
        let filename = format!(
            "{}{}-{:03}.json",
            FILE_PREFIX,
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let backup_path = self.backup_dir.join(&filename);

        let backup = BankBackup::from_store(store, now);
        let json = serde_json::to_string_pretty(&backup)
            .map_err(|e| ForecastError::Backup(format!("Failed to serialize backup: {}", e)))?;
        fs::write(&backup_path, json)
            .map_err(|e| ForecastError::Backup(format!("Failed to write backup file: {}", e)))?;

        debug!(path = %backup_path.display(), banks = backup.banks.len(), "bank backup written");
        Ok(backup_path)
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> ForecastResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.backup_dir).map_err(|e| {
            ForecastError::Backup(format!("Failed to read backup directory: {}", e))
        })?;

        let mut backups = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                ForecastError::Backup(format!("Failed to read directory entry: {}", e))
            })?;
            if let Some(info) = parse_backup_info(&entry.path()) {
                backups.push(info);
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    /// Get the most recent backup
    pub fn latest_backup(&self) -> ForecastResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }

    /// Get a specific backup by filename
    pub fn get_backup(&self, filename: &str) -> Option<BackupInfo> {
        parse_backup_info(&self.backup_dir.join(filename))
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }
}

/// Read and parse a backup file
pub fn read_backup(path: &Path) -> ForecastResult<BankBackup> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ForecastError::Backup(format!("Failed to read backup file: {}", e)))?;
    serde_json::from_str(&contents)
        .map_err(|e| ForecastError::Backup(format!("Failed to parse backup file: {}", e)))
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let stamp = filename.strip_prefix(FILE_PREFIX)?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(stamp)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
    })
}

/// Parse `YYYYMMDD-HHMMSS-mmm` (milliseconds optional)
fn parse_backup_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = stamp.split('-').collect();
    let (date_part, time_part, millis) = match parts.as_slice() {
        [date, time] => (*date, *time, 0),
        [date, time, ms] => (*date, *time, ms.parse().ok()?),
        _ => return None,
    };

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(
        date_part[0..4].parse().ok()?,
        date_part[4..6].parse().ok()?,
        date_part[6..8].parse().ok()?,
    )?;
    let datetime = date.and_hms_milli_opt(
        time_part[0..2].parse().ok()?,
        time_part[2..4].parse().ok()?,
        time_part[4..6].parse().ok()?,
        millis,
    )?;

    Some(DateTime::from_naive_utc_and_offset(datetime, Utc))
}
