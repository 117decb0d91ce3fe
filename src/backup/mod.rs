//! Bank backups for budget-forecast
//!
//! A backup captures every bank account plus the auto-generated interest
//! items, so account data can be rolled back without touching the user's
//! own budget items.
//!
//! # Backup Format
//!
//! Backups are JSON files named `bank-backup-YYYYMMDD-HHMMSS-mmm.json` under
//! the `backups/` directory:
//! - `banks`: bank accounts
//! - `budgetItems`: auto-generated interest items
//! - `timestamp`: when the backup was created
//! - `version`: format version
//!
//! # Example
//!
//! ```rust,ignore
//! use budget_forecast::backup::{restore_from_file, BackupManager};
//!
//! let manager = BackupManager::new(&paths);
//! let path = manager.create_backup(storage.store())?;
//!
//! // Later
//! let result = restore_from_file(&mut storage, &path)?;
//! println!("{}", result.summary());
//! ```

mod manager;
mod restore;

pub use manager::{read_backup, BackupInfo, BackupManager, BankBackup, BACKUP_VERSION};
pub use restore::{restore_backup, restore_from_file, RestoreResult};
