//! Backup CLI commands
//!
//! Implements CLI commands for bank backups.

use std::path::PathBuf;

use clap::Subcommand;

use crate::backup::{restore_from_file, BackupManager};
use crate::config::paths::ForecastPaths;
use crate::error::{ForecastError, ForecastResult};
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Back up all bank accounts and their interest items
    Create,

    /// List all available backups
    List,

    /// Restore bank accounts from a backup
    Restore {
        /// Backup filename or path (default: most recent)
        backup: Option<String>,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    storage: &mut Storage,
    paths: &ForecastPaths,
    cmd: BackupCommands,
) -> ForecastResult<()> {
    let manager = BackupManager::new(paths);

    match cmd {
        BackupCommands::Create => {
            let backup_path = manager.create_backup(storage.store())?;
            println!(
                "Backed up {} bank accounts to {}",
                storage.store().banks().len(),
                backup_path.display()
            );
        }

        BackupCommands::List => {
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: forecast backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            for (i, backup) in backups.iter().enumerate() {
                println!(
                    "  {}. {} ({}, {} bytes)",
                    i + 1,
                    backup.filename,
                    backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    backup.size_bytes
                );
            }
            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore { backup } => {
            let backup_path = resolve_backup_path(&manager, backup.as_deref())?;
            let result = restore_from_file(storage, &backup_path)?;

            println!("Restored from {}", backup_path.display());
            println!(
                "  {} bank account(s), {} interest item(s)",
                result.banks_restored, result.interest_items_restored
            );
        }
    }

    Ok(())
}

fn resolve_backup_path(manager: &BackupManager, backup: Option<&str>) -> ForecastResult<PathBuf> {
    let Some(backup) = backup.filter(|b| *b != "latest") else {
        return manager
            .latest_backup()?
            .map(|info| info.path)
            .ok_or_else(|| ForecastError::Backup("No backup found".into()));
    };

    let direct = PathBuf::from(backup);
    if direct.exists() {
        return Ok(direct);
    }

    manager
        .get_backup(backup)
        .map(|info| info.path)
        .ok_or_else(|| ForecastError::Backup(format!("Backup not found: {}", backup)))
}
