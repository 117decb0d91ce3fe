//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod bank;
pub mod budget;
pub mod export;
pub mod forecast;
pub mod report;

pub use backup::{handle_backup_command, BackupCommands};
pub use bank::{handle_bank_command, BankCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use export::{handle_export_command, handle_import_command, ExportArgs, ImportArgs};
pub use forecast::{handle_project_command, ProjectArgs};
pub use report::{handle_analyze_command, AnalyzeArgs};
