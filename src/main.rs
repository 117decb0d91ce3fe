use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::debug;

use budget_forecast::cli::{
    handle_analyze_command, handle_backup_command, handle_bank_command, handle_budget_command,
    handle_export_command, handle_import_command, handle_project_command, AnalyzeArgs,
    BackupCommands, BankCommands, BudgetCommands, ExportArgs, ImportArgs, ProjectArgs,
};
use budget_forecast::config::{ForecastPaths, Settings};
use budget_forecast::display::format_notifications;
use budget_forecast::logging::init_tracing;
use budget_forecast::services::SyncSchedule;
use budget_forecast::storage::Storage;
use budget_forecast::ForecastError;

#[derive(Parser)]
#[command(
    name = "forecast",
    version,
    about = "Terminal budget forecasting with interest-bearing bank accounts",
    long_about = "Track recurring income and expenses alongside bank accounts, keep \
                  each account's monthly interest in the budget automatically, and \
                  project balances month by month."
)]
struct Cli {
    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Bank account management commands
    #[command(subcommand)]
    Bank(BankCommands),

    /// Budget item management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Project balances month by month
    Project(ProjectArgs),

    /// Analyze cash flow, bank performance and spending
    Analyze(AnalyzeArgs),

    /// Reconcile interest items with bank accounts now
    Sync,

    /// Export data to a file
    Export(ExportArgs),

    /// Replace all data with an exported file
    Import(ImportArgs),

    /// Bank backup commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    let today = cli
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let paths = ForecastPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let mut storage = Storage::new(&paths, &settings)?;

    let mut schedule = SyncSchedule::new(Duration::from_secs(settings.sync_interval_secs));
    if let Some(report) = schedule.run_if_due(&mut storage, Utc::now(), today) {
        debug!(changes = report.total(), "startup synchronization finished");
    }

    let outcome = match cli.command {
        Some(Commands::Bank(cmd)) => handle_bank_command(&mut storage, &settings, today, cmd),
        Some(Commands::Budget(cmd)) => handle_budget_command(&mut storage, &settings, today, cmd),
        Some(Commands::Project(args)) => handle_project_command(&storage, &settings, today, args),
        Some(Commands::Analyze(args)) => handle_analyze_command(&storage, &settings, today, args),
        Some(Commands::Sync) => {
            let report = storage.synchronize(today);
            if report.is_empty() {
                println!("Interest items are up to date.");
            } else {
                println!("Synchronization complete");
                println!("  Created:  {}", report.created());
                println!("  Updated:  {}", report.updated());
                println!("  Removed:  {}", report.removed());
                println!("  Unlinked: {}", report.unlinked());
            }
            Ok(())
        }
        Some(Commands::Export(args)) => handle_export_command(&storage, args),
        Some(Commands::Import(args)) => handle_import_command(&mut storage, args),
        Some(Commands::Backup(cmd)) => handle_backup_command(&mut storage, &paths, cmd),
        Some(Commands::Config) => {
            println!("budget-forecast Configuration");
            println!("=============================");
            println!("Data directory:   {}", paths.base_dir().display());
            println!("Data file:        {}", paths.data_file().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Forecast months:   {}", settings.default_forecast_months);
            println!("  Fallback balance:  {:.2}", settings.fallback_starting_balance);
            println!("  Sync interval:     {}s", settings.sync_interval_secs);
            println!("  Sync tolerance:    {}", settings.sync_tolerance);
            Ok(())
        }
        None => {
            println!("budget-forecast - Budget forecasting from the terminal");
            println!();
            println!("Run 'forecast --help' for usage information.");
            Ok(())
        }
    };

    let notifications = storage.drain_notifications();
    if !notifications.is_empty() {
        eprint!("{}", format_notifications(&notifications));
    }

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => report_failure(e),
    }
}

fn report_failure(err: ForecastError) -> Result<ExitCode> {
    match &err {
        ForecastError::Validation(messages) => {
            eprintln!("Validation failed:");
            for message in messages {
                eprintln!("  - {}", message);
            }
            Ok(ExitCode::from(2))
        }
        ForecastError::NotFound { .. } | ForecastError::Duplicate { .. } => {
            eprintln!("Error: {}", err);
            Ok(ExitCode::from(2))
        }
        _ => Err(err.into()),
    }
}
