//! Forecast CLI command

use std::fs::File;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;

use crate::config::Settings;
use crate::display::forecast::{format_forecast_summary, format_forecast_table};
use crate::error::{ForecastError, ForecastResult};
use crate::export::export_forecast_csv;
use crate::services::{project, ForecastOptions};
use crate::storage::Storage;

/// Arguments for `project`
#[derive(Args)]
pub struct ProjectArgs {
    /// Months to project, up to 1200 (default from settings)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=1200))]
    pub months: Option<u32>,

    /// Also write the projection to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// Handle the project command
pub fn handle_project_command(
    storage: &Storage,
    settings: &Settings,
    today: NaiveDate,
    args: ProjectArgs,
) -> ForecastResult<()> {
    let months = args.months.unwrap_or(settings.default_forecast_months);
    let options =
        ForecastOptions::starting(today).with_fallback_balance(settings.fallback_starting_balance);

    let store = storage.store();
    let points = project(store.budget_items(), store.banks(), months, &options);

    let currency = settings.currency_symbol.as_str();
    println!("{}", format_forecast_table(&points, store.banks(), currency));
    println!();
    print!("{}", format_forecast_summary(&points, currency));

    if let Some(path) = args.csv {
        let file = File::create(&path).map_err(|e| {
            ForecastError::Export(format!("Failed to create {}: {}", path.display(), e))
        })?;
        export_forecast_csv(&points, store.banks(), file)?;
        println!("Forecast exported to {}", path.display());
    }

    Ok(())
}
