//! CLI command for the analyses
//!
//! Prints cash flow, bank performance, spending trends and insights, or all
//! of them as one JSON document.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::config::Settings;
use crate::display::{format_currency, format_notifications};
use crate::error::{ForecastError, ForecastResult};
use crate::notify::Notification;
use crate::reports::{
    insights, AllocationAdvice, BankPerformance, BudgetAnalysis, CashFlowReport, SpendingTrends,
};
use crate::services::{project, ForecastOptions};
use crate::storage::Storage;

/// Which analysis to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    All,
    CashFlow,
    Banks,
    Spending,
    Insights,
}

/// Arguments for `analyze`
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Only show one section
    #[arg(short, long, value_enum, default_value = "all")]
    pub section: Section,

    /// Print every analysis as JSON
    #[arg(long)]
    pub json: bool,

    /// Export spending trends to a CSV file
    #[arg(long)]
    pub spending_csv: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisSnapshot {
    budget: BudgetAnalysis,
    cash_flow: CashFlowReport,
    performance: BankPerformance,
    allocation: Option<AllocationAdvice>,
    spending: SpendingTrends,
    insights: Vec<Notification>,
}

/// Handle the analyze command
pub fn handle_analyze_command(
    storage: &Storage,
    settings: &Settings,
    today: NaiveDate,
    args: AnalyzeArgs,
) -> ForecastResult<()> {
    let store = storage.store();
    let thresholds = &settings.thresholds;
    let currency = settings.currency_symbol.as_str();

    let options =
        ForecastOptions::starting(today).with_fallback_balance(settings.fallback_starting_balance);
    let points = project(
        store.budget_items(),
        store.banks(),
        settings.default_forecast_months,
        &options,
    );

    let snapshot = AnalysisSnapshot {
        budget: BudgetAnalysis::generate(store, today, settings.fallback_starting_balance),
        cash_flow: CashFlowReport::generate(store, today, thresholds),
        performance: BankPerformance::generate(store.banks(), thresholds),
        allocation: AllocationAdvice::generate(store.banks(), thresholds),
        spending: SpendingTrends::generate(store, today, thresholds),
        insights: insights::collect(store, &points, today, settings),
    };

    if let Some(path) = args.spending_csv {
        let file = File::create(&path).map_err(|e| {
            ForecastError::Export(format!("Failed to create {}: {}", path.display(), e))
        })?;
        snapshot.spending.export_csv(BufWriter::new(file))?;
        println!("Spending exported to {}", path.display());
    }

    if args.json {
        let json = serde_json::to_string_pretty(&snapshot)?;
        println!("{}", json);
        return Ok(());
    }

    let show = |section: Section| args.section == Section::All || args.section == section;

    if show(Section::CashFlow) {
        println!("{}", snapshot.budget.format_terminal(currency));
        if !store.banks().is_empty() {
            println!("{}", snapshot.cash_flow.format_terminal(currency));
        }
    }
    if show(Section::Banks) {
        println!("{}", snapshot.performance.format_terminal(currency));
        if let Some(advice) = &snapshot.allocation {
            if advice.reallocation_suggested {
                println!(
                    "Moving {} to {} would earn {} more per month\n",
                    advice.lowest.name,
                    advice.highest.name,
                    format_currency(advice.monthly_gain(store.banks()), currency)
                );
            }
        }
    }
    if show(Section::Spending) {
        println!("{}", snapshot.spending.format_terminal(currency));
    }
    if show(Section::Insights) {
        println!("Insights");
        println!("{}", "=".repeat(40));
        if snapshot.insights.is_empty() {
            println!("Nothing to report.");
        } else {
            print!("{}", format_notifications(&snapshot.insights));
        }
    }

    Ok(())
}
