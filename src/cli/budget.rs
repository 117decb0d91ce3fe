//! Budget item CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::budget::{format_budget_details, format_budget_list};
use crate::error::{ForecastError, ForecastResult};
use crate::models::{BankId, BudgetType};
use crate::services::{BankService, BudgetInput, BudgetService};
use crate::storage::Storage;

/// Budget item subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Add a recurring monthly income or expense
    Add {
        /// Item name
        name: String,
        /// Monthly amount (positive; the type decides the direction)
        amount: f64,
        /// Item type (income, expense)
        #[arg(short = 't', long = "type", default_value = "expense")]
        item_type: String,
        /// First day the item applies (YYYY-MM-DD, default today)
        #[arg(short, long)]
        start: Option<NaiveDate>,
        /// Last day the item applies (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<NaiveDate>,
        /// Bank account name or ID the item posts to
        #[arg(short, long)]
        bank: Option<String>,
    },
    /// Edit a budget item
    Edit {
        /// Item name or ID
        item: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        amount: Option<f64>,
        #[arg(short = 't', long = "type")]
        item_type: Option<String>,
        #[arg(short, long)]
        start: Option<NaiveDate>,
        #[arg(short, long, conflicts_with = "no_end")]
        end: Option<NaiveDate>,
        /// Remove the end date
        #[arg(long)]
        no_end: bool,
        #[arg(short, long, conflicts_with = "unlink")]
        bank: Option<String>,
        /// Remove the bank link
        #[arg(long)]
        unlink: bool,
    },
    /// Delete a budget item
    Delete {
        /// Item name or ID
        item: String,
    },
    /// List all budget items
    List,
    /// Show item details
    Show {
        /// Item name or ID
        item: String,
    },
}

fn parse_budget_type(value: &str) -> ForecastResult<BudgetType> {
    BudgetType::parse(value).ok_or_else(|| {
        ForecastError::validation(format!(
            "Invalid budget item type: '{}'. Valid types: income, expense",
            value
        ))
    })
}

fn resolve_bank(storage: &mut Storage, today: NaiveDate, identifier: &str) -> ForecastResult<BankId> {
    Ok(BankService::new(storage, today).find(identifier)?.id)
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &mut Storage,
    settings: &Settings,
    today: NaiveDate,
    cmd: BudgetCommands,
) -> ForecastResult<()> {
    let currency = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::Add {
            name,
            amount,
            item_type,
            start,
            end,
            bank,
        } => {
            let item_type = parse_budget_type(&item_type)?;
            let mut input = BudgetInput::new(name, amount, item_type, start.unwrap_or(today));
            input.end_date = end;
            if let Some(bank) = bank {
                input.linked_bank_id = Some(resolve_bank(storage, today, &bank)?);
            }

            let item = BudgetService::new(storage).create(input)?;
            println!("Created budget item: {}", item.name);
            println!("  ID: {}", item.id);
        }

        BudgetCommands::Edit {
            item,
            name,
            amount,
            item_type,
            start,
            end,
            no_end,
            bank,
            unlink,
        } => {
            let found = BudgetService::new(storage).find(&item)?.clone();

            let mut input = BudgetInput::from_item(&found);
            if let Some(name) = name {
                input.name = name;
            }
            if let Some(amount) = amount {
                input.amount = amount;
            }
            if let Some(item_type) = item_type {
                input.item_type = parse_budget_type(&item_type)?;
            }
            if let Some(start) = start {
                input.start_date = start;
            }
            if end.is_some() || no_end {
                input.end_date = end;
            }
            if let Some(bank) = bank {
                input.linked_bank_id = Some(resolve_bank(storage, today, &bank)?);
            } else if unlink {
                input.linked_bank_id = None;
            }

            if input == BudgetInput::from_item(&found) {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = BudgetService::new(storage).update(found.id, input)?;
            println!("Updated budget item: {}", updated.name);
        }

        BudgetCommands::Delete { item } => {
            let mut service = BudgetService::new(storage);
            let id = service.find(&item)?.id;
            let deleted = service.delete(id)?;
            println!("Deleted budget item: {}", deleted.name);
            if deleted.is_auto_generated {
                println!("  It will be recreated by the next synchronization.");
            }
        }

        BudgetCommands::List => {
            println!("{}", format_budget_list(storage.store(), today, currency));
        }

        BudgetCommands::Show { item } => {
            let found = BudgetService::new(storage).find(&item)?.clone();
            print!("{}", format_budget_details(storage.store(), &found, currency));
        }
    }

    Ok(())
}
