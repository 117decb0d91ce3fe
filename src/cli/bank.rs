//! Bank account CLI commands
//!
//! Rates are entered as percentages and stored as decimals.

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::bank::{format_bank_details, format_bank_list};
use crate::error::{ForecastError, ForecastResult};
use crate::models::InterestType;
use crate::services::{BankInput, BankService};
use crate::storage::Storage;

/// Bank account subcommands
#[derive(Subcommand)]
pub enum BankCommands {
    /// Add a bank account
    Add {
        /// Account name
        name: String,
        /// Current balance
        #[arg(short, long, allow_hyphen_values = true)]
        balance: f64,
        /// Annual interest rate in percent (e.g. 4.5)
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        rate: f64,
        /// Interest type (simple, compound)
        #[arg(short = 't', long = "type", default_value = "compound")]
        interest_type: String,
    },
    /// Edit a bank account
    Edit {
        /// Account name or ID
        bank: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New balance
        #[arg(short, long, allow_hyphen_values = true)]
        balance: Option<f64>,
        /// New annual interest rate in percent
        #[arg(short, long, allow_hyphen_values = true)]
        rate: Option<f64>,
        /// New interest type (simple, compound)
        #[arg(short = 't', long = "type")]
        interest_type: Option<String>,
    },
    /// Delete a bank account and its interest item
    Delete {
        /// Account name or ID
        bank: String,
    },
    /// List all bank accounts
    List,
    /// Show account details
    Show {
        /// Account name or ID
        bank: String,
    },
}

fn parse_interest_type(value: &str) -> ForecastResult<InterestType> {
    InterestType::parse(value).ok_or_else(|| {
        ForecastError::validation(format!(
            "Invalid interest type: '{}'. Valid types: simple, compound",
            value
        ))
    })
}

/// Handle a bank command
pub fn handle_bank_command(
    storage: &mut Storage,
    settings: &Settings,
    today: NaiveDate,
    cmd: BankCommands,
) -> ForecastResult<()> {
    let currency = settings.currency_symbol.as_str();

    match cmd {
        BankCommands::Add {
            name,
            balance,
            rate,
            interest_type,
        } => {
            let interest_type = parse_interest_type(&interest_type)?;
            let input = BankInput::new(name, balance, rate / 100.0, interest_type);
            let bank = BankService::new(storage, today).create(input)?;

            println!("Created bank account: {}", bank.name);
            println!("  ID: {}", bank.id);
        }

        BankCommands::Edit {
            bank,
            name,
            balance,
            rate,
            interest_type,
        } => {
            let mut service = BankService::new(storage, today);
            let found = service.find(&bank)?.clone();

            if name.is_none() && balance.is_none() && rate.is_none() && interest_type.is_none() {
                println!("No changes specified. Use --name, --balance, --rate or --type.");
                return Ok(());
            }

            let mut input = BankInput::from_account(&found);
            if let Some(name) = name {
                input.name = name;
            }
            if let Some(balance) = balance {
                input.balance = balance;
            }
            if let Some(rate) = rate {
                input.interest_rate = rate / 100.0;
            }
            if let Some(interest_type) = interest_type {
                input.interest_type = parse_interest_type(&interest_type)?;
            }

            let updated = service.update(found.id, input)?;
            println!("Updated bank account: {}", updated.name);
        }

        BankCommands::Delete { bank } => {
            let mut service = BankService::new(storage, today);
            let id = service.find(&bank)?.id;
            let (deleted, report) = service.delete(id)?;

            println!("Deleted bank account: {}", deleted.name);
            if report.unlinked() > 0 {
                println!("  {} budget item(s) unlinked", report.unlinked());
            }
        }

        BankCommands::List => {
            println!("{}", format_bank_list(storage.store(), currency));
        }

        BankCommands::Show { bank } => {
            let service = BankService::new(storage, today);
            let found = service.find(&bank)?.clone();
            print!("{}", format_bank_details(storage.store(), &found, currency));
        }
    }

    Ok(())
}
