//! Bank account display formatting
//!
//! Formats bank accounts for terminal output in table and detail views.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::models::BankAccount;
use crate::services::interest;
use crate::storage::EntityStore;

use super::{format_currency, format_rate};

#[derive(Tabled)]
struct BankRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Type")]
    interest_type: String,
    #[tabled(rename = "Interest/mo")]
    monthly_interest: String,
    #[tabled(rename = "Linked")]
    linked: usize,
}

fn linked_count(store: &EntityStore, bank: &BankAccount) -> usize {
    store
        .budget_items()
        .iter()
        .filter(|i| i.is_user_linked_to(bank.id))
        .count()
}

/// Format all bank accounts as a table with a total row
pub fn format_bank_list(store: &EntityStore, currency: &str) -> String {
    let banks = store.banks();
    if banks.is_empty() {
        return "No bank accounts found.".to_string();
    }

    let rows: Vec<BankRow> = banks
        .iter()
        .map(|bank| BankRow {
            id: bank.id.to_string(),
            name: bank.name.clone(),
            balance: format_currency(bank.balance, currency),
            rate: format_rate(bank.interest_rate),
            interest_type: bank.interest_type.to_string(),
            monthly_interest: format_currency(interest::for_account(bank), currency),
            linked: linked_count(store, bank),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::new(2..4)).with(Alignment::right()))
        .with(Modify::new(Columns::single(5)).with(Alignment::right()));

    let total_interest: f64 = banks.iter().map(interest::for_account).sum();
    format!(
        "{}\n\nTotal: {} across {} account(s), {} interest per month\n",
        table,
        format_currency(store.total_bank_balance(), currency),
        banks.len(),
        format_currency(total_interest, currency)
    )
}

/// Format a single account with its linked budget items
pub fn format_bank_details(store: &EntityStore, bank: &BankAccount, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Bank Account: {}\n", bank.name));
    output.push_str(&format!("  ID:               {}\n", bank.id));
    output.push_str(&format!(
        "  Balance:          {}\n",
        format_currency(bank.balance, currency)
    ));
    output.push_str(&format!(
        "  Interest:         {} {}\n",
        format_rate(bank.interest_rate),
        bank.interest_type
    ));
    output.push_str(&format!(
        "  Monthly interest: {}\n",
        format_currency(interest::for_account(bank), currency)
    ));

    let linked: Vec<_> = store
        .budget_items()
        .iter()
        .filter(|i| i.is_user_linked_to(bank.id))
        .collect();
    if linked.is_empty() {
        output.push_str("  No linked budget items\n");
    } else {
        output.push_str("  Linked budget items:\n");
        for item in linked {
            output.push_str(&format!(
                "    {:<30} {:>14}  {}\n",
                item.name,
                format_currency(item.amount, currency),
                item.item_type
            ));
        }
    }

    output
}
