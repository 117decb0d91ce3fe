//! Budget item display formatting

use chrono::NaiveDate;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::models::BudgetItem;
use crate::storage::EntityStore;

use super::format_currency;

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    item_type: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Bank")]
    bank: String,
    #[tabled(rename = "")]
    flags: String,
}

fn bank_name(store: &EntityStore, item: &BudgetItem) -> String {
    match item.linked_bank_id {
        Some(id) => store
            .bank(id)
            .map_or_else(|| format!("{} (missing)", id), |b| b.name.clone()),
        None => String::new(),
    }
}

/// Format budget items as a table
///
/// Items not active on `today` are marked, as are auto-generated interest
/// items.
pub fn format_budget_list(store: &EntityStore, today: NaiveDate, currency: &str) -> String {
    let items = store.budget_items();
    if items.is_empty() {
        return "No budget items found.".to_string();
    }

    let rows: Vec<BudgetRow> = items
        .iter()
        .map(|item| {
            let mut flags = Vec::new();
            if item.is_auto_generated {
                flags.push("auto");
            }
            if !item.is_active_on(today) {
                flags.push("inactive");
            }
            BudgetRow {
                id: item.id.to_string(),
                name: item.name.clone(),
                item_type: item.item_type.to_string(),
                amount: format_currency(item.amount, currency),
                start: item.start_date.to_string(),
                end: item.end_date.map(|d| d.to_string()).unwrap_or_default(),
                bank: bank_name(store, item),
                flags: flags.join(", "),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::single(3)).with(Alignment::right()));

    table.to_string()
}

/// Format a single budget item
pub fn format_budget_details(store: &EntityStore, item: &BudgetItem, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Budget Item: {}\n", item.name));
    output.push_str(&format!("  ID:     {}\n", item.id));
    output.push_str(&format!("  Type:   {}\n", item.item_type));
    output.push_str(&format!("  Amount: {}/month\n", format_currency(item.amount, currency)));
    output.push_str(&format!("  Start:  {}\n", item.start_date));
    if let Some(end) = item.end_date {
        output.push_str(&format!("  End:    {}\n", end));
    }
    if item.linked_bank_id.is_some() {
        output.push_str(&format!("  Bank:   {}\n", bank_name(store, item)));
    }
    if item.is_auto_generated {
        output.push_str("  Auto-generated from the linked account's interest\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BankAccount, BankId, BudgetItemId, BudgetType, InterestType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_budget_list_flags() {
        let mut store = EntityStore::new();
        store
            .insert_bank(BankAccount::new(BankId::new(1), "Checking", 100.0, 0.0, InterestType::Simple))
            .unwrap();
        store
            .insert_budget_item(
                BudgetItem::new(BudgetItemId::new(1), "Rent", 900.0, BudgetType::Expense, date(2024, 1, 1))
                    .linked_to(BankId::new(1)),
            )
            .unwrap();
        store
            .insert_budget_item(
                BudgetItem::new(BudgetItemId::new(2), "Old gym", 30.0, BudgetType::Expense, date(2023, 1, 1))
                    .with_end_date(date(2023, 6, 1))
                    .linked_to(BankId::new(9)),
            )
            .unwrap();

        let output = format_budget_list(&store, date(2024, 3, 1), "$");
        assert!(output.contains("Rent"));
        assert!(output.contains("-$900.00"));
        assert!(output.contains("Checking"));
        assert!(output.contains("inactive"));
        assert!(output.contains("bank-9 (missing)"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(
            format_budget_list(&EntityStore::new(), date(2024, 1, 1), "$"),
            "No budget items found."
        );
    }

    #[test]
    fn test_details() {
        let store = EntityStore::new();
        let item = BudgetItem::new(BudgetItemId::new(4), "Salary", 4000.0, BudgetType::Income, date(2024, 1, 1));
        let output = format_budget_details(&store, &item, "$");
        assert!(output.contains("Budget Item: Salary"));
        assert!(output.contains("$4,000.00/month"));
        assert!(!output.contains("End:"));
    }
}
