//! Spending trends
//!
//! Ranks the expenses active on a given day by size and their share of total
//! spending.

use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::AnalysisThresholds;
use crate::display::format_currency;
use crate::error::{ForecastError, ForecastResult};
use crate::models::BudgetItemId;
use crate::storage::EntityStore;

use super::cash_flow::truncate;

/// One expense and its share of total spending
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseShare {
    pub item_id: BudgetItemId,
    pub name: String,
    /// Monthly amount (positive)
    pub amount: f64,
    /// Percentage of total monthly expenses
    pub percentage: f64,
    pub linked_to_bank: bool,
}

/// Active expenses ranked by size
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingTrends {
    pub as_of: NaiveDate,
    /// Expenses, largest first
    pub expenses: Vec<ExpenseShare>,
    /// Total monthly expenses
    pub total_expenses: f64,
    /// The largest expense exceeds the dominance threshold
    pub dominant: bool,
}

impl SpendingTrends {
    /// Rank the expenses active on `as_of`
    pub fn generate(store: &EntityStore, as_of: NaiveDate, thresholds: &AnalysisThresholds) -> Self {
        let mut active: Vec<_> = store
            .budget_items()
            .iter()
            .filter(|i| i.is_expense() && i.is_active_on(as_of))
            .collect();
        active.sort_by(|a, b| b.magnitude().total_cmp(&a.magnitude()));

        let total_expenses: f64 = active.iter().map(|i| i.magnitude()).sum();
        let expenses: Vec<ExpenseShare> = active
            .iter()
            .map(|item| ExpenseShare {
                item_id: item.id,
                name: item.name.clone(),
                amount: item.magnitude(),
                percentage: if total_expenses > 0.0 {
                    item.magnitude() / total_expenses * 100.0
                } else {
                    0.0
                },
                linked_to_bank: item.linked_bank_id.is_some(),
            })
            .collect();

        let dominant = expenses
            .first()
            .is_some_and(|top| top.percentage > thresholds.dominant_expense_share);

        Self {
            as_of,
            expenses,
            total_expenses,
            dominant,
        }
    }

    /// Get the top N expenses
    pub fn top_expenses(&self, limit: usize) -> &[ExpenseShare] {
        &self.expenses[..limit.min(self.expenses.len())]
    }

    pub fn largest(&self) -> Option<&ExpenseShare> {
        self.expenses.first()
    }

    /// Format for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Spending as of {}\n",
            self.as_of.format("%Y-%m-%d")
        ));
        output.push_str(&"=".repeat(64));
        output.push('\n');

        if self.expenses.is_empty() {
            output.push_str("No active expenses.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<32} {:>14} {:>8} {:>6}\n",
            "Expense", "Monthly", "%", "Bank"
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');

        for expense in &self.expenses {
            output.push_str(&format!(
                "{:<32} {:>14} {:>7.1}% {:>6}\n",
                truncate(&expense.name, 32),
                format_currency(expense.amount, currency),
                expense.percentage,
                if expense.linked_to_bank { "yes" } else { "" }
            ));
        }

        output.push_str(&"-".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<32} {:>14}\n",
            "TOTAL",
            format_currency(self.total_expenses, currency)
        ));

        output
    }

    /// Export to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> ForecastResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Expense", "Monthly Amount", "Percentage", "Linked To Bank"])
            .map_err(|e| ForecastError::Export(e.to_string()))?;

        for expense in &self.expenses {
            csv.write_record([
                expense.name.clone(),
                format!("{:.2}", expense.amount),
                format!("{:.1}", expense.percentage),
                expense.linked_to_bank.to_string(),
            ])
            .map_err(|e| ForecastError::Export(e.to_string()))?;
        }

        csv.flush().map_err(|e| ForecastError::Export(e.to_string()))?;
        Ok(())
    }
}
