//! Cash flow analysis
//!
//! Budget-wide monthly totals and per-account cash flow for the items active
//! on a given day.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::AnalysisThresholds;
use crate::display::format_currency;
use crate::models::{BankId, BudgetItem};
use crate::services::interest;
use crate::storage::EntityStore;

/// Budget-wide monthly metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAnalysis {
    pub as_of: NaiveDate,
    pub total_income: f64,
    pub total_expenses: f64,
    /// Income minus expenses
    pub net_monthly: f64,
    /// Percent of income kept; 0 when there is no income
    pub savings_rate: f64,
    /// Sum of bank balances, or the fallback balance without accounts
    pub current_balance: f64,
    /// Months until `current_balance` is spent; only set for a deficit
    pub months_to_depletion: Option<f64>,
    pub annual_savings: f64,
    pub bank_linked_income: f64,
    pub bank_linked_expenses: f64,
    /// Interest items maintained by the synchronizer
    pub auto_generated_income: f64,
}

impl BudgetAnalysis {
    pub fn generate(store: &EntityStore, as_of: NaiveDate, fallback_balance: f64) -> Self {
        let mut analysis = Self {
            as_of,
            total_income: 0.0,
            total_expenses: 0.0,
            net_monthly: 0.0,
            savings_rate: 0.0,
            current_balance: if store.banks().is_empty() {
                fallback_balance
            } else {
                store.total_bank_balance()
            },
            months_to_depletion: None,
            annual_savings: 0.0,
            bank_linked_income: 0.0,
            bank_linked_expenses: 0.0,
            auto_generated_income: 0.0,
        };

        for item in store.budget_items().iter().filter(|i| i.is_active_on(as_of)) {
            let amount = item.magnitude();
            if item.is_income() {
                analysis.total_income += amount;
                if item.is_auto_generated {
                    analysis.auto_generated_income += amount;
                } else if item.linked_bank_id.is_some() {
                    analysis.bank_linked_income += amount;
                }
            } else {
                analysis.total_expenses += amount;
                if item.linked_bank_id.is_some() {
                    analysis.bank_linked_expenses += amount;
                }
            }
        }

        analysis.net_monthly = analysis.total_income - analysis.total_expenses;
        analysis.annual_savings = analysis.net_monthly * 12.0;
        if analysis.total_income > 0.0 {
            analysis.savings_rate = analysis.net_monthly / analysis.total_income * 100.0;
        }
        if analysis.net_monthly < 0.0 {
            analysis.months_to_depletion =
                Some((analysis.current_balance / analysis.net_monthly).abs());
        }

        analysis
    }

    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Cash Flow as of {}\n", self.as_of.format("%Y-%m-%d")));
        output.push_str(&"=".repeat(40));
        output.push('\n');

        let rows = [
            ("Total Income", self.total_income),
            ("  Bank interest", self.auto_generated_income),
            ("  Bank-linked", self.bank_linked_income),
            ("Total Expenses", self.total_expenses),
            ("  Bank-linked", self.bank_linked_expenses),
            ("Net Monthly", self.net_monthly),
            ("Annual Savings", self.annual_savings),
            ("Current Balance", self.current_balance),
        ];
        for (label, amount) in rows {
            output.push_str(&format!(
                "{:<20} {:>18}\n",
                label,
                format_currency(amount, currency)
            ));
        }

        output.push_str(&format!("{:<20} {:>17.1}%\n", "Savings Rate", self.savings_rate));
        if let Some(months) = self.months_to_depletion {
            output.push_str(&format!("{:<20} {:>18.1}\n", "Months to Depletion", months));
        }

        output
    }
}

/// Why an account was flagged
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskReason {
    /// Linked expenses exceed the configured share of the balance
    HighExpenseRatio,
    /// Negative net flow with fewer months of runway than configured
    LowRunway,
    /// One linked expense is a large share of the balance
    LargeExpense { name: String, amount: f64 },
}

/// Cash flow through one bank account
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankCashFlow {
    pub bank_id: BankId,
    pub name: String,
    pub balance: f64,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub net_flow: f64,
    pub monthly_interest: f64,
    /// Whole months until the balance runs out; only for negative net flow
    pub runway_months: Option<f64>,
    pub linked_items: usize,
    pub risks: Vec<RiskReason>,
}

impl BankCashFlow {
    /// True when the account is flagged as at risk
    ///
    /// A large single expense alone is advisory and does not count.
    pub fn is_at_risk(&self) -> bool {
        self.risks
            .iter()
            .any(|r| matches!(r, RiskReason::HighExpenseRatio | RiskReason::LowRunway))
    }
}

/// Per-account cash flow for every bank account
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowReport {
    pub as_of: NaiveDate,
    pub accounts: Vec<BankCashFlow>,
}

impl CashFlowReport {
    pub fn generate(store: &EntityStore, as_of: NaiveDate, thresholds: &AnalysisThresholds) -> Self {
        let accounts = store
            .banks()
            .iter()
            .map(|bank| {
                let linked: Vec<&BudgetItem> = store
                    .budget_items()
                    .iter()
                    .filter(|i| i.is_user_linked_to(bank.id) && i.is_active_on(as_of))
                    .collect();

                let monthly_income: f64 =
                    linked.iter().filter(|i| i.is_income()).map(|i| i.magnitude()).sum();
                let monthly_expenses: f64 =
                    linked.iter().filter(|i| i.is_expense()).map(|i| i.magnitude()).sum();
                let net_flow = monthly_income - monthly_expenses;

                let runway_months = if net_flow < 0.0 {
                    Some((bank.balance / net_flow.abs()).floor())
                } else {
                    None
                };

                let mut risks = Vec::new();
                if monthly_expenses > bank.balance * thresholds.expense_to_balance_ratio {
                    risks.push(RiskReason::HighExpenseRatio);
                }
                if net_flow < 0.0 && bank.balance < net_flow.abs() * thresholds.runway_months {
                    risks.push(RiskReason::LowRunway);
                }
                let largest_expense = linked
                    .iter()
                    .filter(|i| i.is_expense())
                    .max_by(|a, b| a.magnitude().total_cmp(&b.magnitude()));
                if let Some(expense) = largest_expense {
                    if expense.magnitude() > bank.balance * thresholds.large_expense_ratio {
                        risks.push(RiskReason::LargeExpense {
                            name: expense.name.clone(),
                            amount: expense.magnitude(),
                        });
                    }
                }

                BankCashFlow {
                    bank_id: bank.id,
                    name: bank.name.clone(),
                    balance: bank.balance,
                    monthly_income,
                    monthly_expenses,
                    net_flow,
                    monthly_interest: interest::for_account(bank),
                    runway_months,
                    linked_items: linked.len(),
                    risks,
                }
            })
            .collect();

        Self { as_of, accounts }
    }

    pub fn at_risk(&self) -> impl Iterator<Item = &BankCashFlow> {
        self.accounts.iter().filter(|a| a.is_at_risk())
    }

    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str("Bank Cash Flow\n");
        output.push_str(&"=".repeat(86));
        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:>14} {:>14} {:>14} {:>12}  {}\n",
            "Account", "Balance", "Net Flow", "Interest", "Runway", "Flags"
        ));
        output.push_str(&"-".repeat(86));
        output.push('\n');

        for account in &self.accounts {
            let runway = account
                .runway_months
                .map_or_else(|| "-".to_string(), |m| format!("{} mo", m));
            let flags: Vec<&str> = account
                .risks
                .iter()
                .map(|r| match r {
                    RiskReason::HighExpenseRatio => "high expenses",
                    RiskReason::LowRunway => "low runway",
                    RiskReason::LargeExpense { .. } => "large expense",
                })
                .collect();

            output.push_str(&format!(
                "{:<24} {:>14} {:>14} {:>14} {:>12}  {}\n",
                truncate(&account.name, 24),
                format_currency(account.balance, currency),
                format_currency(account.net_flow, currency),
                format_currency(account.monthly_interest, currency),
                runway,
                flags.join(", ")
            ));
        }

        output
    }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BankAccount, BudgetItemId, BudgetType, InterestType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 6, 15)
    }

    fn item(id: u64, name: &str, amount: f64, item_type: BudgetType) -> BudgetItem {
        BudgetItem::new(BudgetItemId::new(id), name, amount, item_type, date(2024, 1, 1))
    }

    #[test]
    fn test_budget_analysis_surplus() {
        let mut store = EntityStore::new();
        store.insert_budget_item(item(1, "Salary", 5000.0, BudgetType::Income)).unwrap();
        store.insert_budget_item(item(2, "Rent", 2000.0, BudgetType::Expense)).unwrap();

        let analysis = BudgetAnalysis::generate(&store, today(), 0.0);
        assert_eq!(analysis.net_monthly, 3000.0);
        assert_eq!(analysis.savings_rate, 60.0);
        assert_eq!(analysis.annual_savings, 36000.0);
        assert_eq!(analysis.months_to_depletion, None);
    }

    #[test]
    fn test_budget_analysis_deficit_uses_bank_total() {
        let mut store = EntityStore::new();
        store
            .insert_bank(BankAccount::new(BankId::new(1), "Checking", 1500.0, 0.0, InterestType::Simple))
            .unwrap();
        store.insert_budget_item(item(1, "Rent", 500.0, BudgetType::Expense)).unwrap();

        let analysis = BudgetAnalysis::generate(&store, today(), 99999.0);
        assert_eq!(analysis.net_monthly, -500.0);
        assert_eq!(analysis.savings_rate, 0.0);
        assert_eq!(analysis.current_balance, 1500.0);
        assert_eq!(analysis.months_to_depletion, Some(3.0));
    }

    #[test]
    fn test_budget_analysis_fallback_and_inactive_items() {
        let mut store = EntityStore::new();
        store.insert_budget_item(item(1, "Rent", 500.0, BudgetType::Expense)).unwrap();
        store
            .insert_budget_item(item(2, "Old job", 900.0, BudgetType::Income).with_end_date(date(2024, 6, 14)))
            .unwrap();
        store
            .insert_budget_item(BudgetItem::new(BudgetItemId::new(3), "Raise", 50.0, BudgetType::Income, date(2024, 7, 1)))
            .unwrap();

        let analysis = BudgetAnalysis::generate(&store, today(), 2000.0);
        assert_eq!(analysis.total_income, 0.0);
        assert_eq!(analysis.current_balance, 2000.0);
        assert_eq!(analysis.months_to_depletion, Some(4.0));
    }

    #[test]
    fn test_income_breakdown() {
        let mut store = EntityStore::new();
        let mut interest = item(1, "Savings Interest", 4.0, BudgetType::Income).linked_to(BankId::new(1));
        interest.is_auto_generated = true;
        store.insert_budget_item(interest).unwrap();
        store
            .insert_budget_item(item(2, "Salary", 3000.0, BudgetType::Income).linked_to(BankId::new(1)))
            .unwrap();
        store.insert_budget_item(item(3, "Gift", 100.0, BudgetType::Income)).unwrap();

        let analysis = BudgetAnalysis::generate(&store, today(), 0.0);
        assert_eq!(analysis.total_income, 3104.0);
        assert_eq!(analysis.auto_generated_income, 4.0);
        assert_eq!(analysis.bank_linked_income, 3000.0);
    }

    #[test]
    fn test_bank_cash_flow_risks() {
        let thresholds = AnalysisThresholds::default();
        let mut store = EntityStore::new();
        let bank = BankAccount::new(BankId::new(1), "Checking", 1000.0, 0.0, InterestType::Simple);
        store.insert_bank(bank.clone()).unwrap();
        store
            .insert_budget_item(item(1, "Rent", 900.0, BudgetType::Expense).linked_to(bank.id))
            .unwrap();
        store
            .insert_budget_item(item(2, "Salary", 600.0, BudgetType::Income).linked_to(bank.id))
            .unwrap();

        let report = CashFlowReport::generate(&store, today(), &thresholds);
        let account = &report.accounts[0];
        assert_eq!(account.net_flow, -300.0);
        assert_eq!(account.runway_months, Some(3.0));
        assert_eq!(
            account.risks,
            vec![
                RiskReason::HighExpenseRatio,
                RiskReason::LowRunway,
                RiskReason::LargeExpense {
                    name: "Rent".into(),
                    amount: 900.0
                },
            ]
        );
        assert!(account.is_at_risk());
        assert_eq!(report.at_risk().count(), 1);
    }

    #[test]
    fn test_healthy_account_not_flagged() {
        let mut store = EntityStore::new();
        let bank = BankAccount::new(BankId::new(1), "Savings", 20000.0, 0.04, InterestType::Compound);
        store.insert_bank(bank.clone()).unwrap();
        store
            .insert_budget_item(item(1, "Gym", 50.0, BudgetType::Expense).linked_to(bank.id))
            .unwrap();

        let report = CashFlowReport::generate(&store, today(), &AnalysisThresholds::default());
        let account = &report.accounts[0];
        assert!(account.risks.is_empty());
        assert!(account.runway_months.is_some());
        assert!(account.monthly_interest > 0.0);
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let mut store = EntityStore::new();
        let bank = BankAccount::new(BankId::new(1), "Checking", 1000.0, 0.0, InterestType::Simple);
        store.insert_bank(bank.clone()).unwrap();
        store
            .insert_budget_item(item(1, "Car", 300.0, BudgetType::Expense).linked_to(bank.id))
            .unwrap();

        let strict = AnalysisThresholds {
            expense_to_balance_ratio: 0.25,
            ..AnalysisThresholds::default()
        };
        let lenient = CashFlowReport::generate(&store, today(), &AnalysisThresholds::default());
        let flagged = CashFlowReport::generate(&store, today(), &strict);

        assert!(!lenient.accounts[0].risks.contains(&RiskReason::HighExpenseRatio));
        assert!(flagged.accounts[0].risks.contains(&RiskReason::HighExpenseRatio));
    }

    #[test]
    fn test_format_terminal() {
        let mut store = EntityStore::new();
        store
            .insert_bank(BankAccount::new(BankId::new(1), "Checking", 1000.0, 0.0, InterestType::Simple))
            .unwrap();
        let report = CashFlowReport::generate(&store, today(), &AnalysisThresholds::default());

        let output = report.format_terminal("$");
        assert!(output.contains("Checking"));
        assert!(output.contains("$1,000.00"));
    }
}
