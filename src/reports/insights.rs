//! Advisory insights
//!
//! Turns the analyses into `{message, severity}` notifications. Nothing here
//! mutates the store.

use chrono::NaiveDate;

use crate::config::Settings;
use crate::display::format_currency;
use crate::models::ForecastPoint;
use crate::notify::Notification;
use crate::services::forecast::first_negative_month;
use crate::storage::EntityStore;

use super::bank_insights::{AllocationAdvice, BankPerformance};
use super::cash_flow::{BudgetAnalysis, CashFlowReport, RiskReason};
use super::spending::SpendingTrends;

/// Collect every advisory notification for the current data
///
/// `forecast` may be empty, in which case no overdraft insight is produced.
pub fn collect(
    store: &EntityStore,
    forecast: &[ForecastPoint],
    today: NaiveDate,
    settings: &Settings,
) -> Vec<Notification> {
    let currency = settings.currency_symbol.as_str();
    let thresholds = &settings.thresholds;
    let money = |amount: f64| format_currency(amount, currency);
    let mut insights = Vec::new();

    let analysis = BudgetAnalysis::generate(store, today, settings.fallback_starting_balance);
    if analysis.net_monthly < 0.0 {
        insights.push(Notification::warning(format!(
            "Your budget shows a monthly deficit of {}",
            money(analysis.net_monthly.abs())
        )));
        if let Some(months) = analysis.months_to_depletion {
            if months < thresholds.depletion_warning_months {
                insights.push(Notification::warning(format!(
                    "At this rate your funds will be depleted in {:.1} months",
                    months
                )));
            }
        }
    } else if analysis.net_monthly > 0.0 {
        insights.push(Notification::success(format!(
            "Monthly surplus of {} ({} per year)",
            money(analysis.net_monthly),
            money(analysis.annual_savings)
        )));
        if analysis.savings_rate < thresholds.low_savings_rate {
            insights.push(Notification::info(format!(
                "Consider increasing your savings rate (currently {:.1}%)",
                analysis.savings_rate
            )));
        }
    }

    let cash_flow = CashFlowReport::generate(store, today, thresholds);
    let linked_banks = cash_flow.accounts.iter().filter(|a| a.linked_items > 0).count();
    if linked_banks > 0 {
        insights.push(Notification::info(format!(
            "{} bank account(s) have linked budget items",
            linked_banks
        )));
    }

    for account in &cash_flow.accounts {
        for risk in &account.risks {
            let notification = match risk {
                RiskReason::HighExpenseRatio => Notification::warning(format!(
                    "{} may have cash flow issues: linked expenses of {} against a balance of {}",
                    account.name,
                    money(account.monthly_expenses),
                    money(account.balance)
                )),
                RiskReason::LowRunway => Notification::warning(format!(
                    "{} has negative cash flow ({}/month) and low reserves ({} months left)",
                    account.name,
                    money(account.net_flow),
                    account.runway_months.unwrap_or(0.0)
                )),
                RiskReason::LargeExpense { name, amount } => Notification::info(format!(
                    "{}: \"{}\" ({}) is a large portion of the current balance",
                    account.name,
                    name,
                    money(*amount)
                )),
            };
            insights.push(notification);
        }
    }

    if let Some(advice) = AllocationAdvice::generate(store.banks(), thresholds) {
        if advice.spread_exceeded || advice.reallocation_suggested {
            insights.push(Notification::info(format!(
                "Consider moving funds from {} ({:.2}%) to {} ({:.2}%)",
                advice.lowest.name,
                advice.lowest.rate * 100.0,
                advice.highest.name,
                advice.highest.rate * 100.0
            )));
        }
    }

    let performance = BankPerformance::generate(store.banks(), thresholds);
    if performance.below_market {
        insights.push(Notification::info(format!(
            "Interest earnings of {}/month are below market rates for {}",
            money(performance.monthly_interest),
            money(performance.total_balance)
        )));
    }
    if performance.rebalancing_suggested {
        insights.push(Notification::info(
            "Account balances are very uneven; consider rebalancing",
        ));
    }

    let spending = SpendingTrends::generate(store, today, thresholds);
    if spending.dominant {
        if let Some(top) = spending.largest() {
            insights.push(Notification::info(format!(
                "\"{}\" accounts for {:.1}% of monthly expenses",
                top.name, top.percentage
            )));
        }
    }

    if let Some(point) = first_negative_month(forecast) {
        insights.push(Notification::warning(format!(
            "Projected balance goes negative in {} ({})",
            point.month_label,
            money(point.total_balance)
        )));
    }
    let overdrawn = forecast
        .iter()
        .find_map(|p| p.overdrawn_accounts().first().map(|id| (p, *id)));
    if let Some((point, bank_id)) = overdrawn {
        let name = store
            .bank(bank_id)
            .map_or_else(|| bank_id.to_string(), |b| b.name.clone());
        insights.push(Notification::warning(format!(
            "{} is projected to be overdrawn by {}",
            name, point.month_label
        )));
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BankAccount, BankId, BudgetItem, BudgetItemId, BudgetType, InterestType};
    use crate::notify::Severity;
    use crate::services::{project, ForecastOptions};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 6, 15)
    }

    fn item(id: u64, name: &str, amount: f64, item_type: BudgetType) -> BudgetItem {
        BudgetItem::new(BudgetItemId::new(id), name, amount, item_type, date(2024, 1, 1))
    }

    fn messages(insights: &[Notification]) -> Vec<&str> {
        insights.iter().map(|n| n.message.as_str()).collect()
    }

    #[test]
    fn test_empty_store_has_no_insights() {
        let insights = collect(&EntityStore::new(), &[], today(), &Settings::default());
        assert!(insights.is_empty());
    }

    #[test]
    fn test_deficit_and_depletion() {
        let mut store = EntityStore::new();
        store
            .insert_bank(BankAccount::new(BankId::new(1), "Checking", 1500.0, 0.0, InterestType::Simple))
            .unwrap();
        store.insert_budget_item(item(1, "Rent", 500.0, BudgetType::Expense)).unwrap();

        let insights = collect(&store, &[], today(), &Settings::default());
        let messages = messages(&insights);
        assert!(messages.contains(&"Your budget shows a monthly deficit of $500.00"));
        assert!(messages.contains(&"At this rate your funds will be depleted in 3.0 months"));
        assert_eq!(insights[0].severity, Severity::Warning);
    }

    #[test]
    fn test_surplus_with_low_savings_rate() {
        let mut store = EntityStore::new();
        store.insert_budget_item(item(1, "Salary", 1000.0, BudgetType::Income)).unwrap();
        store.insert_budget_item(item(2, "Rent", 950.0, BudgetType::Expense)).unwrap();

        let insights = collect(&store, &[], today(), &Settings::default());
        let messages = messages(&insights);
        assert!(messages.contains(&"Monthly surplus of $50.00 ($600.00 per year)"));
        assert!(messages.contains(&"Consider increasing your savings rate (currently 5.0%)"));
        assert!(messages.contains(&"\"Rent\" accounts for 100.0% of monthly expenses"));
    }

    #[test]
    fn test_bank_risks_and_allocation() {
        let mut store = EntityStore::new();
        let checking = BankAccount::new(BankId::new(1), "Checking", 1000.0, 0.001, InterestType::Simple);
        let hysa = BankAccount::new(BankId::new(2), "HYSA", 5000.0, 0.045, InterestType::Compound);
        store.insert_bank(checking.clone()).unwrap();
        store.insert_bank(hysa).unwrap();
        store
            .insert_budget_item(item(1, "Rent", 900.0, BudgetType::Expense).linked_to(checking.id))
            .unwrap();

        let insights = collect(&store, &[], today(), &Settings::default());
        let messages = messages(&insights);

        assert!(messages.contains(&"1 bank account(s) have linked budget items"));
        assert!(messages.iter().any(|m| m.starts_with("Checking may have cash flow issues")));
        assert!(messages.iter().any(|m| m.starts_with("Checking has negative cash flow")));
        assert!(messages.contains(&"Checking: \"Rent\" ($900.00) is a large portion of the current balance"));
        assert!(messages.contains(&"Consider moving funds from Checking (0.10%) to HYSA (4.50%)"));
    }

    #[test]
    fn test_forecast_overdraft() {
        let mut store = EntityStore::new();
        let bank = BankAccount::new(BankId::new(1), "Checking", 100.0, 0.0, InterestType::Simple);
        store.insert_bank(bank.clone()).unwrap();
        store
            .insert_budget_item(item(1, "Rent", 300.0, BudgetType::Expense).linked_to(bank.id))
            .unwrap();

        let points = project(
            store.budget_items(),
            store.banks(),
            2,
            &ForecastOptions::starting(date(2024, 6, 1)),
        );
        let insights = collect(&store, &points, today(), &Settings::default());
        let messages = messages(&insights);

        assert!(messages.contains(&"Projected balance goes negative in Jul 2024 (-$200.00)"));
        assert!(messages.contains(&"Checking is projected to be overdrawn by Jun 2024"));
    }

    #[test]
    fn test_collect_does_not_mutate() {
        let mut store = EntityStore::new();
        store.insert_budget_item(item(1, "Rent", 500.0, BudgetType::Expense)).unwrap();
        let before = store.to_document();

        collect(&store, &[], today(), &Settings::default());
        assert_eq!(store.to_document(), before);
    }
}
