//! Bank account performance and allocation
//!
//! Interest earnings across accounts, rate comparisons, and suggestions for
//! where balances would earn more.

use serde::Serialize;

use crate::config::AnalysisThresholds;
use crate::display::format_currency;
use crate::models::{BankAccount, BankId, InterestType};
use crate::services::interest;

/// An account identified by its rate, for best/worst comparisons
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateHolder {
    pub bank_id: BankId,
    pub name: String,
    /// Annual rate as a decimal
    pub rate: f64,
}

impl RateHolder {
    fn from_account(bank: &BankAccount) -> Self {
        Self {
            bank_id: bank.id,
            name: bank.name.clone(),
            rate: bank.interest_rate,
        }
    }
}

/// Highest and lowest rate accounts, first wins on ties
fn rate_extremes(banks: &[BankAccount]) -> Option<(&BankAccount, &BankAccount)> {
    let first = banks.first()?;
    let mut highest = first;
    let mut lowest = first;
    for bank in &banks[1..] {
        if bank.interest_rate > highest.interest_rate {
            highest = bank;
        }
        if bank.interest_rate < lowest.interest_rate {
            lowest = bank;
        }
    }
    Some((highest, lowest))
}

/// Aggregate interest performance across all accounts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankPerformance {
    pub account_count: usize,
    pub total_balance: f64,
    pub monthly_interest: f64,
    pub annual_interest: f64,
    /// Unweighted mean of account rates
    pub average_rate: f64,
    pub compound_accounts: usize,
    pub simple_accounts: usize,
    pub best: Option<RateHolder>,
    pub worst: Option<RateHolder>,
    /// Monthly interest is below the configured yield on the total balance
    pub below_market: bool,
    /// Largest balance is far above the smallest
    pub rebalancing_suggested: bool,
}

impl BankPerformance {
    pub fn generate(banks: &[BankAccount], thresholds: &AnalysisThresholds) -> Self {
        let total_balance: f64 = banks.iter().map(|b| b.balance).sum();
        let monthly_interest: f64 = banks.iter().map(interest::for_account).sum();
        let average_rate = if banks.is_empty() {
            0.0
        } else {
            banks.iter().map(|b| b.interest_rate).sum::<f64>() / banks.len() as f64
        };

        let (best, worst) = match rate_extremes(banks) {
            Some((high, low)) => (
                Some(RateHolder::from_account(high)),
                Some(RateHolder::from_account(low)),
            ),
            None => (None, None),
        };

        let rebalancing_suggested = banks.len() > 1 && {
            let max = banks.iter().map(|b| b.balance).fold(f64::NEG_INFINITY, f64::max);
            let min = banks.iter().map(|b| b.balance).fold(f64::INFINITY, f64::min);
            max / min > thresholds.rebalancing_balance_ratio
        };

        Self {
            account_count: banks.len(),
            total_balance,
            monthly_interest,
            annual_interest: monthly_interest * 12.0,
            average_rate,
            compound_accounts: banks
                .iter()
                .filter(|b| b.interest_type == InterestType::Compound)
                .count(),
            simple_accounts: banks
                .iter()
                .filter(|b| b.interest_type == InterestType::Simple)
                .count(),
            best,
            worst,
            below_market: !banks.is_empty()
                && monthly_interest < total_balance * thresholds.below_market_monthly_yield,
            rebalancing_suggested,
        }
    }

    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str("Bank Performance\n");
        output.push_str(&"=".repeat(40));
        output.push('\n');

        if self.account_count == 0 {
            output.push_str("No bank accounts.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<20} {:>18}\n",
            "Total Balance",
            format_currency(self.total_balance, currency)
        ));
        output.push_str(&format!(
            "{:<20} {:>18}\n",
            "Monthly Interest",
            format_currency(self.monthly_interest, currency)
        ));
        output.push_str(&format!(
            "{:<20} {:>18}\n",
            "Annual Projection",
            format_currency(self.annual_interest, currency)
        ));
        output.push_str(&format!(
            "{:<20} {:>17.2}%\n",
            "Average Rate",
            self.average_rate * 100.0
        ));
        output.push_str(&format!(
            "{:<20} {:>18}\n",
            "Compound / Simple",
            format!("{} / {}", self.compound_accounts, self.simple_accounts)
        ));
        if let (Some(best), Some(worst)) = (&self.best, &self.worst) {
            output.push_str(&format!(
                "{:<20} {} ({:.2}%)\n",
                "Best Rate",
                best.name,
                best.rate * 100.0
            ));
            output.push_str(&format!(
                "{:<20} {} ({:.2}%)\n",
                "Lowest Rate",
                worst.name,
                worst.rate * 100.0
            ));
        }

        output
    }
}

/// Where money would earn more
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationAdvice {
    pub highest: RateHolder,
    pub lowest: RateHolder,
    /// Highest minus lowest rate
    pub spread: f64,
    /// The spread is wide enough to suggest moving funds
    pub spread_exceeded: bool,
    /// The highest rate beats the lowest by the configured multiplier
    pub reallocation_suggested: bool,
}

impl AllocationAdvice {
    /// Compare rates; `None` without at least two accounts
    pub fn generate(banks: &[BankAccount], thresholds: &AnalysisThresholds) -> Option<Self> {
        if banks.len() < 2 {
            return None;
        }
        let (high, low) = rate_extremes(banks)?;
        let spread = high.interest_rate - low.interest_rate;

        Some(Self {
            highest: RateHolder::from_account(high),
            lowest: RateHolder::from_account(low),
            spread,
            spread_exceeded: spread > thresholds.rate_spread,
            reallocation_suggested: high.interest_rate
                > low.interest_rate * thresholds.reallocation_multiplier,
        })
    }

    /// Extra monthly interest if the lowest-rate balance moved to the highest rate
    pub fn monthly_gain(&self, banks: &[BankAccount]) -> f64 {
        let Some(low) = banks.iter().find(|b| b.id == self.lowest.bank_id) else {
            return 0.0;
        };
        let Some(high) = banks.iter().find(|b| b.id == self.highest.bank_id) else {
            return 0.0;
        };
        interest::monthly_interest(low.balance, high.interest_rate, high.interest_type)
            - interest::for_account(low)
    }
}
