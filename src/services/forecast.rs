//! Forecast engine
//!
//! Walks forward month by month from the current month, posting bank-linked
//! cash flows to each account before that account accrues interest, and emits
//! one `ForecastPoint` per month (`months + 1` points in total).

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use tracing::{debug, warn};

use crate::models::forecast::month_label;
use crate::models::{BankAccount, BankId, BudgetItem, ForecastPoint};

use super::interest::monthly_interest;

/// Longest accepted projection horizon (100 years)
pub const MAX_FORECAST_MONTHS: u32 = 1200;

/// Inputs that are not part of the entity store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastOptions {
    /// Any day in the first projected month
    pub start: NaiveDate,
    /// Starting total when no bank accounts exist
    pub fallback_starting_balance: f64,
}

impl ForecastOptions {
    pub fn starting(start: NaiveDate) -> Self {
        Self {
            start,
            fallback_starting_balance: 0.0,
        }
    }

    pub fn with_fallback_balance(mut self, balance: f64) -> Self {
        self.fallback_starting_balance = balance;
        self
    }

    fn first_month(&self) -> NaiveDate {
        self.start.with_day(1).unwrap_or(self.start)
    }
}

/// Project `months` months ahead, at most `MAX_FORECAST_MONTHS`
///
/// Point 0 carries the starting total. Each point's `total_balance` is the
/// balance before that month's activity, while `per_account_balance` is
/// taken after it. Linked items pointing at unknown accounts still count
/// toward the total but move no account balance.
pub fn project(
    items: &[BudgetItem],
    banks: &[BankAccount],
    months: u32,
    options: &ForecastOptions,
) -> Vec<ForecastPoint> {
    if months > MAX_FORECAST_MONTHS {
        warn!(requested = months, max = MAX_FORECAST_MONTHS, "forecast horizon clamped");
    }
    let months = months.min(MAX_FORECAST_MONTHS);

    let mut running_total = if banks.is_empty() {
        options.fallback_starting_balance
    } else {
        banks.iter().map(|b| b.balance).sum()
    };

    let mut working: BTreeMap<BankId, f64> = banks.iter().map(|b| (b.id, b.balance)).collect();
    let first_month = options.first_month();
    let mut points = Vec::with_capacity(months as usize + 1);

    for i in 0..=months {
        let Some(month_start) = first_month.checked_add_months(Months::new(i)) else {
            warn!(month = i, "forecast horizon exceeds the calendar range");
            break;
        };

        let active: Vec<&BudgetItem> = items
            .iter()
            .filter(|item| !item.is_auto_generated && item.is_active_on(month_start))
            .collect();

        for item in &active {
            let Some(balance) = item.linked_bank_id.and_then(|id| working.get_mut(&id)) else {
                continue;
            };
            if item.is_income() {
                *balance += item.magnitude();
            } else {
                *balance -= item.magnitude();
            }
        }

        let mut total_interest = 0.0;
        for bank in banks {
            let Some(balance) = working.get_mut(&bank.id) else {
                continue;
            };
            if *balance > 0.0 {
                let interest = monthly_interest(*balance, bank.interest_rate, bank.interest_type);
                *balance += interest;
                total_interest += interest;
            } else if *balance < 0.0 {
                warn!(
                    bank = %bank.name,
                    balance = *balance,
                    month = %month_label(month_start),
                    "projected balance is negative"
                );
            }
        }

        let non_interest_total: f64 = active.iter().map(|item| item.amount).sum();
        let monthly_delta = non_interest_total + total_interest;

        points.push(ForecastPoint {
            month_start,
            month_label: month_label(month_start),
            total_balance: running_total,
            monthly_delta,
            monthly_interest: total_interest,
            per_account_balance: working.clone(),
        });

        if i < months {
            running_total += monthly_delta;
        }
    }

    debug!(points = points.len(), "forecast projected");
    points
}

/// First point whose total balance is negative, if any
pub fn first_negative_month(points: &[ForecastPoint]) -> Option<&ForecastPoint> {
    points.iter().find(|p| p.total_balance < 0.0)
}
