//! Forecast output model
//!
//! One `ForecastPoint` per projected month. Points are produced fresh on each
//! projection and never mutated afterwards.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::ids::BankId;

/// One month's projected snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// First day of the projected month
    pub month_start: NaiveDate,
    /// Short label such as "Mar 2025"
    pub month_label: String,
    /// Total balance before this month's activity
    pub total_balance: f64,
    /// Net change contributed by this month
    pub monthly_delta: f64,
    /// Interest accrued across all accounts this month
    pub monthly_interest: f64,
    /// Each account's working balance after this month's updates
    pub per_account_balance: BTreeMap<BankId, f64>,
}

impl ForecastPoint {
    /// Projected balance of one account, if it is tracked
    pub fn account_balance(&self, bank_id: BankId) -> Option<f64> {
        self.per_account_balance.get(&bank_id).copied()
    }

    /// Accounts whose projected balance went below zero this month
    pub fn overdrawn_accounts(&self) -> Vec<BankId> {
        self.per_account_balance
            .iter()
            .filter(|(_, balance)| **balance < 0.0)
            .map(|(id, _)| *id)
            .collect()
    }
}

/// Label used for a month starting on `month_start`
pub fn month_label(month_start: NaiveDate) -> String {
    month_start.format("%b %Y").to_string()
}
