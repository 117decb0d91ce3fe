//! Display formatting for terminal output
//!
//! Provides utilities for formatting bank accounts, budget items, forecasts,
//! and notifications for terminal display.

pub mod bank;
pub mod budget;
pub mod forecast;

pub use bank::{format_bank_details, format_bank_list};
pub use budget::{format_budget_details, format_budget_list};
pub use forecast::{format_forecast_summary, format_forecast_table};

use crate::notify::Notification;

/// Format an amount with thousands separators, e.g. `-$1,234.56`
pub fn format_currency(amount: f64, symbol: &str) -> String {
    if !amount.is_finite() {
        return format!("{}{}", symbol, amount);
    }

    let cents = (amount.abs() * 100.0).round() as u128;
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}{}.{:02}", sign, symbol, grouped, cents % 100)
}

/// Format a decimal rate as a percentage, e.g. `0.045` -> `4.50%`
pub fn format_rate(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// One line per notification, prefixed with its severity icon
pub fn format_notifications(notifications: &[Notification]) -> String {
    notifications
        .iter()
        .map(|n| format!("{}\n", n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0, "$"), "$0.00");
        assert_eq!(format_currency(1234.5, "$"), "$1,234.50");
        assert_eq!(format_currency(-200.0, "$"), "-$200.00");
        assert_eq!(format_currency(1_000_000.004, "$"), "$1,000,000.00");
        assert_eq!(format_currency(999.999, "EUR "), "EUR 1,000.00");
        assert_eq!(format_currency(-0.001, "$"), "$0.00");
        assert_eq!(format_currency(f64::NAN, "$"), "$NaN");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.045), "4.50%");
        assert_eq!(format_rate(0.0), "0.00%");
    }

    #[test]
    fn test_format_notifications() {
        let output = format_notifications(&[
            Notification::success("Added \"Savings\""),
            Notification::warning("Low balance"),
        ]);
        assert_eq!(output.lines().count(), 2);
        assert!(output.contains("Low balance"));
    }
}
