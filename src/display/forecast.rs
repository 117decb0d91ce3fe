//! Forecast display formatting
//!
//! One table row per projected month, with a column per bank account.

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};

use crate::models::{BankAccount, ForecastPoint};
use crate::services::forecast::first_negative_month;

use super::format_currency;

/// Format a projection as a table
pub fn format_forecast_table(points: &[ForecastPoint], banks: &[BankAccount], currency: &str) -> String {
    if points.is_empty() {
        return "No forecast data.".to_string();
    }

    let mut builder = Builder::default();

    let mut header = vec![
        "Month".to_string(),
        "Balance".to_string(),
        "Change".to_string(),
        "Interest".to_string(),
    ];
    header.extend(banks.iter().map(|b| b.name.clone()));
    builder.push_record(header);

    for point in points {
        let mut row = vec![
            point.month_label.clone(),
            format_currency(point.total_balance, currency),
            format_currency(point.monthly_delta, currency),
            format_currency(point.monthly_interest, currency),
        ];
        row.extend(banks.iter().map(|b| {
            point
                .account_balance(b.id)
                .map(|balance| format_currency(balance, currency))
                .unwrap_or_default()
        }));
        builder.push_record(row);
    }

    let mut table = builder.build();
    table
        .with(Style::psql())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));

    table.to_string()
}

/// Summarize a projection: start, end, growth, and first negative month
pub fn format_forecast_summary(points: &[ForecastPoint], currency: &str) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return String::new();
    };

    let total_interest: f64 = points.iter().map(|p| p.monthly_interest).sum();
    let mut output = format!(
        "{} to {}: {} -> {} ({} interest)\n",
        first.month_label,
        last.month_label,
        format_currency(first.total_balance, currency),
        format_currency(last.total_balance, currency),
        format_currency(total_interest, currency),
    );

    if let Some(point) = first_negative_month(points) {
        output.push_str(&format!(
            "Balance goes negative in {} ({})\n",
            point.month_label,
            format_currency(point.total_balance, currency)
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BankId, BudgetItem, BudgetItemId, BudgetType, InterestType};
    use crate::services::{project, ForecastOptions};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_forecast_table() {
        let banks = vec![BankAccount::new(BankId::new(1), "Checking", 1000.0, 0.0, InterestType::Simple)];
        let points = project(&[], &banks, 2, &ForecastOptions::starting(date(2024, 1, 1)));

        let output = format_forecast_table(&points, &banks, "$");
        assert!(output.contains("Month"));
        assert!(output.contains("Checking"));
        assert!(output.contains("Mar 2024"));
        assert!(output.contains("$1,000.00"));
    }

    #[test]
    fn test_summary_reports_negative_month() {
        let rent = BudgetItem::new(BudgetItemId::new(1), "Rent", 600.0, BudgetType::Expense, date(2024, 1, 1));
        let points = project(
            &[rent],
            &[],
            3,
            &ForecastOptions::starting(date(2024, 1, 1)).with_fallback_balance(1000.0),
        );

        let output = format_forecast_summary(&points, "$");
        assert!(output.starts_with("Jan 2024 to Apr 2024: $1,000.00 -> -$800.00"));
        assert!(output.contains("Balance goes negative in Mar 2024 (-$200.00)"));
    }

    #[test]
    fn test_empty() {
        assert_eq!(format_forecast_table(&[], &[], "$"), "No forecast data.");
        assert!(format_forecast_summary(&[], "$").is_empty());
    }
}
