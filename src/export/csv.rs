//! CSV Export functionality
//!
//! Exports forecast projections and budget items in spreadsheet-friendly form.

use std::io::Write;

use crate::error::{ForecastError, ForecastResult};
use crate::models::{BankAccount, ForecastPoint};
use crate::storage::EntityStore;

fn export_err(e: csv::Error) -> ForecastError {
    ForecastError::Export(e.to_string())
}

/// Export a projection, one row per month
///
/// The four summary columns are followed by one column per bank account
/// holding that account's projected balance for the month.
pub fn export_forecast_csv<W: Write>(
    points: &[ForecastPoint],
    banks: &[BankAccount],
    writer: W,
) -> ForecastResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec![
        "Month".to_string(),
        "Projected Balance".to_string(),
        "Monthly Change".to_string(),
        "Interest Earnings".to_string(),
    ];
    header.extend(banks.iter().map(|b| b.name.clone()));
    csv.write_record(&header).map_err(export_err)?;

    for point in points {
        let mut row = vec![
            point.month_label.clone(),
            format!("{:.2}", point.total_balance),
            format!("{:.2}", point.monthly_delta),
            format!("{:.2}", point.monthly_interest),
        ];
        row.extend(
            banks
                .iter()
                .map(|b| format!("{:.2}", point.account_balance(b.id).unwrap_or(0.0))),
        );
        csv.write_record(&row).map_err(export_err)?;
    }

    csv.flush()
        .map_err(|e| ForecastError::Export(e.to_string()))?;
    Ok(())
}

/// Export all budget items
pub fn export_budget_csv<W: Write>(store: &EntityStore, writer: W) -> ForecastResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        "ID",
        "Name",
        "Type",
        "Amount",
        "Start Date",
        "End Date",
        "Linked Bank",
        "Auto Generated",
    ])
    .map_err(export_err)?;

    for item in store.budget_items() {
        let bank_name = item
            .linked_bank_id
            .and_then(|id| store.bank(id))
            .map(|b| b.name.clone())
            .unwrap_or_default();

        csv.write_record([
            item.id.to_string(),
            item.name.clone(),
            item.item_type.to_string(),
            format!("{:.2}", item.amount),
            item.start_date.to_string(),
            item.end_date.map(|d| d.to_string()).unwrap_or_default(),
            bank_name,
            item.is_auto_generated.to_string(),
        ])
        .map_err(export_err)?;
    }

    csv.flush()
        .map_err(|e| ForecastError::Export(e.to_string()))?;
    Ok(())
}
