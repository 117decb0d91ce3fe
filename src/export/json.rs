//! JSON export and import
//!
//! The full export carries both collections plus an export timestamp. Import
//! is strict: the document must contain `budget` and `banks` arrays and
//! every entry must deserialize, otherwise nothing is replaced.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ForecastError, ForecastResult};
use crate::models::{BankAccount, BudgetItem, InterestType};
use crate::notify::Notification;
use crate::storage::{EntityStore, Storage, StoreDocument};

/// Version written into full exports
pub const EXPORT_VERSION: &str = "1.0";

/// Version written into bank-only exports
pub const BANK_EXPORT_VERSION: &str = "1.2";

/// Full data export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullExport {
    pub budget: Vec<BudgetItem>,
    pub banks: Vec<BankAccount>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl FullExport {
    pub fn from_store(store: &EntityStore) -> Self {
        Self {
            budget: store.budget_items().to_vec(),
            banks: store.banks().to_vec(),
            export_date: Utc::now(),
            version: EXPORT_VERSION.to_string(),
        }
    }

    pub fn into_document(self) -> StoreDocument {
        StoreDocument {
            budget: self.budget,
            banks: self.banks,
        }
    }
}

/// Summary block of a bank-only export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankSummary {
    pub total_accounts: usize,
    pub total_balance: f64,
    /// Mean rate in percent
    pub average_interest_rate: f64,
    pub compound_accounts: usize,
    pub simple_accounts: usize,
}

/// Bank accounts with a summary, for sharing account data alone
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankExport {
    pub banks: Vec<BankAccount>,
    pub summary: BankSummary,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl BankExport {
    pub fn from_store(store: &EntityStore) -> Self {
        let banks = store.banks().to_vec();
        let average_interest_rate = if banks.is_empty() {
            0.0
        } else {
            banks.iter().map(|b| b.interest_rate).sum::<f64>() / banks.len() as f64 * 100.0
        };
        let summary = BankSummary {
            total_accounts: banks.len(),
            total_balance: store.total_bank_balance(),
            average_interest_rate,
            compound_accounts: banks
                .iter()
                .filter(|b| b.interest_type == InterestType::Compound)
                .count(),
            simple_accounts: banks
                .iter()
                .filter(|b| b.interest_type == InterestType::Simple)
                .count(),
        };

        Self {
            banks,
            summary,
            export_date: Utc::now(),
            version: BANK_EXPORT_VERSION.to_string(),
        }
    }
}

/// Export everything to JSON
pub fn export_full_json<W: Write>(store: &EntityStore, writer: &mut W, pretty: bool) -> ForecastResult<()> {
    let export = FullExport::from_store(store);

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| ForecastError::Export(e.to_string()))?;

    Ok(())
}

/// Export bank accounts with their summary
pub fn export_banks_json<W: Write>(store: &EntityStore, writer: &mut W) -> ForecastResult<()> {
    serde_json::to_writer_pretty(writer, &BankExport::from_store(store))
        .map_err(|e| ForecastError::Export(e.to_string()))
}

/// Check the shape of an import and deserialize both collections
///
/// Extra fields such as `exportDate` and `version` are ignored.
pub fn document_from_value(mut value: Value) -> ForecastResult<StoreDocument> {
    let Some(object) = value.as_object_mut() else {
        return Err(ForecastError::Import("Invalid budget data format".into()));
    };

    let budget = object.remove("budget").unwrap_or(Value::Null);
    let banks = object.remove("banks").unwrap_or(Value::Null);
    if !budget.is_array() || !banks.is_array() {
        return Err(ForecastError::Import("Invalid budget data format".into()));
    }

    let budget: Vec<BudgetItem> = serde_json::from_value(budget)
        .map_err(|e| ForecastError::Import(format!("Invalid budget item: {}", e)))?;
    let banks: Vec<BankAccount> = serde_json::from_value(banks)
        .map_err(|e| ForecastError::Import(format!("Invalid bank account: {}", e)))?;

    Ok(StoreDocument { budget, banks })
}

/// Parse a JSON export
pub fn import_from_json(json_str: &str) -> ForecastResult<StoreDocument> {
    let value: Value = serde_json::from_str(json_str)
        .map_err(|e| ForecastError::Import(format!("Error reading file: {}", e)))?;
    document_from_value(value)
}

/// Replace all data with an imported document
///
/// On failure the storage is left untouched.
pub fn apply_import(storage: &mut Storage, document: StoreDocument) -> ForecastResult<()> {
    let (items, banks) = (document.budget.len(), document.banks.len());
    storage.replace_all(document)?;
    storage.notify(Notification::success(format!(
        "Imported {} budget items and {} bank accounts",
        items, banks
    )));
    Ok(())
}
