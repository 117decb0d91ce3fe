//! Export module for budget-forecast
//!
//! Provides complete data export and import:
//! - JSON: full data export/import and a bank-only export with summary
//! - YAML: human-readable variant of the full export
//! - CSV: forecast projections and budget items

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_budget_csv, export_forecast_csv};
pub use json::{
    apply_import, export_banks_json, export_full_json, import_from_json, BankExport, FullExport,
    EXPORT_VERSION,
};
pub use yaml::{export_full_yaml, import_from_yaml};
