//! YAML Export functionality
//!
//! Same document as the JSON export, in a form that is easier to read and
//! edit by hand.

use std::io::Write;

use serde_json::Value;

use crate::error::{ForecastError, ForecastResult};
use crate::storage::{EntityStore, StoreDocument};

use super::json::{document_from_value, FullExport};

/// Export everything to YAML
pub fn export_full_yaml<W: Write>(store: &EntityStore, writer: &mut W) -> ForecastResult<()> {
    let export = FullExport::from_store(store);

    writeln!(writer, "# budget-forecast data export")
        .and_then(|_| writeln!(writer, "# Generated: {}", export.export_date.to_rfc3339()))
        .and_then(|_| writeln!(writer))
        .map_err(|e| ForecastError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| ForecastError::Export(e.to_string()))?;

    Ok(())
}

/// Parse a YAML export, with the same checks as a JSON import
pub fn import_from_yaml(yaml_str: &str) -> ForecastResult<StoreDocument> {
    let value: Value = serde_yaml::from_str(yaml_str)
        .map_err(|e| ForecastError::Import(format!("Error reading file: {}", e)))?;
    document_from_value(value)
}
