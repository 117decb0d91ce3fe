//! JSON file backend
//!
//! Persists the whole store to a single `financial_data.json` document with
//! top-level `budget` and `banks` arrays.

use std::path::PathBuf;

use tracing::debug;

use crate::error::ForecastResult;

use super::file_io::{read_json_optional, write_json_atomic};
use super::store::StoreDocument;
use super::StateStore;

/// File-backed persistence for the entity store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> ForecastResult<Option<StoreDocument>> {
        let document: Option<StoreDocument> = read_json_optional(&self.path)?;
        if let Some(doc) = &document {
            debug!(
                path = %self.path.display(),
                banks = doc.banks.len(),
                budget_items = doc.budget.len(),
                "loaded store document"
            );
        }
        Ok(document)
    }

    fn save(&self, document: &StoreDocument) -> ForecastResult<()> {
        write_json_atomic(&self.path, document)?;
        debug!(
            path = %self.path.display(),
            banks = document.banks.len(),
            budget_items = document.budget.len(),
            "saved store document"
        );
        Ok(())
    }
}
