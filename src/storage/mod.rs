//! Storage layer for budget-forecast
//!
//! `Storage` owns the in-memory entity store and writes the whole store back
//! through a pluggable `StateStore` after every completed mutation. Load and
//! save failures are logged and surfaced as notifications; the in-memory
//! state stays authoritative either way.

pub mod file_io;
pub mod json_file;
pub mod memory;
pub mod store;

pub use file_io::{read_json_optional, read_json_required, write_json_atomic};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use store::{EntityStore, StoreDocument};

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::audit::{AuditEntry, AuditLogger, EntityType, Origin};
use crate::config::{ForecastPaths, Settings};
use crate::error::{ForecastError, ForecastResult};
use crate::notify::Notification;
use crate::services::sync::{SyncReport, Synchronizer, DEFAULT_TOLERANCE};

/// Persistence backend for the entity store
pub trait StateStore {
    /// Load the last saved document; `None` when nothing was ever saved
    fn load(&self) -> ForecastResult<Option<StoreDocument>>;

    /// Replace the saved document
    fn save(&self, document: &StoreDocument) -> ForecastResult<()>;
}

/// Main storage coordinator
pub struct Storage {
    store: EntityStore,
    backend: Box<dyn StateStore>,
    audit: Option<AuditLogger>,
    notifications: Vec<Notification>,
    sync_tolerance: f64,
}

impl Storage {
    /// Open file-backed storage under `paths`
    pub fn new(paths: &ForecastPaths, settings: &Settings) -> ForecastResult<Self> {
        paths.ensure_directories()?;

        let backend = JsonFileStore::new(paths.data_file());
        Ok(Self::with_backend(Box::new(backend))
            .with_audit(AuditLogger::new(paths.audit_log()))
            .with_sync_tolerance(settings.sync_tolerance))
    }

    /// Load once from `backend`
    ///
    /// A missing document starts an empty store. An unreadable one is
    /// reported and also starts empty.
    pub fn with_backend(backend: Box<dyn StateStore>) -> Self {
        let mut notifications = Vec::new();

        let store = match backend.load().and_then(|doc| {
            doc.map(EntityStore::from_document)
                .transpose()
                .map(Option::unwrap_or_default)
        }) {
            Ok(store) => store,
            Err(e) => {
                error!(error = %e, "failed to load saved data");
                notifications.push(Notification::error(format!(
                    "Error loading saved data: {}",
                    e
                )));
                EntityStore::new()
            }
        };

        Self {
            store,
            backend,
            audit: None,
            notifications,
            sync_tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn with_sync_tolerance(mut self, tolerance: f64) -> Self {
        self.sync_tolerance = tolerance;
        self
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    /// Synchronizer configured for this storage
    pub fn synchronizer(&self, today: NaiveDate) -> Synchronizer {
        Synchronizer::new(today).with_tolerance(self.sync_tolerance)
    }

    /// Write the current state through the backend
    ///
    /// Returns whether the save succeeded; failure is reported, not raised.
    pub fn persist(&mut self) -> bool {
        match self.backend.save(&self.store.to_document()) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "failed to save data");
                self.notify(Notification::error(format!("Error saving data: {}", e)));
                false
            }
        }
    }

    // Notifications

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Take all pending notifications
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // Audit

    fn audit(&self, entries: &[AuditEntry]) {
        if let Some(logger) = &self.audit {
            if let Err(e) = logger.log_batch(entries) {
                warn!(error = %e, "failed to write audit log");
            }
        }
    }

    pub(crate) fn log_create<T: serde::Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.audit(&[AuditEntry::create(entity_type, entity_id, entity_name, entity)]);
    }

    pub(crate) fn log_update<T: serde::Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) {
        self.audit(&[AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        )]);
    }

    pub(crate) fn log_delete<T: serde::Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.audit(&[AuditEntry::delete(entity_type, entity_id, entity_name, entity)]);
    }

    pub(crate) fn log_sync(&self, report: &SyncReport) {
        self.audit(&report.audit_entries());
    }

    /// Reconcile every interest item against the bank list
    ///
    /// Persists and notifies only when something changed.
    pub fn synchronize(&mut self, today: NaiveDate) -> SyncReport {
        let synchronizer = self.synchronizer(today);
        let report = synchronizer.reconcile_all(&mut self.store);

        if !report.is_empty() {
            info!(
                created = report.created(),
                updated = report.updated(),
                removed = report.removed(),
                unlinked = report.unlinked(),
                "synchronized bank interest items"
            );
            self.log_sync(&report);
            self.persist();
            self.notify(Notification::info(format!(
                "Synchronized {} bank-related items",
                report.total()
            )));
        }

        report
    }

    /// Replace the whole store, all or nothing
    ///
    /// The document is checked for invalid or duplicate bank accounts,
    /// duplicate identifiers and malformed items before anything is touched.
    pub fn replace_all(&mut self, document: StoreDocument) -> ForecastResult<()> {
        let mut seen_names = HashSet::new();
        for bank in &document.banks {
            if let Err(errors) = bank.validate() {
                let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                return Err(ForecastError::Import(format!(
                    "Bank account {}: {}",
                    bank.id,
                    messages.join("; ")
                )));
            }
            if !seen_names.insert(bank.name.trim().to_lowercase()) {
                return Err(ForecastError::Import(format!(
                    "Duplicate bank account name: {}",
                    bank.name
                )));
            }
        }
        for item in &document.budget {
            item.validate()
                .map_err(|e| ForecastError::Import(format!("Budget item {}: {}", item.id, e)))?;
        }
        let replacement = EntityStore::from_document(document)
            .map_err(|e| ForecastError::Import(e.to_string()))?;

        let previous = std::mem::replace(&mut self.store, replacement);

        let mut entries = Vec::new();
        for bank in previous.banks() {
            entries.push(
                AuditEntry::delete(
                    EntityType::BankAccount,
                    bank.id.to_string(),
                    Some(bank.name.clone()),
                    bank,
                )
                .with_origin(Origin::Import),
            );
        }
        for item in previous.budget_items() {
            entries.push(
                AuditEntry::delete(
                    EntityType::BudgetItem,
                    item.id.to_string(),
                    Some(item.name.clone()),
                    item,
                )
                .with_origin(Origin::Import),
            );
        }
        for bank in self.store.banks() {
            entries.push(
                AuditEntry::create(
                    EntityType::BankAccount,
                    bank.id.to_string(),
                    Some(bank.name.clone()),
                    bank,
                )
                .with_origin(Origin::Import),
            );
        }
        for item in self.store.budget_items() {
            entries.push(
                AuditEntry::create(
                    EntityType::BudgetItem,
                    item.id.to_string(),
                    Some(item.name.clone()),
                    item,
                )
                .with_origin(Origin::Import),
            );
        }
        self.audit(&entries);

        self.persist();
        Ok(())
    }
}
