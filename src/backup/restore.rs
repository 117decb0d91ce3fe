//! Backup restoration for budget-forecast
//!
//! Restoring replaces every bank account and every auto-generated interest
//! item with the backed-up ones. User budget items are kept.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{ForecastError, ForecastResult};
use crate::models::BudgetItemId;
use crate::notify::Notification;
use crate::storage::{Storage, StoreDocument};

use super::manager::{read_backup, BankBackup};

/// Result of a restore operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreResult {
    pub banks_restored: usize,
    pub interest_items_restored: usize,
    /// Backed-up items given a new id because a kept user item had theirs
    pub items_renumbered: usize,
}

impl RestoreResult {
    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        format!(
            "Restored {} bank accounts from backup",
            self.banks_restored
        )
    }
}

/// Restore from a backup file
pub fn restore_from_file(storage: &mut Storage, path: &Path) -> ForecastResult<RestoreResult> {
    let backup = read_backup(path)?;
    restore_backup(storage, backup)
}

/// Restore a parsed backup; on failure nothing changes
pub fn restore_backup(storage: &mut Storage, backup: BankBackup) -> ForecastResult<RestoreResult> {
    let mut budget: Vec<_> = storage
        .store()
        .budget_items()
        .iter()
        .filter(|i| !i.is_auto_generated)
        .cloned()
        .collect();

    let mut taken: HashSet<BudgetItemId> = budget.iter().map(|i| i.id).collect();
    let mut next_id = budget
        .iter()
        .chain(backup.budget_items.iter())
        .map(|i| i.id.value())
        .max()
        .unwrap_or(0)
        + 1;

    let mut result = RestoreResult {
        banks_restored: backup.banks.len(),
        ..RestoreResult::default()
    };

    for mut item in backup.budget_items.into_iter().filter(|i| i.is_auto_generated) {
        if taken.contains(&item.id) {
            item.id = BudgetItemId::new(next_id);
            next_id += 1;
            result.items_renumbered += 1;
        }
        taken.insert(item.id);
        budget.push(item);
        result.interest_items_restored += 1;
    }

    storage
        .replace_all(StoreDocument {
            budget,
            banks: backup.banks,
        })
        .map_err(|e| ForecastError::Backup(e.to_string()))?;

    storage.notify(Notification::success(result.summary()));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::BackupManager;
    use crate::config::paths::ForecastPaths;
    use crate::models::{BankAccount, BankId, BudgetItem, BudgetType, InterestType};
    use crate::services::{BankInput, BankService, BudgetInput, BudgetService};
    use crate::storage::MemoryStore;
    use chrono::{NaiveDate, Utc};
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn storage() -> Storage {
        Storage::with_backend(Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_restore_replaces_banks_and_keeps_user_items() {
        let mut storage = storage();
        BankService::new(&mut storage, today())
            .create(BankInput::new("Savings", 5000.0, 0.04, InterestType::Compound))
            .unwrap();
        let backup = BankBackup::from_store(storage.store(), Utc::now());

        // Diverge after the backup
        let mut banks = BankService::new(&mut storage, today());
        banks
            .create(BankInput::new("Brokerage", 100.0, 0.02, InterestType::Simple))
            .unwrap();
        BudgetService::new(&mut storage)
            .create(BudgetInput::new("Rent", 900.0, BudgetType::Expense, today()))
            .unwrap();

        let result = restore_backup(&mut storage, backup).unwrap();

        assert_eq!(result.banks_restored, 1);
        assert_eq!(result.interest_items_restored, 1);
        let store = storage.store();
        assert_eq!(store.banks().len(), 1);
        assert_eq!(store.banks()[0].name, "Savings");
        assert!(store.auto_generated_item("Brokerage Interest").is_none());
        assert!(store.auto_generated_item("Savings Interest").is_some());
        assert!(store.budget_items().iter().any(|i| i.name == "Rent"));
        assert_eq!(
            storage.notifications().last().unwrap().message,
            "Restored 1 bank accounts from backup"
        );
    }

    #[test]
    fn test_restore_renumbers_colliding_items() {
        let mut storage = storage();
        let user = BudgetItem::new(BudgetItemId::new(1), "Rent", 900.0, BudgetType::Expense, today());
        storage.store_mut().insert_budget_item(user).unwrap();

        let mut interest = BudgetItem::new(BudgetItemId::new(1), "Savings Interest", 16.0, BudgetType::Income, today())
            .linked_to(BankId::new(1));
        interest.is_auto_generated = true;
        let backup = BankBackup {
            banks: vec![BankAccount::new(BankId::new(1), "Savings", 5000.0, 0.04, InterestType::Compound)],
            budget_items: vec![interest],
            timestamp: Utc::now(),
            version: "1.2".into(),
        };

        let result = restore_backup(&mut storage, backup).unwrap();
        assert_eq!(result.items_renumbered, 1);
        let restored = storage.store().auto_generated_item("Savings Interest").unwrap();
        assert_eq!(restored.id, BudgetItemId::new(2));
    }

    #[test]
    fn test_restore_rejects_duplicate_banks() {
        let mut storage = storage();
        let bank = BankAccount::new(BankId::new(1), "Savings", 5000.0, 0.04, InterestType::Compound);
        let backup = BankBackup {
            banks: vec![bank.clone(), bank],
            budget_items: Vec::new(),
            timestamp: Utc::now(),
            version: "1.2".into(),
        };

        let err = restore_backup(&mut storage, backup).unwrap_err();
        assert!(matches!(err, ForecastError::Backup(_)));
        assert!(storage.store().banks().is_empty());
    }

    #[test]
    fn test_restore_rejects_invalid_bank() {
        let mut storage = storage();
        BankService::new(&mut storage, today())
            .create(BankInput::new("Checking", 800.0, 0.0, InterestType::Simple))
            .unwrap();
        let before = storage.store().to_document();

        let backup = BankBackup {
            banks: vec![BankAccount::new(BankId::new(1), "Savings", -5000.0, 0.04, InterestType::Compound)],
            budget_items: Vec::new(),
            timestamp: Utc::now(),
            version: "1.2".into(),
        };

        let err = restore_backup(&mut storage, backup).unwrap_err();
        assert!(matches!(err, ForecastError::Backup(_)));
        assert_eq!(storage.store().to_document(), before);
    }

    #[test]
    fn test_restore_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ForecastPaths::with_base_dir(temp_dir.path().to_path_buf());
        let manager = BackupManager::new(&paths);

        let mut source = storage();
        BankService::new(&mut source, today())
            .create(BankInput::new("Checking", 750.0, 0.0, InterestType::Simple))
            .unwrap();
        let path = manager.create_backup(source.store()).unwrap();

        let mut target = storage();
        let result = restore_from_file(&mut target, &path).unwrap();
        assert_eq!(result.banks_restored, 1);
        assert_eq!(target.store().banks()[0].name, "Checking");
    }
}
