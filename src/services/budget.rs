//! Budget item service
//!
//! CRUD for user-entered budget items. Auto-generated interest items belong
//! to the synchronizer: they can be deleted here but not edited.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{ForecastError, ForecastResult};
use crate::models::budget_item::MAX_NAME_LEN;
use crate::models::{BankId, BudgetItem, BudgetItemId, BudgetType};
use crate::notify::Notification;
use crate::storage::Storage;

/// User-supplied budget item fields
///
/// `amount` is a positive magnitude; its sign comes from `item_type`.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetInput {
    pub name: String,
    pub amount: f64,
    pub item_type: BudgetType,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub linked_bank_id: Option<BankId>,
}

impl BudgetInput {
    pub fn new(name: impl Into<String>, amount: f64, item_type: BudgetType, start_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            amount,
            item_type,
            start_date,
            end_date: None,
            linked_bank_id: None,
        }
    }

    /// Start from an existing item, for partial edits
    pub fn from_item(item: &BudgetItem) -> Self {
        Self {
            name: item.name.clone(),
            amount: item.magnitude(),
            item_type: item.item_type,
            start_date: item.start_date,
            end_date: item.end_date,
            linked_bank_id: item.linked_bank_id,
        }
    }

    fn into_item(self, id: BudgetItemId) -> BudgetItem {
        let mut item = BudgetItem::new(id, self.name.trim(), self.amount, self.item_type, self.start_date);
        item.end_date = self.end_date;
        item.linked_bank_id = self.linked_bank_id;
        item
    }
}

/// Service for budget item management
pub struct BudgetService<'a> {
    storage: &'a mut Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> &[BudgetItem] {
        self.storage.store().budget_items()
    }

    /// Items active on `date`
    pub fn active_on(&self, date: NaiveDate) -> Vec<&BudgetItem> {
        self.list().iter().filter(|i| i.is_active_on(date)).collect()
    }

    pub fn get(&self, id: BudgetItemId) -> ForecastResult<&BudgetItem> {
        self.storage
            .store()
            .budget_item(id)
            .ok_or_else(|| ForecastError::budget_item_not_found(id.to_string()))
    }

    /// Find an item by id (`4` or `item-4`) or by name (case-insensitive)
    pub fn find(&self, identifier: &str) -> ForecastResult<&BudgetItem> {
        let store = self.storage.store();
        let by_id = identifier
            .parse::<BudgetItemId>()
            .ok()
            .and_then(|id| store.budget_item(id));
        let wanted = identifier.trim().to_lowercase();

        by_id
            .or_else(|| {
                self.list()
                    .iter()
                    .find(|i| i.name.trim().to_lowercase() == wanted)
            })
            .ok_or_else(|| ForecastError::budget_item_not_found(identifier))
    }

    /// Every problem with `input`; empty when it is acceptable
    pub fn validate(&self, input: &BudgetInput) -> Vec<String> {
        let mut errors = Vec::new();

        let name_len = input.name.trim().chars().count();
        if name_len == 0 {
            errors.push("Budget item name is required".to_string());
        } else if name_len > MAX_NAME_LEN {
            errors.push(format!(
                "Budget item name too long ({} chars, max {})",
                name_len, MAX_NAME_LEN
            ));
        }

        if !input.amount.is_finite() || input.amount <= 0.0 {
            errors.push("Amount must be greater than 0".to_string());
        }

        if let Some(end) = input.end_date {
            if end <= input.start_date {
                errors.push("End date must be after start date".to_string());
            }
        }

        if let Some(bank_id) = input.linked_bank_id {
            if self.storage.store().bank(bank_id).is_none() {
                errors.push(format!("Linked bank account {} does not exist", bank_id));
            }
        }

        errors
    }

    pub fn create(&mut self, input: BudgetInput) -> ForecastResult<BudgetItem> {
        let errors = self.validate(&input);
        if !errors.is_empty() {
            return Err(ForecastError::Validation(errors));
        }

        let item = input.into_item(self.storage.store().next_budget_item_id());
        self.storage.store_mut().insert_budget_item(item.clone())?;

        self.storage.persist();
        self.storage.log_create(
            EntityType::BudgetItem,
            item.id.to_string(),
            Some(item.name.clone()),
            &item,
        );
        self.storage.notify(Notification::success(format!(
            "Added budget item \"{}\"",
            item.name
        )));

        Ok(item)
    }

    pub fn update(&mut self, id: BudgetItemId, input: BudgetInput) -> ForecastResult<BudgetItem> {
        if self.get(id)?.is_auto_generated {
            return Err(ForecastError::validation(
                "Auto-generated interest items are managed by their bank account",
            ));
        }

        let errors = self.validate(&input);
        if !errors.is_empty() {
            return Err(ForecastError::Validation(errors));
        }

        let item = input.into_item(id);
        let before = self.storage.store_mut().replace_budget_item(item.clone())?;

        self.storage.persist();
        self.storage.log_update(
            EntityType::BudgetItem,
            item.id.to_string(),
            Some(item.name.clone()),
            &before,
            &item,
        );
        self.storage.notify(Notification::success(format!(
            "Updated budget item \"{}\"",
            item.name
        )));

        Ok(item)
    }

    /// Delete any item; a deleted interest item returns on the next sync
    pub fn delete(&mut self, id: BudgetItemId) -> ForecastResult<BudgetItem> {
        let item = self
            .storage
            .store_mut()
            .remove_budget_item(id)
            .ok_or_else(|| ForecastError::budget_item_not_found(id.to_string()))?;

        self.storage.persist();
        self.storage.log_delete(
            EntityType::BudgetItem,
            item.id.to_string(),
            Some(item.name.clone()),
            &item,
        );
        self.storage.notify(Notification::success(format!(
            "Deleted budget item \"{}\"",
            item.name
        )));

        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InterestType;
    use crate::services::bank::{BankInput, BankService};
    use crate::storage::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn storage() -> Storage {
        Storage::with_backend(Box::new(MemoryStore::new()))
    }

    fn rent() -> BudgetInput {
        BudgetInput::new("Rent", 1200.0, BudgetType::Expense, date(2024, 1, 1))
    }

    #[test]
    fn test_create_signs_amount() {
        let mut storage = storage();
        let item = BudgetService::new(&mut storage).create(rent()).unwrap();

        assert_eq!(item.amount, -1200.0);
        assert_eq!(item.id, BudgetItemId::new(1));
        assert!(!item.is_auto_generated);
        assert_eq!(
            storage.notifications().last().unwrap().message,
            "Added budget item \"Rent\""
        );
    }

    #[test]
    fn test_validation_lists_every_problem() {
        let mut storage = storage();
        let service = BudgetService::new(&mut storage);

        let mut input = BudgetInput::new("  ", 0.0, BudgetType::Income, date(2024, 3, 1));
        input.end_date = Some(date(2024, 3, 1));
        input.linked_bank_id = Some(BankId::new(7));

        assert_eq!(
            service.validate(&input),
            vec![
                "Budget item name is required",
                "Amount must be greater than 0",
                "End date must be after start date",
                "Linked bank account bank-7 does not exist",
            ]
        );
    }

    #[test]
    fn test_long_name_and_nan_rejected() {
        let mut storage = storage();
        let mut service = BudgetService::new(&mut storage);

        let mut input = rent();
        input.name = "x".repeat(101);
        input.amount = f64::NAN;

        let err = service.create(input).unwrap_err();
        assert_eq!(err.validation_messages().len(), 2);
        assert!(service.list().is_empty());
    }

    #[test]
    fn test_update_and_link() {
        let mut storage = storage();
        let bank = BankService::new(&mut storage, date(2024, 1, 1))
            .create(BankInput::new("Checking", 3000.0, 0.0, InterestType::Simple))
            .unwrap();

        let mut service = BudgetService::new(&mut storage);
        let item = service.create(rent()).unwrap();

        let mut input = BudgetInput::from_item(&item);
        input.amount = 1250.0;
        input.linked_bank_id = Some(bank.id);
        let updated = service.update(item.id, input).unwrap();

        assert_eq!(updated.amount, -1250.0);
        assert_eq!(updated.linked_bank_id, Some(bank.id));
    }

    #[test]
    fn test_auto_generated_item_cannot_be_edited_but_can_be_deleted() {
        let mut storage = storage();
        BankService::new(&mut storage, date(2024, 1, 1))
            .create(BankInput::new("Savings", 1000.0, 0.05, InterestType::Compound))
            .unwrap();
        let interest_id = storage
            .store()
            .auto_generated_item("Savings Interest")
            .unwrap()
            .id;

        let mut service = BudgetService::new(&mut storage);
        let err = service.update(interest_id, rent()).unwrap_err();
        assert!(err.is_validation());

        service.delete(interest_id).unwrap();
        assert!(storage.store().auto_generated_item("Savings Interest").is_none());

        // The next synchronization restores it
        storage.synchronize(date(2024, 1, 2));
        assert!(storage.store().auto_generated_item("Savings Interest").is_some());
    }

    #[test]
    fn test_active_on() {
        let mut storage = storage();
        let mut service = BudgetService::new(&mut storage);
        let mut gym = BudgetInput::new("Gym", 40.0, BudgetType::Expense, date(2024, 1, 1));
        gym.end_date = Some(date(2024, 6, 1));
        service.create(gym).unwrap();

        assert_eq!(service.active_on(date(2024, 6, 1)).len(), 1);
        assert!(service.active_on(date(2024, 6, 2)).is_empty());
    }

    #[test]
    fn test_find_by_id_or_name() {
        let mut storage = storage();
        let mut service = BudgetService::new(&mut storage);
        service.create(rent()).unwrap();

        assert_eq!(service.find("item-1").unwrap().name, "Rent");
        assert_eq!(service.find("1").unwrap().name, "Rent");
        assert_eq!(service.find(" rent ").unwrap().id, BudgetItemId::new(1));
        assert!(service.find("Mortgage").unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_missing() {
        let mut storage = storage();
        let err = BudgetService::new(&mut storage)
            .delete(BudgetItemId::new(3))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
