//! In-memory entity store
//!
//! Owns the bank account and budget item collections. All mutation goes
//! through accessor methods so identifier uniqueness is checked at write time.
//! Collections keep insertion order, which is also display order.

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};
use crate::models::{BankAccount, BankId, BudgetItem, BudgetItemId};

/// Serializable form of the whole store
///
/// Used by the persistence backends and, with extra metadata, by import and
/// export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    pub budget: Vec<BudgetItem>,
    pub banks: Vec<BankAccount>,
}

/// The budget items and bank accounts being edited and forecast
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityStore {
    banks: Vec<BankAccount>,
    budget_items: Vec<BudgetItem>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a document, rejecting duplicate identifiers
    pub fn from_document(document: StoreDocument) -> ForecastResult<Self> {
        let mut store = Self::new();
        for bank in document.banks {
            store.insert_bank(bank)?;
        }
        for item in document.budget {
            store.insert_budget_item(item)?;
        }
        Ok(store)
    }

    /// Snapshot the store as a document
    pub fn to_document(&self) -> StoreDocument {
        StoreDocument {
            budget: self.budget_items.clone(),
            banks: self.banks.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty() && self.budget_items.is_empty()
    }

    // Bank accounts

    pub fn banks(&self) -> &[BankAccount] {
        &self.banks
    }

    pub fn bank(&self, id: BankId) -> Option<&BankAccount> {
        self.banks.iter().find(|b| b.id == id)
    }

    /// Get a bank account by name (case-insensitive)
    pub fn bank_by_name(&self, name: &str) -> Option<&BankAccount> {
        let name_lower = name.trim().to_lowercase();
        self.banks
            .iter()
            .find(|b| b.name.to_lowercase() == name_lower)
    }

    /// Check if a bank name is already taken (case-insensitive)
    pub fn bank_name_exists(&self, name: &str, exclude_id: Option<BankId>) -> bool {
        let name_lower = name.trim().to_lowercase();
        self.banks
            .iter()
            .any(|b| b.name.to_lowercase() == name_lower && Some(b.id) != exclude_id)
    }

    /// Sum of all bank balances
    pub fn total_bank_balance(&self) -> f64 {
        self.banks.iter().map(|b| b.balance).sum()
    }

    /// Identifier for the next new bank account
    pub fn next_bank_id(&self) -> BankId {
        self.banks
            .iter()
            .map(|b| b.id)
            .max()
            .map_or(BankId::new(1), |id| id.next())
    }

    pub fn insert_bank(&mut self, bank: BankAccount) -> ForecastResult<()> {
        if self.bank(bank.id).is_some() {
            return Err(ForecastError::Duplicate {
                entity_type: "Bank account",
                identifier: bank.id.to_string(),
            });
        }
        self.banks.push(bank);
        Ok(())
    }

    /// Replace a stored bank account, returning the previous version
    pub fn replace_bank(&mut self, bank: BankAccount) -> ForecastResult<BankAccount> {
        let slot = self
            .banks
            .iter_mut()
            .find(|b| b.id == bank.id)
            .ok_or_else(|| ForecastError::bank_not_found(bank.id.to_string()))?;
        Ok(std::mem::replace(slot, bank))
    }

    pub fn remove_bank(&mut self, id: BankId) -> Option<BankAccount> {
        let index = self.banks.iter().position(|b| b.id == id)?;
        Some(self.banks.remove(index))
    }

    // Budget items

    pub fn budget_items(&self) -> &[BudgetItem] {
        &self.budget_items
    }

    pub fn budget_item(&self, id: BudgetItemId) -> Option<&BudgetItem> {
        self.budget_items.iter().find(|i| i.id == id)
    }

    /// Find an auto-generated item by exact name
    pub fn auto_generated_item(&self, name: &str) -> Option<&BudgetItem> {
        self.budget_items
            .iter()
            .find(|i| i.is_auto_generated && i.name == name)
    }

    pub(crate) fn auto_generated_item_mut(&mut self, name: &str) -> Option<&mut BudgetItem> {
        self.budget_items
            .iter_mut()
            .find(|i| i.is_auto_generated && i.name == name)
    }

    pub(crate) fn budget_items_mut(&mut self) -> impl Iterator<Item = &mut BudgetItem> {
        self.budget_items.iter_mut()
    }

    /// Identifier for the next new budget item
    pub fn next_budget_item_id(&self) -> BudgetItemId {
        self.budget_items
            .iter()
            .map(|i| i.id)
            .max()
            .map_or(BudgetItemId::new(1), |id| id.next())
    }

    pub fn insert_budget_item(&mut self, item: BudgetItem) -> ForecastResult<()> {
        if self.budget_item(item.id).is_some() {
            return Err(ForecastError::Duplicate {
                entity_type: "Budget item",
                identifier: item.id.to_string(),
            });
        }
        self.budget_items.push(item);
        Ok(())
    }

    /// Replace a stored budget item, returning the previous version
    pub fn replace_budget_item(&mut self, item: BudgetItem) -> ForecastResult<BudgetItem> {
        let slot = self
            .budget_items
            .iter_mut()
            .find(|i| i.id == item.id)
            .ok_or_else(|| ForecastError::budget_item_not_found(item.id.to_string()))?;
        Ok(std::mem::replace(slot, item))
    }

    pub fn remove_budget_item(&mut self, id: BudgetItemId) -> Option<BudgetItem> {
        let index = self.budget_items.iter().position(|i| i.id == id)?;
        Some(self.budget_items.remove(index))
    }

    /// Keep only items matching `keep`, returning the removed ones
    pub(crate) fn drain_budget_items<F>(&mut self, mut keep: F) -> Vec<BudgetItem>
    where
        F: FnMut(&BudgetItem) -> bool,
    {
        let (kept, removed) = std::mem::take(&mut self.budget_items)
            .into_iter()
            .partition(|item| keep(item));
        self.budget_items = kept;
        removed
    }
}
