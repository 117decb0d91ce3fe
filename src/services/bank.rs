//! Bank account service
//!
//! Validates user input, applies the account change together with its
//! interest item side effects, then persists, audits and notifies.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{ForecastError, ForecastResult};
use crate::models::{BankAccount, BankId, InterestType};
use crate::notify::Notification;
use crate::storage::Storage;

use super::sync::SyncReport;

/// Balance below this multiple of linked open-ended expenses draws a warning
pub const LOW_BALANCE_MULTIPLIER: f64 = 2.0;

/// User-supplied bank account fields; the rate is a decimal (0.045 = 4.5%)
#[derive(Debug, Clone, PartialEq)]
pub struct BankInput {
    pub name: String,
    pub balance: f64,
    pub interest_rate: f64,
    pub interest_type: InterestType,
}

impl BankInput {
    pub fn new(name: impl Into<String>, balance: f64, interest_rate: f64, interest_type: InterestType) -> Self {
        Self {
            name: name.into(),
            balance,
            interest_rate,
            interest_type,
        }
    }

    /// Start from an existing account, for partial edits
    pub fn from_account(bank: &BankAccount) -> Self {
        Self::new(bank.name.clone(), bank.balance, bank.interest_rate, bank.interest_type)
    }

    fn into_account(self, id: BankId) -> BankAccount {
        BankAccount::new(id, self.name.trim(), self.balance, self.interest_rate, self.interest_type)
    }
}

/// Service for bank account management
pub struct BankService<'a> {
    storage: &'a mut Storage,
    today: NaiveDate,
}

impl<'a> BankService<'a> {
    /// `today` is the start date given to newly created interest items
    pub fn new(storage: &'a mut Storage, today: NaiveDate) -> Self {
        Self { storage, today }
    }

    pub fn list(&self) -> &[BankAccount] {
        self.storage.store().banks()
    }

    pub fn get(&self, id: BankId) -> ForecastResult<&BankAccount> {
        self.storage
            .store()
            .bank(id)
            .ok_or_else(|| ForecastError::bank_not_found(id.to_string()))
    }

    /// Find an account by id (`3` or `bank-3`) or by name (case-insensitive)
    pub fn find(&self, identifier: &str) -> ForecastResult<&BankAccount> {
        let store = self.storage.store();
        identifier
            .parse::<BankId>()
            .ok()
            .and_then(|id| store.bank(id))
            .or_else(|| store.bank_by_name(identifier))
            .ok_or_else(|| ForecastError::bank_not_found(identifier))
    }

    /// Every problem with `input`; empty when it is acceptable
    pub fn validate(&self, input: &BankInput, editing: Option<BankId>) -> Vec<String> {
        let candidate = input.clone().into_account(editing.unwrap_or(BankId::new(0)));
        let mut errors: Vec<String> = match candidate.validate() {
            Ok(()) => Vec::new(),
            Err(problems) => problems.iter().map(ToString::to_string).collect(),
        };

        if self.storage.store().bank_name_exists(&input.name, editing) {
            errors.push("A bank account with this name already exists".to_string());
        }

        errors
    }

    /// Sum of open-ended expenses linked to an account
    pub fn linked_open_expenses(&self, id: BankId) -> f64 {
        self.storage
            .store()
            .budget_items()
            .iter()
            .filter(|i| i.is_user_linked_to(id) && i.is_expense() && i.end_date.is_none())
            .map(|i| i.magnitude())
            .sum()
    }

    pub fn create(&mut self, input: BankInput) -> ForecastResult<BankAccount> {
        let errors = self.validate(&input, None);
        if !errors.is_empty() {
            return Err(ForecastError::Validation(errors));
        }

        let bank = input.into_account(self.storage.store().next_bank_id());
        self.storage.store_mut().insert_bank(bank.clone())?;

        let synchronizer = self.storage.synchronizer(self.today);
        let report = synchronizer.ensure(self.storage.store_mut(), &bank);

        self.storage.persist();
        self.storage.log_create(
            EntityType::BankAccount,
            bank.id.to_string(),
            Some(bank.name.clone()),
            &bank,
        );
        self.storage.log_sync(&report);
        self.storage.notify(Notification::success(format!(
            "Added \"{}\" with {:.2}",
            bank.name, bank.balance
        )));

        Ok(bank)
    }

    pub fn update(&mut self, id: BankId, input: BankInput) -> ForecastResult<BankAccount> {
        self.get(id)?;
        let errors = self.validate(&input, Some(id));
        if !errors.is_empty() {
            return Err(ForecastError::Validation(errors));
        }

        let bank = input.into_account(id);
        let before = self.storage.store_mut().replace_bank(bank.clone())?;

        let synchronizer = self.storage.synchronizer(self.today);
        let report = synchronizer.on_rename(self.storage.store_mut(), &before.name, &bank);

        self.storage.persist();
        self.storage.log_update(
            EntityType::BankAccount,
            bank.id.to_string(),
            Some(bank.name.clone()),
            &before,
            &bank,
        );
        self.storage.log_sync(&report);

        let change = bank.balance - before.balance;
        let change_text = if change != 0.0 {
            format!(" ({}{:.2})", if change > 0.0 { "+" } else { "" }, change)
        } else {
            String::new()
        };
        self.storage.notify(Notification::success(format!(
            "Updated \"{}\"{}",
            bank.name, change_text
        )));

        let linked = self.linked_open_expenses(id);
        if linked > 0.0 && bank.balance < linked * LOW_BALANCE_MULTIPLIER {
            self.storage.notify(Notification::warning(format!(
                "Balance is low compared to linked monthly expenses ({:.2})",
                linked
            )));
        }

        Ok(bank)
    }

    /// Delete an account, its interest item, and every link to it
    pub fn delete(&mut self, id: BankId) -> ForecastResult<(BankAccount, SyncReport)> {
        let bank = self
            .storage
            .store_mut()
            .remove_bank(id)
            .ok_or_else(|| ForecastError::bank_not_found(id.to_string()))?;

        let synchronizer = self.storage.synchronizer(self.today);
        let report = synchronizer.on_delete(self.storage.store_mut(), &bank);

        self.storage.persist();
        self.storage.log_delete(
            EntityType::BankAccount,
            bank.id.to_string(),
            Some(bank.name.clone()),
            &bank,
        );
        self.storage.log_sync(&report);

        let message = match report.unlinked() {
            0 => format!("Deleted \"{}\"", bank.name),
            n => format!("Deleted \"{}\" ({} budget items unlinked)", bank.name, n),
        };
        self.storage.notify(Notification::success(message));

        Ok((bank, report))
    }
}
