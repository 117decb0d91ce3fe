//! Interest item synchronization
//!
//! Keeps exactly one auto-generated interest budget item per bank account,
//! named `"<bank name> Interest"` and carrying the account's current monthly
//! interest. Every pass reports the changes it made so callers can audit and
//! notify.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};

use crate::audit::{AuditEntry, EntityType, Origin};
use crate::models::{
    interest_item_name, BankAccount, BankId, BudgetItem, BudgetItemId, BudgetType,
    InterestMetadata, CREATED_BY_BANK_SYSTEM,
};
use crate::storage::EntityStore;

use super::interest;

/// Interest items within this many currency units are left alone
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Default cadence of periodic synchronization
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// One change made by the synchronizer
#[derive(Debug, Clone, PartialEq)]
pub enum SyncChange {
    Created(BudgetItem),
    Updated { before: BudgetItem, after: BudgetItem },
    Removed(BudgetItem),
    /// A user item lost its link to a deleted or missing account
    Unlinked { before: BudgetItem, after: BudgetItem },
}

impl SyncChange {
    pub fn audit_entry(&self) -> AuditEntry {
        let entry = match self {
            Self::Created(item) => AuditEntry::create(
                EntityType::BudgetItem,
                item.id.to_string(),
                Some(item.name.clone()),
                item,
            ),
            Self::Updated { before, after } | Self::Unlinked { before, after } => {
                AuditEntry::update(
                    EntityType::BudgetItem,
                    after.id.to_string(),
                    Some(after.name.clone()),
                    before,
                    after,
                )
            }
            Self::Removed(item) => AuditEntry::delete(
                EntityType::BudgetItem,
                item.id.to_string(),
                Some(item.name.clone()),
                item,
            ),
        };
        entry.with_origin(Origin::Sync)
    }
}

/// Changes made by one synchronization call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub changes: Vec<SyncChange>,
}

impl SyncReport {
    fn push(&mut self, change: SyncChange) {
        self.changes.push(change);
    }

    fn count(&self, pred: fn(&SyncChange) -> bool) -> usize {
        self.changes.iter().filter(|c| pred(c)).count()
    }

    pub fn created(&self) -> usize {
        self.count(|c| matches!(c, SyncChange::Created(_)))
    }

    pub fn updated(&self) -> usize {
        self.count(|c| matches!(c, SyncChange::Updated { .. }))
    }

    pub fn removed(&self) -> usize {
        self.count(|c| matches!(c, SyncChange::Removed(_)))
    }

    pub fn unlinked(&self) -> usize {
        self.count(|c| matches!(c, SyncChange::Unlinked { .. }))
    }

    /// Number of budget items touched
    pub fn total(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.changes.iter().map(SyncChange::audit_entry).collect()
    }
}

/// Maintains auto-generated interest items against the bank list
#[derive(Debug, Clone, Copy)]
pub struct Synchronizer {
    today: NaiveDate,
    tolerance: f64,
}

impl Synchronizer {
    /// New items start on `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Create or refresh the interest item for one account
    pub fn ensure(&self, store: &mut EntityStore, bank: &BankAccount) -> SyncReport {
        let mut report = SyncReport::default();
        self.ensure_into(store, bank, &mut report);
        report
    }

    /// Full pass: refresh every account's item, then drop orphans and duplicates
    ///
    /// An auto-generated item is an orphan when its name lacks the interest
    /// suffix or the implied bank name matches no account exactly. User items
    /// linked to a missing account are unlinked.
    pub fn reconcile_all(&self, store: &mut EntityStore) -> SyncReport {
        let mut report = SyncReport::default();
        let banks = store.banks().to_vec();

        for bank in &banks {
            self.ensure_into(store, bank, &mut report);
        }

        let bank_names: HashSet<&str> = banks.iter().map(|b| b.name.as_str()).collect();
        let mut seen = HashSet::new();
        let removed = store.drain_budget_items(|item| {
            if !item.is_auto_generated {
                return true;
            }
            match item.implied_bank_name() {
                Some(bank_name) if bank_names.contains(bank_name) => seen.insert(item.name.clone()),
                _ => false,
            }
        });
        report
            .changes
            .extend(removed.into_iter().map(SyncChange::Removed));

        let bank_ids: HashSet<BankId> = banks.iter().map(|b| b.id).collect();
        unlink_where(store, &mut report, |id| !bank_ids.contains(&id));

        report
    }

    /// Follow an account rename (and any balance or rate change with it)
    ///
    /// `bank` already carries the new name.
    pub fn on_rename(&self, store: &mut EntityStore, old_name: &str, bank: &BankAccount) -> SyncReport {
        if old_name == bank.name {
            return self.ensure(store, bank);
        }

        let mut report = SyncReport::default();
        let now = Utc::now();
        match store.auto_generated_item_mut(&interest_item_name(old_name)) {
            Some(item) => {
                let before = item.clone();
                item.name = bank.interest_item_name();
                refresh(item, bank, interest::for_account(bank), now);
                report.push(SyncChange::Updated {
                    before,
                    after: item.clone(),
                });
            }
            None => self.ensure_into(store, bank, &mut report),
        }
        report
    }

    /// Remove an account's interest item and unlink user items that pointed at it
    pub fn on_delete(&self, store: &mut EntityStore, bank: &BankAccount) -> SyncReport {
        let mut report = SyncReport::default();
        let item_name = bank.interest_item_name();

        let removed = store.drain_budget_items(|item| {
            !(item.is_auto_generated
                && (item.name == item_name || item.linked_bank_id == Some(bank.id)))
        });
        report
            .changes
            .extend(removed.into_iter().map(SyncChange::Removed));

        unlink_where(store, &mut report, |id| id == bank.id);
        report
    }

    fn ensure_into(&self, store: &mut EntityStore, bank: &BankAccount, report: &mut SyncReport) {
        let name = bank.interest_item_name();
        let expected = interest::for_account(bank);
        let now = Utc::now();

        match store.auto_generated_item_mut(&name) {
            Some(item) => {
                let in_tolerance = (item.amount - expected).abs() <= self.tolerance;
                if in_tolerance && item.linked_bank_id == Some(bank.id) {
                    return;
                }
                let before = item.clone();
                refresh(item, bank, expected, now);
                report.push(SyncChange::Updated {
                    before,
                    after: item.clone(),
                });
            }
            None => {
                let item = new_interest_item(store.next_budget_item_id(), bank, expected, self.today, now);
                if store.insert_budget_item(item.clone()).is_ok() {
                    report.push(SyncChange::Created(item));
                }
            }
        }
    }
}

fn new_interest_item(
    id: BudgetItemId,
    bank: &BankAccount,
    amount: f64,
    start_date: NaiveDate,
    now: DateTime<Utc>,
) -> BudgetItem {
    let mut item = BudgetItem::new(id, bank.interest_item_name(), amount, BudgetType::Income, start_date)
        .linked_to(bank.id);
    item.is_auto_generated = true;
    item.interest_type = Some(bank.interest_type);
    item.metadata = Some(InterestMetadata {
        created_by: Some(CREATED_BY_BANK_SYSTEM.to_string()),
        created_at: Some(now),
        updated_at: None,
        principal_amount: bank.balance,
        annual_rate: bank.interest_rate,
    });
    item
}

fn refresh(item: &mut BudgetItem, bank: &BankAccount, amount: f64, now: DateTime<Utc>) {
    item.amount = amount;
    item.item_type = BudgetType::Income;
    item.interest_type = Some(bank.interest_type);
    item.linked_bank_id = Some(bank.id);

    let metadata = item.metadata.get_or_insert_with(|| InterestMetadata {
        created_by: Some(CREATED_BY_BANK_SYSTEM.to_string()),
        created_at: Some(now),
        updated_at: None,
        principal_amount: 0.0,
        annual_rate: 0.0,
    });
    metadata.updated_at = Some(now);
    metadata.principal_amount = bank.balance;
    metadata.annual_rate = bank.interest_rate;
}

fn unlink_where<F>(store: &mut EntityStore, report: &mut SyncReport, dangling: F)
where
    F: Fn(BankId) -> bool,
{
    for item in store.budget_items_mut() {
        if item.is_auto_generated {
            continue;
        }
        if let Some(id) = item.linked_bank_id {
            if dangling(id) {
                let before = item.clone();
                item.linked_bank_id = None;
                report.push(SyncChange::Unlinked {
                    before,
                    after: item.clone(),
                });
            }
        }
    }
}

/// Tracks when the next periodic synchronization is due
#[derive(Debug, Clone)]
pub struct SyncSchedule {
    interval: Duration,
    last_run: Option<DateTime<Utc>>,
}

impl Default for SyncSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl SyncSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        self.last_run
    }

    /// True before the first run and once the interval has elapsed since the last
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_run {
            None => true,
            Some(last) => chrono::Duration::from_std(self.interval)
                .map_or(false, |interval| now - last >= interval),
        }
    }

    pub fn mark_run(&mut self, now: DateTime<Utc>) {
        self.last_run = Some(now);
    }

    /// Run a full synchronization if one is due
    ///
    /// `today` dates any interest items created by the pass.
    pub fn run_if_due(
        &mut self,
        storage: &mut crate::storage::Storage,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Option<SyncReport> {
        if !self.is_due(now) {
            return None;
        }
        self.mark_run(now);
        Some(storage.synchronize(today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InterestType;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn bank(id: u64, name: &str, balance: f64) -> BankAccount {
        BankAccount::new(BankId::new(id), name, balance, 0.12, InterestType::Compound)
    }

    fn store_with(banks: &[BankAccount]) -> EntityStore {
        let mut store = EntityStore::new();
        for b in banks {
            store.insert_bank(b.clone()).unwrap();
        }
        store
    }

    fn auto_items(store: &EntityStore) -> Vec<&BudgetItem> {
        store
            .budget_items()
            .iter()
            .filter(|i| i.is_auto_generated)
            .collect()
    }

    #[test]
    fn test_ensure_creates_item() {
        let savings = bank(1, "Savings", 1000.0);
        let mut store = store_with(&[savings.clone()]);

        let report = Synchronizer::new(today()).ensure(&mut store, &savings);
        assert_eq!(report.created(), 1);

        let item = store.auto_generated_item("Savings Interest").unwrap();
        assert!((item.amount - 9.4888).abs() < 0.001);
        assert_eq!(item.item_type, BudgetType::Income);
        assert_eq!(item.start_date, today());
        assert_eq!(item.linked_bank_id, Some(BankId::new(1)));
        assert_eq!(item.interest_type, Some(InterestType::Compound));
        let metadata = item.metadata.as_ref().unwrap();
        assert_eq!(metadata.created_by.as_deref(), Some("bank_system"));
        assert_eq!(metadata.principal_amount, 1000.0);
        assert_eq!(metadata.annual_rate, 0.12);
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let savings = bank(1, "Savings", 1000.0);
        let mut store = store_with(&[savings.clone()]);
        let sync = Synchronizer::new(today());

        sync.ensure(&mut store, &savings);
        let snapshot = store.clone();
        let report = sync.ensure(&mut store, &savings);

        assert!(report.is_empty());
        assert_eq!(store, snapshot);
    }

    #[test]
    fn test_ensure_respects_tolerance() {
        let mut savings = bank(1, "Savings", 1000.0);
        let mut store = store_with(&[savings.clone()]);
        let sync = Synchronizer::new(today());
        sync.ensure(&mut store, &savings);

        // 1000.5 changes the interest by well under a cent
        savings.balance = 1000.5;
        assert!(sync.ensure(&mut store, &savings).is_empty());

        savings.balance = 2000.0;
        let report = sync.ensure(&mut store, &savings);
        assert_eq!(report.updated(), 1);
        let item = store.auto_generated_item("Savings Interest").unwrap();
        assert!((item.amount - 18.9776).abs() < 0.001);
        assert!(item.metadata.as_ref().unwrap().updated_at.is_some());
    }

    #[test]
    fn test_zero_rate_still_gets_item() {
        let checking = BankAccount::new(BankId::new(1), "Checking", 500.0, 0.0, InterestType::Simple);
        let mut store = store_with(&[checking.clone()]);

        Synchronizer::new(today()).ensure(&mut store, &checking);
        assert_eq!(store.auto_generated_item("Checking Interest").unwrap().amount, 0.0);
    }

    #[test]
    fn test_rename_moves_item() {
        let mut savings = bank(1, "Savings", 1000.0);
        let mut store = store_with(&[savings.clone()]);
        let sync = Synchronizer::new(today());
        sync.ensure(&mut store, &savings);
        let id = store.auto_generated_item("Savings Interest").unwrap().id;

        savings.name = "Emergency Fund".into();
        store.replace_bank(savings.clone()).unwrap();
        let report = sync.on_rename(&mut store, "Savings", &savings);

        assert_eq!(report.updated(), 1);
        assert!(store.auto_generated_item("Savings Interest").is_none());
        let renamed = store.auto_generated_item("Emergency Fund Interest").unwrap();
        assert_eq!(renamed.id, id);
        assert_eq!(auto_items(&store).len(), 1);
    }

    #[test]
    fn test_rename_without_existing_item_creates_one() {
        let savings = bank(1, "Renamed", 1000.0);
        let mut store = store_with(&[savings.clone()]);

        let report = Synchronizer::new(today()).on_rename(&mut store, "Original", &savings);
        assert_eq!(report.created(), 1);
        assert!(store.auto_generated_item("Renamed Interest").is_some());
    }

    #[test]
    fn test_delete_removes_item_and_unlinks() {
        let savings = bank(1, "Savings", 1000.0);
        let mut store = store_with(&[savings.clone()]);
        let sync = Synchronizer::new(today());
        sync.ensure(&mut store, &savings);

        let rent = BudgetItem::new(BudgetItemId::new(50), "Rent", 900.0, BudgetType::Expense, today())
            .linked_to(savings.id);
        store.insert_budget_item(rent).unwrap();

        store.remove_bank(savings.id);
        let report = sync.on_delete(&mut store, &savings);

        assert_eq!(report.removed(), 1);
        assert_eq!(report.unlinked(), 1);
        assert!(auto_items(&store).is_empty());
        let rent = store.budget_item(BudgetItemId::new(50)).unwrap();
        assert_eq!(rent.linked_bank_id, None);
    }

    #[test]
    fn test_reconcile_removes_orphans_and_duplicates() {
        let savings = bank(1, "Savings", 1000.0);
        let mut store = store_with(&[savings.clone()]);
        let sync = Synchronizer::new(today());
        sync.ensure(&mut store, &savings);

        let mut orphan = BudgetItem::new(BudgetItemId::new(20), "Closed Bank Interest", 3.0, BudgetType::Income, today());
        orphan.is_auto_generated = true;
        store.insert_budget_item(orphan).unwrap();

        let mut no_suffix = BudgetItem::new(BudgetItemId::new(21), "Mystery", 1.0, BudgetType::Income, today());
        no_suffix.is_auto_generated = true;
        store.insert_budget_item(no_suffix).unwrap();

        let mut duplicate = store.auto_generated_item("Savings Interest").unwrap().clone();
        duplicate.id = BudgetItemId::new(22);
        store.insert_budget_item(duplicate).unwrap();

        let report = sync.reconcile_all(&mut store);
        assert_eq!(report.removed(), 3);
        assert_eq!(auto_items(&store).len(), 1);
        assert!(store.budget_item(BudgetItemId::new(22)).is_none());
    }

    #[test]
    fn test_reconcile_matches_bank_names_exactly() {
        let savings = bank(1, "Savings", 1000.0);
        let mut store = store_with(&[savings.clone()]);

        let mut other_case = BudgetItem::new(BudgetItemId::new(5), "savings Interest", 9.0, BudgetType::Income, today());
        other_case.is_auto_generated = true;
        store.insert_budget_item(other_case).unwrap();

        Synchronizer::new(today()).reconcile_all(&mut store);
        assert!(store.budget_item(BudgetItemId::new(5)).is_none());
        assert!(store.auto_generated_item("Savings Interest").is_some());
    }

    #[test]
    fn test_reconcile_unlinks_dangling_links_and_leaves_user_items() {
        let mut store = EntityStore::new();
        let gym = BudgetItem::new(BudgetItemId::new(1), "Gym Interest", 40.0, BudgetType::Expense, today())
            .linked_to(BankId::new(99));
        store.insert_budget_item(gym).unwrap();

        let report = Synchronizer::new(today()).reconcile_all(&mut store);
        assert_eq!(report.unlinked(), 1);
        assert_eq!(report.removed(), 0);
        assert_eq!(store.budget_items()[0].linked_bank_id, None);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut store = store_with(&[bank(1, "Savings", 1000.0), bank(2, "Checking", 300.0)]);
        let sync = Synchronizer::new(today());

        assert_eq!(sync.reconcile_all(&mut store).created(), 2);
        assert!(sync.reconcile_all(&mut store).is_empty());
    }

    #[test]
    fn test_changes_audited_as_sync() {
        let savings = bank(1, "Savings", 1000.0);
        let mut store = store_with(&[savings.clone()]);

        let report = Synchronizer::new(today()).ensure(&mut store, &savings);
        let entries = report.audit_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].origin, Origin::Sync);
        assert_eq!(entries[0].entity_type, EntityType::BudgetItem);
    }

    #[test]
    fn test_schedule() {
        let start = DateTime::parse_from_rfc3339("2024-03-15T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut schedule = SyncSchedule::default();

        assert!(schedule.is_due(start));
        schedule.mark_run(start);
        assert!(!schedule.is_due(start + chrono::Duration::minutes(4)));
        assert!(schedule.is_due(start + chrono::Duration::minutes(5)));
    }

    #[test]
    fn test_run_if_due() {
        let now = DateTime::parse_from_rfc3339("2024-03-15T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let document = crate::storage::StoreDocument {
            budget: Vec::new(),
            banks: vec![bank(1, "Savings", 1000.0)],
        };
        let mut storage = crate::storage::Storage::with_backend(Box::new(
            crate::storage::MemoryStore::with_document(document),
        ));
        let mut schedule = SyncSchedule::new(Duration::from_secs(60));

        let report = schedule.run_if_due(&mut storage, now, today()).unwrap();
        assert_eq!(report.created(), 1);
        assert!(schedule
            .run_if_due(&mut storage, now + chrono::Duration::seconds(30), today())
            .is_none());
        assert_eq!(schedule.last_run(), Some(now));
    }
}
