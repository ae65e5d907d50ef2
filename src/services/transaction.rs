//! Transaction service
//!
//! Creation, full-replace update, and deletion of transactions. A category
//! reference must exist when it is written; deleting a category later is
//! what orphans transactions, never this service.

use chrono::{DateTime, TimeZone, Utc, Weekday};

use crate::error::{LedgerError, LedgerResult};
use crate::events::{ChangeKind, EntityKind};
use crate::models::{CategoryId, Money, Transaction, TransactionId};
use crate::reports::TransactionFilter;
use crate::storage::{LedgerData, Storage};

/// The mutable fields of a transaction
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionInput {
    pub amount: Money,
    pub category_id: Option<CategoryId>,
    pub note: String,
    pub date: DateTime<Utc>,
}

impl TransactionInput {
    pub fn new(amount: Money, date: DateTime<Utc>) -> Self {
        Self {
            amount,
            category_id: None,
            note: String::new(),
            date,
        }
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a new transaction
    pub fn add(&self, input: TransactionInput) -> LedgerResult<Transaction> {
        let txn = self
            .storage
            .transact(EntityKind::Transaction, ChangeKind::Created, |data| {
                check_category(data, input.category_id)?;

                let txn = Transaction::new(input.amount, input.category_id, input.date)
                    .with_note(input.note.trim());
                data.transactions.push(txn.clone());
                Ok(txn)
            })
            .map_err(|e| {
                tracing::warn!(error = %e, "rejected new transaction");
                e
            })?;

        tracing::info!(id = %txn.id, amount = %txn.amount, "transaction added");
        Ok(txn)
    }

    /// Replace every mutable field of a transaction
    pub fn update(&self, id: TransactionId, input: TransactionInput) -> LedgerResult<Transaction> {
        let txn = self
            .storage
            .transact(EntityKind::Transaction, ChangeKind::Updated, |data| {
                check_category(data, input.category_id)?;

                let txn = data
                    .transaction_mut(id)
                    .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;

                let note = input.note.trim();
                if txn.amount != input.amount
                    || txn.category_id != input.category_id
                    || txn.note != note
                    || txn.date != input.date
                {
                    txn.amount = input.amount;
                    txn.category_id = input.category_id;
                    txn.note = note.to_string();
                    txn.date = input.date;
                    txn.updated_at = Utc::now();
                }
                Ok(txn.clone())
            })
            .map_err(|e| {
                tracing::warn!(%id, error = %e, "rejected transaction update");
                e
            })?;

        tracing::info!(%id, amount = %txn.amount, "transaction updated");
        Ok(txn)
    }

    /// Remove a transaction
    pub fn delete(&self, id: TransactionId) -> LedgerResult<Transaction> {
        let removed = self
            .storage
            .transact(EntityKind::Transaction, ChangeKind::Deleted, |data| {
                let position = data
                    .transactions
                    .iter()
                    .position(|t| t.id == id)
                    .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;
                Ok(data.transactions.remove(position))
            })
            .map_err(|e| {
                tracing::warn!(%id, error = %e, "rejected transaction delete");
                e
            })?;

        tracing::info!(%id, "transaction deleted");
        Ok(removed)
    }

    /// All transactions, newest first; equal dates keep insertion order
    pub fn list(&self) -> LedgerResult<Vec<Transaction>> {
        self.storage.transactions()
    }

    /// [`list`](Self::list) narrowed by `filter`
    pub fn list_filtered<Tz: TimeZone>(
        &self,
        filter: &TransactionFilter,
        now: &DateTime<Tz>,
        week_start: Weekday,
    ) -> LedgerResult<Vec<Transaction>> {
        let transactions = self.list()?;
        let selected = filter.apply(&transactions, now, week_start);
        tracing::debug!(total = transactions.len(), selected = selected.len(), "filtered transactions");
        Ok(selected)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        self.storage.read(|data| data.transaction(id).cloned())
    }

    /// Find a transaction by full id or short id prefix
    ///
    /// A prefix matching more than one transaction is a validation error.
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Transaction>> {
        let identifier = identifier.trim();

        if let Ok(id) = identifier.parse::<TransactionId>() {
            return self.get(id);
        }

        let mut matches = self.storage.read(|data| {
            data.transactions
                .iter()
                .filter(|t| t.id.matches_prefix(identifier))
                .cloned()
                .collect::<Vec<_>>()
        })?;

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(LedgerError::Validation(format!(
                "'{}' matches {} transactions; use more of the id",
                identifier, n
            ))),
        }
    }

    /// Number of transactions
    pub fn count(&self) -> LedgerResult<usize> {
        self.storage.read(|data| data.transactions.len())
    }
}

fn check_category(data: &LedgerData, category_id: Option<CategoryId>) -> LedgerResult<()> {
    match category_id {
        Some(id) if data.category(id).is_none() => {
            Err(LedgerError::category_not_found(id.to_string()))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::reports::DateRange;
    use crate::services::CategoryService;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_add_transaction() {
        let (_temp_dir, storage) = create_test_storage();
        let food = CategoryService::new(&storage).add("Food", "").unwrap();
        let service = TransactionService::new(&storage);

        let txn = service
            .add(
                TransactionInput::new(Money::from_cents(-5000), day(15))
                    .category(food.id)
                    .note(" lunch "),
            )
            .unwrap();

        assert_eq!(txn.amount, Money::from_cents(-5000));
        assert_eq!(txn.category_id, Some(food.id));
        assert_eq!(txn.note, "lunch");
        assert_eq!(service.get(txn.id).unwrap().unwrap(), txn);
    }

    #[test]
    fn test_add_uncategorized() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let txn = service
            .add(TransactionInput::new(Money::from_cents(20000), day(13)))
            .unwrap();
        assert!(txn.is_uncategorized());
        assert_eq!(service.count().unwrap(), 1);
    }

    #[test]
    fn test_add_with_unknown_category_fails() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let result = service.add(
            TransactionInput::new(Money::from_cents(-100), day(15)).category(CategoryId::new()),
        );
        assert!(result.unwrap_err().is_not_found());
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_update_replaces_fields() {
        let (_temp_dir, storage) = create_test_storage();
        let food = CategoryService::new(&storage).add("Food", "").unwrap();
        let service = TransactionService::new(&storage);
        let txn = service
            .add(
                TransactionInput::new(Money::from_cents(-100), day(10))
                    .category(food.id)
                    .note("old"),
            )
            .unwrap();

        let updated = service
            .update(txn.id, TransactionInput::new(Money::from_cents(300), day(11)))
            .unwrap();

        assert_eq!(updated.id, txn.id);
        assert_eq!(updated.amount, Money::from_cents(300));
        assert_eq!(updated.category_id, None);
        assert_eq!(updated.note, "");
        assert_eq!(updated.date, day(11));
        assert_eq!(updated.created_at, txn.created_at);
    }

    #[test]
    fn test_update_failures_change_nothing() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let txn = service
            .add(TransactionInput::new(Money::from_cents(-100), day(10)))
            .unwrap();

        let unknown_txn =
            service.update(TransactionId::new(), TransactionInput::new(Money::zero(), day(10)));
        assert!(unknown_txn.unwrap_err().is_not_found());

        let unknown_category = service.update(
            txn.id,
            TransactionInput::new(Money::zero(), day(10)).category(CategoryId::new()),
        );
        assert!(unknown_category.unwrap_err().is_not_found());

        assert_eq!(service.list().unwrap(), vec![txn]);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let txn = service
            .add(TransactionInput::new(Money::from_cents(-100), day(10)))
            .unwrap();

        let removed = service.delete(txn.id).unwrap();
        assert_eq!(removed.id, txn.id);
        assert!(service.get(txn.id).unwrap().is_none());
        assert!(service.delete(txn.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_newest_first_with_stable_ties() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let old = service
            .add(TransactionInput::new(Money::from_cents(-1), day(10)))
            .unwrap();
        let tie_a = service
            .add(TransactionInput::new(Money::from_cents(-2), day(12)))
            .unwrap();
        let tie_b = service
            .add(TransactionInput::new(Money::from_cents(-3), day(12)))
            .unwrap();
        let newest = service
            .add(TransactionInput::new(Money::from_cents(-4), day(14)))
            .unwrap();

        let ids: Vec<_> = service.list().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![newest.id, tie_a.id, tie_b.id, old.id]);
    }

    #[test]
    fn test_list_filtered() {
        let (_temp_dir, storage) = create_test_storage();
        let food = CategoryService::new(&storage).add("Food", "").unwrap();
        let service = TransactionService::new(&storage);
        let now = day(15);

        let today = service
            .add(TransactionInput::new(Money::from_cents(-5000), now).category(food.id))
            .unwrap();
        service
            .add(
                TransactionInput::new(Money::from_cents(-3000), now - Duration::days(1))
                    .category(food.id),
            )
            .unwrap();
        service
            .add(TransactionInput::new(Money::from_cents(20000), now - Duration::days(2)))
            .unwrap();

        let todays = service
            .list_filtered(
                &TransactionFilter::new().range(DateRange::Today),
                &now,
                Weekday::Mon,
            )
            .unwrap();
        assert_eq!(todays, vec![today]);

        let food_only = service
            .list_filtered(&TransactionFilter::new().category(food.id), &now, Weekday::Mon)
            .unwrap();
        assert_eq!(food_only.len(), 2);
    }

    #[test]
    fn test_category_delete_orphans_then_aggregates_uncategorized() {
        let (_temp_dir, storage) = create_test_storage();
        let categories = CategoryService::new(&storage);
        let food = categories.add("Food", "").unwrap();
        let service = TransactionService::new(&storage);

        for cents in [-100, -200] {
            service
                .add(TransactionInput::new(Money::from_cents(cents), day(15)).category(food.id))
                .unwrap();
        }
        categories.delete(food.id).unwrap();

        let report = crate::reports::SpendingReport::generate(
            &service.list().unwrap(),
            &categories.list().unwrap(),
        )
        .unwrap();
        let row = report.row(crate::reports::UNCATEGORIZED_LABEL).unwrap();
        assert_eq!(row.total, Money::from_cents(300));
        assert_eq!(row.transaction_count, 2);
    }

    #[test]
    fn test_find_by_short_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let txn = service
            .add(TransactionInput::new(Money::from_cents(-100), day(10)))
            .unwrap();

        assert_eq!(service.find(&txn.id.to_string()).unwrap().unwrap().id, txn.id);
        assert_eq!(
            service.find(&txn.id.to_full_string()).unwrap().unwrap().id,
            txn.id
        );
        assert!(service.find("txn-").unwrap().is_none());
    }
}
