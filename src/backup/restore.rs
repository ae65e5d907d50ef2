//! Backup restoration
//!
//! Restoring replaces the entire store with the archive. The archive is read
//! and checked first; nothing is replaced unless it is a usable store
//! document. Transactions that point at categories missing from the archive
//! are restored uncategorized.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{LedgerError, LedgerResult};
use crate::storage::{write_json_atomic, LedgerData, Storage, SCHEMA_VERSION};

/// Handles restoring from the archive
pub struct RestoreManager<'a> {
    storage: &'a Storage,
}

impl<'a> RestoreManager<'a> {
    /// Create a new RestoreManager
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Check an archive without restoring it
    pub fn validate(path: &Path) -> LedgerResult<ValidationResult> {
        let data = read_archive(path)?;
        Ok(ValidationResult::from_data(path, &data))
    }

    /// Replace the live store with the archive at `path`
    ///
    /// Holds the store's write lock for the whole replacement, then reloads
    /// the in-memory document so this handle sees the restored data. On any
    /// failure the live store is unchanged.
    pub fn restore(&self, path: &Path) -> LedgerResult<RestoreResult> {
        let mut data = read_archive(path).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "rejected backup archive");
            e
        })?;
        let references_cleared = clear_dangling_references(&mut data);
        if references_cleared > 0 {
            tracing::warn!(
                count = references_cleared,
                "backup transactions referenced missing categories, restored uncategorized"
            );
        }

        self.storage.replace_store_file(|store| {
            write_json_atomic(store, &data).map_err(|e| match e {
                LedgerError::Storage(message) => LedgerError::Io(message),
                other => other,
            })
        })?;

        let result = RestoreResult {
            archive_path: path.to_path_buf(),
            categories_restored: data.categories.len(),
            transactions_restored: data.transactions.len(),
            references_cleared,
        };
        tracing::info!(
            path = %path.display(),
            categories = result.categories_restored,
            transactions = result.transactions_restored,
            "store restored from backup"
        );
        Ok(result)
    }
}

/// Read and check an archive
///
/// An archive that cannot be read or parsed is an I/O failure.
fn read_archive(path: &Path) -> LedgerResult<LedgerData> {
    let contents = fs::read_to_string(path)
        .map_err(|e| LedgerError::Io(format!("Failed to read backup file: {}", e)))?;

    let data: LedgerData = serde_json::from_str(&contents)
        .map_err(|e| LedgerError::Io(format!("Failed to parse backup file: {}", e)))?;

    if data.schema_version > SCHEMA_VERSION {
        return Err(LedgerError::Validation(format!(
            "Backup schema version {} is newer than supported version {}",
            data.schema_version, SCHEMA_VERSION
        )));
    }

    let mut category_ids = HashSet::new();
    if data.categories.iter().any(|c| !category_ids.insert(c.id)) {
        return Err(LedgerError::Validation(
            "Backup contains duplicate category ids".into(),
        ));
    }
    let mut transaction_ids = HashSet::new();
    if data.transactions.iter().any(|t| !transaction_ids.insert(t.id)) {
        return Err(LedgerError::Validation(
            "Backup contains duplicate transaction ids".into(),
        ));
    }

    Ok(data)
}

/// Orphan transactions whose category is not in `data`, returning how many
fn clear_dangling_references(data: &mut LedgerData) -> usize {
    let known: HashSet<_> = data.categories.iter().map(|c| c.id).collect();
    let mut cleared = 0;
    for txn in &mut data.transactions {
        if txn.category_id.is_some_and(|id| !known.contains(&id)) {
            txn.category_id = None;
            cleared += 1;
        }
    }
    cleared
}

/// Result of a restore operation
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreResult {
    pub archive_path: PathBuf,
    pub categories_restored: usize,
    pub transactions_restored: usize,
    /// Transactions restored uncategorized because their category was missing
    pub references_cleared: usize,
}

impl RestoreResult {
    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Restored {} categories and {} transactions from {}",
            self.categories_restored,
            self.transactions_restored,
            self.archive_path.display()
        );
        if self.references_cleared > 0 {
            summary.push_str(&format!(
                " ({} moved to uncategorized)",
                self.references_cleared
            ));
        }
        summary
    }
}

/// Result of validating an archive
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub archive_path: PathBuf,
    pub schema_version: u32,
    pub category_count: usize,
    pub transaction_count: usize,
    /// Date of the newest transaction, if any
    pub newest_transaction: Option<DateTime<Utc>>,
    /// Transactions pointing at categories missing from the archive
    pub dangling_references: usize,
}

impl ValidationResult {
    fn from_data(path: &Path, data: &LedgerData) -> Self {
        let dangling_references = data
            .transactions
            .iter()
            .filter_map(|t| t.category_id)
            .filter(|id| data.category(*id).is_none())
            .count();

        Self {
            archive_path: path.to_path_buf(),
            schema_version: data.schema_version,
            category_count: data.categories.len(),
            transaction_count: data.transactions.len(),
            newest_transaction: data.transactions.iter().map(|t| t.date).max(),
            dangling_references,
        }
    }

    /// Get a summary of what the archive holds
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} categories, {} transactions (schema v{})",
            self.category_count, self.transaction_count, self.schema_version
        );
        if let Some(newest) = self.newest_transaction {
            summary.push_str(&format!(", newest {}", newest.format("%Y-%m-%d")));
        }
        if self.dangling_references > 0 {
            summary.push_str(&format!(
                ", {} with missing categories",
                self.dangling_references
            ));
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::BackupManager;
    use crate::config::paths::LedgerPaths;
    use crate::events::{ChangeEvent, ChangeKind, EntityKind};
    use crate::models::{Category, Money, Transaction};
    use crate::services::{CategoryService, TransactionInput, TransactionService};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn populate(storage: &Storage) {
        let categories = CategoryService::new(storage);
        categories.seed_defaults().unwrap();
        let food = categories.find("Food").unwrap().unwrap();
        let transactions = TransactionService::new(storage);
        for (cents, day) in [(-5000, 15), (-3000, 14), (20000, 13)] {
            let date = Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0).unwrap();
            let input = TransactionInput::new(Money::from_cents(cents), date);
            let input = if cents < 0 { input.category(food.id) } else { input };
            transactions.add(input).unwrap();
        }
    }

    #[test]
    fn test_round_trip() {
        let (_temp_dir, storage) = create_test_storage();
        populate(&storage);
        let before = storage.snapshot().unwrap();

        let archive = BackupManager::new(&storage).backup().unwrap();

        let categories = CategoryService::new(&storage);
        let food = categories.find("Food").unwrap().unwrap();
        categories.delete(food.id).unwrap();
        categories.add("Later", "").unwrap();
        assert_ne!(storage.snapshot().unwrap(), before);

        let result = RestoreManager::new(&storage).restore(&archive).unwrap();

        assert_eq!(result.categories_restored, 5);
        assert_eq!(result.transactions_restored, 3);
        assert_eq!(result.references_cleared, 0);
        assert_eq!(storage.snapshot().unwrap(), before);

        // A fresh handle sees the same thing as the reloaded one
        let reopened = Storage::new(storage.paths().clone()).unwrap();
        assert_eq!(reopened.snapshot().unwrap(), before);
    }

    #[test]
    fn test_restore_emits_restored_events() {
        let (_temp_dir, storage) = create_test_storage();
        populate(&storage);
        let archive = BackupManager::new(&storage).backup().unwrap();
        let events = storage.subscribe();

        RestoreManager::new(&storage).restore(&archive).unwrap();

        assert_eq!(
            events.try_recv().unwrap(),
            ChangeEvent::new(EntityKind::Category, ChangeKind::Restored)
        );
        assert_eq!(
            events.try_recv().unwrap(),
            ChangeEvent::new(EntityKind::Transaction, ChangeKind::Restored)
        );
    }

    #[test]
    fn test_missing_archive_is_io_error() {
        let (temp_dir, storage) = create_test_storage();
        populate(&storage);
        let before = storage.snapshot().unwrap();

        let result = RestoreManager::new(&storage).restore(&temp_dir.path().join("nope.json"));

        assert!(result.unwrap_err().is_io());
        assert_eq!(storage.snapshot().unwrap(), before);
    }

    #[test]
    fn test_corrupt_archive_leaves_store_untouched() {
        let (temp_dir, storage) = create_test_storage();
        populate(&storage);
        let store_bytes = fs::read(storage.paths().store_file()).unwrap();
        let bad = temp_dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();

        let result = RestoreManager::new(&storage).restore(&bad);

        assert!(result.unwrap_err().is_io());
        assert_eq!(fs::read(storage.paths().store_file()).unwrap(), store_bytes);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let (temp_dir, storage) = create_test_storage();
        let category = Category::new("Food", "", 0);
        let mut data = LedgerData::default();
        data.categories.push(category.clone());
        data.categories.push(category);
        let path = temp_dir.path().join("dup.json");
        write_json_atomic(&path, &data).unwrap();

        assert!(RestoreManager::validate(&path).unwrap_err().is_validation());
        assert!(RestoreManager::new(&storage).restore(&path).is_err());
        assert!(storage.categories().unwrap().is_empty());
    }

    #[test]
    fn test_missing_categories_restore_uncategorized() {
        let (temp_dir, storage) = create_test_storage();
        let ghost = Category::new("Ghost", "", 0);
        let kept = Category::new("Kept", "", 1);
        let date = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let orphan = Transaction::new(Money::from_cents(-700), Some(ghost.id), date);
        let intact = Transaction::new(Money::from_cents(-300), Some(kept.id), date);
        let mut data = LedgerData::default();
        data.categories.push(kept.clone());
        data.transactions.push(orphan.clone());
        data.transactions.push(intact.clone());
        let path = temp_dir.path().join("partial.json");
        write_json_atomic(&path, &data).unwrap();

        assert_eq!(RestoreManager::validate(&path).unwrap().dangling_references, 1);
        let result = RestoreManager::new(&storage).restore(&path).unwrap();
        assert_eq!(result.references_cleared, 1);
        assert!(result.summary().contains("1 moved to uncategorized"));

        let service = TransactionService::new(&storage);
        assert_eq!(service.get(orphan.id).unwrap().unwrap().category_id, None);
        assert_eq!(service.get(intact.id).unwrap().unwrap().category_id, Some(kept.id));

        // The orphaned transaction can be edited without touching its category
        let updated = service
            .update(
                orphan.id,
                TransactionInput::new(Money::from_cents(-800), date).note("fixed"),
            )
            .unwrap();
        assert_eq!(updated.amount, Money::from_cents(-800));
    }

    #[test]
    fn test_validate_reports_counts() {
        let (_temp_dir, storage) = create_test_storage();
        populate(&storage);
        let archive = BackupManager::new(&storage).backup().unwrap();

        let validation = RestoreManager::validate(&archive).unwrap();

        assert_eq!(validation.category_count, 5);
        assert_eq!(validation.transaction_count, 3);
        assert_eq!(validation.dangling_references, 0);
        assert_eq!(
            validation.newest_transaction,
            Some(Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap())
        );
        assert!(validation.summary().contains("5 categories"));
    }
}
