//! Storage layer
//!
//! The record store is a single JSON document holding every category and
//! transaction. One logical operation is one atomic save: mutations edit a
//! staged copy, the copy is written with [`write_json_atomic`], and only then
//! does it replace the in-memory state.

pub mod file_io;
pub mod init;

pub use file_io::{copy_file_atomic, read_json, write_json_atomic};
pub use init::initialize_storage;

use std::path::Path;
use std::sync::mpsc::Receiver;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::config::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::events::{ChangeEvent, ChangeKind, ChangeNotifier, EntityKind};
use crate::models::{Category, CategoryId, Transaction, TransactionId};

/// Current on-disk schema version
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// The persisted document
///
/// Both vectors are kept in insertion order; sorting is done on read and
/// is stable, so insertion order breaks ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerData {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Default for LedgerData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            categories: Vec::new(),
            transactions: Vec::new(),
        }
    }
}

impl LedgerData {
    /// Categories by `sort_order` ascending
    pub fn sorted_categories(&self) -> Vec<Category> {
        let mut list = self.categories.clone();
        list.sort_by_key(|c| c.sort_order);
        list
    }

    /// Transactions by `date` descending (newest first)
    pub fn sorted_transactions(&self) -> Vec<Transaction> {
        let mut list = self.transactions.clone();
        list.sort_by(|a, b| b.date.cmp(&a.date));
        list
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn category_mut(&mut self, id: CategoryId) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.id == id)
    }

    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn transaction_mut(&mut self, id: TransactionId) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|t| t.id == id)
    }
}

/// The record store: owns the document and is the only durability boundary
pub struct Storage {
    paths: LedgerPaths,
    data: RwLock<LedgerData>,
    notifier: ChangeNotifier,
}

impl Storage {
    /// Open (and on first run, create) the store
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        initialize_storage(&paths)?;

        let data = read_json(paths.store_file())?;
        tracing::debug!(path = %paths.store_file().display(), "store opened");

        Ok(Self {
            paths,
            data: RwLock::new(data),
            notifier: ChangeNotifier::new(),
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Re-read the document from disk, discarding in-memory state
    pub fn load(&self) -> LedgerResult<()> {
        let fresh: LedgerData = read_json(self.paths.store_file())?;
        *self.write_guard()? = fresh;
        Ok(())
    }

    /// Run a read-only closure against the current document
    pub fn read<T>(&self, f: impl FnOnce(&LedgerData) -> T) -> LedgerResult<T> {
        let guard = self.read_guard()?;
        Ok(f(&guard))
    }

    /// A full copy of the current document
    pub fn snapshot(&self) -> LedgerResult<LedgerData> {
        self.read(|data| data.clone())
    }

    /// All categories in display order
    pub fn categories(&self) -> LedgerResult<Vec<Category>> {
        self.read(LedgerData::sorted_categories)
    }

    /// All transactions, newest first
    pub fn transactions(&self) -> LedgerResult<Vec<Transaction>> {
        self.read(LedgerData::sorted_transactions)
    }

    /// Apply one logical mutation atomically
    ///
    /// `f` edits a staged copy. An error from `f` discards the copy. A copy
    /// equal to the current document is not saved. Otherwise the copy is
    /// written to disk and, only if that succeeds, becomes the current
    /// document. Subscribers are notified after the lock is released.
    pub fn transact<T>(
        &self,
        kind: EntityKind,
        change: ChangeKind,
        f: impl FnOnce(&mut LedgerData) -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        let mut events = Vec::new();

        let value = {
            let mut guard = self.write_guard()?;
            let mut staged = guard.clone();
            let value = f(&mut staged)?;

            if staged != *guard {
                write_json_atomic(self.paths.store_file(), &staged)?;

                let categories_changed = staged.categories != guard.categories;
                let transactions_changed = staged.transactions != guard.transactions;
                *guard = staged;

                events.push(ChangeEvent::new(kind, change));
                let secondary = match kind {
                    EntityKind::Category if transactions_changed => Some(EntityKind::Transaction),
                    EntityKind::Transaction if categories_changed => Some(EntityKind::Category),
                    _ => None,
                };
                if let Some(other) = secondary {
                    events.push(ChangeEvent::new(other, ChangeKind::Updated));
                }
            } else {
                tracing::debug!(?kind, ?change, "no changes to save");
            }

            value
        };

        for event in events {
            self.notifier.notify(event);
        }

        Ok(value)
    }

    /// Run `f` with the store file while no writer can touch it
    pub fn with_store_file<T>(&self, f: impl FnOnce(&Path) -> LedgerResult<T>) -> LedgerResult<T> {
        let _guard = self.read_guard()?;
        f(&self.paths.store_file())
    }

    /// Replace the store file via `f`, then reload, all under the write lock
    ///
    /// No read or write can interleave with the replacement. If `f` fails,
    /// the in-memory document is left as it was.
    pub fn replace_store_file<T>(
        &self,
        f: impl FnOnce(&Path) -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        let value = {
            let mut guard = self.write_guard()?;
            let store_file = self.paths.store_file();
            let value = f(&store_file)?;
            *guard = read_json(&store_file)?;
            value
        };

        self.notifier
            .notify(ChangeEvent::new(EntityKind::Category, ChangeKind::Restored));
        self.notifier
            .notify(ChangeEvent::new(EntityKind::Transaction, ChangeKind::Restored));

        Ok(value)
    }

    /// Receive a [`ChangeEvent`] after every successful save
    pub fn subscribe(&self) -> Receiver<ChangeEvent> {
        self.notifier.subscribe()
    }

    fn read_guard(&self) -> LedgerResult<RwLockReadGuard<'_, LedgerData>> {
        self.data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_guard(&self) -> LedgerResult<RwLockWriteGuard<'_, LedgerData>> {
        self.data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}
