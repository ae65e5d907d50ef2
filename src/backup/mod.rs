//! Backup and restore
//!
//! - `BackupManager`: copies the whole store to a single archive,
//!   `LedgerBackup.json` in the documents directory, replacing any previous
//!   archive.
//! - `RestoreManager`: checks an archive and replaces the live store with it.
//!
//! The archive is a plain copy of the store document, so any backup can be
//! inspected or restored on another machine.
//!
//! # Example
//!
//! ```rust,ignore
//! use pocket_ledger::backup::{BackupManager, RestoreManager};
//!
//! let archive = BackupManager::new(&storage).backup()?;
//!
//! // Later
//! let result = RestoreManager::new(&storage).restore(&archive)?;
//! println!("{}", result.summary());
//! ```

mod manager;
mod restore;

pub use manager::{BackupInfo, BackupManager};
pub use restore::{RestoreManager, RestoreResult, ValidationResult};
