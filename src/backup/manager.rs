//! Backup creation
//!
//! There is exactly one archive, at a fixed name in the documents
//! directory. Each backup replaces the previous one atomically.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::error::{LedgerError, LedgerResult};
use crate::storage::{copy_file_atomic, Storage};

/// Metadata about the archive on disk
#[derive(Debug, Clone, PartialEq)]
pub struct BackupInfo {
    /// Full path to the archive
    pub path: PathBuf,
    /// Last time the archive was written
    pub modified_at: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Writes the backup archive
pub struct BackupManager<'a> {
    storage: &'a Storage,
}

impl<'a> BackupManager<'a> {
    /// Create a new BackupManager
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Where the archive lives
    pub fn archive_path(&self) -> PathBuf {
        self.storage.paths().backup_file()
    }

    /// Copy the whole store to the archive location
    ///
    /// The live store is only read, under the store's read lock, so the
    /// archive is a consistent snapshot. Returns the archive path.
    pub fn backup(&self) -> LedgerResult<PathBuf> {
        let archive = self.archive_path();

        let bytes = self
            .storage
            .with_store_file(|store| copy_file_atomic(store, &archive))
            .map_err(|e| {
                tracing::warn!(path = %archive.display(), error = %e, "backup failed");
                e
            })?;

        tracing::info!(path = %archive.display(), bytes, "backup written");
        Ok(archive)
    }

    /// Metadata of the current archive, if one exists
    pub fn info(&self) -> LedgerResult<Option<BackupInfo>> {
        let path = self.archive_path();
        if !path.exists() {
            return Ok(None);
        }

        let metadata = fs::metadata(&path)
            .map_err(|e| LedgerError::Io(format!("Failed to read backup metadata: {}", e)))?;
        let modified_at = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .map_err(|e| LedgerError::Io(format!("Failed to read backup time: {}", e)))?;

        Ok(Some(BackupInfo {
            path,
            modified_at,
            size_bytes: metadata.len(),
        }))
    }
}
