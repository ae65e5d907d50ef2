//! Path management for the ledger
//!
//! ## Path Resolution Order
//!
//! 1. `POCKET_LEDGER_DIR` environment variable (if set)
//! 2. The platform data directory (`directories::ProjectDirs`)
//!
//! The backup archive lives in the user's documents directory under a fixed
//! name, so every backup overwrites the previous one.

use std::path::{Path, PathBuf};

use directories::{ProjectDirs, UserDirs};

use crate::error::LedgerError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "POCKET_LEDGER_DIR";

/// File name of the record store inside the data directory
pub const STORE_FILE_NAME: &str = "ledger.json";

/// File name of the backup archive inside the documents directory
pub const BACKUP_FILE_NAME: &str = "LedgerBackup.json";

/// Manages all paths used by the ledger
#[derive(Debug, Clone)]
pub struct LedgerPaths {
    /// Base directory for config and data
    base_dir: PathBuf,
    /// Where the backup archive is written
    documents_dir: PathBuf,
}

impl LedgerPaths {
    /// Resolve paths from the environment
    ///
    /// When `POCKET_LEDGER_DIR` is set, everything (including the documents
    /// directory) lives under it.
    pub fn new() -> Result<Self, LedgerError> {
        if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            return Ok(Self::with_base_dir(PathBuf::from(custom)));
        }

        let project = ProjectDirs::from("", "", "pocket-ledger").ok_or_else(|| {
            LedgerError::Config("Could not determine a home directory".into())
        })?;
        let base_dir = project.data_dir().to_path_buf();

        let documents_dir = UserDirs::new()
            .and_then(|dirs| dirs.document_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| base_dir.join("documents"));

        Ok(Self {
            base_dir,
            documents_dir,
        })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        let documents_dir = base_dir.join("documents");
        Self {
            base_dir,
            documents_dir,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the data directory (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the documents directory holding the backup archive
    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the record store
    pub fn store_file(&self) -> PathBuf {
        self.data_dir().join(STORE_FILE_NAME)
    }

    /// Get the fixed backup archive location
    pub fn backup_file(&self) -> PathBuf {
        self.documents_dir.join(BACKUP_FILE_NAME)
    }

    /// Ensure the base and data directories exist
    ///
    /// The documents directory is created lazily by the first backup.
    pub fn ensure_directories(&self) -> Result<(), LedgerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| LedgerError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}
