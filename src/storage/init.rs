//! Storage initialization
//!
//! First-run setup: directories and an empty store document. Seeding the
//! starter categories is a registry operation, see
//! [`CategoryService::seed_defaults`](crate::services::CategoryService::seed_defaults).

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

use super::file_io::write_json_atomic;
use super::LedgerData;

/// Initialize storage for a fresh installation
///
/// Existing stores are left untouched.
pub fn initialize_storage(paths: &LedgerPaths) -> Result<(), LedgerError> {
    paths.ensure_directories()?;

    if needs_initialization(paths) {
        tracing::info!(path = %paths.store_file().display(), "creating empty store");
        write_json_atomic(paths.store_file(), &LedgerData::default())?;
    }

    Ok(())
}

/// Check if the store file has yet to be created
pub fn needs_initialization(paths: &LedgerPaths) -> bool {
    !paths.store_file().exists()
}
