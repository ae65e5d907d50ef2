//! File I/O utilities with atomic writes
//!
//! Every write goes to a sibling temp file, is synced, and is then renamed
//! over the target, so readers see either the old file or the new one.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::LedgerError;

/// Read JSON from a file that must exist
pub fn read_json<T, P>(path: P) -> Result<T, LedgerError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = File::open(path)
        .map_err(|e| LedgerError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| LedgerError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, sync, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), LedgerError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    ensure_parent(path).map_err(LedgerError::Storage)?;

    let temp_path = temp_path_for(path);

    let result = (|| -> Result<(), String> {
        let file = File::create(&temp_path)
            .map_err(|e| format!("Failed to create temp file: {}", e))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, data)
            .map_err(|e| format!("Failed to serialize data: {}", e))?;
        writer
            .flush()
            .map_err(|e| format!("Failed to flush data: {}", e))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| format!("Failed to sync data: {}", e))?;

        fs::rename(&temp_path, path).map_err(|e| format!("Failed to rename temp file: {}", e))
    })();

    if let Err(message) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(LedgerError::Storage(message));
    }

    tracing::debug!(path = %path.display(), "wrote json atomically");
    Ok(())
}

/// Copy `source` over `destination` atomically
///
/// The source is only read. If anything fails, the destination keeps its
/// previous contents (or stays absent).
pub fn copy_file_atomic(source: &Path, destination: &Path) -> Result<u64, LedgerError> {
    ensure_parent(destination).map_err(LedgerError::Io)?;

    let temp_path = temp_path_for(destination);

    let result = (|| -> Result<u64, String> {
        let bytes = fs::copy(source, &temp_path)
            .map_err(|e| format!("Failed to copy {}: {}", source.display(), e))?;

        File::open(&temp_path)
            .and_then(|f| f.sync_all())
            .map_err(|e| format!("Failed to sync copy: {}", e))?;

        fs::rename(&temp_path, destination)
            .map_err(|e| format!("Failed to move copy into place: {}", e))?;

        Ok(bytes)
    })();

    match result {
        Ok(bytes) => {
            tracing::debug!(
                from = %source.display(),
                to = %destination.display(),
                bytes,
                "copied file atomically"
            );
            Ok(bytes)
        }
        Err(message) => {
            let _ = fs::remove_file(&temp_path);
            Err(LedgerError::Io(message))
        }
    }
}

/// Sibling temp path in the same directory (important for atomic rename)
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn ensure_parent(path: &Path) -> Result<(), String> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory {}: {}", parent.display(), e)),
        _ => Ok(()),
    }
}
