//! Backup CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use crate::backup::{BackupManager, RestoreManager};
use crate::error::LedgerResult;
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Write the backup archive, replacing the previous one
    Create,

    /// Replace all current data with an archive
    Restore {
        /// Archive path (defaults to the standard backup location)
        path: Option<PathBuf>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show what an archive contains
    Info {
        /// Archive path (defaults to the standard backup location)
        path: Option<PathBuf>,
    },
}

/// Handle a backup command
pub fn handle_backup_command(storage: &Storage, cmd: BackupCommands) -> LedgerResult<()> {
    let manager = BackupManager::new(storage);

    match cmd {
        BackupCommands::Create => {
            let path = manager.backup()?;
            println!("Backup created: {}", path.display());
        }

        BackupCommands::Restore { path, force } => {
            let path = path.unwrap_or_else(|| manager.archive_path());
            let validation = RestoreManager::validate(&path)?;

            println!("Backup Information");
            println!("==================");
            println!("File: {}", path.display());
            println!("Contents: {}", validation.summary());
            println!();

            if !force {
                println!("WARNING: This will overwrite ALL current data!");
                println!("To proceed, run again with --force flag:");
                println!("  ledger backup restore {} --force", path.display());
                return Ok(());
            }

            let result = RestoreManager::new(storage).restore(&path)?;
            println!("Restore complete!");
            println!("{}", result.summary());
        }

        BackupCommands::Info { path } => {
            let path = path.unwrap_or_else(|| manager.archive_path());
            let validation = RestoreManager::validate(&path)?;

            println!("Backup Details");
            println!("==============");
            println!("File: {}", path.display());
            if path == manager.archive_path() {
                if let Some(info) = manager.info()? {
                    println!("Size: {}", format_size(info.size_bytes));
                    println!(
                        "Written: {}",
                        info.modified_at.format("%Y-%m-%d %H:%M:%S UTC")
                    );
                }
            }
            println!("Schema version: {}", validation.schema_version);
            println!("Categories:     {}", validation.category_count);
            println!("Transactions:   {}", validation.transaction_count);
            if let Some(newest) = validation.newest_transaction {
                println!("Newest:         {}", newest.format("%Y-%m-%d"));
            }
            if validation.dangling_references > 0 {
                println!(
                    "Warning: {} transaction(s) reference missing categories",
                    validation.dangling_references
                );
            }
        }
    }

    Ok(())
}

/// Format file size in human-readable format
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
