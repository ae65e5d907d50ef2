//! Pocket Ledger - personal finance tracker
//!
//! Records money movements tagged with user-defined categories, filters and
//! groups them, and reports spending per category. All data lives in a single
//! JSON store that can be backed up to, and restored from, one archive file.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Core data models (categories, transactions, money, ids)
//! - `storage`: The JSON record store with atomic saves
//! - `events`: Change notification for read views
//! - `services`: Category registry and transaction ledger
//! - `reports`: Filtering, day grouping, and spending aggregation
//! - `backup`: Single-archive backup and restore
//! - `display`: Terminal formatting and chart colors
//! - `cli`: Command handlers for the `ledger` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use pocket_ledger::config::LedgerPaths;
//! use pocket_ledger::services::{CategoryService, TransactionInput, TransactionService};
//! use pocket_ledger::storage::Storage;
//!
//! let storage = Storage::new(LedgerPaths::new()?)?;
//! CategoryService::new(&storage).seed_defaults()?;
//!
//! let food = CategoryService::new(&storage).find("Food")?.unwrap();
//! TransactionService::new(&storage)
//!     .add(TransactionInput::new(Money::from_cents(-1250), Utc::now()).category(food.id))?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
