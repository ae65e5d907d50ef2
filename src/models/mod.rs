//! Core data models
//!
//! Categories, transactions, and the value types they are built from.

pub mod category;
pub mod ids;
pub mod money;
pub mod transaction;

pub use category::{Category, CategoryValidationError, DefaultCategory};
pub use ids::{CategoryId, TransactionId};
pub use money::Money;
pub use transaction::Transaction;
