//! Service layer
//!
//! Business rules on top of the record store: validation, ordering, and
//! cross-entity operations such as orphaning transactions when their
//! category goes away. Each operation is one store save.

pub mod category;
pub mod transaction;

pub use category::CategoryService;
pub use transaction::{TransactionInput, TransactionService};
