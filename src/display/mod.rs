//! Display formatting for terminal output
//!
//! Turns categories, transactions, and reports into text. Holds the only
//! presentation state in the crate, the session [`CategoryPalette`].

pub mod category;
pub mod palette;
pub mod report;
pub mod transaction;

pub use category::{format_category_details, format_category_list};
pub use palette::{CategoryPalette, PaletteColor};
pub use report::{format_percentage, format_spending_chart};
pub use transaction::{
    format_day_groups, format_transaction_details, format_transaction_register,
};
