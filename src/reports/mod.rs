//! Query & aggregation over transactions
//!
//! Pure read-side computations: filtering by category and date range,
//! grouping by day, and spending totals per category. Nothing here touches
//! the store; callers pass in the transactions and the current time.

pub mod daily;
pub mod filter;
pub mod range;
pub mod spending;

pub use daily::{group_by_day, DayGroup};
pub use filter::TransactionFilter;
pub use range::{parse_day, DateRange};
pub use spending::{CategoryTotal, SpendingReport, UNCATEGORIZED_LABEL};
