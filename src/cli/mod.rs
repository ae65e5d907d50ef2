//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod category;
pub mod stats;
pub mod transaction;

pub use backup::{handle_backup_command, BackupCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use stats::{handle_stats_command, StatsArgs};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::error::{LedgerError, LedgerResult};
use crate::models::Category;
use crate::reports::{parse_day, DateRange};
use crate::services::CategoryService;

/// Resolve `--range` / `--from` / `--to` into one range
///
/// Explicit bounds win over a named range.
pub(crate) fn resolve_range(
    range: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    default: DateRange,
) -> LedgerResult<DateRange> {
    if from.is_some() || to.is_some() {
        let start = from.map(parse_day).transpose()?;
        let end = to.map(parse_day).transpose()?;
        return Ok(DateRange::custom(start, end));
    }

    match range {
        Some(range) => range.parse(),
        None => Ok(default),
    }
}

/// Parse a transaction date: RFC 3339, or a plain day taken as local noon
pub(crate) fn parse_date(input: &str) -> LedgerResult<DateTime<Utc>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(input.trim()) {
        return Ok(datetime.with_timezone(&Utc));
    }

    let day = parse_day(input)?;
    let noon = day
        .and_hms_opt(12, 0, 0)
        .ok_or_else(|| LedgerError::Validation(format!("Invalid date '{}'", input)))?;
    Local
        .from_local_datetime(&noon)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| LedgerError::Validation(format!("Date '{}' does not exist locally", input)))
}

/// Look up a category by name or id, failing when it does not exist
pub(crate) fn require_category(service: &CategoryService, identifier: &str) -> LedgerResult<Category> {
    service
        .find(identifier)?
        .ok_or_else(|| LedgerError::category_not_found(identifier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_bounds_override_named_range() {
        let range = resolve_range(Some("week"), Some("2025-01-01"), None, DateRange::All).unwrap();
        assert_eq!(
            range,
            DateRange::custom(NaiveDate::from_ymd_opt(2025, 1, 1), None)
        );
    }

    #[test]
    fn test_default_range() {
        let range = resolve_range(None, None, None, DateRange::ThisMonth).unwrap();
        assert_eq!(range, DateRange::ThisMonth);
    }

    #[test]
    fn test_parse_date() {
        let exact = parse_date("2025-01-15T08:30:00Z").unwrap();
        assert_eq!(exact, Utc.with_ymd_and_hms(2025, 1, 15, 8, 30, 0).unwrap());

        let day = parse_date("2025-01-15").unwrap();
        assert_eq!(
            day.with_timezone(&Local).date_naive(),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );

        assert!(parse_date("15/01/2025").unwrap_err().is_validation());
    }
}
