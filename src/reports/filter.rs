//! Transaction filtering by category and date range

use chrono::{DateTime, TimeZone, Weekday};

use crate::models::{CategoryId, Transaction};

use super::range::DateRange;

/// Selection criteria for transactions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// `None` matches every category, including uncategorized
    pub category_id: Option<CategoryId>,
    pub range: DateRange,
}

impl TransactionFilter {
    /// A filter that matches everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Only transactions in this category
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    pub fn matches<Tz: TimeZone>(
        &self,
        transaction: &Transaction,
        now: &DateTime<Tz>,
        week_start: Weekday,
    ) -> bool {
        if let Some(category_id) = self.category_id {
            if transaction.category_id != Some(category_id) {
                return false;
            }
        }
        self.range.contains(&transaction.date, now, week_start)
    }

    /// Select matching transactions, preserving input order
    pub fn apply<Tz: TimeZone>(
        &self,
        transactions: &[Transaction],
        now: &DateTime<Tz>,
        week_start: Weekday,
    ) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|t| self.matches(t, now, week_start))
            .cloned()
            .collect()
    }
}
