//! Grouping transactions by calendar day

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone};

use crate::models::{Money, Transaction};

/// All transactions of one calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    pub day: NaiveDate,
    /// In the order they were given
    pub transactions: Vec<Transaction>,
}

impl DayGroup {
    /// Net (signed) total of the day, clamped to the representable range
    pub fn net(&self) -> Money {
        self.transactions
            .iter()
            .fold(Money::zero(), |acc, t| acc.saturating_add(t.amount))
    }
}

/// Partition transactions into days, newest day first
///
/// Each group keeps the relative order of its transactions from the input,
/// so a date-descending ledger stays date-descending inside each day.
pub fn group_by_day<Tz: TimeZone>(transactions: &[Transaction], tz: &Tz) -> Vec<DayGroup> {
    let mut days: BTreeMap<NaiveDate, Vec<Transaction>> = BTreeMap::new();
    for txn in transactions {
        days.entry(txn.local_day(tz)).or_default().push(txn.clone());
    }

    days.into_iter()
        .rev()
        .map(|(day, transactions)| DayGroup { day, transactions })
        .collect()
}
