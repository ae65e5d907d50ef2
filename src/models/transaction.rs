//! Transaction model
//!
//! A money movement with an optional, weak reference to a category. The
//! reference is a plain id: deleting the category clears it rather than
//! deleting the transaction.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, TransactionId};
use super::money::Money;

/// A recorded money movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, never reassigned
    pub id: TransactionId,

    /// Signed amount (negative for expenses by convention)
    pub amount: Money,

    /// Category reference; `None` means uncategorized
    pub category_id: Option<CategoryId>,

    /// Free-text note
    #[serde(default)]
    pub note: String,

    /// When the money moved
    pub date: DateTime<Utc>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(amount: Money, category_id: Option<CategoryId>, date: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            amount,
            category_id,
            note: String::new(),
            date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style note setter
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Whether this transaction has no category
    pub fn is_uncategorized(&self) -> bool {
        self.category_id.is_none()
    }

    pub fn is_expense(&self) -> bool {
        self.amount.is_negative()
    }

    pub fn is_income(&self) -> bool {
        self.amount.is_positive()
    }

    /// Drop the category reference (used when the category is deleted)
    pub fn clear_category(&mut self) {
        if self.category_id.take().is_some() {
            self.updated_at = Utc::now();
        }
    }

    /// The calendar day of this transaction in the given time zone
    pub fn local_day<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.date.with_timezone(tz).date_naive()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format("%Y-%m-%d"), self.amount)?;
        if !self.note.is_empty() {
            write!(f, " {}", self.note)?;
        }
        Ok(())
    }
}
