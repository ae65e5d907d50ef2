//! Spending Report
//!
//! Aggregates the absolute value of amounts per category name over an
//! already-filtered set of transactions.

use std::collections::HashMap;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, CategoryId, Money, Transaction};

/// Label for transactions without a (live) category
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// One row of the report
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// Category name, or [`UNCATEGORIZED_LABEL`]
    pub label: String,
    /// Sum of absolute amounts
    pub total: Money,
    /// Number of transactions
    pub transaction_count: usize,
    /// Share of the grand total, 0-100
    pub percentage: f64,
}

/// Spending by category
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingReport {
    /// Rows by total descending; ties keep first-seen order
    pub rows: Vec<CategoryTotal>,
    /// Sum of absolute amounts across all rows
    pub total: Money,
    /// Total transaction count
    pub total_transactions: usize,
}

impl SpendingReport {
    /// Aggregate `transactions`, resolving labels through `categories`
    ///
    /// References to categories that no longer exist count as uncategorized.
    /// Fails with a validation error if a total would overflow.
    pub fn generate(transactions: &[Transaction], categories: &[Category]) -> LedgerResult<Self> {
        let names: HashMap<CategoryId, &str> = categories
            .iter()
            .map(|c| (c.id, c.name.as_str()))
            .collect();

        let mut rows: Vec<CategoryTotal> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut total = Money::zero();

        for txn in transactions {
            let label = txn
                .category_id
                .and_then(|id| names.get(&id).copied())
                .unwrap_or(UNCATEGORIZED_LABEL);

            let position = match index.get(label) {
                Some(&position) => position,
                None => {
                    rows.push(CategoryTotal {
                        label: label.to_string(),
                        total: Money::zero(),
                        transaction_count: 0,
                        percentage: 0.0,
                    });
                    index.insert(label.to_string(), rows.len() - 1);
                    rows.len() - 1
                }
            };

            let row = &mut rows[position];
            let amount = txn.amount.checked_abs().ok_or_else(|| overflow(&row.label))?;
            row.total = row.total.checked_add(amount).ok_or_else(|| overflow(&row.label))?;
            row.transaction_count += 1;
            total = total.checked_add(amount).ok_or_else(|| overflow("TOTAL"))?;
        }

        for row in &mut rows {
            row.percentage = if total.is_zero() {
                0.0
            } else {
                (row.total.cents() as f64 / total.cents() as f64) * 100.0
            };
        }

        // Stable, so equal totals keep first-seen order
        rows.sort_by(|a, b| b.total.cmp(&a.total));

        Ok(Self {
            rows,
            total,
            total_transactions: transactions.len(),
        })
    }

    /// Look up a row by label
    pub fn row(&self, label: &str) -> Option<&CategoryTotal> {
        self.rows.iter().find(|r| r.label == label)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{:<30} {:>12} {:>8} {:>7}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<30} {:>12} {:>8} {:>6.1}%\n",
                row.label,
                row.total.format_with_symbol(currency_symbol),
                row.transaction_count,
                row.percentage
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<30} {:>12} {:>8}\n",
            "TOTAL",
            self.total.format_with_symbol(currency_symbol),
            self.total_transactions
        ));

        output
    }
}

fn overflow(label: &str) -> LedgerError {
    LedgerError::Validation(format!("Spending total for '{}' is too large to compute", label))
}
