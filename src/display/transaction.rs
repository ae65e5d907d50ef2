//! Transaction display formatting
//!
//! Register rows, the day-grouped list view, and single-transaction details.
//! Category names are resolved through a lookup built from the registry, so
//! an orphaned reference shows as uncategorized.

use std::collections::HashMap;

use crate::config::Settings;
use crate::models::{Category, CategoryId, Transaction};
use crate::reports::{DayGroup, UNCATEGORIZED_LABEL};

use super::report::{format_money_colored, truncate};

/// Category id to name lookup
pub fn category_names(categories: &[Category]) -> HashMap<CategoryId, &str> {
    categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect()
}

fn label_for<'a>(txn: &Transaction, names: &HashMap<CategoryId, &'a str>) -> &'a str {
    txn.category_id
        .and_then(|id| names.get(&id).copied())
        .unwrap_or(UNCATEGORIZED_LABEL)
}

/// Format a single transaction for display (register row)
pub fn format_transaction_row(
    txn: &Transaction,
    names: &HashMap<CategoryId, &str>,
    settings: &Settings,
) -> String {
    format!(
        "{:<12} {:<10} {:<16} {:>12}  {}",
        txn.id,
        txn.date.format(&settings.date_format),
        truncate(label_for(txn, names), 16),
        txn.amount.format_with_symbol(&settings.currency_symbol),
        truncate(&txn.note, 30)
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(
    transactions: &[Transaction],
    categories: &[Category],
    settings: &Settings,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let names = category_names(categories);
    let mut output = String::new();
    output.push_str(&format!(
        "{:<12} {:<10} {:<16} {:>12}  {}\n",
        "ID", "Date", "Category", "Amount", "Note"
    ));
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, &names, settings));
        output.push('\n');
    }

    output
}

/// Format day groups with a header and net total per day
pub fn format_day_groups(
    groups: &[DayGroup],
    categories: &[Category],
    settings: &Settings,
) -> String {
    if groups.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let names = category_names(categories);
    let mut output = String::new();

    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format!(
            "{}  ({})\n",
            group.day.format(&settings.date_format),
            format_money_colored(group.net(), &settings.currency_symbol)
        ));
        for txn in &group.transactions {
            output.push_str(&format!("  {}\n", format_transaction_row(txn, &names, settings)));
        }
    }

    output
}

/// Format transaction details for display
pub fn format_transaction_details(
    txn: &Transaction,
    category_name: Option<&str>,
    settings: &Settings,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id.to_full_string()));
    output.push_str(&format!(
        "Date:        {}\n",
        txn.date.format(&format!("{} %H:%M", settings.date_format))
    ));
    output.push_str(&format!(
        "Amount:      {}\n",
        format_money_colored(txn.amount, &settings.currency_symbol)
    ));
    output.push_str(&format!(
        "Category:    {}\n",
        category_name.unwrap_or(UNCATEGORIZED_LABEL)
    ));
    if !txn.note.is_empty() {
        output.push_str(&format!("Note:        {}\n", txn.note));
    }

    output
}
