//! Transaction CLI commands

use chrono::{Local, Utc};
use clap::Subcommand;

use crate::config::Settings;
use crate::display::transaction::{
    format_day_groups, format_transaction_details, format_transaction_register,
};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, Transaction};
use crate::reports::{group_by_day, DateRange, TransactionFilter};
use crate::services::{CategoryService, TransactionInput, TransactionService};
use crate::storage::Storage;

use super::{parse_date, require_category, resolve_range};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction (negative amount for an expense)
    Add {
        /// Amount, e.g. "-12.50"
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Note
        #[arg(short, long, default_value = "")]
        note: String,
        /// Date (YYYY-MM-DD or RFC 3339); defaults to now
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Change a transaction; omitted fields keep their value
    Edit {
        /// Transaction ID
        id: String,
        /// New amount
        #[arg(short, long, allow_hyphen_values = true)]
        amount: Option<String>,
        /// New category name or ID
        #[arg(short, long, conflicts_with = "uncategorized")]
        category: Option<String>,
        /// Remove the category
        #[arg(long)]
        uncategorized: bool,
        /// New note
        #[arg(short, long)]
        note: Option<String>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },

    /// List transactions, newest first
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// all, today, week, month, year, or START..END
        #[arg(short, long)]
        range: Option<String>,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Group by day
        #[arg(long)]
        by_day: bool,
        /// Show at most this many transactions
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> LedgerResult<()> {
    let service = TransactionService::new(storage);
    let categories = CategoryService::new(storage);

    match cmd {
        TransactionCommands::Add {
            amount,
            category,
            note,
            date,
        } => {
            let mut input = TransactionInput::new(
                parse_amount(&amount)?,
                date.as_deref().map(parse_date).transpose()?.unwrap_or_else(Utc::now),
            )
            .note(note);
            if let Some(category) = category {
                input = input.category(require_category(&categories, &category)?.id);
            }

            let txn = service.add(input)?;
            println!(
                "Recorded {} on {}",
                txn.amount.format_with_symbol(&settings.currency_symbol),
                txn.date.with_timezone(&Local).format(&settings.date_format)
            );
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::Edit {
            id,
            amount,
            category,
            uncategorized,
            note,
            date,
        } => {
            let existing = require_transaction(&service, &id)?;

            let category_id = if uncategorized {
                None
            } else if let Some(category) = category {
                Some(require_category(&categories, &category)?.id)
            } else {
                existing.category_id
            };
            let input = TransactionInput {
                amount: amount
                    .as_deref()
                    .map(parse_amount)
                    .transpose()?
                    .unwrap_or(existing.amount),
                category_id,
                note: note.unwrap_or(existing.note),
                date: date.as_deref().map(parse_date).transpose()?.unwrap_or(existing.date),
            };

            let txn = service.update(existing.id, input)?;
            println!("Updated transaction {}", txn.id);
        }

        TransactionCommands::Show { id } => {
            let txn = require_transaction(&service, &id)?;
            let category = txn
                .category_id
                .map(|id| categories.get(id))
                .transpose()?
                .flatten();
            print!(
                "{}",
                format_transaction_details(&txn, category.as_ref().map(|c| c.name.as_str()), settings)
            );
        }

        TransactionCommands::Delete { id } => {
            let txn = require_transaction(&service, &id)?;
            service.delete(txn.id)?;
            println!("Deleted transaction {}", txn.id);
        }

        TransactionCommands::List {
            category,
            range,
            from,
            to,
            by_day,
            limit,
        } => {
            let mut filter = TransactionFilter::new().range(resolve_range(
                range.as_deref(),
                from.as_deref(),
                to.as_deref(),
                DateRange::All,
            )?);
            if let Some(category) = category {
                filter = filter.category(require_category(&categories, &category)?.id);
            }

            let mut transactions =
                service.list_filtered(&filter, &Local::now(), settings.week_start())?;
            if let Some(limit) = limit {
                transactions.truncate(limit);
            }
            let categories = categories.list()?;

            if by_day {
                let groups = group_by_day(&transactions, &Local);
                print!("{}", format_day_groups(&groups, &categories, settings));
            } else {
                print!(
                    "{}",
                    format_transaction_register(&transactions, &categories, settings)
                );
            }
        }
    }

    Ok(())
}

fn parse_amount(input: &str) -> LedgerResult<Money> {
    Money::parse(input).map_err(|e| LedgerError::Validation(format!("Invalid amount: {}", e)))
}

fn require_transaction(service: &TransactionService, identifier: &str) -> LedgerResult<Transaction> {
    service
        .find(identifier)?
        .ok_or_else(|| LedgerError::transaction_not_found(identifier))
}
