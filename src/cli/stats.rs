//! Spending statistics command

use chrono::Local;
use clap::Args;

use crate::config::Settings;
use crate::display::{format_spending_chart, CategoryPalette};
use crate::error::LedgerResult;
use crate::reports::{DateRange, SpendingReport, TransactionFilter};
use crate::services::{CategoryService, TransactionService};
use crate::storage::Storage;

use super::resolve_range;

/// Options for `stats`
#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    /// all, today, week, month, year, or START..END (default: month)
    #[arg(short, long)]
    pub range: Option<String>,
    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// Last day (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
    /// Plain table instead of the chart
    #[arg(long)]
    pub plain: bool,
}

/// Print spending by category for the selected range
pub fn handle_stats_command(
    storage: &Storage,
    settings: &Settings,
    args: StatsArgs,
) -> LedgerResult<()> {
    let range = resolve_range(
        args.range.as_deref(),
        args.from.as_deref(),
        args.to.as_deref(),
        DateRange::ThisMonth,
    )?;
    let now = Local::now();

    let transactions = TransactionService::new(storage).list_filtered(
        &TransactionFilter::new().range(range),
        &now,
        settings.week_start(),
    )?;
    let categories = CategoryService::new(storage).list()?;
    let report = SpendingReport::generate(&transactions, &categories)?;

    let title = format!("Spending, {}", range);

    if args.plain {
        println!("{}", title);
        print!("{}", report.format_terminal(&settings.currency_symbol));
    } else {
        let mut palette = CategoryPalette::new();
        print!(
            "{}",
            format_spending_chart(&report, &mut palette, &settings.currency_symbol, &title)
        );
    }

    Ok(())
}
