//! Report formatting utilities for terminal output

use colored::Colorize;

use crate::models::Money;
use crate::reports::SpendingReport;

use super::palette::CategoryPalette;

const BAR_WIDTH: usize = 24;

/// Format a money amount, red for negative and green for positive
pub fn format_money_colored(amount: Money, currency_symbol: &str) -> String {
    let text = amount.format_with_symbol(currency_symbol);
    if amount.is_negative() {
        text.red().to_string()
    } else if amount.is_positive() {
        text.green().to_string()
    } else {
        text
    }
}

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Truncate to `max_len` characters with an ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// Render the spending report as a colored bar chart with a legend
///
/// Colors come from `palette`, so the same label keeps its color across
/// every chart drawn with it.
pub fn format_spending_chart(
    report: &SpendingReport,
    palette: &mut CategoryPalette,
    currency_symbol: &str,
    title: &str,
) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", title.bold()));

    if report.is_empty() {
        output.push_str("No spending in this period.\n");
        return output;
    }

    let max = report
        .rows
        .first()
        .map(|r| r.total.as_f64())
        .unwrap_or_default();

    for row in &report.rows {
        let color = palette.color_for(&row.label);
        let bar = format_bar(row.total.as_f64(), max, BAR_WIDTH);
        output.push_str(&format!(
            "{} {:<20} {:>12} {:>6}  ({})\n",
            color.paint(&bar),
            truncate(&row.label, 20),
            row.total.format_with_symbol(currency_symbol),
            format_percentage(row.percentage),
            row.transaction_count
        ));
    }

    let label = format!("{:>width$}", "Total", width = BAR_WIDTH + 21);
    output.push_str(&format!(
        "{} {:>12}\n",
        label.bold(),
        report.total.format_with_symbol(currency_symbol)
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::palette::PaletteColor;
    use crate::models::{Category, Transaction};
    use chrono::Utc;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.05), "0.05%");
        assert_eq!(format_percentage(5.24), "5.2%");
        assert_eq!(format_percentage(42.4), "42%");
    }

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(5.0, 10.0, 4), "██░░");
        assert_eq!(format_bar(0.0, 10.0, 3), "   ");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("Entertainment", 8), "Enter...");
        assert_eq!(truncate("Café", 4), "Café");
    }

    #[test]
    fn test_chart_assigns_colors_by_row_order() {
        let food = Category::new("Food", "", 0);
        let travel = Category::new("Travel", "", 1);
        let transactions = vec![
            Transaction::new(Money::from_cents(-100), Some(food.id), Utc::now()),
            Transaction::new(Money::from_cents(-900), Some(travel.id), Utc::now()),
        ];
        let report = SpendingReport::generate(&transactions, &[food, travel]).unwrap();
        let mut palette = CategoryPalette::new();

        let chart = format_spending_chart(&report, &mut palette, "$", "Spending");

        assert!(chart.contains("Travel"));
        assert!(chart.contains("$9.00"));
        assert_eq!(palette.get("Travel"), Some(PaletteColor::Blue));
        assert_eq!(palette.get("Food"), Some(PaletteColor::Green));
    }

    #[test]
    fn test_empty_chart() {
        let report = SpendingReport::generate(&[], &[]).unwrap();
        let chart = format_spending_chart(&report, &mut CategoryPalette::new(), "$", "Spending");
        assert!(chart.contains("No spending"));
    }
}
