//! Category display formatting

use crate::models::Category;

/// Format categories as a numbered list in display order
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nAdd one with 'ledger category add <name>'.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>5}  {:<12}  {:<16}  {}\n",
        "Order", "ID", "Icon", "Name"
    ));
    output.push_str(&"-".repeat(50));
    output.push('\n');

    for category in categories {
        output.push_str(&format!(
            "{:>5}  {:<12}  {:<16}  {}\n",
            category.sort_order, category.id, category.icon, category.name
        ));
    }

    output
}

/// Format category details for display
pub fn format_category_details(category: &Category, transaction_count: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category:     {}\n", category.name));
    output.push_str(&format!("ID:           {}\n", category.id.to_full_string()));
    output.push_str(&format!("Icon:         {}\n", category.icon));
    output.push_str(&format!("Sort order:   {}\n", category.sort_order));
    output.push_str(&format!("Transactions: {}\n", transaction_count));
    output.push_str(&format!(
        "Created:      {}\n",
        category.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}
