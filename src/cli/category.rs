//! Category CLI commands

use clap::Subcommand;

use crate::display::category::{format_category_details, format_category_list};
use crate::error::LedgerResult;
use crate::services::CategoryService;
use crate::storage::Storage;

use super::require_category;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories in display order
    List,

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Create a new category at the end of the list
    Add {
        /// Category name
        name: String,
        /// Icon name
        #[arg(short, long, default_value = "")]
        icon: String,
    },

    /// Rename a category
    Rename {
        /// Category name or ID
        category: String,
        /// New name
        name: String,
        /// New icon (keeps the current one if omitted)
        #[arg(short, long)]
        icon: Option<String>,
    },

    /// Put categories in the given order
    Reorder {
        /// Category names or IDs, first to last; unlisted ones follow
        #[arg(required = true)]
        categories: Vec<String>,
    },

    /// Delete a category; its transactions become uncategorized
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> LedgerResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            print!("{}", format_category_list(&service.list()?));
        }

        CategoryCommands::Show { category } => {
            let category = require_category(&service, &category)?;
            let transaction_count = storage.read(|data| {
                data.transactions
                    .iter()
                    .filter(|t| t.category_id == Some(category.id))
                    .count()
            })?;
            print!("{}", format_category_details(&category, transaction_count));
        }

        CategoryCommands::Add { name, icon } => {
            let category = service.add(&name, &icon)?;
            println!("Created category: {}", category.name);
            println!("  ID: {}", category.id);
            println!("  Order: {}", category.sort_order);
        }

        CategoryCommands::Rename {
            category,
            name,
            icon,
        } => {
            let existing = require_category(&service, &category)?;
            let renamed = service.rename(existing.id, &name, icon.as_deref())?;
            println!("Renamed category: {} -> {}", existing.name, renamed.name);
        }

        CategoryCommands::Reorder { categories } => {
            let ids = categories
                .iter()
                .map(|c| require_category(&service, c).map(|c| c.id))
                .collect::<LedgerResult<Vec<_>>>()?;
            let ordered = service.reorder(&ids)?;
            println!("New order:");
            for category in ordered {
                println!("  {}. {}", category.sort_order, category.name);
            }
        }

        CategoryCommands::Delete { category } => {
            let existing = require_category(&service, &category)?;
            let orphaned = service.delete(existing.id)?;
            println!("Deleted category: {}", existing.name);
            if orphaned > 0 {
                println!("  {} transaction(s) are now uncategorized", orphaned);
            }
        }
    }

    Ok(())
}
