//! Category service
//!
//! The category registry: CRUD, explicit ordering, first-run seeding, and
//! deletion that orphans (never deletes) the transactions that referenced
//! the category.

use std::collections::HashSet;

use crate::error::{LedgerError, LedgerResult};
use crate::events::{ChangeKind, EntityKind};
use crate::models::category::{validate_name, DEFAULT_ICON};
use crate::models::{Category, CategoryId, DefaultCategory};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// List all categories by `sort_order` ascending
    pub fn list(&self) -> LedgerResult<Vec<Category>> {
        self.storage.categories()
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> LedgerResult<Option<Category>> {
        self.storage.read(|data| data.category(id).cloned())
    }

    /// Find a category by name (case-insensitive), full id, or short id
    ///
    /// Names are not unique; the first match in display order wins.
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Category>> {
        let identifier = identifier.trim();
        let categories = self.list()?;

        let name_lower = identifier.to_lowercase();
        if let Some(category) = categories
            .iter()
            .find(|c| c.name.to_lowercase() == name_lower)
        {
            return Ok(Some(category.clone()));
        }

        if let Ok(id) = identifier.parse::<CategoryId>() {
            return Ok(categories.into_iter().find(|c| c.id == id));
        }

        Ok(categories
            .into_iter()
            .find(|c| c.id.matches_prefix(identifier)))
    }

    /// Number of categories
    pub fn count(&self) -> LedgerResult<usize> {
        self.storage.read(|data| data.categories.len())
    }

    /// Create a category at the end of the display order
    pub fn add(&self, name: &str, icon: &str) -> LedgerResult<Category> {
        let name = name.trim();
        validate_name(name).map_err(|e| {
            tracing::warn!(error = %e, "rejected new category");
            LedgerError::Validation(e.to_string())
        })?;
        let icon = normalize_icon(icon);

        let category = self
            .storage
            .transact(EntityKind::Category, ChangeKind::Created, |data| {
                let next_order = data
                    .categories
                    .iter()
                    .map(|c| c.sort_order)
                    .max()
                    .map_or(0, |max| max + 1);

                let category = Category::new(name, icon, next_order);
                data.categories.push(category.clone());
                Ok(category)
            })?;

        tracing::info!(id = %category.id, name = %category.name, sort_order = category.sort_order, "category added");
        Ok(category)
    }

    /// Change a category's name and, optionally, its icon
    pub fn rename(
        &self,
        id: CategoryId,
        new_name: &str,
        new_icon: Option<&str>,
    ) -> LedgerResult<Category> {
        let new_name = new_name.trim();

        let category = self
            .storage
            .transact(EntityKind::Category, ChangeKind::Updated, |data| {
                let category = data
                    .category_mut(id)
                    .ok_or_else(|| LedgerError::category_not_found(id.to_string()))?;

                validate_name(new_name).map_err(|e| LedgerError::Validation(e.to_string()))?;

                let icon = new_icon
                    .map(normalize_icon)
                    .unwrap_or(&category.icon)
                    .to_string();
                if category.name != new_name || category.icon != icon {
                    category.rename(new_name, icon);
                }
                Ok(category.clone())
            })
            .map_err(|e| {
                tracing::warn!(%id, error = %e, "rejected category rename");
                e
            })?;

        tracing::info!(%id, name = %category.name, icon = %category.icon, "category renamed");
        Ok(category)
    }

    /// Rewrite sort orders to follow `ordered_ids`
    ///
    /// Listed categories get `0..n-1` in the given order. Categories left out
    /// keep their relative order and follow, numbered from `n`.
    pub fn reorder(&self, ordered_ids: &[CategoryId]) -> LedgerResult<Vec<Category>> {
        let mut seen = HashSet::with_capacity(ordered_ids.len());
        if let Some(duplicate) = ordered_ids.iter().find(|id| !seen.insert(**id)) {
            tracing::warn!(id = %duplicate, "rejected reorder with duplicate id");
            return Err(LedgerError::Validation(format!(
                "Category {} appears more than once in the new order",
                duplicate
            )));
        }

        self.storage
            .transact(EntityKind::Category, ChangeKind::Reordered, |data| {
                if let Some(unknown) = ordered_ids.iter().find(|id| data.category(**id).is_none()) {
                    return Err(LedgerError::Validation(format!(
                        "Cannot reorder unknown category {}",
                        unknown
                    )));
                }

                let unlisted: Vec<CategoryId> = data
                    .sorted_categories()
                    .into_iter()
                    .map(|c| c.id)
                    .filter(|id| !seen.contains(id))
                    .collect();

                for (position, id) in ordered_ids.iter().chain(unlisted.iter()).enumerate() {
                    if let Some(category) = data.category_mut(*id) {
                        category.set_sort_order(position as i32);
                    }
                }

                Ok(data.sorted_categories())
            })
            .map(|categories| {
                tracing::info!(count = ordered_ids.len(), "categories reordered");
                categories
            })
    }

    /// Delete a category and clear every reference to it
    ///
    /// Returns how many transactions became uncategorized. The removal and
    /// the reference clearing are saved together.
    pub fn delete(&self, id: CategoryId) -> LedgerResult<usize> {
        let (name, orphaned) = self
            .storage
            .transact(EntityKind::Category, ChangeKind::Deleted, |data| {
                let position = data
                    .categories
                    .iter()
                    .position(|c| c.id == id)
                    .ok_or_else(|| LedgerError::category_not_found(id.to_string()))?;
                let removed = data.categories.remove(position);

                let mut orphaned = 0;
                for txn in data
                    .transactions
                    .iter_mut()
                    .filter(|t| t.category_id == Some(id))
                {
                    txn.clear_category();
                    orphaned += 1;
                }

                Ok((removed.name, orphaned))
            })
            .map_err(|e| {
                tracing::warn!(%id, error = %e, "rejected category delete");
                e
            })?;

        tracing::info!(%id, %name, orphaned, "category deleted");
        Ok(orphaned)
    }

    /// Populate the starter categories, only into an empty registry
    ///
    /// Returns the categories created (empty when the registry already had
    /// any). Meant to be called once at startup.
    pub fn seed_defaults(&self) -> LedgerResult<Vec<Category>> {
        let seeded = self
            .storage
            .transact(EntityKind::Category, ChangeKind::Created, |data| {
                if !data.categories.is_empty() {
                    return Ok(Vec::new());
                }

                let defaults: Vec<Category> = DefaultCategory::all()
                    .iter()
                    .enumerate()
                    .map(|(i, default)| default.to_category(i as i32))
                    .collect();
                data.categories.extend(defaults.iter().cloned());
                Ok(defaults)
            })?;

        if !seeded.is_empty() {
            tracing::info!(count = seeded.len(), "seeded default categories");
        }
        Ok(seeded)
    }
}

fn normalize_icon(icon: &str) -> &str {
    let icon = icon.trim();
    if icon.is_empty() {
        DEFAULT_ICON
    } else {
        icon
    }
}
