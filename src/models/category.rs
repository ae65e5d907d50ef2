//! Category model
//!
//! Categories are flat (no groups). Their display order is an explicit
//! `sort_order`; names are not required to be unique.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// Icon used when the caller does not pick one
pub const DEFAULT_ICON: &str = "tag";

/// Maximum category name length, in characters
pub const MAX_NAME_LEN: usize = 50;

/// A user-defined spending category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier, never reassigned
    pub id: CategoryId,

    /// Display name
    pub name: String,

    /// Symbolic glyph reference, opaque to the core
    #[serde(default = "default_icon")]
    pub icon: String,

    /// Position among categories (ascending)
    pub sort_order: i32,

    /// When the category was created
    pub created_at: DateTime<Utc>,

    /// When the category was last modified
    pub updated_at: DateTime<Utc>,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

impl Category {
    /// Create a new category
    pub fn new(name: impl Into<String>, icon: impl Into<String>, sort_order: i32) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            icon: icon.into(),
            sort_order,
            created_at: now,
            updated_at: now,
        }
    }

    /// Change name and icon together
    pub fn rename(&mut self, name: impl Into<String>, icon: impl Into<String>) {
        self.name = name.into();
        self.icon = icon.into();
        self.updated_at = Utc::now();
    }

    /// Move to a new position
    pub fn set_sort_order(&mut self, sort_order: i32) {
        if self.sort_order != sort_order {
            self.sort_order = sort_order;
            self.updated_at = Utc::now();
        }
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        validate_name(&self.name)
    }
}

/// Check a candidate category name
pub fn validate_name(name: &str) -> Result<(), CategoryValidationError> {
    if name.trim().is_empty() {
        return Err(CategoryValidationError::EmptyName);
    }

    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(CategoryValidationError::NameTooLong(len));
    }

    Ok(())
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Starter categories seeded into an empty registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultCategory {
    Food,
    Transport,
    Shopping,
    Entertainment,
    Household,
}

impl DefaultCategory {
    /// Get all default categories in display order
    pub fn all() -> &'static [Self] {
        &[
            Self::Food,
            Self::Transport,
            Self::Shopping,
            Self::Entertainment,
            Self::Household,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::Household => "Household",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Food => "fork.knife",
            Self::Transport => "car",
            Self::Shopping => "cart",
            Self::Entertainment => "gamecontroller",
            Self::Household => "house",
        }
    }

    /// Create a Category from this default
    pub fn to_category(&self, sort_order: i32) -> Category {
        Category::new(self.name(), self.icon(), sort_order)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(
                    f,
                    "Category name too long ({} chars, max {})",
                    len, MAX_NAME_LEN
                )
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = Category::new("Food", "fork.knife", 3);
        assert_eq!(category.name, "Food");
        assert_eq!(category.icon, "fork.knife");
        assert_eq!(category.sort_order, 3);
        assert_eq!(category.created_at, category.updated_at);
    }

    #[test]
    fn test_validation() {
        let mut category = Category::new("Valid", DEFAULT_ICON, 0);
        assert!(category.validate().is_ok());

        category.name = "   ".into();
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        category.name = "a".repeat(51);
        assert_eq!(
            category.validate(),
            Err(CategoryValidationError::NameTooLong(51))
        );

        // Counted in characters, not bytes
        category.name = "餐".repeat(50);
        assert!(category.validate().is_ok());
    }

    #[test]
    fn test_set_sort_order_noop_keeps_timestamp() {
        let mut category = Category::new("Food", DEFAULT_ICON, 2);
        let before = category.updated_at;
        category.set_sort_order(2);
        assert_eq!(category.updated_at, before);
    }

    #[test]
    fn test_defaults() {
        let defaults = DefaultCategory::all();
        assert_eq!(defaults.len(), 5);
        assert_eq!(defaults[0].name(), "Food");
        assert_eq!(defaults[0].icon(), "fork.knife");
        assert_eq!(defaults[4].to_category(4).sort_order, 4);
    }

    #[test]
    fn test_missing_icon_deserializes_to_default() {
        let category = Category::new("Food", "fork.knife", 0);
        let mut value = serde_json::to_value(&category).unwrap();
        value.as_object_mut().unwrap().remove("icon");

        let restored: Category = serde_json::from_value(value).unwrap();
        assert_eq!(restored.icon, DEFAULT_ICON);
        assert_eq!(restored.id, category.id);
    }
}
