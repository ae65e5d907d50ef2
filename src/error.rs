//! Custom error types for the ledger
//!
//! Every failure the core can produce is one of these variants. Nothing in
//! the library terminates the process; callers decide what to do.

use thiserror::Error;

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors (backup, restore, directory setup)
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Malformed input: empty names, duplicate ids in a reorder, bad amounts
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced id does not exist
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Record store failures (load, save, lock poisoning)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a store or filesystem failure
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Storage(_))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::Validation("Category name cannot be empty".into());
        assert_eq!(
            err.to_string(),
            "Validation error: Category name cannot be empty"
        );
    }

    #[test]
    fn test_not_found_error() {
        let err = LedgerError::category_not_found("Food");
        assert_eq!(err.to_string(), "Category not found: Food");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: LedgerError = io_err.into();
        assert!(matches!(err, LedgerError::Io(_)));
        assert!(err.is_io());
    }
}
