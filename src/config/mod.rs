//! Configuration module
//!
//! - Path resolution for the store, settings, and backup archive
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::Settings;
