//! User settings
//!
//! Display preferences and the calendar convention used by the relative
//! date ranges (which weekday starts a week).

use std::fmt::Write;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;

/// User settings, persisted as `config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// First day of week (0 = Sunday, 1 = Monday, ... 6 = Saturday)
    #[serde(default = "default_first_day_of_week")]
    pub first_day_of_week: u8,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_first_day_of_week() -> u8 {
    0 // Sunday
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            first_day_of_week: default_first_day_of_week(),
        }
    }
}

impl Settings {
    /// The weekday that starts a calendar week
    ///
    /// Out-of-range values wrap, so `7` is Sunday again.
    pub fn week_start(&self) -> Weekday {
        match self.first_day_of_week % 7 {
            0 => Weekday::Sun,
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            _ => Weekday::Sat,
        }
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        let mut settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))?;

        if !is_valid_date_format(&settings.date_format) {
            tracing::warn!(
                format = %settings.date_format,
                "unusable date_format in settings, using the default"
            );
            settings.date_format = default_date_format();
        }

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

/// A format is usable when it renders a plain calendar day
fn is_valid_date_format(format: &str) -> bool {
    let mut out = String::new();
    write!(out, "{}", NaiveDate::MIN.format(format)).is_ok()
}
