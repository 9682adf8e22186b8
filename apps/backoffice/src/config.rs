//! # Back-office Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`BIZDESK_*`)
//! 2. Defaults (this file)
//!
//! | Variable                      | Default                        |
//! |-------------------------------|--------------------------------|
//! | `BIZDESK_DB_PATH`             | platform data dir `bizdesk.db` |
//! | `BIZDESK_LOW_STOCK_THRESHOLD` | `10`                           |
//! | `BIZDESK_SALE_WRITE_MODE`     | `two_step`                     |
//! | `BIZDESK_BUSINESS_NAME`       | `BizDesk`                      |
//! | `BIZDESK_CURRENCY_SYMBOL`     | `$`                            |
//!
//! Configuration is read-only after initialization.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::services::SaleWriteMode;
use bizdesk_core::{Money, LOW_STOCK_THRESHOLD};

const DB_FILE_NAME: &str = "bizdesk.db";

/// Back-office configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// SQLite database file.
    pub db_path: PathBuf,

    /// A sale leaving fewer units than this raises a low-stock warning.
    pub low_stock_threshold: i64,

    /// How the sale coordinator writes the sale and the stock update.
    pub sale_write_mode: SaleWriteMode,

    /// Shown in the dashboard header
    pub business_name: String,

    pub currency_symbol: String,
}

impl AppConfig {
    /// Default configuration with an explicit database path.
    pub fn with_db_path(db_path: impl Into<PathBuf>) -> Self {
        AppConfig {
            db_path: db_path.into(),
            low_stock_threshold: LOW_STOCK_THRESHOLD,
            sale_write_mode: SaleWriteMode::default(),
            business_name: "BizDesk".to_string(),
            currency_symbol: "$".to_string(),
        }
    }

    /// Loads configuration from `BIZDESK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = match get("BIZDESK_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        let mut config = AppConfig::with_db_path(db_path);

        if let Some(threshold) = get("BIZDESK_LOW_STOCK_THRESHOLD") {
            config.low_stock_threshold = threshold
                .parse::<i64>()
                .ok()
                .filter(|t| *t >= 0)
                .ok_or_else(|| ConfigError::InvalidValue("BIZDESK_LOW_STOCK_THRESHOLD".to_string()))?;
        }

        if let Some(mode) = get("BIZDESK_SALE_WRITE_MODE") {
            config.sale_write_mode = mode
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BIZDESK_SALE_WRITE_MODE".to_string()))?;
        }

        if let Some(name) = get("BIZDESK_BUSINESS_NAME") {
            config.business_name = name;
        }

        if let Some(symbol) = get("BIZDESK_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        Ok(config)
    }

    /// Formats a cent amount with the configured symbol and two decimals.
    ///
    /// ## Example
    /// ```rust
    /// use bizdesk_backoffice::AppConfig;
    ///
    /// let config = AppConfig::with_db_path("bizdesk.db");
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let amount = Money::from_cents(cents);
        let sign = if cents < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            self.currency_symbol,
            amount.major().unsigned_abs(),
            amount.minor()
        )
    }
}

/// Platform data directory for the database file.
///
/// - **macOS**: `~/Library/Application Support/com.bizdesk.backoffice/bizdesk.db`
/// - **Windows**: `%APPDATA%\bizdesk\backoffice\data\bizdesk.db`
/// - **Linux**: `~/.local/share/backoffice/bizdesk.db`
fn default_db_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "bizdesk", "backoffice")
        .ok_or_else(|| ConfigError::MissingRequired("BIZDESK_DB_PATH".to_string()))?;

    Ok(dirs.data_dir().join(DB_FILE_NAME))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    /// The database directory could not be created.
    #[error("Cannot prepare data directory: {0}")]
    DataDir(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("BIZDESK_DB_PATH", "/tmp/b.db")])).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/b.db"));
        assert_eq!(config.low_stock_threshold, 10);
        assert_eq!(config.sale_write_mode, SaleWriteMode::TwoStep);
        assert_eq!(config.business_name, "BizDesk");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("BIZDESK_DB_PATH", "/tmp/b.db"),
            ("BIZDESK_LOW_STOCK_THRESHOLD", "25"),
            ("BIZDESK_SALE_WRITE_MODE", "atomic"),
            ("BIZDESK_BUSINESS_NAME", "Corner Shop"),
            ("BIZDESK_CURRENCY_SYMBOL", "€"),
        ]))
        .unwrap();

        assert_eq!(config.low_stock_threshold, 25);
        assert_eq!(config.sale_write_mode, SaleWriteMode::Atomic);
        assert_eq!(config.business_name, "Corner Shop");
        assert_eq!(config.format_currency(250), "€2.50");
    }

    #[test]
    fn test_blank_value_is_unset() {
        let config = AppConfig::from_lookup(lookup(&[
            ("BIZDESK_DB_PATH", "/tmp/b.db"),
            ("BIZDESK_LOW_STOCK_THRESHOLD", "  "),
        ]))
        .unwrap();
        assert_eq!(config.low_stock_threshold, 10);
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("BIZDESK_LOW_STOCK_THRESHOLD", "ten"),
            ("BIZDESK_LOW_STOCK_THRESHOLD", "-1"),
            ("BIZDESK_SALE_WRITE_MODE", "eventually"),
        ] {
            let err = AppConfig::from_lookup(lookup(&[("BIZDESK_DB_PATH", "/tmp/b.db"), (key, value)]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(ref k) if k == key));
        }
    }

    #[test]
    fn test_format_currency() {
        let config = AppConfig::with_db_path("bizdesk.db");
        assert_eq!(config.format_currency(1234), "$12.34");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(0), "$0.00");
        assert_eq!(config.format_currency(-1234), "-$12.34");
        assert_eq!(config.format_currency(i64::MAX), "$92233720368547758.07");
        assert_eq!(config.format_currency(i64::MIN), "-$92233720368547758.08");
    }
}
