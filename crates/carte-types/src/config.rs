//! Configuration types for the ledger, exchange and process logging.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CarteError, Result, constants};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarteConfig {
    pub ledger: LedgerConfig,
    pub exchange: ExchangeConfig,
    pub logging: LoggingConfig,
}

/// Ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Credits granted on registration.
    pub starting_credits: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            starting_credits: constants::DEFAULT_STARTING_CREDITS,
        }
    }
}

/// Exchange configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// `wants` text used when the publisher leaves it empty.
    /// `{rarity}` is substituted.
    pub default_wants_template: String,
    /// Title of completed-trade notifications.
    pub notification_title: String,
}

impl ExchangeConfig {
    /// Render the default `wants` text for a rarity.
    #[must_use]
    pub fn default_wants(&self, rarity: &str) -> String {
        self.default_wants_template.replace("{rarity}", rarity)
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            default_wants_template: constants::DEFAULT_WANTS_TEMPLATE.to_string(),
            notification_title: constants::DEFAULT_TRADE_NOTIFICATION_TITLE.to_string(),
        }
    }
}

/// Logging configuration (consumed by binaries installing a subscriber).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `"info,carte_exchange=debug"`.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: constants::DEFAULT_LOG_FILTER.to_string(),
            json: false,
        }
    }
}

impl CarteConfig {
    /// Parse a JSON document; missing sections fall back to defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Reject values the engines cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.exchange.default_wants_template.trim().is_empty() {
            return Err(CarteError::Configuration(
                "exchange.default_wants_template must not be empty".into(),
            ));
        }
        if self.exchange.notification_title.trim().is_empty() {
            return Err(CarteError::Configuration(
                "exchange.notification_title must not be empty".into(),
            ));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(CarteError::Configuration("logging.filter must not be empty".into()));
        }
        Ok(())
    }
}
