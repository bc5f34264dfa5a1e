//! Wallet configuration
//!
//! Every field has a default, so an empty JSON object (or no file at all) is a
//! valid configuration. Environment variables override file values.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::entities::transaction::DEFAULT_DATE_FORMAT;

/// Overrides `database_path`
pub const ENV_DATABASE_PATH: &str = "CARD_WALLET_DB";
/// Overrides `id_strategy` ("uuid" or "sequential")
pub const ENV_ID_STRATEGY: &str = "CARD_WALLET_ID_STRATEGY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid field value: {field} - {reason}")]
    InvalidValue { field: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// How new record ids are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Random v4 UUIDs
    #[default]
    Uuid,
    /// "0", "1", "2", ... resumed past the highest stored id
    Sequential,
}

impl std::str::FromStr for IdStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uuid" => Ok(IdStrategy::Uuid),
            "sequential" => Ok(IdStrategy::Sequential),
            other => Err(ConfigError::InvalidValue {
                field: "id_strategy".to_string(),
                reason: format!("expected \"uuid\" or \"sequential\", got {:?}", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Store key holding the card collection
    #[serde(default = "default_cards_key")]
    pub cards_key: String,
    /// Store key holding the transaction collection
    #[serde(default = "default_transactions_key")]
    pub transactions_key: String,
    /// SQLite file used by `Wallet::open`
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// strftime pattern for transaction dates
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub id_strategy: IdStrategy,
}

fn default_cards_key() -> String {
    "cards".to_string()
}

fn default_transactions_key() -> String {
    "transactions".to_string()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./card-wallet.db")
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

impl Default for WalletConfig {
    fn default() -> Self {
        WalletConfig {
            cards_key: default_cards_key(),
            transactions_key: default_transactions_key(),
            database_path: default_database_path(),
            date_format: default_date_format(),
            id_strategy: IdStrategy::default(),
        }
    }
}

impl WalletConfig {
    /// Read a JSON config file, apply environment overrides, validate.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: WalletConfig = serde_json::from_str(&raw)?;
        config.with_env_overrides()?.validated()
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> ConfigResult<Self> {
        WalletConfig::default().with_env_overrides()?.validated()
    }

    fn with_env_overrides(mut self) -> ConfigResult<Self> {
        if let Ok(path) = std::env::var(ENV_DATABASE_PATH) {
            if !path.is_empty() {
                self.database_path = PathBuf::from(path);
            }
        }
        if let Ok(strategy) = std::env::var(ENV_ID_STRATEGY) {
            self.id_strategy = strategy.parse()?;
        }
        Ok(self)
    }

    pub fn validated(self) -> ConfigResult<Self> {
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.cards_key.is_empty() {
            return Err(invalid("cards_key", "must not be empty"));
        }
        if self.transactions_key.is_empty() {
            return Err(invalid("transactions_key", "must not be empty"));
        }
        if self.cards_key == self.transactions_key {
            return Err(invalid(
                "transactions_key",
                "must differ from cards_key",
            ));
        }
        if self.date_format.is_empty() {
            return Err(invalid("date_format", "must not be empty"));
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(invalid(
                "date_format",
                &format!("{:?} is not a valid strftime pattern", self.date_format),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
