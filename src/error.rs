// Error types for the wallet core
//
// Every failure is recoverable: the Wallet turns each one into an alert and
// keeps running.

use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    /// One or more required fields are missing or invalid. Nothing was mutated.
    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// The store rejected a read or write. In-memory state may already be ahead of it.
    #[error("persistence failed: {0:#}")]
    Persistence(#[source] anyhow::Error),

    /// Stored JSON could not be decoded.
    #[error("stored {key} is malformed: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("card not found: {0}")]
    CardNotFound(String),
}

impl WalletError {
    pub fn is_validation(&self) -> bool {
        matches!(self, WalletError::Validation(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, WalletError::Persistence(_))
    }

    /// Header shown to the user when this error is raised as an alert
    pub fn alert_header(&self) -> &'static str {
        match self {
            WalletError::Validation(_) => "Invalid input",
            WalletError::Persistence(_) => "Storage error",
            WalletError::Parse { .. } => "Load error",
            WalletError::CardNotFound(_) => "Card not found",
        }
    }

    /// Message shown to the user when this error is raised as an alert
    pub fn alert_message(&self) -> String {
        match self {
            WalletError::Validation(errors) => errors
                .iter()
                .map(|e| e.message.clone())
                .collect::<Vec<_>>()
                .join(" "),
            WalletError::Persistence(_) => "Failed to save your changes. Please try again.".to_string(),
            WalletError::Parse { .. } => "Failed to load saved data. Please try again.".to_string(),
            WalletError::CardNotFound(id) => format!("No card with id {} exists.", id),
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type WalletResult<T> = Result<T, WalletError>;
