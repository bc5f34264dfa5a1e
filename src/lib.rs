// Card Wallet - Core Library
// Payment cards and their credit/debit transactions, persisted to a key-value store

pub mod alerts;
pub mod balance;
pub mod config;
pub mod entities;
pub mod error;
pub mod ids;
pub mod store;
pub mod validation;
pub mod wallet;

// Re-export commonly used types
pub use alerts::{Alert, AlertSink, LogAlerts, RecordingAlerts};
pub use balance::{balance, BalanceSummary};
pub use config::{ConfigError, IdStrategy, WalletConfig};
pub use entities::{
    Card, CardRepository,
    Operation, Transaction, TransactionDraft, TransactionRepository,
};
pub use error::{WalletError, WalletResult};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use validation::{ValidationError, ValidationResult};
pub use wallet::{LoadSummary, Wallet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
