// 💸 Transaction Entity + Repository
//
// A single Credit or Debit against one card. The date is stamped once, as a
// display string, when the transaction is added.

use crate::entities::{load_collection, save_collection};
use crate::error::{WalletError, WalletResult};
use crate::ids::{IdGenerator, UuidIds};
use crate::store::KeyValueStore;
use crate::validation::{validate_transaction, ValidationError};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::sync::Arc;

/// Day/month/year, e.g. "05/03/2024"
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

// ============================================================================
// OPERATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Money in: adds to the balance
    #[serde(alias = "Crédito")]
    Credit,

    /// Money out: subtracts from the balance
    #[serde(alias = "Débito")]
    Debit,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Credit => "Credit",
            Operation::Debit => "Debit",
        }
    }

    pub fn sign(&self) -> f64 {
        match self {
            Operation::Credit => 1.0,
            Operation::Debit => -1.0,
        }
    }
}

// ============================================================================
// TRANSACTION ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,

    /// Display date stamped at creation. Not meant to be parsed back.
    pub date: String,

    pub description: String,

    pub operation: Operation,

    /// Always positive; the operation carries the sign
    pub value: f64,

    /// Owning card
    pub card_id: String,
}

impl Transaction {
    /// `value` with the operation's sign applied
    pub fn signed_value(&self) -> f64 {
        self.operation.sign() * self.value
    }

    pub fn is_credit(&self) -> bool {
        self.operation == Operation::Credit
    }
}

/// Transaction form input. The card comes from the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub occurred_at: DateTime<Utc>,
    pub description: String,
    pub operation: Operation,
    pub value: f64,
}

impl TransactionDraft {
    /// Draft dated now
    pub fn new(description: &str, operation: Operation, value: f64) -> Self {
        TransactionDraft {
            occurred_at: Utc::now(),
            description: description.to_string(),
            operation,
            value,
        }
    }

    pub fn on(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = occurred_at;
        self
    }
}

// ============================================================================
// TRANSACTION REPOSITORY
// ============================================================================

pub struct TransactionRepository {
    transactions: Vec<Transaction>,
    store: Arc<dyn KeyValueStore>,
    key: String,
    ids: Box<dyn IdGenerator>,
    date_format: String,
}

impl TransactionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        TransactionRepository {
            transactions: Vec::new(),
            store,
            key: key.into(),
            ids: Box::new(UuidIds),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn with_ids(mut self, ids: Box<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// chrono strftime pattern used to stamp `date`
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    /// Replace the in-memory list with what the store holds.
    /// On failure the list is left empty and the error returned.
    pub fn load(&mut self) -> WalletResult<usize> {
        self.transactions.clear();

        self.transactions = load_collection(&*self.store, &self.key)?;

        let ids: Vec<&str> = self.transactions.iter().map(|t| t.id.as_str()).collect();
        self.ids.observe_existing(&ids);

        info!("Loaded {} transactions from {}", self.transactions.len(), self.key);
        Ok(self.transactions.len())
    }

    pub fn list(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn count(&self) -> usize {
        self.transactions.len()
    }

    /// Transactions of one card, in insertion order
    pub fn list_for_card(&self, card_id: &str) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.card_id == card_id)
            .collect()
    }

    /// Validate, stamp and append a transaction for the selected card.
    pub fn add(&mut self, draft: TransactionDraft, selected_card_id: Option<&str>) -> WalletResult<Transaction> {
        validate_transaction(&draft, selected_card_id).map_err(WalletError::Validation)?;
        let card_id = selected_card_id.unwrap_or_default().to_string();

        let date = self.stamp_date(&draft.occurred_at)?;

        let transaction = Transaction {
            id: self.ids.next_id(),
            date,
            description: draft.description,
            operation: draft.operation,
            value: draft.value,
            card_id,
        };
        debug!("Transaction {} appended for card {}", transaction.id, transaction.card_id);
        self.transactions.push(transaction.clone());

        self.persist()?;
        info!(
            "Transaction saved: {} ({} {})",
            transaction.id,
            transaction.operation.as_str(),
            transaction.value
        );
        Ok(transaction)
    }

    /// Drop every transaction of `card_id`. Returns how many were removed.
    pub fn delete_by_card(&mut self, card_id: &str) -> WalletResult<usize> {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.card_id != card_id);
        let removed = before - self.transactions.len();

        self.persist()?;
        debug!("Removed {} transactions of card {}", removed, card_id);
        Ok(removed)
    }

    fn stamp_date(&self, occurred_at: &DateTime<Utc>) -> WalletResult<String> {
        let mut date = String::new();
        write!(date, "{}", occurred_at.format(&self.date_format)).map_err(|_| {
            WalletError::Validation(vec![ValidationError::new(
                "date",
                &format!("invalid date format {:?}", self.date_format),
                "Transaction",
            )])
        })?;
        Ok(date)
    }

    fn persist(&self) -> WalletResult<()> {
        save_collection(&*self.store, &self.key, &self.transactions)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn repo() -> (Arc<dyn KeyValueStore>, TransactionRepository) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let repo = TransactionRepository::new(store.clone(), "transactions")
            .with_ids(Box::new(SequentialIds::new()));
        (store, repo)
    }

    fn march_5th() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_add_stamps_day_month_year() {
        let (_, mut repo) = repo();

        let tx = repo
            .add(
                TransactionDraft::new("Coffee", Operation::Debit, 4.5).on(march_5th()),
                Some("card-1"),
            )
            .unwrap();

        assert_eq!(tx.id, "0");
        assert_eq!(tx.date, "05/03/2024");
        assert_eq!(tx.card_id, "card-1");
        assert_eq!(tx.signed_value(), -4.5);
        assert_eq!(repo.list(), &[tx]);
    }

    #[test]
    fn test_add_custom_date_format() {
        let (_, repo) = repo();
        let mut repo = repo.with_date_format("%Y-%m-%d");

        let tx = repo
            .add(
                TransactionDraft::new("Coffee", Operation::Debit, 4.5).on(march_5th()),
                Some("card-1"),
            )
            .unwrap();

        assert_eq!(tx.date, "2024-03-05");
    }

    #[test]
    fn test_add_rejects_invalid_without_append() {
        let (store, mut repo) = repo();

        let cases = vec![
            (TransactionDraft::new("Coffee", Operation::Debit, 0.0), Some("card-1")),
            (TransactionDraft::new("Coffee", Operation::Debit, -3.0), Some("card-1")),
            (TransactionDraft::new("", Operation::Credit, 10.0), Some("card-1")),
            (TransactionDraft::new("Coffee", Operation::Debit, 4.5), None),
        ];

        for (draft, selected) in cases {
            let result = repo.add(draft, selected);
            assert!(matches!(result, Err(WalletError::Validation(_))));
        }

        assert_eq!(repo.count(), 0);
        assert_eq!(store.get("transactions").unwrap(), None);
    }

    #[test]
    fn test_list_for_card_preserves_order() {
        let (_, mut repo) = repo();
        for (desc, card) in [("a", "c1"), ("b", "c2"), ("c", "c1"), ("d", "c1")] {
            repo.add(TransactionDraft::new(desc, Operation::Credit, 1.0), Some(card))
                .unwrap();
        }

        let descriptions: Vec<&str> = repo
            .list_for_card("c1")
            .iter()
            .map(|t| t.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["a", "c", "d"]);
        assert!(repo.list_for_card("unknown").is_empty());
    }

    #[test]
    fn test_delete_by_card() {
        let (store, mut repo) = repo();
        repo.add(TransactionDraft::new("a", Operation::Credit, 1.0), Some("c1")).unwrap();
        repo.add(TransactionDraft::new("b", Operation::Debit, 2.0), Some("c2")).unwrap();
        repo.add(TransactionDraft::new("c", Operation::Debit, 3.0), Some("c1")).unwrap();

        assert_eq!(repo.delete_by_card("c1").unwrap(), 2);
        assert_eq!(repo.count(), 1);
        assert_eq!(repo.list()[0].card_id, "c2");

        // Persisted state matches memory
        let stored: Vec<Transaction> =
            serde_json::from_str(&store.get("transactions").unwrap().unwrap()).unwrap();
        assert_eq!(stored, repo.list());

        assert_eq!(repo.delete_by_card("c1").unwrap(), 0);
    }

    #[test]
    fn test_load_roundtrip() {
        let (store, mut repo) = repo();
        repo.add(TransactionDraft::new("Salary", Operation::Credit, 100.0), Some("c1")).unwrap();
        repo.add(TransactionDraft::new("Rent", Operation::Debit, 30.0), Some("c1")).unwrap();

        let mut reloaded = TransactionRepository::new(store, "transactions");
        assert_eq!(reloaded.load().unwrap(), 2);
        assert_eq!(reloaded.list(), repo.list());
    }

    #[test]
    fn test_load_legacy_operations() {
        let legacy = r#"[
            {"id":"1","date":"05/03/2024","description":"Salário","operation":"Crédito","value":100,"cardId":"0"},
            {"id":"2","date":"06/03/2024","description":"Café","operation":"Débito","value":4.5,"cardId":"0"}
        ]"#;
        let store: Arc<dyn KeyValueStore> =
            Arc::new(MemoryStore::with_entries([("transactions", legacy)]));

        let mut repo = TransactionRepository::new(store, "transactions");
        repo.load().unwrap();

        assert_eq!(repo.list()[0].operation, Operation::Credit);
        assert_eq!(repo.list()[1].operation, Operation::Debit);
        assert_eq!(repo.list()[1].value, 4.5);
    }

    #[test]
    fn test_stored_shape_is_camel_case() {
        let (store, mut repo) = repo();
        repo.add(
            TransactionDraft::new("Coffee", Operation::Debit, 4.5).on(march_5th()),
            Some("card-1"),
        )
        .unwrap();

        let raw = store.get("transactions").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "id": "0",
                "date": "05/03/2024",
                "description": "Coffee",
                "operation": "Debit",
                "value": 4.5,
                "cardId": "card-1"
            }])
        );
    }
}
