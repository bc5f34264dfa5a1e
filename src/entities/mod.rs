// Entity models and their repositories
//
// Each repository:
// - Owns its collection exclusively (insertion order is the display order)
// - Writes the whole collection through to the injected store on every mutation
// - Never rolls memory back when the write fails

pub mod card;
pub mod transaction;

pub use card::{Card, CardRepository};
pub use transaction::{Operation, Transaction, TransactionDraft, TransactionRepository};

use crate::error::{WalletError, WalletResult};
use crate::store::KeyValueStore;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read one collection. Absent, blank and `null` values all mean "empty".
pub(crate) fn load_collection<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> WalletResult<Vec<T>> {
    let raw = store.get(key).map_err(WalletError::Persistence)?;

    match raw {
        None => Ok(Vec::new()),
        Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
        Some(raw) => serde_json::from_str::<Option<Vec<T>>>(&raw)
            .map(Option::unwrap_or_default)
            .map_err(|source| WalletError::Parse {
                key: key.to_string(),
                source,
            }),
    }
}

/// Write one collection as a JSON array, replacing whatever was there.
pub(crate) fn save_collection<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> WalletResult<()> {
    let json = serde_json::to_string(items)
        .with_context(|| format!("Failed to serialize {}", key))
        .map_err(WalletError::Persistence)?;

    store.set(key, &json).map_err(WalletError::Persistence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_load_absent_and_null_as_empty() {
        let store = MemoryStore::with_entries([("a", "null"), ("b", ""), ("c", "[]")]);

        for key in ["a", "b", "c", "missing"] {
            let items: Vec<Card> = load_collection(&store, key).unwrap();
            assert!(items.is_empty(), "key {} should load empty", key);
        }
    }

    #[test]
    fn test_load_malformed_is_parse_error() {
        let store = MemoryStore::with_entries([("cards", "{not json")]);

        let err = load_collection::<Card>(&store, "cards").unwrap_err();
        assert!(matches!(err, WalletError::Parse { ref key, .. } if key == "cards"));
    }

    #[test]
    fn test_save_then_load_preserves_order() {
        let store = MemoryStore::new();
        let cards = vec![
            Card {
                id: "b".to_string(),
                ..Card::draft("Bob", "5500000000000004", "999", "01/27")
            },
            Card {
                id: "a".to_string(),
                ..Card::draft("Alice", "4111111111111111", "123", "12/29")
            },
        ];

        save_collection(&store, "cards", &cards).unwrap();
        let loaded: Vec<Card> = load_collection(&store, "cards").unwrap();

        assert_eq!(loaded, cards);
    }
}
