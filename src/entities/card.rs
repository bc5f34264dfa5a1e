// 💳 Card Entity + Repository
//
// "The id is IDENTITY (assigned once), the four form fields are VALUES"
//
// - Id generated by the repository on first save, never changed afterwards
// - Holder, number, security code and expiry are opaque strings
// - Deleting a card deletes its transactions too
// - The repository also remembers which card is selected

use crate::entities::{load_collection, save_collection, TransactionRepository};
use crate::error::{WalletError, WalletResult};
use crate::ids::{IdGenerator, UuidIds};
use crate::store::KeyValueStore;
use crate::validation::validate_card;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// CARD ENTITY
// ============================================================================

/// Stored shape is camelCase. The aliases read blobs written by the older
/// Portuguese-keyed client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Empty until the card is first saved
    #[serde(default)]
    pub id: String,

    #[serde(alias = "nomeCartao")]
    pub holder_name: String,

    #[serde(alias = "numeroCartao")]
    pub card_number: String,

    #[serde(alias = "cvv")]
    pub security_code: String,

    /// e.g. "12/29"
    #[serde(alias = "validade")]
    pub expiry: String,
}

impl Card {
    /// Unsaved card, as submitted from the form
    pub fn draft(holder_name: &str, card_number: &str, security_code: &str, expiry: &str) -> Self {
        Card {
            id: String::new(),
            holder_name: holder_name.to_string(),
            card_number: card_number.to_string(),
            security_code: security_code.to_string(),
            expiry: expiry.to_string(),
        }
    }

    pub fn is_saved(&self) -> bool {
        !self.id.is_empty()
    }

    /// Card number with only the last 4 characters visible
    ///
    /// Example: "4111111111111111" → "*1111"
    pub fn masked_number(&self) -> String {
        let chars: Vec<char> = self.card_number.chars().collect();
        if chars.len() <= 4 {
            return self.card_number.clone();
        }
        let last4: String = chars[chars.len() - 4..].iter().collect();
        format!("*{}", last4)
    }
}

// ============================================================================
// CARD REPOSITORY
// ============================================================================

pub struct CardRepository {
    cards: Vec<Card>,
    selected: Option<String>,
    store: Arc<dyn KeyValueStore>,
    key: String,
    ids: Box<dyn IdGenerator>,
}

impl CardRepository {
    /// Empty repository writing to `key`, with UUID ids
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        CardRepository {
            cards: Vec::new(),
            selected: None,
            store,
            key: key.into(),
            ids: Box::new(UuidIds),
        }
    }

    pub fn with_ids(mut self, ids: Box<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Replace the in-memory list with what the store holds and select the
    /// first card.
    ///
    /// On a read or parse failure the list is left empty and the error is
    /// returned for reporting.
    pub fn load(&mut self) -> WalletResult<usize> {
        self.cards.clear();
        self.selected = None;

        self.cards = load_collection(&*self.store, &self.key)?;

        let ids: Vec<&str> = self.cards.iter().map(|c| c.id.as_str()).collect();
        self.ids.observe_existing(&ids);
        self.selected = self.cards.first().map(|c| c.id.clone());

        info!("Loaded {} cards from {}", self.cards.len(), self.key);
        Ok(self.cards.len())
    }

    pub fn list(&self) -> &[Card] {
        &self.cards
    }

    pub fn count(&self) -> usize {
        self.cards.len()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected(&self) -> Option<&Card> {
        self.selected_id().and_then(|id| self.find_by_id(id))
    }

    pub fn select(&mut self, id: &str) -> WalletResult<()> {
        if self.find_by_id(id).is_none() {
            return Err(WalletError::CardNotFound(id.to_string()));
        }
        self.selected = Some(id.to_string());
        Ok(())
    }

    /// Insert a new card (empty id) or replace an existing one (matching id).
    ///
    /// Returns the card as stored. Validation and unknown-id failures leave the
    /// list untouched; a persistence failure leaves the list already updated
    /// but does not select the card.
    pub fn upsert(&mut self, mut card: Card) -> WalletResult<Card> {
        validate_card(&card).map_err(WalletError::Validation)?;

        if card.is_saved() {
            let index = self
                .cards
                .iter()
                .position(|c| c.id == card.id)
                .ok_or_else(|| WalletError::CardNotFound(card.id.clone()))?;
            self.cards[index] = card.clone();
            debug!("Card {} replaced at position {}", card.id, index);
        } else {
            card.id = self.ids.next_id();
            self.cards.push(card.clone());
            debug!("Card {} appended", card.id);
        }

        self.persist()?;
        if self.selected.is_none() {
            self.selected = Some(card.id.clone());
        }
        info!("Card saved: {}", card.id);
        Ok(card)
    }

    /// Remove a card and every transaction that references it.
    ///
    /// Both collections are written even if the first write fails; the first
    /// failure is returned.
    pub fn delete(&mut self, id: &str, transactions: &mut TransactionRepository) -> WalletResult<Card> {
        let index = self
            .cards
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| WalletError::CardNotFound(id.to_string()))?;
        let removed = self.cards.remove(index);

        if self.selected.as_deref() == Some(id) {
            self.selected = self.cards.first().map(|c| c.id.clone());
        }

        let persisted = self.persist();
        let cascaded = transactions.delete_by_card(id);

        persisted?;
        let removed_transactions = cascaded?;

        info!(
            "Card deleted: {} ({} transactions removed)",
            id, removed_transactions
        );
        Ok(removed)
    }

    fn persist(&self) -> WalletResult<()> {
        save_collection(&*self.store, &self.key, &self.cards)
    }
}

// ============================================================================
// TESTS
// ============================================================================
