// 👛 Wallet - the core the view layer talks to
//
// Wires both repositories to one store and one alert hook. Every operation
// returns its result AND reports failures through `show_alert`, so a view can
// either inspect the error or just re-render.

use crate::alerts::{AlertSink, LogAlerts};
use crate::balance::{balance, BalanceSummary};
use crate::config::{ConfigResult, IdStrategy, WalletConfig};
use crate::entities::{Card, CardRepository, Transaction, TransactionDraft, TransactionRepository};
use crate::error::{WalletError, WalletResult};
use crate::ids::{IdGenerator, SequentialIds, UuidIds};
use crate::store::{KeyValueStore, MemoryStore, SqliteStore};
use anyhow::Context;
use log::{info, warn};
use std::sync::Arc;

/// Record counts after `load_data`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub cards: usize,
    pub transactions: usize,
    /// At least one collection could not be read and was reset to empty
    pub degraded: bool,
}

pub struct Wallet {
    cards: CardRepository,
    transactions: TransactionRepository,
    alerts: Box<dyn AlertSink>,
}

fn id_generator(strategy: IdStrategy) -> Box<dyn IdGenerator> {
    match strategy {
        IdStrategy::Uuid => Box::new(UuidIds),
        IdStrategy::Sequential => Box::new(SequentialIds::new()),
    }
}

impl Wallet {
    /// Empty wallet over `store`. Call `load_data` before use.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        config: &WalletConfig,
        alerts: Box<dyn AlertSink>,
    ) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Wallet::build(store, config, alerts))
    }

    fn build(store: Arc<dyn KeyValueStore>, config: &WalletConfig, alerts: Box<dyn AlertSink>) -> Self {
        let cards = CardRepository::new(store.clone(), config.cards_key.as_str())
            .with_ids(id_generator(config.id_strategy));
        let transactions = TransactionRepository::new(store, config.transactions_key.as_str())
            .with_ids(id_generator(config.id_strategy))
            .with_date_format(config.date_format.as_str());

        Wallet {
            cards,
            transactions,
            alerts,
        }
    }

    /// Wallet backed by the SQLite file in `config`, already loaded, logging alerts.
    pub fn open(config: &WalletConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let store = SqliteStore::open(&config.database_path).with_context(|| {
            format!("Failed to open wallet at {}", config.database_path.display())
        })?;

        let mut wallet = Wallet::build(Arc::new(store), config, Box::new(LogAlerts));
        wallet.load_data();
        Ok(wallet)
    }

    /// Throwaway wallet with default settings
    pub fn in_memory() -> Self {
        Wallet::build(
            Arc::new(MemoryStore::new()),
            &WalletConfig::default(),
            Box::new(LogAlerts),
        )
    }

    // ========================================================================
    // LOADING
    // ========================================================================

    /// Rehydrate both collections. Never fails: unreadable data becomes an
    /// empty collection and an alert.
    pub fn load_data(&mut self) -> LoadSummary {
        let mut summary = LoadSummary::default();

        match self.cards.load() {
            Ok(count) => summary.cards = count,
            Err(e) => {
                summary.degraded = true;
                self.alert(&e);
            }
        }

        match self.transactions.load() {
            Ok(count) => summary.transactions = count,
            Err(e) => {
                summary.degraded = true;
                self.alert(&e);
            }
        }

        info!(
            "Wallet loaded: {} cards, {} transactions",
            summary.cards, summary.transactions
        );
        summary
    }

    // ========================================================================
    // CARDS
    // ========================================================================

    pub fn cards(&self) -> &[Card] {
        self.cards.list()
    }

    /// Copy of a card, e.g. to pre-fill an edit form
    pub fn card(&self, id: &str) -> Option<Card> {
        self.cards.find_by_id(id).cloned()
    }

    pub fn selected_card_id(&self) -> Option<&str> {
        self.cards.selected_id()
    }

    pub fn selected_card(&self) -> Option<&Card> {
        self.cards.selected()
    }

    pub fn select_card(&mut self, id: &str) -> WalletResult<()> {
        let result = self.cards.select(id);
        self.report(result)
    }

    /// Create (empty id) or update (existing id) a card
    pub fn save_card(&mut self, card: Card) -> WalletResult<Card> {
        let result = self.cards.upsert(card);
        self.report(result)
    }

    /// Delete a card and all of its transactions
    pub fn delete_card(&mut self, id: &str) -> WalletResult<Card> {
        let result = self.cards.delete(id, &mut self.transactions);
        self.report(result)
    }

    // ========================================================================
    // TRANSACTIONS
    // ========================================================================

    pub fn transactions(&self) -> &[Transaction] {
        self.transactions.list()
    }

    /// Add a transaction to the selected card
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> WalletResult<Transaction> {
        let result = self.transactions.add(draft, self.cards.selected_id());
        self.report(result)
    }

    pub fn transactions_for_card(&self, card_id: &str) -> Vec<&Transaction> {
        self.transactions.list_for_card(card_id)
    }

    /// Empty when no card is selected
    pub fn transactions_for_selected(&self) -> Vec<&Transaction> {
        match self.cards.selected_id() {
            Some(id) => self.transactions.list_for_card(id),
            None => Vec::new(),
        }
    }

    // ========================================================================
    // BALANCES
    // ========================================================================

    pub fn balance_for(&self, card_id: &str) -> f64 {
        balance(self.transactions.list_for_card(card_id))
    }

    /// Balance of the selected card, `0` when nothing is selected
    pub fn selected_balance(&self) -> f64 {
        balance(self.transactions_for_selected())
    }

    pub fn summary_for(&self, card_id: &str) -> BalanceSummary {
        BalanceSummary::from_transactions(self.transactions.list_for_card(card_id))
    }

    // ========================================================================
    // ALERTS
    // ========================================================================

    fn report<T>(&self, result: WalletResult<T>) -> WalletResult<T> {
        if let Err(e) = &result {
            self.alert(e);
        }
        result
    }

    fn alert(&self, error: &WalletError) {
        warn!("{}", error);
        self.alerts
            .show_alert(error.alert_header(), &error.alert_message());
    }
}
