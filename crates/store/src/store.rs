//! The persisted ledger handle handed to every consumer.

use tripledger_core::{ExchangeId, ExpenseId};
use tripledger_ledger::{
    CurrencyExchange, Expense, Ledger, LedgerCommands, LedgerQueries, NewExchange, NewExpense,
};

use crate::config::{StorageBackend, StoreConfig};
use crate::error::StorageError;
use crate::snapshot;
use crate::sqlite::SqliteStorage;
use crate::storage::{InMemoryStorage, KeyValueStorage};

/// What happened when the store read its slot at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No slot yet; started empty.
    Empty,
    /// Slot parsed; records restored.
    Restored { expenses: usize, exchanges: usize },
    /// Slot present but unparseable; its content was dropped and the ledger started empty.
    Discarded { reason: String },
    /// The backend could not be read; started empty without overwriting the slot.
    Unavailable { reason: String },
}

/// Ledger plus best-effort persistence under one fixed key.
///
/// Reads answer from memory. Every add/remove rewrites the whole slot; a failed write
/// is logged and otherwise ignored. Until [`LedgerStore::hydrate`] has run, reads see
/// an empty ledger and nothing is written.
#[derive(Debug)]
pub struct LedgerStore<S> {
    storage: S,
    key: String,
    ledger: Ledger,
    ready: bool,
    writable: bool,
}

impl<S: KeyValueStorage> LedgerStore<S> {
    /// Create a store and load its slot.
    pub fn open(storage: S, key: impl Into<String>) -> (Self, LoadOutcome) {
        let mut store = Self::pending(storage, key);
        let outcome = store.hydrate();
        (store, outcome)
    }

    /// Create a store that has not loaded yet.
    pub fn pending(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            ledger: Ledger::new(),
            ready: false,
            writable: true,
        }
    }

    /// Load the slot, replacing the in-memory ledger.
    ///
    /// Records added before the first load are kept and appended after the restored
    /// ones. Never fails: corrupt or unreadable slots degrade to an empty ledger.
    pub fn hydrate(&mut self) -> LoadOutcome {
        let early = if self.ready {
            Ledger::new()
        } else {
            std::mem::take(&mut self.ledger)
        };

        let stored = self
            .storage
            .get(&self.key)
            .map(|raw| raw.filter(|raw| !raw.trim().is_empty()));

        let (restored, outcome) = match stored {
            Ok(None) => {
                tracing::info!(key = %self.key, "no persisted ledger; starting empty");
                (Ledger::new(), LoadOutcome::Empty)
            }
            Ok(Some(raw)) => match snapshot::decode(&raw) {
                Ok(ledger) => {
                    let outcome = LoadOutcome::Restored {
                        expenses: ledger.expenses().len(),
                        exchanges: ledger.exchanges().len(),
                    };
                    tracing::info!(
                        key = %self.key,
                        expenses = ledger.expenses().len(),
                        exchanges = ledger.exchanges().len(),
                        "ledger restored"
                    );
                    (ledger, outcome)
                }
                Err(err) => {
                    tracing::warn!(key = %self.key, error = %err, "discarding unreadable ledger data");
                    (
                        Ledger::new(),
                        LoadOutcome::Discarded {
                            reason: err.to_string(),
                        },
                    )
                }
            },
            Err(err) => {
                tracing::error!(key = %self.key, error = %err, "ledger storage unreadable; starting empty");
                (
                    Ledger::new(),
                    LoadOutcome::Unavailable {
                        reason: err.to_string(),
                    },
                )
            }
        };

        self.ledger = restored;
        let (early_expenses, early_exchanges) = early.into_records();
        for expense in early_expenses {
            if let Err(err) = self.ledger.insert_expense(expense) {
                tracing::warn!(error = %err, "dropping expense recorded before load");
            }
        }
        for exchange in early_exchanges {
            if let Err(err) = self.ledger.insert_exchange(exchange) {
                tracing::warn!(error = %err, "dropping exchange recorded before load");
            }
        }

        self.ready = true;
        self.writable = !matches!(outcome, LoadOutcome::Unavailable { .. });
        self.persist();
        outcome
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The in-memory ledger (empty view until loaded).
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Drop every record and persist the empty ledger.
    pub fn clear(&mut self) {
        self.ledger.clear();
        tracing::info!(key = %self.key, "ledger cleared");
        self.persist();
    }

    /// Write the whole ledger to the slot. Failures are logged, never returned.
    fn persist(&self) {
        if !self.ready || !self.writable {
            tracing::debug!(key = %self.key, "skipping persist; store not loaded");
            return;
        }

        let payload = match snapshot::encode(&self.ledger) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(key = %self.key, error = %err, "failed to encode ledger");
                return;
            }
        };

        if let Err(err) = self.storage.set(&self.key, &payload) {
            tracing::error!(key = %self.key, error = %err, "failed to persist ledger");
        }
    }
}

impl LedgerStore<Box<dyn KeyValueStorage>> {
    /// Open the backend named by `config` and load the configured slot.
    ///
    /// Only opening the backend can fail; loading follows [`LedgerStore::hydrate`].
    pub fn open_with_config(config: &StoreConfig) -> Result<(Self, LoadOutcome), StorageError> {
        let storage: Box<dyn KeyValueStorage> = match config.backend {
            StorageBackend::Sqlite => {
                let path = config.resolve_database_path()?;
                Box::new(SqliteStorage::open(&path)?)
            }
            StorageBackend::Memory => Box::new(InMemoryStorage::new()),
        };

        tracing::info!(backend = ?config.backend, key = %config.storage_key, "opening ledger store");
        Ok(Self::open(storage, config.storage_key.clone()))
    }
}

impl<S: KeyValueStorage> LedgerQueries for LedgerStore<S> {
    fn expenses(&self) -> &[Expense] {
        if self.ready { self.ledger.expenses() } else { &[] }
    }

    fn exchanges(&self) -> &[CurrencyExchange] {
        if self.ready { self.ledger.exchanges() } else { &[] }
    }
}

impl<S: KeyValueStorage> LedgerCommands for LedgerStore<S> {
    fn add_expense(&mut self, fields: NewExpense) -> ExpenseId {
        let id = self.ledger.add_expense(fields);
        tracing::debug!(%id, "expense added");
        self.persist();
        id
    }

    fn remove_expense(&mut self, id: ExpenseId) -> Option<Expense> {
        let removed = self.ledger.remove_expense(id);
        tracing::debug!(%id, found = removed.is_some(), "expense removed");
        self.persist();
        removed
    }

    fn add_exchange(&mut self, fields: NewExchange) -> ExchangeId {
        let id = self.ledger.add_exchange(fields);
        tracing::debug!(%id, "exchange added");
        self.persist();
        id
    }

    fn remove_exchange(&mut self, id: ExchangeId) -> Option<CurrencyExchange> {
        let removed = self.ledger.remove_exchange(id);
        tracing::debug!(%id, found = removed.is_some(), "exchange removed");
        self.persist();
        removed
    }
}
