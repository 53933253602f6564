//! `tripledger-store`
//!
//! **Responsibility:** durable, best-effort persistence of the trip ledger.
//!
//! This crate provides:
//! - A single-slot key/value storage abstraction with in-memory and SQLite backends
//! - The persisted snapshot layout (both record lists under one fixed key)
//! - `LedgerStore`, which hydrates once at startup and rewrites the slot after every mutation

pub mod config;
pub mod error;
pub mod snapshot;
pub mod sqlite;
pub mod storage;
pub mod store;

pub use config::{DEFAULT_STORAGE_KEY, StorageBackend, StoreConfig};
pub use error::StorageError;
pub use sqlite::SqliteStorage;
pub use storage::{InMemoryStorage, KeyValueStorage};
pub use store::{LedgerStore, LoadOutcome};
