//! Store configuration (environment-driven).

use std::path::PathBuf;

use crate::error::StorageError;
use crate::sqlite::default_database_path;

/// Slot key the ledger is persisted under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "viaje-chile-2026-data";

/// Which storage backend holds the ledger slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    /// Process-local only; nothing survives a restart.
    Memory,
}

impl StorageBackend {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Some(Self::Sqlite),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub storage_key: String,
    pub backend: StorageBackend,
    /// Explicit SQLite file; `None` means the OS data directory.
    pub database_path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            backend: StorageBackend::Sqlite,
            database_path: None,
        }
    }
}

impl StoreConfig {
    /// Read `TRIPLEDGER_STORAGE_KEY`, `TRIPLEDGER_STORAGE` and `TRIPLEDGER_DB_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`StoreConfig::from_env`] with a caller-supplied variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(key) = lookup("TRIPLEDGER_STORAGE_KEY").filter(|k| !k.trim().is_empty()) {
            config.storage_key = key;
        }

        if let Some(raw) = lookup("TRIPLEDGER_STORAGE") {
            match StorageBackend::parse(&raw) {
                Some(backend) => config.backend = backend,
                None => tracing::warn!(value = %raw, "unknown TRIPLEDGER_STORAGE; using sqlite"),
            }
        }

        if let Some(path) = lookup("TRIPLEDGER_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }

        config
    }

    pub fn resolve_database_path(&self) -> Result<PathBuf, StorageError> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => default_database_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = StoreConfig::from_lookup(|_| None);
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.storage_key, "viaje-chile-2026-data");
        assert_eq!(config.backend, StorageBackend::Sqlite);
    }

    #[test]
    fn reads_all_variables() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("TRIPLEDGER_STORAGE_KEY", "trip-2027"),
            ("TRIPLEDGER_STORAGE", "Memory"),
            ("TRIPLEDGER_DB_PATH", "/tmp/trip.db"),
        ]));
        assert_eq!(config.storage_key, "trip-2027");
        assert_eq!(config.backend, StorageBackend::Memory);
        assert_eq!(
            config.resolve_database_path().unwrap(),
            PathBuf::from("/tmp/trip.db")
        );
    }

    #[test]
    fn unknown_backend_and_blank_values_fall_back() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("TRIPLEDGER_STORAGE_KEY", "  "),
            ("TRIPLEDGER_STORAGE", "redis"),
        ]));
        assert_eq!(config, StoreConfig::default());
    }
}
