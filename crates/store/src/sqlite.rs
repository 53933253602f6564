//! SQLite-backed key/value slots.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tokio::runtime::{Builder, Runtime};

use crate::error::StorageError;
use crate::storage::KeyValueStorage;

/// Durable storage in a single SQLite file.
///
/// The ledger API is synchronous, so this owns a current-thread runtime and blocks
/// on each query. Do not call it from inside another async runtime.
#[derive(Debug)]
pub struct SqliteStorage {
    pool: SqlitePool,
    runtime: Runtime,
    path: PathBuf,
}

impl SqliteStorage {
    /// Open (or create) the database at `path` and ensure the slot table exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StorageError::Runtime(e.to_string()))?;

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);

        let pool = runtime.block_on(async {
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(options)
                .await
                .with_context(|| format!("failed to open SQLite storage at {:?}", path))?;

            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS kv_slots (
                    key        TEXT PRIMARY KEY NOT NULL,
                    value      TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                "#,
            )
            .execute(&pool)
            .await
            .context("failed to create kv_slots table")?;

            Ok::<_, anyhow::Error>(pool)
        })?;

        tracing::debug!(path = %path.display(), "opened SQLite storage");

        Ok(Self {
            pool,
            runtime,
            path,
        })
    }

    /// Open the database at the default location (see [`default_database_path`]).
    pub fn open_default() -> Result<Self, StorageError> {
        Self::open(default_database_path()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStorage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = self.runtime.block_on(async {
            sqlx::query(
                r#"
                SELECT value
                FROM kv_slots
                WHERE key = ?1
                "#,
            )
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to read slot {key}"))
        })?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let value: String = row
            .try_get("value")
            .with_context(|| format!("slot {key} has no readable value"))?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let now = Utc::now().to_rfc3339();

        self.runtime.block_on(async {
            sqlx::query(
                r#"
                INSERT INTO kv_slots (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key)
                DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(key)
            .bind(value)
            .bind(&now)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to write slot {key}"))
        })?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.runtime.block_on(async {
            sqlx::query(
                r#"
                DELETE FROM kv_slots
                WHERE key = ?1
                "#,
            )
            .bind(key)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to remove slot {key}"))
        })?;

        Ok(())
    }
}

/// Resolve the default database path: `{app_data_dir}/tripledger/ledger.db`.
pub fn default_database_path() -> Result<PathBuf, StorageError> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    let mut path = base;
    path.push("tripledger");
    path.push("ledger.db");
    Ok(path)
}
