use thiserror::Error;

/// Failure talking to a storage backend.
///
/// These never reach ledger callers: the store logs them and carries on.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend failed: {0:#}")]
    Backend(#[from] anyhow::Error),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode ledger snapshot: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage runtime unavailable: {0}")]
    Runtime(String),
}
