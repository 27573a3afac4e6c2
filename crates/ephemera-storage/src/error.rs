use thiserror::Error;

/// Result type for durable store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("storage io failed: {0}")]
    Io(String),
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

/// Loading the persisted records failed. Callers recover by starting empty.
#[derive(Debug, Clone, Error)]
pub enum PersistenceReadError {
    #[error("failed to read key '{key}': {source}")]
    Storage { key: String, source: StorageError },
    #[error("stored value under '{key}' is corrupt: {message}")]
    Corrupt { key: String, message: String },
}

/// Persisting the records failed. The in-memory store stays authoritative.
#[derive(Debug, Clone, Error)]
pub enum PersistenceWriteError {
    #[error("failed to encode records: {0}")]
    Encode(String),
    #[error("failed to write key '{key}': {source}")]
    Storage { key: String, source: StorageError },
}
