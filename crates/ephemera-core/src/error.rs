use thiserror::Error;

use crate::record::RecordId;

/// Errors raised by the core record model and store.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("record id already present: {0}")]
    DuplicateId(RecordId),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid ttl: {0}")]
    InvalidTtl(String),
}
