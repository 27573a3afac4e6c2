use thiserror::Error;

/// Shown when the gateway refuses a request without saying why.
pub const FALLBACK_MESSAGE: &str = "Failed to shorten URL.";

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The service answered but did not produce a short URL. The message is
    /// the service's own text, or [`FALLBACK_MESSAGE`] when it sent none.
    #[error("{0}")]
    Rejected(String),
    /// The request never completed.
    #[error("gateway unreachable: {0}")]
    Network(String),
}

impl GatewayError {
    /// Builds a rejection, substituting the fallback for empty text.
    pub fn rejected(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            Self::Rejected(FALLBACK_MESSAGE.to_string())
        } else {
            Self::Rejected(message)
        }
    }
}
