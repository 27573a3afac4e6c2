use ephemera_core::CoreError;
use ephemera_gateway::GatewayError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

/// Failures a user can see. Display strings are meant to be shown as-is;
/// the inner detail is for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Please enter a valid URL (e.g., https://example.com).")]
    Validation(String),
    #[error("{0}")]
    Gateway(String),
    #[error("An error occurred. Please check your network connection.")]
    Network(String),
    #[error("{0}")]
    Core(CoreError),
    #[error("invalid session settings: {0}")]
    InvalidSettings(String),
}

impl From<CoreError> for SessionError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidUrl(message) => Self::Validation(message),
            other => Self::Core(other),
        }
    }
}

impl From<GatewayError> for SessionError {
    fn from(value: GatewayError) -> Self {
        match value {
            GatewayError::Rejected(message) => Self::Gateway(message),
            GatewayError::Network(message) => Self::Network(message),
        }
    }
}
