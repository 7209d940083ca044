//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the portal client
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum EyeCareError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with 5xx or 429
    #[error("Server error: {0}")]
    Server(String),

    /// The backend rejected the request (4xx other than auth and 404)
    #[error("Request rejected: {0}")]
    Client(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl EyeCareError {
    /// Whether another attempt of the same request might succeed.
    /// Truncated or garbled bodies count as transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Server(_) | Self::Decode(_))
    }

    /// Stable lowercase name of the variant, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Server(_) => "server",
            Self::Client(_) => "client",
            Self::Auth(_) => "auth",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Decode(_) => "decode",
            Self::Storage(_) => "storage",
            Self::Cancelled(_) => "cancelled",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for EyeCareError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for portal operations
pub type Result<T> = std::result::Result<T, EyeCareError>;
