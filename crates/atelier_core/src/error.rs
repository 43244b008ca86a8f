//! Error types shared across the Atelier crates.

use std::time::Duration;

/// Convenience alias used by the library crates.
pub type Result<T, E = AtelierError> = std::result::Result<T, E>;

/// Errors raised while decoding a comma-joined metadata string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    #[error("Number of elements not enough: expected {expected}, found {found}")]
    NotEnoughElements { expected: usize, found: usize },

    #[error("Number of elements too many: expected {expected}, found {found}")]
    TooManyElements { expected: usize, found: usize },
}

/// Errors that can occur while resolving an account's holdings.
#[derive(Debug, thiserror::Error)]
pub enum AtelierError {
    /// Configuration failed validation.
    #[error("Config error: {0}")]
    Config(String),

    /// A string could not be parsed as an account address.
    #[error("Invalid account address: {0}")]
    InvalidAddress(String),

    /// The wallet refused or could not provide an account.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// The request never produced an HTTP response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The node answered with a non-success status.
    #[error("Ledger API error ({status}): {body}")]
    Http { status: u16, body: String },

    /// A response body did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A view call returned a malformed metadata string.
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// The node did not answer in time.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AtelierError {
    /// Whether the failure happened before the node produced an answer.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}
