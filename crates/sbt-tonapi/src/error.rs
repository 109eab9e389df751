//! Error types for the HTTP backends.

use sbt_mint::{LookupError, StoreError};
use sbt_tracker::IndexerError;
use thiserror::Error;

/// Errors that can occur when talking to TonAPI or Pinata.
#[derive(Debug, Error)]
pub enum TonApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Connection failed: {0}")]
    Connection(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Result type for backend operations.
pub type TonApiResult<T> = Result<T, TonApiError>;

impl TonApiError {
    /// Whether the same request may succeed later.
    pub fn is_transient(&self) -> bool {
        match self {
            TonApiError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            TonApiError::Connection(_) => true,
            TonApiError::Status { status, .. } => *status == 429 || *status >= 500,
            TonApiError::Parse(_) | TonApiError::InvalidConfig(_) => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TonApiError::Status { status: 404, .. })
    }
}

impl From<TonApiError> for IndexerError {
    fn from(e: TonApiError) -> Self {
        if e.is_not_found() {
            IndexerError::NotFound
        } else if e.is_transient() {
            IndexerError::Transient(e.to_string())
        } else {
            IndexerError::Malformed(e.to_string())
        }
    }
}

impl From<TonApiError> for LookupError {
    fn from(e: TonApiError) -> Self {
        match e {
            TonApiError::Parse(message) => LookupError::Malformed(message),
            other => LookupError::Request(other.to_string()),
        }
    }
}

impl From<TonApiError> for StoreError {
    fn from(e: TonApiError) -> Self {
        match e {
            TonApiError::Parse(message) => StoreError::Malformed(message),
            other => StoreError::Request(other.to_string()),
        }
    }
}
