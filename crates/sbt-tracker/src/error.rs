//! Error types for confirmation tracking.

use thiserror::Error;

/// Errors reported by an indexer lookup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexerError {
    /// The indexer has not seen a transaction for this message yet.
    #[error("Transaction not found")]
    NotFound,

    /// Network or server trouble. The lookup may succeed later.
    #[error("Transient indexer error: {0}")]
    Transient(String),

    /// The indexer answered with something that cannot be interpreted.
    #[error("Malformed indexer response: {0}")]
    Malformed(String),
}

impl IndexerError {
    /// Whether another attempt can change the answer.
    pub fn is_retryable(&self) -> bool {
        matches!(self, IndexerError::NotFound | IndexerError::Transient(_))
    }
}

/// Ways a confirmation wait can end without a transaction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// Every attempt failed with a retryable error.
    #[error("Transaction not confirmed after {attempts} attempts (last error: {last_error})")]
    Exhausted { attempts: u32, last_error: String },

    /// The indexer returned a response that will not improve on retry.
    #[error("Confirmation failed after {attempts} attempts: {error}")]
    Failed { attempts: u32, error: String },

    /// The wait was cancelled by the caller.
    #[error("Confirmation cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },
}

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
