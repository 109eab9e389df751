//! Error types for SBT minting.

use sbt_cell::CellError;
use sbt_tracker::TrackerError;
use thiserror::Error;

/// Errors reported by a wallet when asked to send a transaction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The user declined the request in the wallet.
    #[error("Transaction rejected by wallet: {0}")]
    Rejected(String),

    /// The wallet could not sign or broadcast the transaction.
    #[error("Wallet failed to send transaction: {0}")]
    Failed(String),
}

/// Errors reported by a metadata store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Metadata upload failed: {0}")]
    Request(String),

    #[error("Unexpected metadata store response: {0}")]
    Malformed(String),
}

/// Errors reported while resolving a jetton wallet address.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Jetton wallet lookup failed: {0}")]
    Request(String),

    #[error("Unexpected jetton wallet lookup response: {0}")]
    Malformed(String),
}

/// Errors that can occur while minting an SBT.
#[derive(Debug, Error)]
pub enum MintError {
    /// A cell could not be built or (de)serialized.
    #[error("Cell error: {0}")]
    Cell(#[from] CellError),

    #[error(transparent)]
    Submission(#[from] SubmitError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    JettonLookup(#[from] LookupError),

    /// A setting needed by the requested flow is not configured.
    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),

    /// The expiry of the transaction request could not be computed.
    #[error("Invalid validity window: {0}")]
    Validity(String),

    #[error("Metadata serialization failed: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error(transparent)]
    Confirmation(#[from] TrackerError),
}

/// Result type for mint operations.
pub type MintResult<T> = Result<T, MintError>;
