//! Indexer abstraction.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::IndexerError;

/// A transaction as reported by an indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction hash, hex.
    pub hash: String,
    /// Logical time.
    #[serde(default)]
    pub lt: u64,
    /// Unix time the transaction was included.
    #[serde(default)]
    pub utime: u64,
    /// Whether the compute and action phases succeeded.
    #[serde(default)]
    pub success: bool,
}

/// Lookup of the transaction produced by an inbound external message.
///
/// Implementations must not retry on their own: the tracker owns the retry
/// policy.
#[async_trait::async_trait]
pub trait Indexer: Send + Sync {
    /// Find the transaction for a message, identified by the hex hash of the
    /// message cell.
    async fn find_transaction_by_message_hash(
        &self,
        message_hash: &str,
    ) -> Result<TransactionRecord, IndexerError>;
}

#[async_trait::async_trait]
impl<T: Indexer + ?Sized> Indexer for Arc<T> {
    async fn find_transaction_by_message_hash(
        &self,
        message_hash: &str,
    ) -> Result<TransactionRecord, IndexerError> {
        (**self).find_transaction_by_message_hash(message_hash).await
    }
}
