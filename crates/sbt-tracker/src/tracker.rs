//! Bounded, fixed-delay confirmation polling.
//!
//! ```text
//!            NotFound / Transient, attempt < max
//!               +-------------------+
//!               v                   |
//! Pending --> lookup --Ok--> Confirmed
//!               |--Malformed--> Failed
//!               |--retryable, attempt == max--> Exhausted
//!               '--token cancelled--> Cancelled
//! ```

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{Indexer, IndexerError, TrackerConfig, TrackerError, TrackerResult, TransactionRecord};

/// Progress of a single confirmation wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationQuery {
    pub message_hash: String,
    /// Lookups made so far.
    pub attempt: u32,
    pub max_attempts: u32,
    pub delay: Duration,
}

impl ConfirmationQuery {
    pub fn new(message_hash: impl Into<String>, config: &TrackerConfig) -> Self {
        ConfirmationQuery {
            message_hash: message_hash.into(),
            attempt: 0,
            max_attempts: config.max_attempts.max(1),
            delay: config.retry_delay(),
        }
    }

    fn has_attempts_left(&self) -> bool {
        self.attempt < self.max_attempts
    }
}

/// Terminal state of a confirmation wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Confirmed {
        transaction: TransactionRecord,
        attempts: u32,
    },
    Exhausted {
        attempts: u32,
        last_error: IndexerError,
    },
    Failed {
        attempts: u32,
        error: IndexerError,
    },
    Cancelled {
        attempts: u32,
    },
}

impl ConfirmationOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ConfirmationOutcome::Confirmed { .. })
    }

    /// Number of indexer lookups that were made.
    pub fn attempts(&self) -> u32 {
        match self {
            ConfirmationOutcome::Confirmed { attempts, .. }
            | ConfirmationOutcome::Exhausted { attempts, .. }
            | ConfirmationOutcome::Failed { attempts, .. }
            | ConfirmationOutcome::Cancelled { attempts } => *attempts,
        }
    }

    pub fn into_result(self) -> TrackerResult<TransactionRecord> {
        match self {
            ConfirmationOutcome::Confirmed { transaction, .. } => Ok(transaction),
            ConfirmationOutcome::Exhausted {
                attempts,
                last_error,
            } => Err(TrackerError::Exhausted {
                attempts,
                last_error: last_error.to_string(),
            }),
            ConfirmationOutcome::Failed { attempts, error } => Err(TrackerError::Failed {
                attempts,
                error: error.to_string(),
            }),
            ConfirmationOutcome::Cancelled { attempts } => {
                Err(TrackerError::Cancelled { attempts })
            }
        }
    }
}

/// Polls an [`Indexer`] until the transaction for a message shows up.
///
/// Every lookup that fails with `NotFound` or `Transient` is followed by a
/// fixed pause, up to `max_attempts` lookups in total. No pause follows the
/// last lookup. A `Malformed` response ends the wait at once.
#[derive(Debug, Clone)]
pub struct ConfirmationTracker<I> {
    indexer: I,
    config: TrackerConfig,
}

impl<I: Indexer> ConfirmationTracker<I> {
    pub fn new(indexer: I, config: TrackerConfig) -> Self {
        ConfirmationTracker { indexer, config }
    }

    /// Create a tracker with 20 attempts spaced 1500 ms apart.
    pub fn with_defaults(indexer: I) -> Self {
        Self::new(indexer, TrackerConfig::default())
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn indexer(&self) -> &I {
        &self.indexer
    }

    /// Wait for confirmation, returning the transaction or why there is none.
    pub async fn wait(
        &self,
        message_hash: &str,
        cancel: &CancellationToken,
    ) -> TrackerResult<TransactionRecord> {
        self.track(message_hash, cancel).await.into_result()
    }

    /// Run the polling loop to a terminal state.
    ///
    /// Cancelling `cancel` stops the wait during a lookup or a pause; no
    /// further lookup is scheduled afterwards.
    pub async fn track(
        &self,
        message_hash: &str,
        cancel: &CancellationToken,
    ) -> ConfirmationOutcome {
        let mut query = ConfirmationQuery::new(message_hash, &self.config);

        loop {
            if cancel.is_cancelled() {
                return cancelled(&query);
            }

            query.attempt += 1;
            let lookup = tokio::select! {
                biased;
                _ = cancel.cancelled() => return cancelled(&query),
                result = self
                    .indexer
                    .find_transaction_by_message_hash(&query.message_hash) => result,
            };

            let error = match lookup {
                Ok(transaction) => {
                    info!(
                        message_hash = %query.message_hash,
                        transaction = %transaction.hash,
                        attempts = query.attempt,
                        "Transaction confirmed"
                    );
                    return ConfirmationOutcome::Confirmed {
                        transaction,
                        attempts: query.attempt,
                    };
                }
                Err(error) if !error.is_retryable() => {
                    warn!(
                        message_hash = %query.message_hash,
                        attempts = query.attempt,
                        %error,
                        "Indexer response cannot be used, giving up"
                    );
                    return ConfirmationOutcome::Failed {
                        attempts: query.attempt,
                        error,
                    };
                }
                Err(error) => error,
            };

            if !query.has_attempts_left() {
                warn!(
                    message_hash = %query.message_hash,
                    attempts = query.attempt,
                    last_error = %error,
                    "Transaction not confirmed, attempts exhausted"
                );
                return ConfirmationOutcome::Exhausted {
                    attempts: query.attempt,
                    last_error: error,
                };
            }

            debug!(
                message_hash = %query.message_hash,
                attempt = query.attempt,
                max_attempts = query.max_attempts,
                %error,
                "Transaction not confirmed yet, retrying"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return cancelled(&query),
                _ = tokio::time::sleep(query.delay) => {}
            }
        }
    }
}

fn cancelled(query: &ConfirmationQuery) -> ConfirmationOutcome {
    debug!(
        message_hash = %query.message_hash,
        attempts = query.attempt,
        "Confirmation wait cancelled"
    );
    ConfirmationOutcome::Cancelled {
        attempts: query.attempt,
    }
}
