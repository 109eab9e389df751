//! Confirmation tracking for submitted TON messages.
//!
//! After a wallet broadcasts a message, the transaction it produces shows up
//! in indexers some seconds later. [`ConfirmationTracker`] polls an
//! [`Indexer`] with a fixed delay and a bounded number of attempts, and can
//! be cancelled at any point through a `CancellationToken`.
//!
//! # Example
//!
//! ```no_run
//! use sbt_tracker::{ConfirmationTracker, Indexer};
//! use tokio_util::sync::CancellationToken;
//!
//! async fn confirm(indexer: impl Indexer, message_hash: &str) {
//!     let tracker = ConfirmationTracker::with_defaults(indexer);
//!     match tracker.wait(message_hash, &CancellationToken::new()).await {
//!         Ok(tx) => println!("confirmed in {}", tx.hash),
//!         Err(e) => println!("not confirmed: {e}"),
//!     }
//! }
//! ```

mod config;
mod error;
mod indexer;
mod tracker;

pub use config::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, TrackerConfig};
pub use error::{IndexerError, TrackerError, TrackerResult};
pub use indexer::{Indexer, TransactionRecord};
pub use tracker::{ConfirmationOutcome, ConfirmationQuery, ConfirmationTracker};
