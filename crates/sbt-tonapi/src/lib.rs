//! HTTP backends for SBT minting.
//!
//! - [`TonApiClient`] implements [`Indexer`](sbt_tracker::Indexer) over
//!   `GET /v2/blockchain/messages/{hash}/transaction` and
//!   [`JettonWalletResolver`](sbt_mint::JettonWalletResolver) over the jetton
//!   master's `get_wallet_address` get-method.
//! - [`PinataStore`] implements [`MetadataStore`](sbt_mint::MetadataStore)
//!   by pinning JSON on IPFS through Pinata.
//!
//! ```rust,no_run
//! use sbt_tonapi::{TonApiClient, TonApiConfig};
//! use sbt_tracker::ConfirmationTracker;
//! use tokio_util::sync::CancellationToken;
//!
//! async fn confirm(message_hash: &str) -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TonApiClient::new(TonApiConfig::new().with_api_key("..."))?;
//!     let tracker = ConfirmationTracker::with_defaults(client);
//!     let tx = tracker.wait(message_hash, &CancellationToken::new()).await?;
//!     println!("confirmed in {}", tx.hash);
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod pinata;
pub mod types;

pub use client::TonApiClient;
pub use config::{PinataConfig, TonApiConfig};
pub use error::{TonApiError, TonApiResult};
pub use pinata::PinataStore;
