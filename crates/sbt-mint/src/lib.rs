//! # sbt-mint
//!
//! Minting of standalone soulbound tokens (SBT) on TON.
//!
//! A mint deploys one SBT item contract whose initial data names the owner
//! and points at an off-chain metadata document. Payment is either attached
//! to the deployment in TON, or made in jettons through a second message to
//! the payer's jetton wallet in the same transaction.
//!
//! ## Flow
//!
//! 1. [`SbtMetadata`] is serialized to JSON and stored through a
//!    [`MetadataStore`], which returns its URI.
//! 2. For jetton payments, the payer's jetton wallet is resolved through a
//!    [`JettonWalletResolver`].
//! 3. [`MessageAssembler`] builds the state-init, the transfer body and the
//!    [`TransactionRequest`].
//! 4. A [`WalletService`] signs and sends the request and returns the
//!    external message BOC.
//! 5. The hash of that message is polled with
//!    [`ConfirmationTracker`](sbt_tracker::ConfirmationTracker).
//!
//! ## Example
//!
//! ```rust,no_run
//! use sbt_cell::Address;
//! use sbt_mint::{MessageAssembler, MintConfig, MintRequest, Payment};
//!
//! let owner = Address::parse("UQAI6XfeQmLtZ8qzeoNWJRYG8wfuWQZBZHZF5-eUH7kDiZVN").unwrap();
//! let assembler = MessageAssembler::new(MintConfig::default()).unwrap();
//! let mint = assembler
//!     .assemble_now(&MintRequest::new(owner, "https://gw/ipfs/abc", Payment::Native))
//!     .unwrap();
//! println!("SBT will be deployed at {}", mint.item_address.to_friendly(true, false));
//! ```

pub mod assembler;
pub mod code;
pub mod config;
pub mod error;
pub mod item;
pub mod jetton;
pub mod message;
pub mod metadata;
pub mod minter;
pub mod wallet;

pub use assembler::{AssembledMint, MessageAssembler, MintRequest, Payment};
pub use code::{SBT_ITEM_CODE_BOC, SBT_ITEM_CODE_HASH, sbt_item_code};
pub use config::{DEFAULT_PAYMENT_RECIPIENT, MintConfig};
pub use error::{LookupError, MintError, MintResult, StoreError, SubmitError};
pub use item::{StateInit, item_data_cell};
pub use jetton::{JETTON_TRANSFER, JettonTransfer, jetton_transfer_body};
pub use message::{OutboundMessage, TonConnectMessage, TonConnectTransaction, TransactionRequest};
pub use metadata::{Attribute, Button, SbtMetadata, content_cell};
pub use minter::{MintReceipt, Minter, PaymentFlow};
pub use wallet::{JettonWalletResolver, MetadataStore, NoJettons, WalletReceipt, WalletService};
