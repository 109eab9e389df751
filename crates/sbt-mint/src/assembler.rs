//! Assembly of the mint transaction.
//!
//! A mint deploys a standalone SBT item. When paying in TON the deployment
//! carries the whole price. When paying in jettons a second message asks the
//! payer's jetton wallet to transfer the price to the payment recipient; both
//! messages go out in the same transaction request.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use sbt_cell::{Address, Cell};
use tracing::debug;

use crate::code::sbt_item_code;
use crate::item::{StateInit, item_data_cell};
use crate::jetton::{JettonTransfer, jetton_transfer_body};
use crate::{MintConfig, MintError, MintResult, OutboundMessage, TransactionRequest};

/// How the mint is paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payment {
    /// The deployment message carries the price in TON.
    Native,
    /// The price is paid from the given jetton wallet.
    Jetton { jetton_wallet: Address },
}

/// What to mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    /// Owner of the new SBT.
    pub owner: Address,
    /// URI of the item's metadata document.
    pub metadata_uri: String,
    pub payment: Payment,
}

impl MintRequest {
    pub fn new(owner: Address, metadata_uri: impl Into<String>, payment: Payment) -> Self {
        Self {
            owner,
            metadata_uri: metadata_uri.into(),
            payment,
        }
    }
}

/// Everything built for one mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledMint {
    /// Address the SBT item will be deployed at.
    pub item_address: Address,
    pub state_init: Arc<Cell>,
    pub request: TransactionRequest,
}

/// Builds mint transactions. It neither signs nor sends them.
#[derive(Debug, Clone)]
pub struct MessageAssembler {
    config: MintConfig,
    code: Arc<Cell>,
}

impl MessageAssembler {
    /// Create an assembler using the bundled SBT item code.
    pub fn new(config: MintConfig) -> MintResult<Self> {
        Ok(Self::with_code(config, sbt_item_code()?))
    }

    pub fn with_code(config: MintConfig, code: Arc<Cell>) -> Self {
        Self { config, code }
    }

    pub fn config(&self) -> &MintConfig {
        &self.config
    }

    /// Build the item state-init for `owner` and `metadata_uri`.
    pub fn state_init(&self, owner: &Address, metadata_uri: &str) -> MintResult<StateInit> {
        let data = item_data_cell(owner, metadata_uri)?;
        Ok(StateInit::new(self.code.clone(), data))
    }

    /// Build the transaction request for a mint.
    ///
    /// The result depends only on the arguments, so the same inputs always
    /// give the same cells and hashes.
    pub fn assemble(
        &self,
        request: &MintRequest,
        valid_until: u64,
        query_id: u64,
    ) -> MintResult<AssembledMint> {
        let state_init = self
            .state_init(&request.owner, &request.metadata_uri)?
            .to_cell()?;
        let item_address = Address::new(self.config.workchain, state_init.hash());

        let messages = match request.payment {
            Payment::Native => vec![
                OutboundMessage::new(item_address, self.config.native_mint_amount.into())
                    .with_state_init(state_init.clone()),
            ],
            Payment::Jetton { jetton_wallet } => {
                let body = jetton_transfer_body(&JettonTransfer {
                    query_id,
                    amount: self.config.jetton_price.into(),
                    destination: self.config.payment_recipient,
                    response_destination: None,
                    forward_ton_amount: self.config.forward_ton_amount.into(),
                })?;
                vec![
                    OutboundMessage::new(item_address, self.config.deploy_amount.into())
                        .with_state_init(state_init.clone()),
                    OutboundMessage::new(jetton_wallet, self.config.jetton_transfer_gas.into())
                        .with_body(body),
                ]
            }
        };

        debug!(
            item = %item_address,
            payment = ?request.payment,
            valid_until,
            messages = messages.len(),
            "Assembled mint transaction"
        );

        Ok(AssembledMint {
            item_address,
            state_init,
            request: TransactionRequest::new(valid_until, messages),
        })
    }

    /// Build the transaction request with a validity window starting now and
    /// a random query id.
    pub fn assemble_now(&self, request: &MintRequest) -> MintResult<AssembledMint> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| MintError::Validity(format!("system clock is before 1970: {e}")))?
            .as_secs();
        self.assemble(request, self.valid_until(now)?, rand::random())
    }

    /// Expiry of a request created at `now` (unix seconds).
    pub fn valid_until(&self, now: u64) -> MintResult<u64> {
        now.checked_add(self.config.validity_secs).ok_or_else(|| {
            MintError::Validity(format!(
                "{now} + {} s does not fit in a timestamp",
                self.config.validity_secs
            ))
        })
    }
}
