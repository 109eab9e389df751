//! Mint orchestration: metadata upload, jetton wallet lookup, assembly,
//! submission and confirmation.

use sbt_cell::Address;
use sbt_tracker::{ConfirmationTracker, Indexer, TransactionRecord};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    JettonWalletResolver, MessageAssembler, MetadataStore, MintError, MintRequest, MintResult,
    NoJettons, Payment, SbtMetadata, TransactionRequest, WalletReceipt, WalletService,
};

/// How the caller wants to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentFlow {
    Native,
    /// Pay with the configured jetton from `payer`'s jetton wallet.
    Jetton { payer: Address },
}

/// A mint that the wallet accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    pub item_address: Address,
    pub request: TransactionRequest,
    pub receipt: WalletReceipt,
}

impl MintReceipt {
    /// Hex hash of the external message the wallet sent.
    pub fn message_hash(&self) -> MintResult<String> {
        Ok(self.receipt.message_hash()?)
    }

    /// Wait until the transaction of this mint is indexed.
    pub async fn confirm<I: Indexer>(
        &self,
        tracker: &ConfirmationTracker<I>,
        cancel: &CancellationToken,
    ) -> MintResult<TransactionRecord> {
        let message_hash = self.message_hash()?;
        Ok(tracker.wait(&message_hash, cancel).await?)
    }
}

/// Drives a mint from metadata to a sent transaction.
///
/// Nothing is retried here: every failure of the wallet, the store or the
/// jetton lookup is returned to the caller as is.
pub struct Minter<W, J = NoJettons> {
    wallet: W,
    resolver: J,
    assembler: MessageAssembler,
}

impl<W: WalletService> Minter<W, NoJettons> {
    /// Create a minter that only supports paying in TON.
    pub fn native(wallet: W, assembler: MessageAssembler) -> Self {
        Self::new(wallet, NoJettons, assembler)
    }
}

impl<W: WalletService, J: JettonWalletResolver> Minter<W, J> {
    pub fn new(wallet: W, resolver: J, assembler: MessageAssembler) -> Self {
        Self {
            wallet,
            resolver,
            assembler,
        }
    }

    pub fn assembler(&self) -> &MessageAssembler {
        &self.assembler
    }

    /// Serialize `metadata` and store it, returning its URI.
    pub async fn upload_metadata<S: MetadataStore + ?Sized>(
        &self,
        store: &S,
        metadata: &SbtMetadata,
    ) -> MintResult<String> {
        let document = metadata.to_json()?;
        debug!(name = %metadata.name, bytes = document.len(), "Uploading SBT metadata");
        let uri = store.store(&document).await?;
        info!(%uri, "SBT metadata stored");
        Ok(uri)
    }

    /// Turn a payment flow into a concrete payment, looking up the payer's
    /// jetton wallet when needed.
    pub async fn resolve_payment(&self, flow: PaymentFlow) -> MintResult<Payment> {
        match flow {
            PaymentFlow::Native => Ok(Payment::Native),
            PaymentFlow::Jetton { payer } => {
                let master = self
                    .assembler
                    .config()
                    .jetton_master
                    .ok_or(MintError::MissingConfig("jetton_master"))?;
                let jetton_wallet = self.resolver.jetton_wallet(&master, &payer).await?;
                debug!(%master, %payer, %jetton_wallet, "Resolved jetton wallet");
                Ok(Payment::Jetton { jetton_wallet })
            }
        }
    }

    /// Mint an SBT for `owner` pointing at `metadata_uri`.
    ///
    /// The request is rebuilt on every call with a fresh validity window.
    pub async fn mint(
        &self,
        owner: &Address,
        metadata_uri: &str,
        flow: PaymentFlow,
    ) -> MintResult<MintReceipt> {
        let payment = self.resolve_payment(flow).await?;
        let mint = self
            .assembler
            .assemble_now(&MintRequest::new(*owner, metadata_uri, payment))?;

        info!(
            item = %mint.item_address,
            owner = %owner,
            amount = %mint.request.total_amount(),
            "Sending mint transaction"
        );

        let receipt = match self.wallet.send_transaction(&mint.request).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(item = %mint.item_address, error = %e, "Mint transaction not sent");
                return Err(e.into());
            }
        };

        Ok(MintReceipt {
            item_address: mint.item_address,
            request: mint.request,
            receipt,
        })
    }
}
