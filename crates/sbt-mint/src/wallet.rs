//! External services the minter talks to.

use std::sync::Arc;

use sbt_cell::{Address, BagOfCells, CellResult};
use serde::{Deserialize, Serialize};

use crate::{LookupError, StoreError, SubmitError, TransactionRequest};

/// What a wallet returns after sending a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletReceipt {
    /// Base64 BOC of the signed external message.
    pub boc: String,
}

impl WalletReceipt {
    pub fn new(boc: impl Into<String>) -> Self {
        Self { boc: boc.into() }
    }

    /// Hex hash of the external message, as indexers key it.
    pub fn message_hash(&self) -> CellResult<String> {
        let root = BagOfCells::deserialize_from_base64(&self.boc)?.into_single_root()?;
        Ok(root.hash_hex())
    }
}

/// A connected wallet able to sign and broadcast a transaction request.
///
/// The messages of one request are sent atomically or not at all.
#[async_trait::async_trait]
pub trait WalletService: Send + Sync {
    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<WalletReceipt, SubmitError>;
}

/// Content-addressed storage for metadata documents.
#[async_trait::async_trait]
pub trait MetadataStore: Send + Sync {
    /// Store a JSON document and return the URI it can be fetched from.
    async fn store(&self, document: &[u8]) -> Result<String, StoreError>;
}

/// Resolves the jetton wallet of an owner for a given jetton master.
#[async_trait::async_trait]
pub trait JettonWalletResolver: Send + Sync {
    async fn jetton_wallet(&self, master: &Address, owner: &Address)
    -> Result<Address, LookupError>;
}

#[async_trait::async_trait]
impl<T: WalletService + ?Sized> WalletService for Arc<T> {
    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<WalletReceipt, SubmitError> {
        (**self).send_transaction(request).await
    }
}

#[async_trait::async_trait]
impl<T: MetadataStore + ?Sized> MetadataStore for Arc<T> {
    async fn store(&self, document: &[u8]) -> Result<String, StoreError> {
        (**self).store(document).await
    }
}

#[async_trait::async_trait]
impl<T: JettonWalletResolver + ?Sized> JettonWalletResolver for Arc<T> {
    async fn jetton_wallet(
        &self,
        master: &Address,
        owner: &Address,
    ) -> Result<Address, LookupError> {
        (**self).jetton_wallet(master, owner).await
    }
}

/// Resolver for the native flow, where no jetton wallet is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJettons;

#[async_trait::async_trait]
impl JettonWalletResolver for NoJettons {
    async fn jetton_wallet(
        &self,
        master: &Address,
        _owner: &Address,
    ) -> Result<Address, LookupError> {
        Err(LookupError::Request(format!(
            "no jetton wallet resolver configured for master {master}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sbt_cell::{CellBuilder, CellError};

    #[test]
    fn test_receipt_message_hash() {
        let mut builder = CellBuilder::new();
        builder.store_u32(0xdeadbeef).unwrap();
        let cell = builder.build().unwrap();
        let hash = cell.hash_hex();

        let boc = BagOfCells::from_root(cell).serialize_to_base64().unwrap();
        assert_eq!(WalletReceipt::new(boc).message_hash().unwrap(), hash);
    }

    #[test]
    fn test_receipt_with_garbage_boc() {
        let err = WalletReceipt::new("bm90IGEgYm9j")
            .message_hash()
            .unwrap_err();
        assert!(matches!(err, CellError::MalformedBoc(_)));
    }

    #[tokio::test]
    async fn test_no_jettons_resolver_errors() {
        let master = Address::new(0, [1; 32]);
        let err = NoJettons.jetton_wallet(&master, &master).await.unwrap_err();
        assert!(matches!(err, LookupError::Request(_)));
    }
}
