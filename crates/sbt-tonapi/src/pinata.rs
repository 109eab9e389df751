//! Pinata IPFS pinning.

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use sbt_mint::{MetadataStore, StoreError};
use tracing::{debug, info};

use crate::types::PinResponse;
use crate::{PinataConfig, TonApiError, TonApiResult};

/// Stores metadata documents by pinning them as JSON on IPFS.
#[derive(Debug, Clone)]
pub struct PinataStore {
    client: Client,
    config: PinataConfig,
}

impl PinataStore {
    pub fn new(config: PinataConfig) -> TonApiResult<Self> {
        if config.jwt.is_empty() {
            return Err(TonApiError::InvalidConfig("jwt"));
        }
        if config.gateway.is_empty() {
            return Err(TonApiError::InvalidConfig("gateway"));
        }
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(TonApiError::Http)?;

        Ok(Self { client, config })
    }

    fn pin_url(&self) -> String {
        format!(
            "{}/pinning/pinJSONToIPFS",
            self.config.api_url.trim_end_matches('/')
        )
    }

    /// Public URL of pinned content.
    pub fn gateway_url(&self, ipfs_hash: &str) -> String {
        format!("https://{}/ipfs/{ipfs_hash}", self.config.gateway)
    }

    /// Pin a JSON document and return its IPFS hash.
    pub async fn pin_json(&self, document: &[u8]) -> TonApiResult<String> {
        debug!(bytes = document.len(), "Pinning JSON document");

        let response = self
            .client
            .post(self.pin_url())
            .bearer_auth(&self.config.jwt)
            .header(CONTENT_TYPE, "application/json")
            .body(document.to_vec())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TonApiError::Status {
                status: status.as_u16(),
                message: body,
            });
        }
        let pin: PinResponse =
            serde_json::from_str(&body).map_err(|e| TonApiError::Parse(e.to_string()))?;
        Ok(pin.ipfs_hash)
    }
}

#[async_trait::async_trait]
impl MetadataStore for PinataStore {
    async fn store(&self, document: &[u8]) -> Result<String, StoreError> {
        let hash = self.pin_json(document).await?;
        let uri = self.gateway_url(&hash);
        info!(%uri, "Metadata pinned");
        Ok(uri)
    }
}
