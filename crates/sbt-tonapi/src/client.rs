//! TonAPI REST client.

use reqwest::{Client, RequestBuilder};
use sbt_cell::Address;
use sbt_mint::{JettonWalletResolver, LookupError};
use sbt_tracker::{Indexer, IndexerError, TransactionRecord};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::types::{JettonWalletAddress, MethodExecutionResult, Transaction};
use crate::{TonApiConfig, TonApiError, TonApiResult};

/// Client for the TonAPI v2 blockchain endpoints.
///
/// Each call is a single request. Retrying is left to the caller.
#[derive(Debug, Clone)]
pub struct TonApiClient {
    client: Client,
    config: TonApiConfig,
}

impl TonApiClient {
    pub fn new(config: TonApiConfig) -> TonApiResult<Self> {
        if config.base_url.is_empty() {
            return Err(TonApiError::InvalidConfig("base_url"));
        }
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(TonApiError::Http)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TonApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn transaction_path(message_hash: &str) -> String {
        format!("/v2/blockchain/messages/{message_hash}/transaction")
    }

    fn get_method_path(account: &Address, method: &str) -> String {
        format!(
            "/v2/blockchain/accounts/{}/methods/{method}",
            account.to_raw()
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> TonApiResult<R> {
        let url = self.url(path);
        trace!(%url, "TonAPI request");

        let response = self
            .authorize(self.client.get(&url).query(query))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    TonApiError::Connection(format!("Cannot connect to {}", self.config.base_url))
                } else {
                    TonApiError::Http(e)
                }
            })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TonApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        serde_json::from_str(&body).map_err(|e| TonApiError::Parse(e.to_string()))
    }

    /// Fetch the transaction triggered by a message.
    pub async fn transaction_by_message_hash(
        &self,
        message_hash: &str,
    ) -> TonApiResult<Transaction> {
        self.get(&Self::transaction_path(message_hash), &[]).await
    }

    /// Run `get_wallet_address(owner)` on a jetton master.
    pub async fn jetton_wallet_address(
        &self,
        master: &Address,
        owner: &Address,
    ) -> TonApiResult<Address> {
        let result: MethodExecutionResult = self
            .get(
                &Self::get_method_path(master, "get_wallet_address"),
                &[("args", owner.to_raw())],
            )
            .await?;
        let wallet = parse_wallet_address(result)?;
        debug!(%master, %owner, %wallet, "Jetton wallet address");
        Ok(wallet)
    }
}

/// TonAPI errors come as `{"error": "..."}`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

fn parse_wallet_address(result: MethodExecutionResult) -> TonApiResult<Address> {
    if !result.success {
        return Err(TonApiError::Parse(format!(
            "get_wallet_address failed with exit code {}",
            result.exit_code
        )));
    }
    let decoded = result
        .decoded
        .ok_or_else(|| TonApiError::Parse("get_wallet_address result not decoded".to_string()))?;
    let decoded: JettonWalletAddress =
        serde_json::from_value(decoded).map_err(|e| TonApiError::Parse(e.to_string()))?;
    Address::parse(&decoded.jetton_wallet_address).map_err(|e| TonApiError::Parse(e.to_string()))
}

#[async_trait::async_trait]
impl Indexer for TonApiClient {
    async fn find_transaction_by_message_hash(
        &self,
        message_hash: &str,
    ) -> Result<TransactionRecord, IndexerError> {
        Ok(self.transaction_by_message_hash(message_hash).await?.into())
    }
}

#[async_trait::async_trait]
impl JettonWalletResolver for TonApiClient {
    async fn jetton_wallet(
        &self,
        master: &Address,
        owner: &Address,
    ) -> Result<Address, LookupError> {
        Ok(self.jetton_wallet_address(master, owner).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method_result(json: &str) -> MethodExecutionResult {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_paths() {
        assert_eq!(
            TonApiClient::transaction_path("abcd"),
            "/v2/blockchain/messages/abcd/transaction"
        );
        let master = Address::new(0, [0x11; 32]);
        assert_eq!(
            TonApiClient::get_method_path(&master, "get_wallet_address"),
            format!(
                "/v2/blockchain/accounts/0:{}/methods/get_wallet_address",
                "11".repeat(32)
            )
        );
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client =
            TonApiClient::new(TonApiConfig::new().with_base_url("http://localhost:8081/")).unwrap();
        assert_eq!(client.url("/v2/status"), "http://localhost:8081/v2/status");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let err = TonApiClient::new(TonApiConfig::new().with_base_url("")).unwrap_err();
        assert!(matches!(err, TonApiError::InvalidConfig("base_url")));
    }

    #[test]
    fn test_parse_wallet_address() {
        let raw = format!("0:{}", "22".repeat(32));
        let result = method_result(&format!(
            r#"{{"success": true, "exit_code": 0, "decoded": {{"jetton_wallet_address": "{raw}"}}}}"#
        ));
        assert_eq!(
            parse_wallet_address(result).unwrap(),
            Address::new(0, [0x22; 32])
        );
    }

    #[test]
    fn test_parse_wallet_address_failures() {
        let failed = method_result(r#"{"success": false, "exit_code": 11}"#);
        assert!(matches!(
            parse_wallet_address(failed),
            Err(TonApiError::Parse(_))
        ));

        let undecoded = method_result(r#"{"success": true, "exit_code": 0}"#);
        assert!(matches!(
            parse_wallet_address(undecoded),
            Err(TonApiError::Parse(_))
        ));

        let bad_address = method_result(
            r#"{"success": true, "exit_code": 0, "decoded": {"jetton_wallet_address": "nope"}}"#,
        );
        assert!(matches!(
            parse_wallet_address(bad_address),
            Err(TonApiError::Parse(_))
        ));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"error": "entity not found"}"#),
            "entity not found"
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }
}
