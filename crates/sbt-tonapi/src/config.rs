//! Backend settings.
//!
//! Credentials are never defaulted; they have to come from the caller's
//! configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for [`TonApiClient`](crate::TonApiClient).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TonApiConfig {
    /// Base URL (default: `https://tonapi.io`).
    pub base_url: String,
    /// Bearer token. Requests are anonymous without one.
    pub api_key: Option<String>,
    /// Whole-request timeout in seconds (default: 10).
    pub timeout_secs: u64,
    /// Connect timeout in seconds (default: 5).
    pub connect_timeout_secs: u64,
}

impl TonApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the testnet endpoint.
    pub fn testnet() -> Self {
        Self {
            base_url: "https://testnet.tonapi.io".to_string(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for TonApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://tonapi.io".to_string(),
            api_key: None,
            timeout_secs: 10,
            connect_timeout_secs: 5,
        }
    }
}

/// Configuration for [`PinataStore`](crate::PinataStore).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PinataConfig {
    /// API base URL (default: `https://api.pinata.cloud`).
    pub api_url: String,
    /// JWT used as bearer token. Required.
    pub jwt: String,
    /// Gateway host that serves pinned content, e.g. `example.mypinata.cloud`.
    /// Required.
    pub gateway: String,
    /// Whole-request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl PinataConfig {
    pub fn new(jwt: impl Into<String>, gateway: impl Into<String>) -> Self {
        Self {
            jwt: jwt.into(),
            gateway: gateway.into(),
            ..Self::default()
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for PinataConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.pinata.cloud".to_string(),
            jwt: String::new(),
            gateway: String::new(),
            timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tonapi_defaults() {
        let config = TonApiConfig::default();
        assert_eq!(config.base_url, "https://tonapi.io");
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(
            TonApiConfig::testnet().base_url,
            "https://testnet.tonapi.io"
        );
    }

    #[test]
    fn test_tonapi_from_json() {
        let config: TonApiConfig = serde_json::from_str(r#"{"api_key": "k"}"#).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.base_url, "https://tonapi.io");
    }

    #[test]
    fn test_pinata_from_json() {
        let config: PinataConfig =
            serde_json::from_str(r#"{"jwt": "t", "gateway": "gw.example"}"#).unwrap();
        assert_eq!(config.api_url, "https://api.pinata.cloud");
        assert_eq!(config, PinataConfig::new("t", "gw.example"));
    }
}
