//! Mint settings.

use std::time::Duration;

use sbt_cell::Address;
use serde::Deserialize;

/// Recipient of jetton payments (`UQAI6XfeQmLtZ8qzeoNWJRYG8wfuWQZBZHZF5-eUH7kDiZVN`).
pub const DEFAULT_PAYMENT_RECIPIENT: Address = Address::new(
    0,
    [
        0x08, 0xe9, 0x77, 0xde, 0x42, 0x62, 0xed, 0x67, 0xca, 0xb3, 0x7a, 0x83, 0x56, 0x25, 0x16,
        0x06, 0xf3, 0x07, 0xee, 0x59, 0x06, 0x41, 0x64, 0x76, 0x45, 0xe7, 0xe7, 0x94, 0x1f, 0xb9,
        0x03, 0x89,
    ],
);

/// Configuration for [`MessageAssembler`](crate::MessageAssembler) and
/// [`Minter`](crate::Minter).
///
/// Amounts are in nanoton, except `jetton_price` which is in jetton base
/// units. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MintConfig {
    /// Workchain the item is deployed to (default: 0).
    pub workchain: i8,
    /// Value attached to the deployment when paying in jettons (default: 0.05 TON).
    pub deploy_amount: u64,
    /// Value attached to the jetton transfer for gas (default: 0.035 TON).
    pub jetton_transfer_gas: u64,
    /// Jettons charged per mint (default: 300 with 9 decimals).
    pub jetton_price: u64,
    /// TON forwarded with the transfer notification (default: 0).
    pub forward_ton_amount: u64,
    /// Value attached to the deployment when paying in TON (default: 0.35 TON).
    pub native_mint_amount: u64,
    /// Who receives the jetton payment.
    pub payment_recipient: Address,
    /// Jetton master accepted as payment. The jetton flow requires it.
    pub jetton_master: Option<Address>,
    /// How long a transaction request stays valid, in seconds (default: 300).
    pub validity_secs: u64,
}

impl MintConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workchain(mut self, workchain: i8) -> Self {
        self.workchain = workchain;
        self
    }

    pub fn with_jetton_master(mut self, master: Address) -> Self {
        self.jetton_master = Some(master);
        self
    }

    pub fn with_jetton_price(mut self, price: u64) -> Self {
        self.jetton_price = price;
        self
    }

    pub fn with_payment_recipient(mut self, recipient: Address) -> Self {
        self.payment_recipient = recipient;
        self
    }

    pub fn with_native_mint_amount(mut self, amount: u64) -> Self {
        self.native_mint_amount = amount;
        self
    }

    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity_secs = validity.as_secs();
        self
    }

    pub fn validity(&self) -> Duration {
        Duration::from_secs(self.validity_secs)
    }
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            workchain: 0,
            deploy_amount: 50_000_000,
            jetton_transfer_gas: 35_000_000,
            jetton_price: 300_000_000_000,
            forward_ton_amount: 0,
            native_mint_amount: 350_000_000,
            payment_recipient: DEFAULT_PAYMENT_RECIPIENT,
            jetton_master: None,
            validity_secs: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_recipient_matches_friendly_form() {
        let parsed = Address::parse("UQAI6XfeQmLtZ8qzeoNWJRYG8wfuWQZBZHZF5-eUH7kDiZVN").unwrap();
        assert_eq!(parsed, DEFAULT_PAYMENT_RECIPIENT);
    }

    #[test]
    fn test_defaults() {
        let config = MintConfig::default();
        assert_eq!(config.deploy_amount, 50_000_000);
        assert_eq!(config.jetton_transfer_gas, 35_000_000);
        assert_eq!(config.jetton_price, 300_000_000_000);
        assert_eq!(config.validity(), Duration::from_secs(300));
        assert!(config.jetton_master.is_none());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "jetton_master": "0:0000000000000000000000000000000000000000000000000000000000000001",
            "jetton_price": 1000
        }"#;
        let config: MintConfig = serde_json::from_str(json).unwrap();
        let mut hash = [0u8; 32];
        hash[31] = 1;
        assert_eq!(config.jetton_master, Some(Address::new(0, hash)));
        assert_eq!(config.jetton_price, 1000);
        assert_eq!(config.native_mint_amount, 350_000_000);
        assert_eq!(config.payment_recipient, DEFAULT_PAYMENT_RECIPIENT);
    }

    #[test]
    fn test_builder_methods() {
        let config = MintConfig::new()
            .with_workchain(-1)
            .with_native_mint_amount(1)
            .with_validity(Duration::from_secs(60));
        assert_eq!(config.workchain, -1);
        assert_eq!(config.native_mint_amount, 1);
        assert_eq!(config.validity_secs, 60);
    }
}
