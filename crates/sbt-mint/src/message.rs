//! Outbound messages and the transaction request handed to a wallet.

use std::sync::Arc;

use sbt_cell::{Address, BagOfCells, Cell, CellResult};
use serde::{Deserialize, Serialize};

/// One internal message the wallet should send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub destination: Address,
    /// Value in nanoton.
    pub amount: u128,
    pub body: Option<Arc<Cell>>,
    pub state_init: Option<Arc<Cell>>,
}

impl OutboundMessage {
    pub fn new(destination: Address, amount: u128) -> Self {
        Self {
            destination,
            amount,
            body: None,
            state_init: None,
        }
    }

    pub fn with_body(mut self, body: Arc<Cell>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_state_init(mut self, state_init: Arc<Cell>) -> Self {
        self.state_init = Some(state_init);
        self
    }

    fn to_ton_connect(&self) -> CellResult<TonConnectMessage> {
        let encode = |cell: &Option<Arc<Cell>>| {
            cell.as_ref()
                .map(|cell| BagOfCells::from_root(cell.clone()).serialize_to_base64())
                .transpose()
        };
        Ok(TonConnectMessage {
            address: self.destination.to_raw(),
            amount: self.amount.to_string(),
            state_init: encode(&self.state_init)?,
            payload: encode(&self.body)?,
        })
    }
}

/// Messages that a wallet signs and sends as one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    /// Unix time after which the wallet must not send the request.
    pub valid_until: u64,
    pub messages: Vec<OutboundMessage>,
}

impl TransactionRequest {
    pub fn new(valid_until: u64, messages: Vec<OutboundMessage>) -> Self {
        Self {
            valid_until,
            messages,
        }
    }

    /// Total value of all messages, in nanoton.
    pub fn total_amount(&self) -> u128 {
        self.messages.iter().map(|m| m.amount).sum()
    }

    /// Convert to the `sendTransaction` request shape of TON Connect.
    pub fn to_ton_connect(&self) -> CellResult<TonConnectTransaction> {
        Ok(TonConnectTransaction {
            valid_until: self.valid_until,
            messages: self
                .messages
                .iter()
                .map(OutboundMessage::to_ton_connect)
                .collect::<CellResult<_>>()?,
        })
    }
}

/// TON Connect `sendTransaction` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TonConnectTransaction {
    pub valid_until: u64,
    pub messages: Vec<TonConnectMessage>,
}

/// One message of a [`TonConnectTransaction`]. Cells are base64 BOCs and the
/// amount is a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TonConnectMessage {
    pub address: String,
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_init: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sbt_cell::CellBuilder;

    fn cell(value: u32) -> Arc<Cell> {
        let mut builder = CellBuilder::new();
        builder.store_u32(value).unwrap();
        Arc::new(builder.build().unwrap())
    }

    #[test]
    fn test_ton_connect_json_shape() {
        let request = TransactionRequest::new(
            1_700_000_300,
            vec![
                OutboundMessage::new(Address::new(0, [0x11; 32]), 50_000_000)
                    .with_state_init(cell(0xdeadbeef)),
                OutboundMessage::new(Address::new(0, [0x22; 32]), 35_000_000).with_body(cell(1)),
            ],
        );

        let json = serde_json::to_value(request.to_ton_connect().unwrap()).unwrap();
        assert_eq!(json["validUntil"], 1_700_000_300u64);

        let first = &json["messages"][0];
        assert_eq!(first["address"], format!("0:{}", "11".repeat(32)));
        assert_eq!(first["amount"], "50000000");
        assert_eq!(first["stateInit"], "te6cckEBAQEABgAACN6tvu+qPBS2");
        assert!(first.get("payload").is_none());

        let second = &json["messages"][1];
        assert_eq!(second["amount"], "35000000");
        assert!(second.get("stateInit").is_none());
        assert!(second["payload"].is_string());
    }

    #[test]
    fn test_payload_decodes_to_body() {
        let body = cell(7);
        let request = TransactionRequest::new(
            0,
            vec![OutboundMessage::new(Address::new(0, [0; 32]), 1).with_body(body.clone())],
        );
        let tc = request.to_ton_connect().unwrap();
        let payload = tc.messages[0].payload.as_deref().unwrap();
        let decoded = BagOfCells::deserialize_from_base64(payload)
            .unwrap()
            .into_single_root()
            .unwrap();
        assert_eq!(decoded.hash(), body.hash());
    }

    #[test]
    fn test_total_amount() {
        let request = TransactionRequest::new(
            0,
            vec![
                OutboundMessage::new(Address::new(0, [0; 32]), 50_000_000),
                OutboundMessage::new(Address::new(0, [1; 32]), 35_000_000),
            ],
        );
        assert_eq!(request.total_amount(), 85_000_000);
    }
}
