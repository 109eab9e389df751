//! Response models.

use serde::Deserialize;

use sbt_tracker::TransactionRecord;

/// Transaction as returned by `/v2/blockchain/messages/{hash}/transaction`.
///
/// Only the fields the tracker needs are kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Transaction {
    pub hash: String,
    pub lt: u64,
    pub utime: u64,
    #[serde(default)]
    pub success: bool,
}

impl From<Transaction> for TransactionRecord {
    fn from(tx: Transaction) -> Self {
        TransactionRecord {
            hash: tx.hash,
            lt: tx.lt,
            utime: tx.utime,
            success: tx.success,
        }
    }
}

/// Result of a get-method execution.
#[derive(Debug, Clone, Deserialize)]
pub struct MethodExecutionResult {
    pub success: bool,
    pub exit_code: i32,
    #[serde(default)]
    pub decoded: Option<serde_json::Value>,
}

/// Decoded output of the jetton master's `get_wallet_address`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JettonWalletAddress {
    pub jetton_wallet_address: String,
}

/// Body of a successful pin request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PinResponse {
    pub ipfs_hash: String,
    #[serde(default)]
    pub pin_size: u64,
    #[serde(default)]
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_ignores_extra_fields() {
        let json = r#"{
            "hash": "55e8809519cd3c49098c9ee45afdafcea7a894a74d0f628d94a115a50e045122",
            "lt": 47000000000001,
            "account": {"address": "0:1111", "is_scam": false, "is_wallet": true},
            "success": true,
            "utime": 1717000000,
            "orig_status": "active",
            "end_status": "active",
            "total_fees": 1234,
            "in_msg": {"msg_type": "ext_in_msg"}
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        let record = TransactionRecord::from(tx);
        assert_eq!(record.lt, 47_000_000_000_001);
        assert_eq!(record.utime, 1_717_000_000);
        assert!(record.success);
        assert!(record.hash.starts_with("55e88095"));
    }

    #[test]
    fn test_method_result_decoded() {
        let json = r#"{
            "success": true,
            "exit_code": 0,
            "stack": [{"type": "cell", "cell": "b5ee9c72"}],
            "decoded": {"jetton_wallet_address": "0:2222"}
        }"#;
        let result: MethodExecutionResult = serde_json::from_str(json).unwrap();
        let decoded: JettonWalletAddress =
            serde_json::from_value(result.decoded.unwrap()).unwrap();
        assert_eq!(decoded.jetton_wallet_address, "0:2222");
    }

    #[test]
    fn test_pin_response() {
        let json = r#"{"IpfsHash": "QmHash", "PinSize": 120, "Timestamp": "2024-06-01T00:00:00Z"}"#;
        let pin: PinResponse = serde_json::from_str(json).unwrap();
        assert_eq!(pin.ipfs_hash, "QmHash");
        assert_eq!(pin.pin_size, 120);
    }
}
