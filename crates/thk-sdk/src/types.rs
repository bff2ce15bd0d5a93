//! RPC result types

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thk_primitives::U256;

/// Serde helpers for 256-bit amounts carried as JSON numbers.
///
/// Serialization writes a bare JSON number with every digit kept.
/// Deserialization also accepts decimal or `0x` strings, and `null` as zero.
pub mod big_number {
    use super::*;
    use std::str::FromStr;
    use thk_primitives::bigint::parse_big256;

    /// Serialize as a JSON number
    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serde_json::Number::from_str(&value.to_string())
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }

    /// Deserialize from a JSON number or string
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(U256::zero()),
            Value::Number(n) => parse_big256(&n.to_string()).map_err(serde::de::Error::custom),
            Value::String(s) => parse_big256(&s).map_err(serde::de::Error::custom),
            other => Err(serde::de::Error::custom(format!(
                "expected a number, got {}",
                other
            ))),
        }
    }
}

/// Account state returned by `GetAccount`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account address
    pub address: String,
    /// Next nonce
    #[serde(default)]
    pub nonce: u64,
    /// Balance in the base currency
    #[serde(default, with = "big_number")]
    pub balance: U256,
    /// Balance in the chain's local currency, if any
    #[serde(rename = "localCurrency", default, with = "big_number")]
    pub local_currency: U256,
    /// Contract storage root
    #[serde(rename = "storageRoot", default)]
    pub storage_root: Option<Value>,
    /// Contract code hash
    #[serde(rename = "codeHash", default)]
    pub code_hash: Option<Value>,
    /// System contract storage root
    #[serde(rename = "longStorageRoot", default)]
    pub long_storage_root: Option<Value>,
}

/// Result of `SendTx`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SendTxResult {
    /// Hash of the accepted transaction
    #[serde(rename = "TXhash", default)]
    pub tx_hash: String,
}

/// Transaction as echoed back in a [`TxResult`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionResult {
    /// Chain id
    #[serde(rename = "chainid")]
    pub chain_id: u32,
    /// Sender
    pub from: String,
    /// Recipient
    pub to: String,
    /// Nonce
    pub nonce: u64,
    /// Value
    #[serde(with = "big_number")]
    pub value: U256,
    /// Input, hex
    pub input: String,
    /// Transaction hash
    pub hash: String,
    /// Paid in local currency
    #[serde(rename = "uselocal")]
    pub use_local: bool,
    /// Extra, hex
    pub extra: String,
    /// Timestamp
    pub timestamp: u64,
}

/// Result of `CallTransaction` and `GetTransactionByHash`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxResult {
    /// Transaction
    #[serde(rename = "tx")]
    pub transaction: TransactionResult,
    /// State root after execution
    pub root: String,
    /// 1 on success
    pub status: i64,
    /// Emitted logs, as returned by the node
    pub logs: Value,
    /// Transaction hash
    #[serde(rename = "transactionHash")]
    pub transaction_hash: String,
    /// Address of a deployed contract
    #[serde(rename = "contractAddress")]
    pub contract_address: String,
    /// Return data, hex
    pub out: String,
    /// Fee paid
    #[serde(rename = "gasFee")]
    pub gas_fee: String,
    /// Gas used
    #[serde(rename = "gasUsed")]
    pub gas_used: u64,
    /// Block that included the transaction
    #[serde(rename = "blockHeight")]
    pub block_height: u64,
    /// Execution error
    #[serde(rename = "errorMsg")]
    pub error: String,
}

impl TxResult {
    /// Whether execution succeeded
    pub fn is_success(&self) -> bool {
        self.status == 1
    }
}

/// Result of `GetStats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainStats {
    /// Chain id
    #[serde(rename = "chainId")]
    pub chain_id: u32,
    /// Current height
    #[serde(rename = "currentheight")]
    pub current_height: u64,
    /// Duration of the current epoch
    #[serde(rename = "epochduration")]
    pub epoch_duration: u64,
    /// Blocks per epoch
    #[serde(rename = "epochlength")]
    pub epoch_length: u64,
    /// Gas limit
    #[serde(rename = "gaslimit")]
    pub gas_limit: u64,
    /// Gas price, decimal
    #[serde(rename = "gasprice")]
    pub gas_price: String,
    /// Duration of the last epoch
    #[serde(rename = "lastepochduration")]
    pub last_epoch_duration: u64,
    /// Seconds the chain has been alive
    pub lives: u64,
    /// Transactions per second
    pub tps: u64,
    /// TPS over the last epoch
    #[serde(rename = "tpsLastEpoch")]
    pub tps_last_epoch: u64,
    /// Window size for `tps_last_n`
    pub n: u64,
    /// TPS over the last `n` blocks
    #[serde(rename = "tpsLastN")]
    pub tps_last_n: u64,
    /// Duration of the last `n` blocks
    #[serde(rename = "lastNduration")]
    pub last_n_duration: u64,
    /// Transactions on the chain
    #[serde(rename = "txcount")]
    pub tx_count: u64,
    /// Accounts on the chain
    #[serde(rename = "accountcount")]
    pub account_count: u64,
    /// Current committee members
    #[serde(rename = "currentcomm")]
    pub current_comm: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_big_balance() {
        let raw = r#"{"address":"0x2c7536e3605d9c16a7a3d7b1898e529396a65c23","nonce":3,
            "balance":1000000000000000000000000000,"localCurrency":null,
            "storageRoot":null,"codeHash":null,"longStorageRoot":null}"#;
        let account: Account = serde_json::from_str(raw).unwrap();
        assert_eq!(account.nonce, 3);
        assert_eq!(
            account.balance,
            U256::from_dec_str("1000000000000000000000000000").unwrap()
        );
        assert!(account.local_currency.is_zero());
    }

    #[test]
    fn test_big_number_accepts_strings() {
        let account: Account =
            serde_json::from_value(json!({"address": "0x", "balance": "0x10"})).unwrap();
        assert_eq!(account.balance, U256::from(16));
    }

    #[test]
    fn test_big_number_serializes_as_number() {
        let account = Account {
            balance: U256::from_dec_str("123456789012345678901234567890").unwrap(),
            ..Default::default()
        };
        let text = serde_json::to_string(&account).unwrap();
        assert!(text.contains(r#""balance":123456789012345678901234567890"#));
    }

    #[test]
    fn test_tx_result() {
        let result: TxResult = serde_json::from_value(json!({
            "tx": {"chainid": 1, "from": "0x01", "to": "0x02", "nonce": 4, "value": 0,
                   "input": "0x", "hash": "0xab", "uselocal": false, "extra": "0x", "timestamp": 7},
            "status": 1,
            "transactionHash": "0xab",
            "out": "0x",
            "gasUsed": 21000,
            "blockHeight": 99
        }))
        .unwrap();
        assert!(result.is_success());
        assert_eq!(result.transaction.nonce, 4);
        assert_eq!(result.block_height, 99);
        assert!(result.logs.is_null());
    }

    #[test]
    fn test_chain_stats() {
        let stats: ChainStats = serde_json::from_value(json!({
            "chainId": 1, "currentheight": 1000, "gasprice": "400000000",
            "tpsLastEpoch": 12, "currentcomm": ["0xaa", "0xbb"]
        }))
        .unwrap();
        assert_eq!(stats.current_height, 1000);
        assert_eq!(stats.gas_price, "400000000");
        assert_eq!(stats.current_comm.len(), 2);
    }
}
