//! Transactions and their signing hash

use rlp::RlpStream;
use serde::{Deserialize, Serialize};
use thk_crypto::keccak256;
use thk_primitives::bigint::parse_big256;
use thk_primitives::bytes::{clean_hex_prefix, encode_prefixed, from_hex, has_hex_prefix};
use thk_primitives::{Address, H256, U256};

use crate::types::big_number;
use crate::wallet::Signer;
use crate::SdkError;

/// Offset added to the chain id inside the signing hash.
pub const DEFAULT_BASE_CHAIN_ID: u64 = 100007;

/// Gas parameters, carried hex-encoded JSON in a transaction's `extra`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasProvider {
    /// Provider type
    #[serde(rename = "type")]
    pub kind: u8,
    /// Gas limit
    pub gas: u64,
    /// Gas price
    #[serde(rename = "gasPrice", with = "big_number")]
    pub gas_price: U256,
}

impl Default for GasProvider {
    fn default() -> Self {
        Self {
            kind: 0,
            gas: 25000,
            gas_price: U256::from(400_000_000u64),
        }
    }
}

impl GasProvider {
    /// Provider that pays nothing. This is what an empty `extra` means.
    pub fn zero() -> Self {
        Self {
            kind: 0,
            gas: 0,
            gas_price: U256::zero(),
        }
    }

    /// `0x` hex of the JSON form
    pub fn to_extra(&self) -> Result<String, SdkError> {
        Ok(encode_prefixed(&serde_json::to_vec(self)?))
    }

    /// Parse an `extra` field. Empty input yields [`GasProvider::zero`].
    pub fn from_extra(extra: &str) -> Result<Self, SdkError> {
        let json = from_hex(extra);
        if json.is_empty() {
            return Ok(Self::zero());
        }
        Ok(serde_json::from_slice(&json)?)
    }
}

/// Decimal text as a 256-bit integer. Hex is refused: nodes read these
/// fields as base 10.
fn parse_decimal(field: &'static str, text: &str) -> Result<U256, SdkError> {
    if has_hex_prefix(text) {
        return Err(SdkError::InvalidNumber {
            field,
            value: text.to_string(),
        });
    }
    parse_big256(text).map_err(|_| SdkError::InvalidNumber {
        field,
        value: text.to_string(),
    })
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// Transaction in the JSON form accepted by the node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Chain the transaction executes on, decimal
    #[serde(rename = "chainId")]
    pub chain_id: String,
    /// Source chain for cross-chain transactions
    #[serde(rename = "fromChainId", default, skip_serializing_if = "String::is_empty")]
    pub from_chain_id: String,
    /// Destination chain for cross-chain transactions
    #[serde(rename = "toChainId", default, skip_serializing_if = "String::is_empty")]
    pub to_chain_id: String,
    /// Sender, `0x` hex
    pub from: String,
    /// Recipient, `0x` hex (empty for contract creation)
    pub to: String,
    /// Sender nonce, decimal
    pub nonce: String,
    /// Amount, decimal
    pub value: String,
    /// Signature, set by signing
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sig: String,
    /// Signer public key, set by signing
    #[serde(rename = "pub", default, skip_serializing_if = "String::is_empty")]
    pub pub_key: String,
    /// Call data, hex
    #[serde(default)]
    pub input: String,
    /// Pay in the chain's local currency
    #[serde(rename = "useLocal", default)]
    pub use_local: bool,
    /// Hex of the JSON [`GasProvider`]
    #[serde(default)]
    pub extra: String,
    /// Last height at which the transaction is valid
    #[serde(rename = "expireHeight", default, skip_serializing_if = "is_zero")]
    pub expire_height: i64,
    /// Cosigner public keys
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub multipubs: Vec<String>,
    /// Cosigner signatures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub multisigs: Vec<String>,
}

impl Transaction {
    /// Create a transaction on `chain_id` with zero value
    pub fn new(chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            value: "0".to_string(),
            ..Default::default()
        }
    }

    /// Set the sender
    pub fn from(mut self, address: &Address) -> Self {
        self.from = address.to_hex();
        self
    }

    /// Set the recipient
    pub fn to(mut self, address: &Address) -> Self {
        self.to = address.to_hex();
        self
    }

    /// Set the nonce
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce.to_string();
        self
    }

    /// Set the value
    pub fn value(mut self, value: U256) -> Self {
        self.value = value.to_string();
        self
    }

    /// Set the call data
    pub fn input(mut self, data: &[u8]) -> Self {
        self.input = encode_prefixed(data);
        self
    }

    /// Set `extra` to the given gas parameters
    pub fn with_gas(mut self, gas: &GasProvider) -> Result<Self, SdkError> {
        self.extra = gas.to_extra()?;
        Ok(self)
    }

    /// Gas parameters encoded in `extra`
    pub fn gas(&self) -> Result<GasProvider, SdkError> {
        GasProvider::from_extra(&self.extra)
    }

    /// Signing hash.
    ///
    /// Keccak-256 of the RLP list
    /// `[nonce, gasPrice, gas, to, value, input, chainId + base, 0, 0]`.
    pub fn hash_value(&self, base_chain_id: u64) -> Result<H256, SdkError> {
        let chain_id = parse_decimal("chainId", &self.chain_id)?
            .checked_add(U256::from(base_chain_id))
            .ok_or_else(|| SdkError::InvalidNumber {
                field: "chainId",
                value: self.chain_id.clone(),
            })?;
        let value = parse_decimal("value", &self.value)?;
        let nonce: u64 = self.nonce.parse().map_err(|_| SdkError::InvalidNumber {
            field: "nonce",
            value: self.nonce.clone(),
        })?;
        let gas = self.gas()?;

        let mut stream = RlpStream::new_list(9);
        stream.append(&nonce);
        stream.append(&gas.gas_price);
        stream.append(&gas.gas);
        stream.append(&from_hex(&self.to));
        stream.append(&value);
        stream.append(&from_hex(&self.input));
        stream.append(&chain_id);
        stream.append(&0u8);
        stream.append(&0u8);
        let payload = stream.out();

        tracing::trace!(len = payload.len(), "transaction hash payload");
        Ok(keccak256(&payload))
    }

    /// Hash of the dash-joined text form used by early nodes:
    /// `chainId-from-to-nonce-useLocal-value-input-extra`.
    pub fn legacy_hash_value(&self) -> H256 {
        let use_local = if self.use_local { "1" } else { "0" };
        let text = [
            self.chain_id.clone(),
            clean_hex_prefix(&self.from).to_lowercase(),
            clean_hex_prefix(&self.to).to_lowercase(),
            self.nonce.clone(),
            use_local.to_string(),
            self.value.clone(),
            clean_hex_prefix(&self.input).to_lowercase(),
            clean_hex_prefix(&self.extra).to_lowercase(),
        ]
        .join("-");
        keccak256(text.as_bytes())
    }
}

/// Sign `tx` with `signer`, and with each of `cosigners` into
/// `multisigs`/`multipubs`.
///
/// All signatures are produced before `tx` is modified, so a failure leaves
/// it untouched.
pub fn sign_transaction(
    tx: &mut Transaction,
    base_chain_id: u64,
    signer: &dyn Signer,
    cosigners: &[&dyn Signer],
) -> Result<(), SdkError> {
    let hash = tx.hash_value(base_chain_id)?;

    let sig = encode_prefixed(&signer.sign_digest(&hash)?);
    let pub_key = encode_prefixed(&signer.public_key_bytes());
    let mut multi = Vec::with_capacity(cosigners.len());
    for cosigner in cosigners {
        multi.push((
            encode_prefixed(&cosigner.sign_digest(&hash)?),
            encode_prefixed(&cosigner.public_key_bytes()),
        ));
    }

    tx.sig = sig;
    tx.pub_key = pub_key;
    for (sig, pub_key) in multi {
        tx.multisigs.push(sig);
        tx.multipubs.push(pub_key);
    }
    Ok(())
}

/// Message a node operator signs to bind a node to an address:
/// `nodeId,nodeType,address,nonce,amount` with `0x` prefixes removed.
pub fn node_sig_message(
    node_id: &str,
    node_type: &str,
    address: &str,
    nonce: &str,
    amount: &str,
) -> String {
    format!(
        "{},{},{},{},{}",
        clean_hex_prefix(node_id),
        node_type,
        clean_hex_prefix(address),
        nonce,
        amount
    )
}

/// Sign the keccak-256 of `message`, returning `0x` hex of the signature.
pub fn sign_message(message: &str, signer: &dyn Signer) -> Result<String, SdkError> {
    let digest = keccak256(message.as_bytes());
    Ok(encode_prefixed(&signer.sign_digest(&digest)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gas_provider_extra_roundtrip() {
        let gas = GasProvider::default();
        let extra = gas.to_extra().unwrap();
        let json = String::from_utf8(from_hex(&extra)).unwrap();
        assert_eq!(json, r#"{"type":0,"gas":25000,"gasPrice":400000000}"#);
        assert_eq!(GasProvider::from_extra(&extra).unwrap(), gas);
    }

    #[test]
    fn test_empty_extra_is_zero_gas() {
        assert_eq!(GasProvider::from_extra("").unwrap(), GasProvider::zero());
        assert_eq!(GasProvider::from_extra("0x").unwrap(), GasProvider::zero());
    }

    #[test]
    fn test_bad_extra() {
        assert!(GasProvider::from_extra("0x7b7d7d").is_err());
    }

    #[test]
    fn test_hash_value_rejects_bad_numbers() {
        let tx = Transaction {
            chain_id: "abc".into(),
            nonce: "1".into(),
            ..Default::default()
        };
        assert!(matches!(
            tx.hash_value(DEFAULT_BASE_CHAIN_ID),
            Err(SdkError::InvalidNumber { field: "chainId", .. })
        ));

        let tx = Transaction {
            chain_id: "1".into(),
            nonce: "-1".into(),
            ..Default::default()
        };
        assert!(matches!(
            tx.hash_value(DEFAULT_BASE_CHAIN_ID),
            Err(SdkError::InvalidNumber { field: "nonce", .. })
        ));
    }

    #[test]
    fn test_hash_value_rejects_hex_amounts() {
        let tx = Transaction {
            chain_id: "1".into(),
            nonce: "1".into(),
            value: "0x10".into(),
            ..Default::default()
        };
        assert!(matches!(
            tx.hash_value(DEFAULT_BASE_CHAIN_ID),
            Err(SdkError::InvalidNumber { field: "value", .. })
        ));

        let tx = Transaction {
            chain_id: "0x1".into(),
            nonce: "1".into(),
            ..Default::default()
        };
        assert!(matches!(
            tx.hash_value(DEFAULT_BASE_CHAIN_ID),
            Err(SdkError::InvalidNumber { field: "chainId", .. })
        ));

        let tx = Transaction {
            chain_id: "1".into(),
            nonce: "1".into(),
            value: "16".into(),
            ..Default::default()
        };
        assert!(tx.hash_value(DEFAULT_BASE_CHAIN_ID).is_ok());
    }

    #[test]
    fn test_hash_value_depends_on_gas() {
        let tx = Transaction::new("1").nonce(0);
        let with_gas = tx.clone().with_gas(&GasProvider::default()).unwrap();
        assert_ne!(
            tx.hash_value(DEFAULT_BASE_CHAIN_ID).unwrap(),
            with_gas.hash_value(DEFAULT_BASE_CHAIN_ID).unwrap()
        );
    }

    #[test]
    fn test_serialization_omits_empty_fields() {
        let tx = Transaction::new("1").nonce(3);
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["chainId"], "1");
        assert_eq!(json["nonce"], "3");
        assert!(json.get("sig").is_none());
        assert!(json.get("pub").is_none());
        assert!(json.get("expireHeight").is_none());
        assert!(json.get("multisigs").is_none());
    }

    #[test]
    fn test_node_sig_message() {
        assert_eq!(
            node_sig_message("0xabcd", "0", "0x7112add80e015c16c84f2e7cdb52c4f70bcb2e60", "1", "100"),
            "abcd,0,7112add80e015c16c84f2e7cdb52c4f70bcb2e60,1,100"
        );
    }
}
