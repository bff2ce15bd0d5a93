//! Cross-chain cash cheque codec
//!
//! A cheque travels as the hex of a fixed big-endian layout:
//!
//! ```text
//! FromChain(4) FromAddress(20) Nonce(8) ToChain(4) ToAddress(20)
//! ExpireHeight(8) AmountLen(1) Amount(AmountLen)
//! ```
//!
//! Older writers could put a metadata prefix in front of that layout. It is
//! announced by [`LEGACY_SENTINEL_CHAIN_ID`] in the first four bytes,
//! followed by a version byte. Decoding detects the format first and then
//! dispatches to the decoder registered for that version. Encoding only ever
//! produces the plain layout.

use std::fmt;

use bytes::{Buf, BufMut, BytesMut};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use thk_primitives::bigint::{big_bytes, parse_big256};
use thk_primitives::bytes::{decode_prefixed, encode_prefixed};
use thk_primitives::{Address, BlockHeight, ChainId, HexError, U256};

/// Withdraw system contract
pub const SYSTEM_CONTRACT_ADDRESS_WITHDRAW: &str = "0x0000000000000000000000000000000000020000";
/// Deposit system contract
pub const SYSTEM_CONTRACT_ADDRESS_DEPOSIT: &str = "0x0000000000000000000000000000000000030000";
/// Cancel system contract
pub const SYSTEM_CONTRACT_ADDRESS_CANCEL: &str = "0x0000000000000000000000000000000000040000";

/// Chain id that marks a legacy metadata prefix.
pub const LEGACY_SENTINEL_CHAIN_ID: ChainId = 0;

/// Cheque codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChequeError {
    /// Malformed hex in an address field or the encoded cheque
    #[error("invalid hex in {field}: {source}")]
    InvalidHex {
        /// Field name
        field: &'static str,
        /// Underlying hex error
        source: HexError,
    },

    /// Numeric field that does not parse
    #[error("invalid number in {field}: {value:?}")]
    InvalidNumber {
        /// Field name
        field: &'static str,
        /// Offending text
        value: String,
    },

    /// Encoded cheque ends inside a field
    #[error("cheque truncated in {field}")]
    Truncated {
        /// Field being read
        field: &'static str,
    },

    /// Legacy prefix with an unregistered version byte
    #[error("unknown cheque version {0:#04x}")]
    UnknownVersion(u8),

    /// From-chain equal to the legacy sentinel
    #[error("from chain {0} is reserved")]
    ReservedChainId(ChainId),

    /// Amount wider than 256 bits
    #[error("amount of {0} bytes exceeds 256 bits")]
    AmountTooLong(usize),
}

/// Cheque in the text form exchanged with the node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashCheque {
    /// Chain the cheque is presented on (the from-chain after decoding)
    #[serde(rename = "chainId")]
    pub chain_id: String,
    /// Source chain, decimal
    #[serde(rename = "fromChainId")]
    pub from_chain_id: String,
    /// Source address, `0x` hex
    pub from: String,
    /// Nonce of the source account, decimal
    pub nonce: String,
    /// Destination chain, decimal
    #[serde(rename = "toChainId")]
    pub to_chain_id: String,
    /// Destination address, `0x` hex
    pub to: String,
    /// Last height at which the cheque can be cashed, decimal
    #[serde(rename = "expireheight")]
    pub expire_height: String,
    /// Amount, decimal
    pub value: String,
}

impl CashCheque {
    /// Hex of the plain binary layout.
    pub fn encode(&self) -> Result<String, ChequeError> {
        let check = CashCheck {
            from_chain: parse_field("fromChainId", &self.from_chain_id)?,
            from_address: parse_address("from", &self.from)?,
            nonce: parse_field("nonce", &self.nonce)?,
            to_chain: parse_field("toChainId", &self.to_chain_id)?,
            to_address: parse_address("to", &self.to)?,
            expire_height: parse_field("expireheight", &self.expire_height)?,
            amount: parse_big256(&self.value).map_err(|_| ChequeError::InvalidNumber {
                field: "value",
                value: self.value.clone(),
            })?,
            legacy: None,
        };
        Ok(encode_prefixed(&check.to_bytes()?))
    }

    /// Decode the hex produced by [`CashCheque::encode`] or a legacy writer.
    pub fn decode(input: &str) -> Result<Self, ChequeError> {
        let data = decode_prefixed(input).map_err(|source| ChequeError::InvalidHex {
            field: "cheque",
            source,
        })?;
        Ok(CashCheck::from_bytes(&data)?.into())
    }
}

impl From<CashCheck> for CashCheque {
    fn from(check: CashCheck) -> Self {
        Self {
            chain_id: check.from_chain.to_string(),
            from_chain_id: check.from_chain.to_string(),
            from: check.from_address.to_hex(),
            nonce: check.nonce.to_string(),
            to_chain_id: check.to_chain.to_string(),
            to: check.to_address.to_hex(),
            expire_height: check.expire_height.to_string(),
            value: check.amount.to_string(),
        }
    }
}

fn parse_field<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, ChequeError> {
    value.parse().map_err(|_| ChequeError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_address(field: &'static str, value: &str) -> Result<Address, ChequeError> {
    let bytes = decode_prefixed(value).map_err(|source| ChequeError::InvalidHex { field, source })?;
    Ok(Address::from_slice_padded(&bytes))
}

/// Metadata carried by the legacy prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegacyMetadata {
    /// Pay in the chain's local currency
    pub use_local: bool,
    /// Parent chain of the issuing shard
    pub parent_chain: ChainId,
    /// Issued by a shard chain
    pub is_shard: bool,
    /// Local currency id
    pub currency_id: u16,
}

/// Cheque in binary form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashCheck {
    /// Source chain
    pub from_chain: ChainId,
    /// Source address
    pub from_address: Address,
    /// Nonce of the source account
    pub nonce: u64,
    /// Destination chain
    pub to_chain: ChainId,
    /// Destination address
    pub to_address: Address,
    /// Expiry height
    pub expire_height: BlockHeight,
    /// Amount
    pub amount: U256,
    /// Present only when decoded from a legacy-prefixed cheque
    pub legacy: Option<LegacyMetadata>,
}

/// Reads the fields a legacy version stores between the version byte and
/// the real from-chain.
type PrefixDecoder = fn(&mut &[u8]) -> Result<LegacyMetadata, ChequeError>;

/// Registered legacy prefix versions.
const LEGACY_DECODERS: &[(u8, PrefixDecoder)] = &[
    (0x00, decode_prefix_v0 as PrefixDecoder),
    (0x01, decode_prefix_v1 as PrefixDecoder),
];

fn decode_prefix_v0(_buf: &mut &[u8]) -> Result<LegacyMetadata, ChequeError> {
    Ok(LegacyMetadata {
        use_local: true,
        ..LegacyMetadata::default()
    })
}

fn decode_prefix_v1(buf: &mut &[u8]) -> Result<LegacyMetadata, ChequeError> {
    ensure(buf, 8, "legacy metadata")?;
    Ok(LegacyMetadata {
        use_local: buf.get_u8() != 0,
        parent_chain: buf.get_u32(),
        is_shard: buf.get_u8() != 0,
        currency_id: buf.get_u16(),
    })
}

enum Format {
    Plain(ChainId),
    Legacy(u8),
}

fn detect_format(buf: &mut &[u8]) -> Result<Format, ChequeError> {
    ensure(buf, 4, "FromChain")?;
    let first = buf.get_u32();
    if first != LEGACY_SENTINEL_CHAIN_ID {
        return Ok(Format::Plain(first));
    }
    ensure(buf, 1, "version")?;
    Ok(Format::Legacy(buf.get_u8()))
}

fn ensure(buf: &[u8], len: usize, field: &'static str) -> Result<(), ChequeError> {
    if buf.len() < len {
        return Err(ChequeError::Truncated { field });
    }
    Ok(())
}

fn read_u32(buf: &mut &[u8], field: &'static str) -> Result<u32, ChequeError> {
    ensure(buf, 4, field)?;
    Ok(buf.get_u32())
}

fn read_u64(buf: &mut &[u8], field: &'static str) -> Result<u64, ChequeError> {
    ensure(buf, 8, field)?;
    Ok(buf.get_u64())
}

fn read_address(buf: &mut &[u8], field: &'static str) -> Result<Address, ChequeError> {
    ensure(buf, Address::LEN, field)?;
    let mut bytes = [0u8; 20];
    buf.copy_to_slice(&mut bytes);
    Ok(Address::from_bytes(bytes))
}

fn read_amount(buf: &mut &[u8]) -> Result<U256, ChequeError> {
    ensure(buf, 1, "AmountLen")?;
    let len = buf.get_u8() as usize;
    ensure(buf, len, "Amount")?;
    let current: &[u8] = buf;
    let (raw, rest) = current.split_at(len);
    *buf = rest;

    let significant = match raw.iter().position(|b| *b != 0) {
        Some(start) => &raw[start..],
        None => return Ok(U256::zero()),
    };
    if significant.len() > 32 {
        return Err(ChequeError::AmountTooLong(significant.len()));
    }
    Ok(U256::from_big_endian(significant))
}

impl CashCheck {
    /// Plain binary layout. Legacy metadata is never written.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ChequeError> {
        if self.from_chain == LEGACY_SENTINEL_CHAIN_ID {
            return Err(ChequeError::ReservedChainId(self.from_chain));
        }
        let amount = big_bytes(&self.amount);
        let mut buf = BytesMut::with_capacity(65 + amount.len());
        buf.put_u32(self.from_chain);
        buf.put_slice(self.from_address.as_bytes());
        buf.put_u64(self.nonce);
        buf.put_u32(self.to_chain);
        buf.put_slice(self.to_address.as_bytes());
        buf.put_u64(self.expire_height);
        buf.put_u8(amount.len() as u8);
        buf.put_slice(&amount);
        Ok(buf.to_vec())
    }

    /// Decode either layout.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ChequeError> {
        let mut buf = data;

        let (from_chain, legacy) = match detect_format(&mut buf)? {
            Format::Plain(chain) => (chain, None),
            Format::Legacy(version) => {
                let decoder = LEGACY_DECODERS
                    .iter()
                    .find(|(v, _)| *v == version)
                    .map(|(_, d)| d)
                    .ok_or(ChequeError::UnknownVersion(version))?;
                let metadata = decoder(&mut buf)?;
                tracing::debug!(version, ?metadata, "legacy cheque prefix");
                (read_u32(&mut buf, "FromChain")?, Some(metadata))
            }
        };

        let check = CashCheck {
            from_chain,
            from_address: read_address(&mut buf, "FromAddress")?,
            nonce: read_u64(&mut buf, "Nonce")?,
            to_chain: read_u32(&mut buf, "ToChain")?,
            to_address: read_address(&mut buf, "ToAddress")?,
            expire_height: read_u64(&mut buf, "ExpireHeight")?,
            amount: read_amount(&mut buf)?,
            legacy,
        };

        if buf.has_remaining() {
            tracing::debug!(trailing = buf.remaining(), "ignoring bytes after cheque");
        }
        Ok(check)
    }
}

impl fmt::Display for CashCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let meta = self.legacy.unwrap_or_default();
        write!(
            f,
            "Check{{ParentChain:{} IsShard:{} From:[{},{}] Nonce:{} To:[{},{}] Expire:{} Local:{} Amount:{} CoinID:{}}}",
            meta.parent_chain,
            meta.is_shard,
            self.from_chain,
            self.from_address,
            self.nonce,
            self.to_chain,
            self.to_address,
            self.expire_height,
            meta.use_local,
            self.amount,
            meta.currency_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x700fe44d941225d58e695c449f79412cc7fdbcf8";

    fn cheque(value: &str) -> CashCheque {
        CashCheque {
            chain_id: "1".into(),
            from_chain_id: "1".into(),
            from: ADDR.into(),
            nonce: "5".into(),
            to_chain_id: "2".into(),
            to: ADDR.into(),
            expire_height: "13448596".into(),
            value: value.into(),
        }
    }

    #[test]
    fn test_encode_layout() {
        let encoded = cheque("256").encode().unwrap();
        let bytes = decode_prefixed(&encoded).unwrap();
        assert_eq!(bytes.len(), 64 + 1 + 2);
        assert_eq!(&bytes[..4], &[0, 0, 0, 1]);
        assert_eq!(&bytes[24..32], &[0, 0, 0, 0, 0, 0, 0, 5]);
        assert_eq!(bytes[64], 2);
        assert_eq!(&bytes[65..], &[1, 0]);
    }

    #[test]
    fn test_zero_amount_has_empty_field() {
        let encoded = cheque("0").encode().unwrap();
        let bytes = decode_prefixed(&encoded).unwrap();
        assert_eq!(bytes.len(), 65);
        assert_eq!(bytes[64], 0);
        assert_eq!(CashCheque::decode(&encoded).unwrap().value, "0");
    }

    #[test]
    fn test_decode_sets_chain_id_to_from_chain() {
        let mut c = cheque("7");
        c.chain_id = "9".into();
        let decoded = CashCheque::decode(&c.encode().unwrap()).unwrap();
        assert_eq!(decoded.chain_id, "1");
    }

    #[test]
    fn test_legacy_v0_prefix() {
        let plain = decode_prefixed(&cheque("10").encode().unwrap()).unwrap();
        let mut data = vec![0, 0, 0, 0, 0x00];
        data.extend_from_slice(&plain);

        let check = CashCheck::from_bytes(&data).unwrap();
        assert_eq!(check.from_chain, 1);
        assert_eq!(check.amount, U256::from(10));
        assert_eq!(
            check.legacy,
            Some(LegacyMetadata {
                use_local: true,
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_legacy_v1_prefix() {
        let plain = decode_prefixed(&cheque("10").encode().unwrap()).unwrap();
        let mut data = vec![0, 0, 0, 0, 0x01, 0x01, 0, 0, 0, 3, 0x01, 0x00, 0x07];
        data.extend_from_slice(&plain);

        let check = CashCheck::from_bytes(&data).unwrap();
        assert_eq!(
            check.legacy,
            Some(LegacyMetadata {
                use_local: true,
                parent_chain: 3,
                is_shard: true,
                currency_id: 7,
            })
        );
        assert_eq!(check.to_chain, 2);
    }

    #[test]
    fn test_unknown_legacy_version() {
        let data = [0, 0, 0, 0, 0x02, 0, 0, 0, 1];
        assert_eq!(
            CashCheck::from_bytes(&data),
            Err(ChequeError::UnknownVersion(2))
        );
    }

    #[test]
    fn test_truncated_names_field() {
        let plain = decode_prefixed(&cheque("10").encode().unwrap()).unwrap();
        assert_eq!(
            CashCheck::from_bytes(&plain[..30]),
            Err(ChequeError::Truncated { field: "Nonce" })
        );
        assert_eq!(
            CashCheck::from_bytes(&plain[..65]),
            Err(ChequeError::Truncated { field: "Amount" })
        );
        assert_eq!(
            CashCheck::from_bytes(&[]),
            Err(ChequeError::Truncated { field: "FromChain" })
        );
    }

    #[test]
    fn test_sentinel_from_chain_not_encodable() {
        let mut c = cheque("1");
        c.from_chain_id = "0".into();
        assert_eq!(c.encode(), Err(ChequeError::ReservedChainId(0)));
    }

    #[test]
    fn test_encode_rejects_bad_fields() {
        let mut c = cheque("1");
        c.nonce = "five".into();
        assert!(matches!(
            c.encode(),
            Err(ChequeError::InvalidNumber { field: "nonce", .. })
        ));

        let mut c = cheque("1");
        c.from = "700fe44d941225d58e695c449f79412cc7fdbcf8".into();
        assert!(matches!(
            c.encode(),
            Err(ChequeError::InvalidHex { field: "from", .. })
        ));

        let mut c = cheque("1");
        c.value = "1.5".into();
        assert!(matches!(
            c.encode(),
            Err(ChequeError::InvalidNumber { field: "value", .. })
        ));
    }

    #[test]
    fn test_display() {
        let check = CashCheck::from_bytes(&decode_prefixed(&cheque("3").encode().unwrap()).unwrap())
            .unwrap();
        let text = check.to_string();
        assert!(text.starts_with("Check{ParentChain:0 IsShard:false From:[1,0x700fe44d"));
        assert!(text.ends_with("Amount:3 CoinID:0}"));
    }
}
