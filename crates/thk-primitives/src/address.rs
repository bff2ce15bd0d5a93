//! 20-byte account address

use crate::bytes::{bytes_to_fixed, clean_hex_prefix, from_hex};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Address parsing error
#[derive(Debug, Error)]
pub enum AddressError {
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Invalid length
    #[error("invalid address length: expected 20 bytes, got {0}")]
    InvalidLength(usize),
}

/// A 20-byte account address.
///
/// The canonical text form is lowercase `0x` hex. The mixed-case checksum
/// form lives in `thk-crypto` because it needs keccak.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// Size of address in bytes
    pub const LEN: usize = 20;

    /// Zero address (0x0000...0000)
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create address from bytes
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    /// Create address from a slice of exactly 20 bytes
    pub fn from_slice(slice: &[u8]) -> Result<Self, AddressError> {
        if slice.len() != Self::LEN {
            return Err(AddressError::InvalidLength(slice.len()));
        }
        Ok(Address(bytes_to_fixed(slice)))
    }

    /// Create address from a slice of any length.
    ///
    /// Longer input keeps the rightmost 20 bytes, shorter input is
    /// left-padded with zeros.
    pub fn from_slice_padded(slice: &[u8]) -> Self {
        Address(bytes_to_fixed(slice))
    }

    /// Parse a 20-byte address from hex (with or without 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let bytes = hex::decode(clean_hex_prefix(s))
            .map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Parse an address leniently, never failing.
    ///
    /// Decodes as much valid hex as possible, then pads or truncates to
    /// 20 bytes.
    pub fn from_hex_lossy(s: &str) -> Self {
        Self::from_slice_padded(&from_hex(s))
    }

    /// Get as byte array
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Lowercase hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

/// Returns true for exactly `0x` followed by 40 lowercase hex digits.
pub fn is_strict_address(s: &str) -> bool {
    s.len() == 42
        && s.starts_with("0x")
        && s[2..]
            .bytes()
            .all(|c| c.is_ascii_digit() || (b'a'..=b'f').contains(&c))
}

/// Normalises an address string to the strict lowercase `0x` form.
///
/// Input shorter than 40 digits is left-padded with `0`. Longer input is
/// returned lowercased but otherwise untouched.
pub fn to_strict_address(s: &str) -> String {
    if is_strict_address(s) {
        return s.to_string();
    }
    let body = clean_hex_prefix(s).to_ascii_lowercase();
    format!("0x{:0>40}", body)
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
