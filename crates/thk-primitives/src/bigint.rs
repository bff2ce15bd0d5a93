//! 256-bit integer text and byte codecs.
//!
//! Node JSON carries amounts as decimal strings, ABI words carry them as
//! 32-byte two's complement. The helpers here convert between those forms
//! without ever silently truncating.

use crate::bytes::{clean_hex_prefix, has_hex_prefix, left_pad_bytes};
use crate::U256;
use std::fmt;
use thiserror::Error;

/// Big integer parse error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BigIntError {
    /// Text is not a decimal or 0x-hex number
    #[error("invalid integer: {0:?}")]
    InvalidNumber(String),
    /// Value does not fit in 256 bits
    #[error("integer exceeds 256 bits: {0:?}")]
    Overflow(String),
}

fn parse_digits(digits: &str, radix: u32, text: &str) -> Result<U256, BigIntError> {
    if digits.is_empty() {
        return Err(BigIntError::InvalidNumber(text.to_string()));
    }
    let mut acc = U256::zero();
    for c in digits.chars() {
        let d = c
            .to_digit(radix)
            .ok_or_else(|| BigIntError::InvalidNumber(text.to_string()))?;
        acc = acc
            .checked_mul(U256::from(radix))
            .and_then(|v| v.checked_add(U256::from(d)))
            .ok_or_else(|| BigIntError::Overflow(text.to_string()))?;
    }
    Ok(acc)
}

/// Parses decimal or `0x`-prefixed hex into a U256.
///
/// The empty string parses as zero. Leading zeros are accepted. Values
/// above 2^256 - 1 are rejected.
pub fn parse_big256(text: &str) -> Result<U256, BigIntError> {
    if text.is_empty() {
        return Ok(U256::zero());
    }
    if has_hex_prefix(text) {
        parse_digits(clean_hex_prefix(text), 16, text)
    } else {
        parse_digits(text.strip_prefix('+').unwrap_or(text), 10, text)
    }
}

/// Minimal big-endian bytes of `value`; empty for zero.
pub fn big_bytes(value: &U256) -> Vec<u8> {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    let start = buf.iter().position(|b| *b != 0).unwrap_or(32);
    buf[start..].to_vec()
}

/// Big-endian bytes of `value`, left-padded to at least `len` bytes.
pub fn padded_big_bytes(value: &U256, len: usize) -> Vec<u8> {
    left_pad_bytes(&big_bytes(value), len)
}

/// Interprets `value` as a two's complement signed integer.
pub fn to_signed(value: U256) -> I256 {
    if value.bit(255) {
        I256::new(value.overflowing_neg().0, true)
    } else {
        I256::new(value, false)
    }
}

/// Two's complement encoding of `value`, masked to 256 bits.
pub fn to_unsigned(value: I256) -> U256 {
    if value.negative {
        value.abs.overflowing_neg().0
    } else {
        value.abs
    }
}

/// `base ^ exponent` by square-and-multiply, wrapping at 2^256.
pub fn exp(base: U256, exponent: U256) -> U256 {
    let mut result = U256::one();
    let mut word = base;
    for i in 0..exponent.bits() {
        if exponent.bit(i) {
            result = result.overflowing_mul(word).0;
        }
        word = word.overflowing_mul(word).0;
    }
    result
}

/// Signed 256-bit integer in sign/magnitude form.
///
/// Zero is always non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct I256 {
    /// Absolute value
    pub abs: U256,
    /// Sign (true if negative)
    pub negative: bool,
}

impl I256 {
    /// Create a new I256
    pub fn new(abs: U256, negative: bool) -> Self {
        Self {
            abs,
            negative: negative && !abs.is_zero(),
        }
    }

    /// Create from i128
    pub fn from_i128(value: i128) -> Self {
        Self::new(U256::from(value.unsigned_abs()), value < 0)
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }

    /// Whether the value fits a signed integer of `bits` width.
    pub fn fits_in(&self, bits: usize) -> bool {
        if bits == 0 || bits > 256 {
            return false;
        }
        let limit = U256::one() << (bits - 1);
        if self.negative {
            self.abs <= limit
        } else {
            self.abs < limit
        }
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

impl From<i64> for I256 {
    fn from(value: i64) -> Self {
        Self::from_i128(value as i128)
    }
}
