//! Hex and byte-slice helpers.
//!
//! Two families of hex decoding live here:
//!
//! - **Lossy** ([`from_hex`], [`hex_to_bytes`], [`hex_to_bytes_fixed`]): never
//!   fail, decoding the longest valid prefix. Used where node responses are
//!   trusted to be well formed.
//! - **Strict** ([`decode_prefixed`]): requires the `0x` prefix and an even
//!   number of valid digits. Used for user supplied addresses and payloads.

use thiserror::Error;

/// Strict hex decoding error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    /// Input was empty
    #[error("empty hex string")]
    Empty,
    /// Input did not start with `0x`
    #[error("hex string without 0x prefix")]
    MissingPrefix,
    /// Odd number of hex digits
    #[error("hex string of odd length")]
    OddLength,
    /// Non-hex character
    #[error("invalid hex character {0:?} at position {1}")]
    InvalidCharacter(char, usize),
}

/// Returns true if `s` begins with `0x` or `0X`.
pub fn has_hex_prefix(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 2 && b[0] == b'0' && (b[1] == b'x' || b[1] == b'X')
}

/// Strips a leading `0x`/`0X` if present.
pub fn clean_hex_prefix(s: &str) -> &str {
    if has_hex_prefix(s) {
        &s[2..]
    } else {
        s
    }
}

/// Returns true if `c` is an ASCII hex digit.
pub fn is_hex_character(c: u8) -> bool {
    c.is_ascii_hexdigit()
}

/// Returns true if `s` has even length and contains only hex digits.
///
/// No prefix is accepted.
pub fn is_hex(s: &str) -> bool {
    s.len() % 2 == 0 && s.bytes().all(is_hex_character)
}

/// Encodes bytes as lowercase hex without a prefix.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Encodes bytes as lowercase hex with a `0x` prefix.
pub fn encode_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Decodes unprefixed hex, stopping at the first invalid digit pair.
///
/// A trailing odd digit is dropped.
pub fn hex_to_bytes(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len() / 2);
    for pair in s.as_bytes().chunks_exact(2) {
        match (nibble(pair[0]), nibble(pair[1])) {
            (Some(hi), Some(lo)) => out.push((hi << 4) | lo),
            _ => break,
        }
    }
    out
}

/// Decodes hex with an optional `0x` prefix.
///
/// Odd-length input is treated as if it had a leading `0`. Never fails:
/// malformed input yields the bytes decoded before the first bad digit.
pub fn from_hex(s: &str) -> Vec<u8> {
    let s = clean_hex_prefix(s);
    if s.len() % 2 == 1 {
        hex_to_bytes(&format!("0{}", s))
    } else {
        hex_to_bytes(s)
    }
}

/// Decodes unprefixed hex into exactly `len` bytes, keeping the rightmost
/// bytes or left-padding with zeros.
pub fn hex_to_bytes_fixed(s: &str, len: usize) -> Vec<u8> {
    let decoded = hex_to_bytes(s);
    if decoded.len() >= len {
        return decoded[decoded.len() - len..].to_vec();
    }
    left_pad_bytes(&decoded, len)
}

/// Strictly decodes `0x`-prefixed hex.
///
/// `"0x"` decodes to an empty vector.
pub fn decode_prefixed(s: &str) -> Result<Vec<u8>, HexError> {
    if s.is_empty() {
        return Err(HexError::Empty);
    }
    if !has_hex_prefix(s) {
        return Err(HexError::MissingPrefix);
    }
    let body = &s[2..];
    if body.len() % 2 == 1 {
        return Err(HexError::OddLength);
    }
    hex::decode(body).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { c, index } => {
            HexError::InvalidCharacter(c, index + 2)
        }
        _ => HexError::OddLength,
    })
}

/// Zero-pads `slice` on the left up to `len` bytes.
///
/// Slices already at least `len` long are returned unchanged.
pub fn left_pad_bytes(slice: &[u8], len: usize) -> Vec<u8> {
    if len <= slice.len() {
        return slice.to_vec();
    }
    let mut padded = vec![0u8; len];
    padded[len - slice.len()..].copy_from_slice(slice);
    padded
}

/// Zero-pads `slice` on the right up to `len` bytes.
pub fn right_pad_bytes(slice: &[u8], len: usize) -> Vec<u8> {
    if len <= slice.len() {
        return slice.to_vec();
    }
    let mut padded = vec![0u8; len];
    padded[..slice.len()].copy_from_slice(slice);
    padded
}

/// Converts an arbitrary slice into a fixed-width array.
///
/// Longer input keeps its last `N` bytes, shorter input is left-padded
/// with zeros.
pub fn bytes_to_fixed<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    let src = if bytes.len() > N {
        &bytes[bytes.len() - N..]
    } else {
        bytes
    };
    out[N - src.len()..].copy_from_slice(src);
    out
}
