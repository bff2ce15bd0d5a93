//! Mixed-case checksum address encoding.
//!
//! Digit `i` of the lowercase hex address is uppercased iff nibble `i` of
//! `keccak256(lowercase_hex)` is greater than 7.

use crate::keccak256;
use thk_primitives::bytes::clean_hex_prefix;
use thk_primitives::Address;

fn hash_nibble(hash: &[u8; 32], i: usize) -> u8 {
    let byte = hash[i / 2];
    if i % 2 == 0 {
        byte >> 4
    } else {
        byte & 0x0f
    }
}

/// Checksum text form of `address`, with `0x` prefix.
pub fn to_checksum_address(address: &Address) -> String {
    let lower = hex::encode(address.as_bytes());
    let hash = keccak256(lower.as_bytes());
    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        if hash_nibble(hash.as_bytes(), i) > 7 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Returns true if `address` is 40 hex digits (prefix optional) whose case
/// pattern matches its checksum.
pub fn is_checksum_address(address: &str) -> bool {
    let body = clean_hex_prefix(address);
    if body.len() != 40 || !body.bytes().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }
    let hash = keccak256(body.to_ascii_lowercase().as_bytes());
    body.bytes().enumerate().all(|(i, c)| {
        if hash_nibble(hash.as_bytes(), i) > 7 {
            !c.is_ascii_lowercase()
        } else {
            !c.is_ascii_uppercase()
        }
    })
}
