//! IBAN text form of account addresses (ISO 13616, country code `TH`).
//!
//! The address is rendered as an uppercase base-36 BBAN, left-padded to 30
//! characters, preceded by the country code and two mod-97 check digits.

use crate::to_checksum_address;
use thk_primitives::{Address, U256};

const COUNTRY_CODE: &str = "TH";
const BBAN_MIN_LEN: usize = 30;

/// Remainder mod 97 of the ISO 13616 digit expansion of `iban`
/// (first four characters moved to the end, letters mapped A=10..Z=35).
fn iso13616_mod97(iban: &str) -> Option<u32> {
    let upper = iban.to_ascii_uppercase();
    if upper.len() < 4 {
        return None;
    }
    let (head, tail) = upper.split_at(4);
    let mut rem: u32 = 0;
    for c in tail.chars().chain(head.chars()) {
        let value = c.to_digit(36)?;
        rem = if value >= 10 {
            (rem * 100 + value) % 97
        } else {
            (rem * 10 + value) % 97
        };
    }
    Some(rem)
}

fn to_base36(mut value: U256) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    let radix = U256::from(36u8);
    let mut digits = Vec::new();
    while !value.is_zero() {
        let (q, r) = value.div_mod(radix);
        digits.push(std::char::from_digit(r.low_u32(), 36).unwrap_or('0'));
        value = q;
    }
    digits.iter().rev().map(|c| c.to_ascii_uppercase()).collect()
}

fn from_base36(text: &str) -> Option<U256> {
    let radix = U256::from(36u8);
    text.chars().try_fold(U256::zero(), |acc, c| {
        let d = c.to_digit(36)?;
        acc.checked_mul(radix)?.checked_add(U256::from(d))
    })
}

/// IBAN for `address`.
pub fn to_iban(address: &Address) -> String {
    let value = U256::from_big_endian(address.as_bytes());
    let bban = format!("{:0>width$}", to_base36(value), width = BBAN_MIN_LEN);
    let probe = format!("{}00{}", COUNTRY_CODE, bban);
    let rem = iso13616_mod97(&probe).unwrap_or(0);
    format!("{}{:02}{}", COUNTRY_CODE, 98 - rem, bban)
}

/// Direct IBANs (34 or 35 characters) encode a full address.
pub fn is_direct_iban(iban: &str) -> bool {
    iban.len() == 34 || iban.len() == 35
}

/// Format and mod-97 check of an IBAN.
pub fn is_valid_iban(iban: &str) -> bool {
    let bytes = iban.as_bytes();
    let shape_ok = bytes.len() >= 34
        && bytes.len() <= 35
        && iban.starts_with(COUNTRY_CODE)
        && bytes[2..4].iter().all(u8::is_ascii_digit)
        && bytes[4..]
            .iter()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase());
    shape_ok && iso13616_mod97(iban) == Some(1)
}

/// Address encoded by a direct IBAN.
///
/// Returns `None` for indirect IBANs, non base-36 payloads, or payloads
/// wider than 20 bytes. Check digits are not verified, use
/// [`is_valid_iban`] for that.
pub fn iban_to_address(iban: &str) -> Option<Address> {
    if !is_direct_iban(iban) || !iban.is_char_boundary(4) {
        return None;
    }
    let value = from_base36(&iban[4..])?;
    if value.bits() > 160 {
        return None;
    }
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    Some(Address::from_slice_padded(&word))
}

/// Checksum address text encoded by a direct IBAN.
pub fn iban_to_checksum_address(iban: &str) -> Option<String> {
    iban_to_address(iban).map(|a| to_checksum_address(&a))
}
