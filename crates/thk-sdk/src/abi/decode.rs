//! ABI decoding
//!
//! Every region (the top-level argument list, a dynamic array body, a tuple)
//! is decoded with offsets relative to its own start. Pointer and length
//! words are bounds-checked against the region before they are followed.

use thk_primitives::bigint::to_signed;
use thk_primitives::bytes::from_hex;
use thk_primitives::{Address, U256};

use super::types::{ParamType, Token};
use super::AbiError;

/// Selector of `Error(string)`, prefixed to revert outputs.
pub const ERROR_METHOD_ID: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Decode tokens from ABI-encoded data
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    decode_params(types, data)
}

/// Decode function return data
pub fn decode_output(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    decode(types, data)
}

/// Returns true if the hex output of a call starts with the `Error(string)`
/// selector.
pub fn is_error_output(out: &str) -> bool {
    from_hex(out).starts_with(&ERROR_METHOD_ID)
}

/// Revert reason carried by an `Error(string)` output.
pub fn extract_revert_reason(out: &str) -> Result<String, AbiError> {
    let data = from_hex(out);
    if !data.starts_with(&ERROR_METHOD_ID) {
        return Err(AbiError::InvalidData("output is not a revert reason".into()));
    }
    let mut tokens = decode(&[ParamType::String], &data[4..])?;
    match tokens.pop() {
        Some(Token::String(reason)) => Ok(reason),
        _ => Err(AbiError::InvalidData("revert reason is not a string".into())),
    }
}

fn decode_params(types: &[ParamType], region: &[u8]) -> Result<Vec<Token>, AbiError> {
    let mut head = 0;
    let mut tokens = Vec::with_capacity(types.len());

    for param_type in types {
        let token = if param_type.is_dynamic() {
            let offset = read_usize(region, head)?;
            decode_token(param_type, region, offset)?
        } else {
            decode_token(param_type, region, head)?
        };
        tokens.push(token);
        head = head.saturating_add(param_type.head_length());
    }

    Ok(tokens)
}

/// Decode the value whose encoding starts at `offset` in `region`.
fn decode_token(param_type: &ParamType, region: &[u8], offset: usize) -> Result<Token, AbiError> {
    match param_type {
        ParamType::Address => {
            let word = read_word(region, offset)?;
            Ok(Token::Address(Address::from_slice_padded(&word[12..])))
        }
        ParamType::Uint(bits) => {
            let value = U256::from_big_endian(read_word(region, offset)?);
            if value.bits() > *bits {
                return Err(AbiError::IntegerOverflow {
                    ty: param_type.to_string(),
                    value: value.to_string(),
                });
            }
            Ok(Token::Uint(value))
        }
        ParamType::Int(bits) => {
            let value = to_signed(U256::from_big_endian(read_word(region, offset)?));
            if !value.fits_in(*bits) {
                return Err(AbiError::IntegerOverflow {
                    ty: param_type.to_string(),
                    value: value.to_string(),
                });
            }
            Ok(Token::Int(value))
        }
        ParamType::Bool => {
            let word = read_word(region, offset)?;
            if word[..31].iter().any(|b| *b != 0) || word[31] > 1 {
                return Err(AbiError::InvalidData("bool word is neither 0 nor 1".into()));
            }
            Ok(Token::Bool(word[31] == 1))
        }
        ParamType::FixedBytes(size) => {
            let word = read_word(region, offset)?;
            if word[*size..].iter().any(|b| *b != 0) {
                return Err(AbiError::InvalidData(format!(
                    "non-zero padding after {}",
                    param_type
                )));
            }
            Ok(Token::FixedBytes(word[..*size].to_vec()))
        }
        ParamType::Bytes => Ok(Token::Bytes(read_bytes(region, offset)?.to_vec())),
        ParamType::String => {
            let bytes = read_bytes(region, offset)?.to_vec();
            let s = String::from_utf8(bytes)
                .map_err(|e| AbiError::InvalidData(format!("invalid UTF-8: {}", e)))?;
            Ok(Token::String(s))
        }
        ParamType::Array(inner) => {
            let len = read_usize(region, offset)?;
            let body = sub_region(region, offset + 32)?;
            ensure_elements_fit(inner, len, body)?;
            let types = vec![(**inner).clone(); len];
            Ok(Token::Array(decode_params(&types, body)?))
        }
        ParamType::FixedArray(inner, size) => {
            let body = sub_region(region, offset)?;
            ensure_elements_fit(inner, *size, body)?;
            let types = vec![(**inner).clone(); *size];
            Ok(Token::FixedArray(decode_params(&types, body)?))
        }
        ParamType::Tuple(types) => Ok(Token::Tuple(decode_params(
            types,
            sub_region(region, offset)?,
        )?)),
    }
}

/// Heads of `count` elements of `inner` must fit in `body` before any
/// element type list is allocated.
fn ensure_elements_fit(inner: &ParamType, count: usize, body: &[u8]) -> Result<(), AbiError> {
    let needed = count.checked_mul(inner.head_length()).unwrap_or(usize::MAX);
    if needed > body.len() {
        return Err(AbiError::OffsetOutOfRange {
            needed,
            available: body.len(),
        });
    }
    Ok(())
}

fn sub_region(region: &[u8], start: usize) -> Result<&[u8], AbiError> {
    region.get(start..).ok_or(AbiError::OffsetOutOfRange {
        needed: start,
        available: region.len(),
    })
}

fn read_word(region: &[u8], offset: usize) -> Result<&[u8], AbiError> {
    let end = offset.checked_add(32).unwrap_or(usize::MAX);
    region.get(offset..end).ok_or(AbiError::OffsetOutOfRange {
        needed: end,
        available: region.len(),
    })
}

/// A pointer or length word. Values larger than the region cannot be valid.
fn read_usize(region: &[u8], offset: usize) -> Result<usize, AbiError> {
    let value = U256::from_big_endian(read_word(region, offset)?);
    if value > U256::from(region.len()) {
        return Err(AbiError::OffsetOutOfRange {
            needed: if value.bits() <= 64 {
                value.low_u64() as usize
            } else {
                usize::MAX
            },
            available: region.len(),
        });
    }
    Ok(value.as_usize())
}

/// Length-prefixed content at `offset`.
fn read_bytes(region: &[u8], offset: usize) -> Result<&[u8], AbiError> {
    let len = read_usize(region, offset)?;
    let start = offset + 32;
    let end = start + len;
    region.get(start..end).ok_or(AbiError::OffsetOutOfRange {
        needed: end,
        available: region.len(),
    })
}
