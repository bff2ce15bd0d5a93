//! ABI encoding
//!
//! Arguments are checked against their declared types before any byte is
//! written, so a failed pack never yields partial output.

use thk_primitives::bigint::to_unsigned;
use thk_primitives::U256;

use super::types::{ParamType, Token};
use super::AbiError;

/// Encode `tokens` as the values of `types`.
pub fn encode(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    if types.len() != tokens.len() {
        return Err(AbiError::ArgumentCountMismatch {
            expected: types.len(),
            got: tokens.len(),
        });
    }
    for (param_type, token) in types.iter().zip(tokens) {
        validate(param_type, token)?;
    }
    Ok(encode_params(types, tokens))
}

/// Encode function call (selector + params)
pub fn encode_function_call(
    selector: [u8; 4],
    types: &[ParamType],
    tokens: &[Token],
) -> Result<Vec<u8>, AbiError> {
    let mut result = selector.to_vec();
    result.extend(encode(types, tokens)?);
    Ok(result)
}

/// Compute function selector (first 4 bytes of keccak256(signature))
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = thk_crypto::keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}

fn mismatch(param_type: &ParamType, token: &Token) -> AbiError {
    AbiError::ArgumentTypeMismatch {
        expected: param_type.to_string(),
        got: token.kind(),
    }
}

/// Check that `token` can be encoded as `param_type`.
fn validate(param_type: &ParamType, token: &Token) -> Result<(), AbiError> {
    match (param_type, token) {
        (ParamType::Address, Token::Address(_))
        | (ParamType::Bool, Token::Bool(_))
        | (ParamType::Bytes, Token::Bytes(_))
        | (ParamType::String, Token::String(_)) => Ok(()),
        (ParamType::Uint(bits), Token::Uint(value)) => {
            if value.bits() > *bits {
                return Err(AbiError::IntegerOverflow {
                    ty: param_type.to_string(),
                    value: value.to_string(),
                });
            }
            Ok(())
        }
        (ParamType::Int(bits), Token::Int(value)) => {
            if !value.fits_in(*bits) {
                return Err(AbiError::IntegerOverflow {
                    ty: param_type.to_string(),
                    value: value.to_string(),
                });
            }
            Ok(())
        }
        (ParamType::FixedBytes(size), Token::FixedBytes(data)) => {
            if data.len() != *size {
                return Err(mismatch(param_type, token));
            }
            Ok(())
        }
        (ParamType::Array(inner), Token::Array(tokens)) => {
            tokens.iter().try_for_each(|t| validate(inner, t))
        }
        (ParamType::FixedArray(inner, size), Token::FixedArray(tokens)) => {
            if tokens.len() != *size {
                return Err(AbiError::ArrayLengthMismatch {
                    expected: *size,
                    got: tokens.len(),
                });
            }
            tokens.iter().try_for_each(|t| validate(inner, t))
        }
        (ParamType::Tuple(types), Token::Tuple(tokens)) => {
            if types.len() != tokens.len() {
                return Err(AbiError::ArgumentCountMismatch {
                    expected: types.len(),
                    got: tokens.len(),
                });
            }
            types
                .iter()
                .zip(tokens)
                .try_for_each(|(t, v)| validate(t, v))
        }
        _ => Err(mismatch(param_type, token)),
    }
}

/// Head/tail layout of one region. Offsets are relative to the region start.
fn encode_params(types: &[ParamType], tokens: &[Token]) -> Vec<u8> {
    let head_size: usize = types.iter().map(ParamType::head_length).sum();

    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for (param_type, token) in types.iter().zip(tokens) {
        if param_type.is_dynamic() {
            head.extend_from_slice(&word(&U256::from(head_size + tail.len())));
            tail.extend(encode_token(param_type, token));
        } else {
            head.extend(encode_token(param_type, token));
        }
    }

    head.extend(tail);
    head
}

fn encode_token(param_type: &ParamType, token: &Token) -> Vec<u8> {
    match (param_type, token) {
        (ParamType::Address, Token::Address(addr)) => {
            let mut buf = [0u8; 32];
            buf[12..].copy_from_slice(addr.as_bytes());
            buf.to_vec()
        }
        (ParamType::Uint(_), Token::Uint(value)) => word(value).to_vec(),
        (ParamType::Int(_), Token::Int(value)) => word(&to_unsigned(*value)).to_vec(),
        (ParamType::Bool, Token::Bool(b)) => word(&U256::from(u8::from(*b))).to_vec(),
        (ParamType::FixedBytes(_), Token::FixedBytes(data)) => {
            let mut buf = [0u8; 32];
            buf[..data.len()].copy_from_slice(data);
            buf.to_vec()
        }
        (ParamType::Bytes, Token::Bytes(data)) => encode_bytes(data),
        (ParamType::String, Token::String(s)) => encode_bytes(s.as_bytes()),
        (ParamType::Array(inner), Token::Array(tokens)) => {
            let mut result = word(&U256::from(tokens.len())).to_vec();
            let inner_types = vec![(**inner).clone(); tokens.len()];
            result.extend(encode_params(&inner_types, tokens));
            result
        }
        (ParamType::FixedArray(inner, _), Token::FixedArray(tokens)) => {
            let inner_types = vec![(**inner).clone(); tokens.len()];
            encode_params(&inner_types, tokens)
        }
        (ParamType::Tuple(types), Token::Tuple(tokens)) => encode_params(types, tokens),
        // unreachable after validate()
        _ => Vec::new(),
    }
}

fn word(value: &U256) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    bytes
}

/// Length word, then content right-padded to a word boundary.
fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut result = word(&U256::from(data.len())).to_vec();
    let padded_len = data.len().div_ceil(32) * 32;
    result.extend_from_slice(data);
    result.resize(32 + padded_len, 0);
    result
}
