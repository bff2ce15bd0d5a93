//! ABI encoding and decoding for Solidity contracts
//!
//! This module provides functionality for:
//! - Parsing JSON ABI descriptions
//! - Packing function arguments into call data
//! - Unpacking return values and event data
//! - Extracting revert reasons
//!
//! # Example
//!
//! ```rust
//! use thk_sdk::abi::{decode, encode, function_selector, ParamType, Token};
//! use thk_primitives::Address;
//!
//! let selector = function_selector("transfer(address,uint256)");
//! assert_eq!(selector, [0xa9, 0x05, 0x9c, 0xbb]);
//!
//! let types = [ParamType::Address, ParamType::Uint(256)];
//! let args = [Token::Address(Address::ZERO), Token::uint(1000)];
//! let data = encode(&types, &args).unwrap();
//! assert_eq!(decode(&types, &data).unwrap(), args);
//! ```

mod decode;
mod encode;
mod error;
mod json;
mod types;

pub use decode::{
    decode, decode_output, extract_revert_reason, is_error_output, ERROR_METHOD_ID,
};
pub use encode::{encode, encode_function_call, function_selector};
pub use error::AbiError;
pub use json::{Abi, Event, Function, Param};
pub use types::{ParamType, Token};
