//! # thk-primitives
//!
//! Primitive types for the Thinkium client SDK.
//!
//! This crate provides the fixed-width values (addresses, hashes), the hex
//! codec helpers and the 256-bit integer codec shared by every other crate
//! in the workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;

pub mod bigint;
pub mod bytes;

pub use address::{is_strict_address, to_strict_address, Address, AddressError};
pub use bigint::{BigIntError, I256};
pub use bytes::{bytes_to_fixed, HexError};
pub use error::PrimitiveError;
pub use hash::{Hash, HashError, H256};

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Chain identifier
pub type ChainId = u32;

/// Block height type
pub type BlockHeight = u64;

/// Transaction nonce type
pub type Nonce = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u256_reexport() {
        let a = U256::from(100u64);
        let b = U256::from(200u64);
        assert_eq!(a + b, U256::from(300u64));
    }

    #[test]
    fn test_primitive_error_from_address() {
        let err: PrimitiveError = Address::from_hex("0x12").unwrap_err().into();
        assert!(err.to_string().starts_with("address error"));
    }
}
