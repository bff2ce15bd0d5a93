//! Common error types for primitives

use crate::address::AddressError;
use crate::bigint::BigIntError;
use crate::bytes::HexError;
use crate::hash::HashError;
use thiserror::Error;

/// Primitive operation error
#[derive(Debug, Error)]
pub enum PrimitiveError {
    /// Address error
    #[error("address error: {0}")]
    Address(#[from] AddressError),

    /// Hash error
    #[error("hash error: {0}")]
    Hash(#[from] HashError),

    /// Hex decoding error
    #[error("hex error: {0}")]
    Hex(#[from] HexError),

    /// Big integer error
    #[error("integer error: {0}")]
    BigInt(#[from] BigIntError),
}
