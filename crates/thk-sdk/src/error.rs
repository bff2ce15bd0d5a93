//! SDK error types

use thiserror::Error;

use crate::abi::AbiError;
use crate::cheque::ChequeError;

/// SDK error type
#[derive(Debug, Error)]
pub enum SdkError {
    /// Transport/network error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Error reported by the node in a response's `ErrMsg`/`errMsg` field
    #[error("RPC error from {method}: {message}")]
    Rpc {
        /// Method that failed
        method: String,
        /// Message returned by the node
        message: String,
    },

    /// Invalid private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// ABI packing or unpacking error
    #[error("ABI error: {0}")]
    Abi(#[from] AbiError),

    /// Cheque encoding or decoding error
    #[error("Cheque error: {0}")]
    Cheque(#[from] ChequeError),

    /// Numeric transaction field that does not parse
    #[error("Invalid number in {field}: {value:?}")]
    InvalidNumber {
        /// Field name
        field: &'static str,
        /// Offending text
        value: String,
    },

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Primitive type error
    #[error("Primitive error: {0}")]
    Primitive(#[from] thk_primitives::PrimitiveError),
}

impl From<hex::FromHexError> for SdkError {
    fn from(e: hex::FromHexError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}

impl From<thk_crypto::CryptoError> for SdkError {
    fn from(e: thk_crypto::CryptoError) -> Self {
        SdkError::SigningFailed(e.to_string())
    }
}
