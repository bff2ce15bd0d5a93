//! ABI errors

use thiserror::Error;

/// Errors raised while parsing ABI descriptions or packing/unpacking values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// Unrecognised type string
    #[error("cannot parse ABI type {0:?}")]
    TypeParse(String),

    /// Malformed ABI JSON
    #[error("invalid ABI JSON: {0}")]
    Json(String),

    /// Wrong number of arguments (top level or inside a tuple)
    #[error("argument count mismatch: expected {expected}, got {got}")]
    ArgumentCountMismatch {
        /// Declared arity
        expected: usize,
        /// Supplied arity
        got: usize,
    },

    /// Value does not match the declared type
    #[error("argument type mismatch: expected {expected}, got {got}")]
    ArgumentTypeMismatch {
        /// Declared type
        expected: String,
        /// Type of the supplied value
        got: String,
    },

    /// Integer does not fit the declared width
    #[error("integer overflow: {value} does not fit {ty}")]
    IntegerOverflow {
        /// Declared type
        ty: String,
        /// Offending value
        value: String,
    },

    /// Fixed-size array with the wrong number of elements
    #[error("array length mismatch: expected {expected}, got {got}")]
    ArrayLengthMismatch {
        /// Declared length
        expected: usize,
        /// Supplied length
        got: usize,
    },

    /// Read past the end of the encoded data
    #[error("offset out of range: need {needed} bytes, have {available}")]
    OffsetOutOfRange {
        /// Bytes required
        needed: usize,
        /// Bytes available
        available: usize,
    },

    /// Encoded data violates a type rule
    #[error("invalid encoded data: {0}")]
    InvalidData(String),

    /// Method not present in the ABI
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// Event not present in the ABI
    #[error("unknown event: {0}")]
    UnknownEvent(String),
}
