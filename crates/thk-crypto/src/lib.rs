//! # thk-crypto
//!
//! Cryptographic primitives for the Thinkium client SDK.
//!
//! - Keccak-256 hashing
//! - ECDSA signing/verification (secp256k1) with 65-byte `r || s || v` output
//! - Public key recovery and address derivation
//! - Checksum and IBAN address text forms

#![warn(missing_docs)]
#![warn(clippy::all)]

mod checksum;
mod error;
mod hash;
mod signature;

pub mod iban;

pub use checksum::{is_checksum_address, to_checksum_address};
pub use error::CryptoError;
pub use hash::{hash256_concat, keccak256};
pub use signature::{
    public_key_bytes, public_key_to_address, recover_public_key, sign, verify, PrivateKey,
    PublicKey, Signature,
};
