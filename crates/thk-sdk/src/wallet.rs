//! Signing capability and a local-key wallet

use thk_crypto::{keccak256, public_key_bytes, public_key_to_address, sign, PrivateKey, PublicKey};
use thk_primitives::{Address, H256};
use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::SdkError;

/// Something that can sign 32-byte digests.
///
/// Signers are always passed explicitly to the operations that need them.
pub trait Signer: Send + Sync {
    /// 65-byte `r || s || v` signature of `digest`, with `v` in {0, 1}
    fn sign_digest(&self, digest: &H256) -> Result<Vec<u8>, SdkError>;

    /// 65-byte uncompressed public key
    fn public_key_bytes(&self) -> Vec<u8>;
}

/// Wallet holding a secp256k1 private key in memory
///
/// Note: Clone is intentionally not implemented to prevent accidental key duplication.
/// Use `from_private_key` to create a new wallet with the same key if needed.
pub struct Wallet {
    private_key: PrivateKey,
    address: Address,
}

impl Wallet {
    /// Create a new random wallet
    pub fn new_random() -> Self {
        let private_key = SigningKey::random(&mut OsRng);
        let address = public_key_to_address(private_key.verifying_key());

        Self {
            private_key,
            address,
        }
    }

    /// Create a wallet from a 32-byte private key
    pub fn from_private_key(key: &[u8; 32]) -> Result<Self, SdkError> {
        let private_key = SigningKey::from_slice(key)
            .map_err(|e| SdkError::InvalidPrivateKey(e.to_string()))?;
        let address = public_key_to_address(private_key.verifying_key());

        Ok(Self {
            private_key,
            address,
        })
    }

    /// Create a wallet from a hex-encoded private key
    ///
    /// Accepts both with and without "0x" prefix.
    pub fn from_private_key_hex(hex: &str) -> Result<Self, SdkError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let mut bytes = hex::decode(hex)?;
        if bytes.len() != 32 {
            bytes.zeroize();
            return Err(SdkError::InvalidPrivateKey(format!(
                "Expected 32 bytes, got {}",
                bytes.len()
            )));
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        bytes.zeroize();

        let result = Self::from_private_key(&key);
        key.zeroize();
        result
    }

    /// Get the wallet's address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Get the wallet's public key
    pub fn public_key(&self) -> &PublicKey {
        self.private_key.verifying_key()
    }

    /// Sign the keccak-256 of `message`
    pub fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, SdkError> {
        self.sign_digest(&keccak256(message))
    }
}

impl Signer for Wallet {
    fn sign_digest(&self, digest: &H256) -> Result<Vec<u8>, SdkError> {
        let signature =
            sign(digest, &self.private_key).map_err(|e| SdkError::SigningFailed(e.to_string()))?;
        Ok(signature.to_bytes().to_vec())
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        public_key_bytes(self.public_key())
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
