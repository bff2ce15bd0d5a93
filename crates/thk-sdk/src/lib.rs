//! # thk-sdk
//!
//! Rust client SDK for Thinkium chains.
//!
//! ## Features
//!
//! - **ThkClient**: RPC client for communicating with Thinkium nodes
//! - **Wallet**: Local key management and the [`Signer`] capability
//! - **Transaction**: JSON transaction form, signing hash and multi-signing
//! - **Cheque**: Cross-chain cheque binary codec
//! - **Contract**: Packing contract calls and unpacking their outputs
//! - **ABI**: Solidity ABI encoding and decoding
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use thk_sdk::{ThkClient, Transaction, Wallet, GasProvider};
//! use thk_primitives::{Address, U256};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a mock client for testing
//!     let client = ThkClient::new_mock();
//!
//!     // Create a wallet
//!     let wallet = Wallet::new_random();
//!     let from = wallet.address().to_hex();
//!     println!("Address: {}", from);
//!
//!     // Get the next nonce
//!     let nonce = client.get_nonce(&from, "1").await?;
//!
//!     // Build, sign and submit a transfer
//!     let to = Address::from_hex("0x33819ba73fb9a63b547815822c044530124bd4b1")?;
//!     let mut tx = Transaction::new("1")
//!         .from(wallet.address())
//!         .to(&to)
//!         .nonce(nonce)
//!         .value(U256::from(1_000_000_000u64))
//!         .with_gas(&GasProvider::default())?;
//!     client.sign_transaction(&mut tx, &wallet, &[])?;
//!     let hash = client.send_tx(&tx).await?;
//!     println!("Sent: {}", hash);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Contract Interaction
//!
//! ```rust,no_run
//! use thk_sdk::{contract, abi::Token, ThkClient, Transaction};
//! use thk_primitives::Address;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ThkClient::new_mock();
//!
//!     let token = Address::from_hex("0x8b95043faa2aa106505a6e133c034ef6003d23a4")?;
//!     let owner = Address::from_hex("0x07f9aaabd576b732486208e21577e01557c297d7")?;
//!     let erc20 = contract::erc20();
//!
//!     let tx = Transaction::new("1").from(&owner).to(&token);
//!     let result = erc20
//!         .call(&client, tx, "balanceOf", &[Token::Address(owner)])
//!         .await?;
//!
//!     let balance = erc20.parse(&result.out, "balanceOf")?;
//!     println!("Balance: {:?}", balance[0]);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
pub mod cheque;
mod client;
pub mod config;
pub mod contract;
mod error;
pub mod transaction;
mod transport;
pub mod types;
mod wallet;

// Re-export main types
pub use cheque::{CashCheck, CashCheque, ChequeError};
pub use client::ThkClient;
pub use config::ClientConfig;
pub use contract::Contract;
pub use error::SdkError;
pub use transaction::{GasProvider, Transaction};
pub use transport::{split_method, MockTransport};

/// Re-export Transport trait for custom implementations
pub use transport::Transport;
pub use wallet::{Signer, Wallet};

#[cfg(feature = "http")]
pub use transport::HttpTransport;

// Re-export primitives for convenience
pub use thk_primitives::{Address, ChainId, H256, Nonce, U256};
