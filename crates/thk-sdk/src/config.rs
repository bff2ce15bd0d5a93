//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use thk_primitives::bigint::parse_big256;

use crate::transaction::{GasProvider, DEFAULT_BASE_CHAIN_ID};
use crate::SdkError;

/// Client configuration, usually read from a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// RPC endpoint URL
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Offset added to the chain id in signing hashes
    #[serde(default = "default_base_chain_id")]
    pub base_chain_id: u64,
    /// Chain used when a call does not name one
    #[serde(default = "default_chain_id")]
    pub default_chain_id: String,
    /// Gas limit written into `extra` by [`ClientConfig::default_gas`]
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    /// Gas price, decimal
    #[serde(default = "default_gas_price")]
    pub gas_price: String,
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:8089".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_base_chain_id() -> u64 {
    DEFAULT_BASE_CHAIN_ID
}

fn default_chain_id() -> String {
    "1".to_string()
}

fn default_gas_limit() -> u64 {
    25000
}

fn default_gas_price() -> String {
    "400000000".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            timeout_secs: default_timeout_secs(),
            base_chain_id: default_base_chain_id(),
            default_chain_id: default_chain_id(),
            gas_limit: default_gas_limit(),
            gas_price: default_gas_price(),
        }
    }
}

impl ClientConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, SdkError> {
        toml::from_str(content).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Read and parse a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SdkError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, SdkError> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Gas parameters built from `gas_limit` and `gas_price`
    pub fn default_gas(&self) -> Result<GasProvider, SdkError> {
        let gas_price = parse_big256(&self.gas_price).map_err(|_| SdkError::InvalidNumber {
            field: "gas_price",
            value: self.gas_price.clone(),
        })?;
        Ok(GasProvider {
            kind: 0,
            gas: self.gas_limit,
            gas_price,
        })
    }
}
