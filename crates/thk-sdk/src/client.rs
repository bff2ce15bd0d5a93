//! ThkClient - main RPC client

use serde::Serialize;
use serde_json::{json, Map, Value};
use thk_primitives::U256;

use crate::cheque::CashCheque;
use crate::config::ClientConfig;
use crate::transaction::{node_sig_message, sign_message, sign_transaction, Transaction};
use crate::transport::{deserialize_response, MockTransport, Transport};
use crate::types::{Account, ChainStats, SendTxResult, TxResult};
use crate::wallet::Signer;
use crate::SdkError;

#[cfg(feature = "http")]
use crate::transport::HttpTransport;

/// Thinkium client for RPC communication
pub struct ThkClient {
    transport: Box<dyn Transport>,
    config: ClientConfig,
}

impl ThkClient {
    /// Create a client talking HTTP to `config.rpc_url`
    #[cfg(feature = "http")]
    pub fn connect(config: ClientConfig) -> Result<Self, SdkError> {
        let transport = HttpTransport::with_timeout(
            &config.rpc_url,
            std::time::Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self {
            transport: Box::new(transport),
            config,
        })
    }

    /// Create a new client with mock transport (for testing)
    pub fn new_mock() -> Self {
        Self::with_transport(MockTransport::new(), ClientConfig::default())
    }

    /// Create a client with a custom transport
    pub fn with_transport(transport: impl Transport + 'static, config: ClientConfig) -> Self {
        Self {
            transport: Box::new(transport),
            config,
        }
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `params` to `method`, failing on a non-empty `ErrMsg`/`errMsg`.
    async fn request_value(&self, method: &str, params: impl Serialize) -> Result<Value, SdkError> {
        let params = serde_json::to_value(params)?;
        tracing::debug!(method, "rpc request");
        let response = self.transport.request_json(method, params).await?;
        check_err_msg(method, &response)?;
        Ok(response)
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: impl Serialize,
    ) -> Result<T, SdkError> {
        deserialize_response(self.request_value(method, params).await?)
    }

    // ==================== Account Queries ====================

    /// Account state of `address` on `chain_id`
    pub async fn get_account(&self, address: &str, chain_id: &str) -> Result<Account, SdkError> {
        self.request("GetAccount", json!({ "address": address, "chainId": chain_id }))
            .await
    }

    /// Balance of `address` on `chain_id`
    pub async fn get_balance(&self, address: &str, chain_id: &str) -> Result<U256, SdkError> {
        Ok(self.get_account(address, chain_id).await?.balance)
    }

    /// Next nonce of `address` on `chain_id`
    pub async fn get_nonce(&self, address: &str, chain_id: &str) -> Result<u64, SdkError> {
        Ok(self.get_account(address, chain_id).await?.nonce)
    }

    // ==================== Transactions ====================

    /// Sign `tx` with this client's base chain id. See [`sign_transaction`].
    pub fn sign_transaction(
        &self,
        tx: &mut Transaction,
        signer: &dyn Signer,
        cosigners: &[&dyn Signer],
    ) -> Result<(), SdkError> {
        sign_transaction(tx, self.config.base_chain_id, signer, cosigners)
    }

    /// Submit a signed transaction, returning its hash
    pub async fn send_tx(&self, tx: &Transaction) -> Result<String, SdkError> {
        let result: SendTxResult = self.request("SendTx", tx).await?;
        tracing::debug!(hash = %result.tx_hash, "transaction submitted");
        Ok(result.tx_hash)
    }

    /// Execute `tx` without submitting it
    pub async fn call_transaction(&self, tx: &Transaction) -> Result<TxResult, SdkError> {
        self.request("CallTransaction", tx).await
    }

    /// Look up a transaction and its receipt
    pub async fn get_transaction_by_hash(
        &self,
        chain_id: &str,
        hash: &str,
    ) -> Result<TxResult, SdkError> {
        self.request(
            "GetTransactionByHash",
            json!({ "chainId": chain_id, "hash": hash }),
        )
        .await
    }

    // ==================== Chain Info ====================

    /// Statistics of `chain_id`
    pub async fn get_stats(&self, chain_id: &str) -> Result<ChainStats, SdkError> {
        self.request("GetStats", json!({ "chainId": chain_id })).await
    }

    // ==================== Cheques ====================

    /// Proof that a cheque was issued on its source chain
    pub async fn rpc_make_vcc_proof(
        &self,
        cheque: &CashCheque,
    ) -> Result<Map<String, Value>, SdkError> {
        self.request("RpcMakeVccProof", cheque).await
    }

    /// Proof that a cheque was cashed (or expired) on its destination chain
    pub async fn make_ccc_existence_proof(
        &self,
        cheque: &CashCheque,
    ) -> Result<Map<String, Value>, SdkError> {
        self.request("MakeCCCExistenceProof", cheque).await
    }

    // ==================== Node Binding ====================

    /// Signature binding a node to an address. See [`node_sig_message`].
    pub fn get_node_sig(
        &self,
        node_id: &str,
        node_type: &str,
        address: &str,
        nonce: &str,
        amount: &str,
        signer: &dyn Signer,
    ) -> Result<String, SdkError> {
        let message = node_sig_message(node_id, node_type, address, nonce, amount);
        sign_message(&message, signer)
    }
}

/// Fail with [`SdkError::Rpc`] if the response reports an error message.
fn check_err_msg(method: &str, response: &Value) -> Result<(), SdkError> {
    let message = ["ErrMsg", "errMsg"]
        .iter()
        .filter_map(|key| response.get(*key).and_then(Value::as_str))
        .find(|msg| !msg.is_empty());

    if let Some(message) = message {
        tracing::warn!(method, error = message, "rpc returned an error");
        return Err(SdkError::Rpc {
            method: method.to_string(),
            message: message.to_string(),
        });
    }
    Ok(())
}
