//! Transport layer for RPC communication
//!
//! Requests are JSON bodies of the form `{"method": m, "params": p}`. A
//! method written as `/path:Method` is posted to `url + /path` with `Method`
//! as the method name.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::SdkError;

/// Transport trait for RPC communication (object-safe)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an RPC request and get JSON response
    async fn request_json(&self, method: &str, params: Value) -> Result<Value, SdkError>;
}

/// Split `/path:Method` into the URL path and the method name.
///
/// Methods without exactly one `:` have an empty path.
pub fn split_method(method: &str) -> (&str, &str) {
    let mut parts = method.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(path), Some(name), None) => (path, name),
        _ => ("", method),
    }
}

/// Helper to deserialize response
pub fn deserialize_response<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, SdkError> {
    serde_json::from_value(value).map_err(|e| SdkError::Serialization(e.to_string()))
}

/// Mock transport for testing
///
/// Replies with canned responses and records every request it receives.
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, Value>>>,
    default_responses: Arc<Mutex<HashMap<String, Value>>>,
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        let mut defaults = HashMap::new();

        defaults.insert(
            "GetAccount".to_string(),
            serde_json::json!({
                "address": "0x0000000000000000000000000000000000000000",
                "nonce": 0,
                "balance": 0,
            }),
        );
        defaults.insert(
            "SendTx".to_string(),
            serde_json::json!({
                "TXhash": "0x26ec7b670d1466ff523c9ec8fd8dc2750483ce7c429130c8a4aed7a650f57810",
            }),
        );
        defaults.insert(
            "CallTransaction".to_string(),
            serde_json::json!({ "status": 1, "out": "0x" }),
        );

        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_responses: Arc::new(Mutex::new(defaults)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a mock response for a specific method
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (only possible if another thread panicked while holding the lock).
    pub fn set_response(&self, method: &str, response: Value) {
        // Using expect here is acceptable as mutex poisoning indicates a serious bug
        // that should not be silently ignored in tests
        self.responses
            .lock()
            .expect("MockTransport mutex poisoned")
            .insert(method.to_string(), response);
    }

    /// Clear custom responses
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn clear_responses(&self) {
        self.responses
            .lock()
            .expect("MockTransport mutex poisoned")
            .clear();
    }

    /// Every request received so far, as `(method, params)`
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests
            .lock()
            .expect("MockTransport mutex poisoned")
            .clone()
    }

    /// Number of requests received for `method`
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn request_count(&self, method: &str) -> usize {
        self.requests
            .lock()
            .expect("MockTransport mutex poisoned")
            .iter()
            .filter(|(m, _)| m == method)
            .count()
    }

    /// A handle sharing this mock's responses and request log
    pub fn handle(&self) -> Self {
        Self {
            responses: Arc::clone(&self.responses),
            default_responses: Arc::clone(&self.default_responses),
            requests: Arc::clone(&self.requests),
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request_json(&self, method: &str, params: Value) -> Result<Value, SdkError> {
        self.requests
            .lock()
            .map_err(|_| SdkError::Transport("MockTransport mutex poisoned".to_string()))?
            .push((method.to_string(), params));

        // Check custom responses first
        let custom_response = self
            .responses
            .lock()
            .map_err(|_| SdkError::Transport("MockTransport mutex poisoned".to_string()))?
            .get(method)
            .cloned();

        if let Some(response) = custom_response {
            return Ok(response);
        }

        let default_response = self
            .default_responses
            .lock()
            .map_err(|_| SdkError::Transport("MockTransport mutex poisoned".to_string()))?
            .get(method)
            .cloned();

        default_response
            .ok_or_else(|| SdkError::Transport(format!("no mock response for {}", method)))
    }
}

/// HTTP transport for real RPC communication
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a transport whose requests time out after `timeout`
    pub fn with_timeout(url: &str, timeout: std::time::Duration) -> Result<Self, SdkError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SdkError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
        })
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn request_json(&self, method: &str, params: Value) -> Result<Value, SdkError> {
        let (path, name) = split_method(method);
        let url = format!("{}{}", self.url, path);
        let request = serde_json::json!({
            "method": name,
            "params": params,
        });

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, %status, "non-success HTTP status");
        }

        response
            .json()
            .await
            .map_err(|e| SdkError::Transport(format!("{} ({})", e, status)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_method() {
        assert_eq!(split_method("GetAccount"), ("", "GetAccount"));
        assert_eq!(split_method("/chaininfo:Ping"), ("/chaininfo", "Ping"));
        assert_eq!(split_method("a:b:c"), ("", "a:b:c"));
    }

    #[tokio::test]
    async fn test_mock_transport_default_responses() {
        let transport = MockTransport::new();
        let result = transport.request_json("SendTx", json!({})).await.unwrap();
        assert!(result["TXhash"].is_string());
    }

    #[tokio::test]
    async fn test_mock_transport_custom_response() {
        let transport = MockTransport::new();
        transport.set_response("GetStats", json!({"chainId": 2}));

        let result = transport
            .request_json("GetStats", json!({"chainId": "2"}))
            .await
            .unwrap();
        assert_eq!(result["chainId"], 2);
    }

    #[tokio::test]
    async fn test_mock_transport_records_requests() {
        let transport = MockTransport::new();
        let handle = transport.handle();
        transport
            .request_json("GetAccount", json!({"address": "0x01", "chainId": "1"}))
            .await
            .unwrap();

        assert_eq!(handle.request_count("GetAccount"), 1);
        let requests = handle.requests();
        assert_eq!(requests[0].0, "GetAccount");
        assert_eq!(requests[0].1["chainId"], "1");
    }

    #[tokio::test]
    async fn test_mock_transport_unknown_method() {
        let transport = MockTransport::new();
        let result = transport.request_json("unknown_method", json!(null)).await;
        assert!(matches!(result, Err(SdkError::Transport(_))));
        // still recorded
        assert_eq!(transport.request_count("unknown_method"), 1);
    }
}
