//! Transport layer for JSON-RPC communication

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::ClientError;

/// Transport trait for RPC communication (object-safe)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an RPC request and get the JSON result
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, ClientError>;
}

/// Helper to deserialize an RPC result
pub fn deserialize_response<T: serde::de::DeserializeOwned>(
    value: Value,
) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::Serialization(e.to_string()))
}

/// One scripted mock reply
#[derive(Debug, Clone)]
enum MockReply {
    Result(Value),
    Error { code: i64, message: String },
}

/// Mock transport for testing.
///
/// Replies are served from per-method FIFO queues first, then from the
/// default table. Every request is recorded so tests can assert which
/// methods were (or were not) reached, and in what order.
pub struct MockTransport {
    queues: Mutex<HashMap<String, VecDeque<MockReply>>>,
    defaults: Mutex<HashMap<String, Value>>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

/// Transaction hash served by the mock for submissions without a scripted reply
pub const MOCK_TX_HASH: &str =
    "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";

/// Contract address served by the mock deployment receipt
pub const MOCK_CONTRACT_ADDRESS: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";

impl MockTransport {
    /// Create a new mock transport with working defaults for a happy-path run
    pub fn new() -> Self {
        let mut defaults = HashMap::new();

        defaults.insert(
            "eth_getBlockByNumber".to_string(),
            json!({"number": "0x1", "gasLimit": "0x1c9c380", "transactions": []}),
        );
        defaults.insert("eth_estimateGas".to_string(), json!("0x5208")); // 21000
        defaults.insert("eth_sendTransaction".to_string(), json!(MOCK_TX_HASH));
        defaults.insert(
            "eth_getTransactionReceipt".to_string(),
            json!({
                "transactionHash": MOCK_TX_HASH,
                "status": "0x1",
                "contractAddress": MOCK_CONTRACT_ADDRESS,
            }),
        );
        defaults.insert(
            "debug_traceTransaction".to_string(),
            json!({"gas": 21000, "returnValue": "", "structLogs": []}),
        );
        defaults.insert("evm_increaseTime".to_string(), json!("0x0"));
        defaults.insert("evm_mine".to_string(), json!("0x0"));

        Self {
            queues: Mutex::new(HashMap::new()),
            defaults: Mutex::new(defaults),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply for a method; queued replies are consumed
    /// in FIFO order before the default is used
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn push_result(&self, method: &str, response: Value) {
        self.queues
            .lock()
            .expect("MockTransport mutex poisoned")
            .entry(method.to_string())
            .or_default()
            .push_back(MockReply::Result(response));
    }

    /// Queue an RPC error reply for a method
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn push_error(&self, method: &str, code: i64, message: &str) {
        self.queues
            .lock()
            .expect("MockTransport mutex poisoned")
            .entry(method.to_string())
            .or_default()
            .push_back(MockReply::Error {
                code,
                message: message.to_string(),
            });
    }

    /// Replace the default reply for a method
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn set_default(&self, method: &str, response: Value) {
        self.defaults
            .lock()
            .expect("MockTransport mutex poisoned")
            .insert(method.to_string(), response);
    }

    /// All requests seen so far, in order
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls
            .lock()
            .expect("MockTransport mutex poisoned")
            .clone()
    }

    /// How many times a method has been requested
    pub fn call_count(&self, method: &str) -> usize {
        self.calls()
            .iter()
            .filter(|(name, _)| name == method)
            .count()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, ClientError> {
        self.calls
            .lock()
            .map_err(|_| ClientError::Transport("MockTransport mutex poisoned".to_string()))?
            .push((method.to_string(), params));

        let queued = self
            .queues
            .lock()
            .map_err(|_| ClientError::Transport("MockTransport mutex poisoned".to_string()))?
            .get_mut(method)
            .and_then(VecDeque::pop_front);

        if let Some(reply) = queued {
            return match reply {
                MockReply::Result(value) => Ok(value),
                MockReply::Error { code, message } => Err(ClientError::Rpc { code, message }),
            };
        }

        let default_response = self
            .defaults
            .lock()
            .map_err(|_| ClientError::Transport("MockTransport mutex poisoned".to_string()))?
            .get(method)
            .cloned();

        if let Some(response) = default_response {
            return Ok(response);
        }

        Err(ClientError::Rpc {
            code: -32601,
            message: format!("Method not found: {}", method),
        })
    }
}

/// HTTP transport for real RPC communication
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    request_id: std::sync::atomic::AtomicU64,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
            request_id: std::sync::atomic::AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> u64 {
        self.request_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, ClientError> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": self.next_id(),
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        // A reply the node produced but the client cannot decode is the
        // ambiguous case: the transaction may still have been processed.
        let response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(ClientError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(response.result)
    }
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcResponse {
    // Null results are legitimate (e.g. a receipt that is not mined yet)
    #[serde(default)]
    result: Value,
    error: Option<JsonRpcError>,
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_default_responses() {
        let transport = MockTransport::new();

        let result = transport
            .request_json("eth_estimateGas", vec![])
            .await
            .unwrap();
        assert_eq!(result, Value::String("0x5208".to_string()));
    }

    #[tokio::test]
    async fn test_mock_transport_queue_then_default() {
        let transport = MockTransport::new();
        transport.push_result("eth_estimateGas", json!("0x100"));

        let first = transport
            .request_json("eth_estimateGas", vec![])
            .await
            .unwrap();
        assert_eq!(first, json!("0x100"));

        // Queue exhausted, falls back to the default
        let second = transport
            .request_json("eth_estimateGas", vec![])
            .await
            .unwrap();
        assert_eq!(second, json!("0x5208"));
    }

    #[tokio::test]
    async fn test_mock_transport_error_reply() {
        let transport = MockTransport::new();
        transport.push_error("eth_sendTransaction", -32000, "out of gas");

        let err = transport
            .request_json("eth_sendTransaction", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Rpc { code: -32000, .. }));
    }

    #[tokio::test]
    async fn test_mock_transport_records_calls() {
        let transport = MockTransport::new();
        transport
            .request_json("evm_mine", vec![json!(1)])
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "evm_mine");
        assert_eq!(calls[0].1, vec![json!(1)]);
        assert_eq!(transport.call_count("evm_mine"), 1);
        assert_eq!(transport.call_count("evm_increaseTime"), 0);
    }

    #[tokio::test]
    async fn test_mock_transport_unknown_method() {
        let transport = MockTransport::new();
        let result = transport.request_json("unknown_method", vec![]).await;
        assert!(result.is_err());
    }
}
