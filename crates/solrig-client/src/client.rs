//! LedgerClient - typed RPC surface the execution loop drives

use async_trait::async_trait;
use primitive_types::{H160, H256};
use serde_json::{json, Value};
use std::sync::Arc;

use solrig_types::hex::{format_h256, parse_h256, parse_quantity};
use solrig_types::{ArgValue, BlockInfo, TransactionTrace};

use crate::transport::{deserialize_response, MockTransport, Transport};
use crate::types::{CallOutcome, MethodCall, PendingDeploy, TxParams, TxReceipt};
use crate::ClientError;

#[cfg(feature = "http")]
use crate::transport::HttpTransport;

/// Bounded receipt polling per submitted transaction
const RECEIPT_POLL_ATTEMPTS: usize = 10;

/// Ledger client for RPC communication with the simulator node
pub struct LedgerClient {
    transport: Arc<dyn Transport>,
}

impl LedgerClient {
    /// Create a new client with HTTP transport
    #[cfg(feature = "http")]
    pub fn connect(url: &str) -> Self {
        Self {
            transport: Arc::new(HttpTransport::new(url)),
        }
    }

    /// Create a new client with mock transport (for testing)
    pub fn new_mock() -> Self {
        Self {
            transport: Arc::new(MockTransport::new()),
        }
    }

    /// Create a client over a shared transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Helper method to make an RPC request and deserialize the result
    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, ClientError> {
        let value = self.transport.request_json(method, params).await?;
        deserialize_response(value)
    }

    // ==================== Blocks ====================

    /// Fetch the latest block snapshot
    pub async fn latest_block(&self) -> Result<BlockInfo, ClientError> {
        self.request("eth_getBlockByNumber", vec![json!("latest"), json!(false)])
            .await
    }

    // ==================== Deployment ====================

    /// Estimate gas for a contract deployment payload
    pub async fn estimate_deploy_gas(&self, from: &H160, data: &[u8]) -> Result<u64, ClientError> {
        let params = TxParams {
            from: Some(*from),
            data: Some(data.to_vec()),
            ..Default::default()
        };
        let result: String = self
            .request("eth_estimateGas", vec![serde_json::to_value(&params)?])
            .await?;
        Ok(parse_quantity(&result)?)
    }

    /// Submit a deployment.
    ///
    /// Returns as soon as the node accepts the transaction; pair with
    /// [`confirm_deploy`](Self::confirm_deploy) to await mining.
    pub async fn deploy(
        &self,
        from: &H160,
        data: &[u8],
        gas: u64,
    ) -> Result<PendingDeploy, ClientError> {
        let params = TxParams {
            from: Some(*from),
            data: Some(data.to_vec()),
            gas: Some(gas),
            ..Default::default()
        };
        let result: String = self
            .request("eth_sendTransaction", vec![serde_json::to_value(&params)?])
            .await?;
        Ok(PendingDeploy {
            transaction_hash: parse_h256(&result)?,
        })
    }

    /// Await the deployment receipt and return the new contract address
    pub async fn confirm_deploy(&self, pending: &PendingDeploy) -> Result<H160, ClientError> {
        let receipt = self.wait_receipt(&pending.transaction_hash).await?;
        receipt.contract_address.ok_or_else(|| {
            ClientError::InvalidResponse(format!(
                "deployment receipt for {} carries no contract address",
                format_h256(&pending.transaction_hash)
            ))
        })
    }

    // ==================== Method calls ====================

    /// Submit a method call and await its receipt.
    ///
    /// Fails for on-chain reverts, out-of-gas conditions, and replies the
    /// client cannot interpret; callers classify the failure through
    /// [`ClientError::failure_kind`].
    pub async fn call(&self, call: &MethodCall) -> Result<CallOutcome, ClientError> {
        let params = TxParams::from(call);
        let result: String = self
            .request("eth_sendTransaction", vec![serde_json::to_value(&params)?])
            .await?;
        let hash = parse_h256(&result)?;

        let receipt = self.wait_receipt(&hash).await?;
        if !receipt.status {
            return Err(ClientError::Reverted {
                hash: format_h256(&hash),
            });
        }

        Ok(CallOutcome {
            transaction_hash: hash,
            success: true,
        })
    }

    async fn wait_receipt(&self, hash: &H256) -> Result<TxReceipt, ClientError> {
        for _ in 0..RECEIPT_POLL_ATTEMPTS {
            let receipt: Option<TxReceipt> = self
                .request(
                    "eth_getTransactionReceipt",
                    vec![json!(format_h256(hash))],
                )
                .await?;
            if let Some(receipt) = receipt {
                return Ok(receipt);
            }
        }
        Err(ClientError::NoReceipt {
            hash: format_h256(hash),
            attempts: RECEIPT_POLL_ATTEMPTS,
        })
    }

    // ==================== Time and block advance ====================

    /// Advance the node clock.
    ///
    /// Submitted without awaiting the reply; failures are logged at debug
    /// level and dropped.
    pub fn advance_time(&self, args: &[ArgValue]) {
        let params: Vec<Value> = args.iter().map(ArgValue::to_json).collect();
        self.fire_and_forget("evm_increaseTime", params);
    }

    /// Mine one empty block.
    ///
    /// Submitted without awaiting the reply; failures are logged at debug
    /// level and dropped.
    pub fn mine_block(&self) {
        self.fire_and_forget("evm_mine", vec![]);
    }

    fn fire_and_forget(&self, method: &'static str, params: Vec<Value>) {
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            if let Err(err) = transport.request_json(method, params).await {
                tracing::debug!("{} dropped: {}", method, err);
            }
        });
    }
}

/// Structured execution log access, one transaction at a time
#[async_trait]
pub trait TraceProvider: Send + Sync {
    /// Fetch the execution trace for a mined transaction
    async fn transaction_trace(&self, hash: &H256) -> Result<TransactionTrace, ClientError>;
}

#[async_trait]
impl TraceProvider for LedgerClient {
    async fn transaction_trace(&self, hash: &H256) -> Result<TransactionTrace, ClientError> {
        self.request(
            "debug_traceTransaction",
            vec![json!(format_h256(hash)), json!({})],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MOCK_CONTRACT_ADDRESS, MOCK_TX_HASH};
    use solrig_types::hex::format_h160;

    #[tokio::test]
    async fn test_client_mock_latest_block() {
        let client = LedgerClient::new_mock();
        let block = client.latest_block().await.unwrap();
        assert_eq!(block.number, 1);
        assert_eq!(block.gas_limit, 30_000_000);
        assert!(block.transactions.is_empty());
    }

    #[tokio::test]
    async fn test_client_mock_estimate_gas() {
        let client = LedgerClient::new_mock();
        let gas = client
            .estimate_deploy_gas(&H160::zero(), &[0x60, 0x80])
            .await
            .unwrap();
        assert_eq!(gas, 21_000);
    }

    #[tokio::test]
    async fn test_client_mock_deploy_and_confirm() {
        let client = LedgerClient::new_mock();
        let pending = client
            .deploy(&H160::zero(), &[0x60, 0x80], 21_001)
            .await
            .unwrap();
        assert_eq!(format_h256(&pending.transaction_hash), MOCK_TX_HASH);

        let address = client.confirm_deploy(&pending).await.unwrap();
        assert_eq!(format_h160(&address), MOCK_CONTRACT_ADDRESS);
    }

    #[tokio::test]
    async fn test_client_call_success() {
        let client = LedgerClient::new_mock();
        let call = MethodCall {
            from: H160::zero(),
            to: H160::zero(),
            data: vec![0xa9, 0x05, 0x9c, 0xbb],
            value: None,
            gas: None,
        };
        let outcome = client.call(&call).await.unwrap();
        assert!(outcome.success);
        assert_eq!(format_h256(&outcome.transaction_hash), MOCK_TX_HASH);
    }

    #[tokio::test]
    async fn test_client_call_reverted_receipt() {
        let mock = Arc::new(MockTransport::new());
        mock.push_result(
            "eth_getTransactionReceipt",
            serde_json::json!({"transactionHash": MOCK_TX_HASH, "status": "0x0"}),
        );
        let client = LedgerClient::with_transport(mock);

        let call = MethodCall {
            from: H160::zero(),
            to: H160::zero(),
            data: vec![],
            value: None,
            gas: None,
        };
        let err = client.call(&call).await.unwrap_err();
        assert!(matches!(err, ClientError::Reverted { .. }));
        assert_eq!(err.failure_kind(), crate::FailureKind::Revert);
    }

    #[tokio::test]
    async fn test_client_call_no_receipt() {
        let mock = Arc::new(MockTransport::new());
        mock.set_default("eth_getTransactionReceipt", Value::Null);
        let client = LedgerClient::with_transport(mock.clone());

        let call = MethodCall {
            from: H160::zero(),
            to: H160::zero(),
            data: vec![],
            value: None,
            gas: None,
        };
        let err = client.call(&call).await.unwrap_err();
        assert!(matches!(err, ClientError::NoReceipt { attempts: 10, .. }));
        assert_eq!(mock.call_count("eth_getTransactionReceipt"), 10);
    }

    #[tokio::test]
    async fn test_client_trace_provider() {
        let mock = Arc::new(MockTransport::new());
        mock.push_result(
            "debug_traceTransaction",
            serde_json::json!({
                "gas": 31000,
                "returnValue": "",
                "structLogs": [
                    {"pc": 0, "op": "PUSH1", "gas": 78888, "gasCost": 3, "depth": 1, "stack": []}
                ]
            }),
        );
        let client = LedgerClient::with_transport(mock.clone());

        let hash = H256::repeat_byte(0x11);
        let trace = client.transaction_trace(&hash).await.unwrap();
        assert_eq!(trace.struct_logs.len(), 1);
        assert_eq!(trace.struct_logs[0].op, "PUSH1");

        // The hash travels as the first RPC parameter
        let calls = mock.calls();
        assert_eq!(calls[0].1[0], json!(format_h256(&hash)));
    }

    #[tokio::test]
    async fn test_client_fire_and_forget() {
        let mock = Arc::new(MockTransport::new());
        let client = LedgerClient::with_transport(mock.clone());

        client.advance_time(&[ArgValue::Number(3600.into())]);
        client.mine_block();

        // Spawned submissions run once the test future yields
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(mock.call_count("evm_increaseTime"), 1);
        assert_eq!(mock.call_count("evm_mine"), 1);

        let calls = mock.calls();
        let (_, params) = calls
            .iter()
            .find(|(m, _)| m == "evm_increaseTime")
            .unwrap();
        assert_eq!(params[0].to_string(), "3600");
    }
}
