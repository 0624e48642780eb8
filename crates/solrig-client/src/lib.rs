//! # solrig-client
//!
//! JSON-RPC ledger client for the SolRig harness.
//!
//! ## Features
//!
//! - **LedgerClient**: typed wrapper over the simulator node's RPC surface
//!   (blocks, gas estimation, deployment, method calls, time/block advance)
//! - **TraceProvider**: structured execution logs via the debug interface
//! - **ContractAbi / ContractArtifact**: method registry bound at ABI-load
//!   time and call-data encoding
//! - **Transport**: object-safe RPC seam with HTTP and mock implementations
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use solrig_client::LedgerClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LedgerClient::new_mock();
//!
//!     let block = client.latest_block().await?;
//!     println!("head: #{} (gas limit {})", block.number, block.gas_limit);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
mod client;
mod error;
mod transport;
mod types;

pub use client::{LedgerClient, TraceProvider};
pub use error::{ClientError, FailureKind};
pub use transport::{MockTransport, Transport, MOCK_CONTRACT_ADDRESS, MOCK_TX_HASH};
pub use types::{CallOutcome, MethodCall, PendingDeploy, TxParams, TxReceipt};

#[cfg(feature = "http")]
pub use transport::HttpTransport;
