//! Runner error types

use solrig_client::ClientError;
use thiserror::Error;

/// Runner error type
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Directive input rejected before execution starts
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A submission failed outside the recoverable classifications
    #[error("unrecoverable client failure: {0}")]
    Unrecoverable(ClientError),

    /// An RPC interaction around the call path failed (block, receipt, or
    /// trace fetch)
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The same transaction was traced twice in a row
    #[error("duplicate execution trace at directive {index}; confirmation appears stuck")]
    DuplicateTrace {
        /// Position of the offending directive
        index: usize,
    },

    /// A method call arrived with no deployed contract instance
    #[error("no deployed contract for method call {method:?}")]
    NoContract {
        /// Name of the method the directive asked for
        method: String,
    },

    /// Confirmation polling found no transaction to reconcile against
    #[error("no transaction to trace in block {block} after confirmation polling")]
    ConfirmationFailed {
        /// Number of the last observed block
        block: u64,
    },

    /// Result splice position out of bounds
    #[error("splice position {position} beyond {len} collected records")]
    SplicePosition {
        /// Requested insertion position
        position: usize,
        /// Records collected so far
        len: usize,
    },

    /// Output write failure
    #[error("output write failed: {0}")]
    Sink(#[from] std::io::Error),
}
