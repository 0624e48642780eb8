//! Client error types and failure classification

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport/network error
    #[error("transport error: {0}")]
    Transport(String),

    /// RPC error from the node
    #[error("RPC error: {code} - {message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },

    /// The node's reply could not be interpreted
    #[error("invalid JSON RPC response: \"{0}\"")]
    InvalidResponse(String),

    /// The transaction landed but reverted
    #[error("transaction {hash} was reverted by the EVM")]
    Reverted {
        /// Hash of the reverted transaction
        hash: String,
    },

    /// No receipt materialized within the bounded polling window
    #[error("no receipt for transaction {hash} after {attempts} attempts")]
    NoReceipt {
        /// Hash of the submitted transaction
        hash: String,
        /// Polling attempts made
        attempts: usize,
    },

    /// Invalid hex string
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Method name with no entry in the contract interface
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// ABI encoding error
    #[error("ABI encoding error: {0}")]
    AbiEncode(String),

    /// Malformed ABI descriptor
    #[error("malformed ABI descriptor: {0}")]
    AbiParse(String),
}

impl From<solrig_types::TypeError> for ClientError {
    fn from(e: solrig_types::TypeError) -> Self {
        ClientError::InvalidHex(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Serialization(e.to_string())
    }
}

/// What a failed submission means for the execution loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Sender balance below the transfer value
    InsufficientFunds,
    /// The transaction ran out of gas
    OutOfGas,
    /// The transaction landed but reverted
    Revert,
    /// The reply could not be interpreted; the transaction may still have
    /// been mined
    InvalidResponse,
    /// Anything else; not recoverable
    Fatal,
}

impl ClientError {
    /// Classify this failure by inspecting its description.
    ///
    /// Node-raised messages are matched by content, never by position.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ClientError::Reverted { .. } => FailureKind::Revert,
            ClientError::InvalidResponse(_) | ClientError::NoReceipt { .. } => {
                FailureKind::InvalidResponse
            }
            ClientError::Rpc { message, .. } => classify_message(message),
            ClientError::Transport(message) => classify_message(message),
            _ => FailureKind::Fatal,
        }
    }
}

fn classify_message(message: &str) -> FailureKind {
    let lower = message.to_ascii_lowercase();
    if lower.contains("sender doesn't have enough funds") {
        FailureKind::InsufficientFunds
    } else if lower.contains("out of gas") {
        FailureKind::OutOfGas
    } else if lower.contains("revert") {
        FailureKind::Revert
    } else if lower.trim().is_empty() {
        FailureKind::InvalidResponse
    } else {
        FailureKind::Fatal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpc(message: &str) -> ClientError {
        ClientError::Rpc {
            code: -32000,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_classify_out_of_gas() {
        let err = rpc("VM Exception while processing transaction: out of gas");
        assert_eq!(err.failure_kind(), FailureKind::OutOfGas);
    }

    #[test]
    fn test_classify_revert() {
        let err = rpc("VM Exception while processing transaction: revert");
        assert_eq!(err.failure_kind(), FailureKind::Revert);

        let err = ClientError::Reverted {
            hash: "0xabc".to_string(),
        };
        assert_eq!(err.failure_kind(), FailureKind::Revert);
    }

    #[test]
    fn test_classify_insufficient_funds() {
        let err = rpc(
            "sender doesn't have enough funds to send tx. The upfront cost is: 100 \
             and the sender's account only has: 1",
        );
        assert_eq!(err.failure_kind(), FailureKind::InsufficientFunds);
    }

    #[test]
    fn test_classify_invalid_response() {
        let err = ClientError::InvalidResponse(String::new());
        assert_eq!(err.failure_kind(), FailureKind::InvalidResponse);

        let err = ClientError::NoReceipt {
            hash: "0xabc".to_string(),
            attempts: 10,
        };
        assert_eq!(err.failure_kind(), FailureKind::InvalidResponse);
    }

    #[test]
    fn test_classify_fatal() {
        let err = rpc("nonce too low");
        assert_eq!(err.failure_kind(), FailureKind::Fatal);

        let err = ClientError::UnknownMethod("frobnicate".to_string());
        assert_eq!(err.failure_kind(), FailureKind::Fatal);
    }
}
