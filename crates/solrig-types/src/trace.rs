//! Execution traces returned by the node's debug interface

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One step of the VM execution log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructLog {
    /// Program counter
    pub pc: u64,
    /// Opcode mnemonic
    pub op: String,
    /// Gas remaining before the step
    pub gas: u64,
    /// Gas cost of the step
    pub gas_cost: u64,
    /// Call depth
    pub depth: u64,
    /// Stack contents, hex words
    #[serde(default)]
    pub stack: Vec<String>,
    /// Memory contents, when the tracer includes them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<Vec<String>>,
    /// Touched storage slots, when the tracer includes them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<BTreeMap<String, String>>,
    /// Step-level error, e.g. an out-of-gas halt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Structured execution log for one transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionTrace {
    /// Total gas used
    #[serde(default)]
    pub gas: u64,
    /// Hex-encoded return value
    #[serde(default)]
    pub return_value: String,
    /// Per-step execution log
    #[serde(default)]
    pub struct_logs: Vec<StructLog>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trace_deserialize() {
        let raw = json!({
            "gas": 21432,
            "returnValue": "",
            "structLogs": [
                {"pc": 0, "op": "PUSH1", "gas": 78888, "gasCost": 3, "depth": 1, "stack": []},
                {"pc": 2, "op": "MSTORE", "gas": 78885, "gasCost": 12, "depth": 1,
                 "stack": ["0x60", "0x40"]},
            ]
        });

        let trace: TransactionTrace = serde_json::from_value(raw).unwrap();
        assert_eq!(trace.gas, 21432);
        assert_eq!(trace.struct_logs.len(), 2);
        assert_eq!(trace.struct_logs[1].op, "MSTORE");
        assert_eq!(trace.struct_logs[1].stack, vec!["0x60", "0x40"]);
        assert!(trace.struct_logs[0].memory.is_none());
    }

    #[test]
    fn test_trace_roundtrip_skips_absent_fields() {
        let log = StructLog {
            pc: 0,
            op: "STOP".to_string(),
            gas: 100,
            gas_cost: 0,
            depth: 1,
            stack: vec![],
            memory: None,
            storage: None,
            error: None,
        };
        let json = serde_json::to_value(&log).unwrap();
        assert!(json.get("memory").is_none());
        assert!(json.get("storage").is_none());
        assert_eq!(json.get("gasCost").unwrap(), 0);
    }
}
