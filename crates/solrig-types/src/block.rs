//! Block metadata consumed by the execution loop

use primitive_types::H256;
use serde::Deserialize;

use crate::hex::{parse_h256, parse_quantity};
use crate::TypeError;

/// Latest-block snapshot: number, gas limit, and mined transaction hashes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawBlockInfo")]
pub struct BlockInfo {
    /// Block number
    pub number: u64,
    /// Block gas limit
    pub gas_limit: u64,
    /// Hashes of the transactions mined in this block
    pub transactions: Vec<H256>,
}

/// Wire shape: the node encodes quantities as hex strings
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlockInfo {
    number: String,
    gas_limit: String,
    #[serde(default)]
    transactions: Vec<String>,
}

impl TryFrom<RawBlockInfo> for BlockInfo {
    type Error = TypeError;

    fn try_from(raw: RawBlockInfo) -> Result<Self, Self::Error> {
        Ok(Self {
            number: parse_quantity(&raw.number)?,
            gas_limit: parse_quantity(&raw.gas_limit)?,
            transactions: raw
                .transactions
                .iter()
                .map(|t| parse_h256(t))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_info_deserialize() {
        let raw = json!({
            "number": "0x2a",
            "gasLimit": "0x1c9c380",
            "transactions": [format!("0x{}", "11".repeat(32))],
        });

        let block: BlockInfo = serde_json::from_value(raw).unwrap();
        assert_eq!(block.number, 42);
        assert_eq!(block.gas_limit, 30_000_000);
        assert_eq!(block.transactions.len(), 1);
    }

    #[test]
    fn test_block_info_empty_transactions() {
        let raw = json!({"number": "0x0", "gasLimit": "0x0"});
        let block: BlockInfo = serde_json::from_value(raw).unwrap();
        assert!(block.transactions.is_empty());
    }

    #[test]
    fn test_block_info_bad_quantity() {
        let raw = json!({"number": "not-hex", "gasLimit": "0x0"});
        assert!(serde_json::from_value::<BlockInfo>(raw).is_err());
    }
}
