//! Client-side request and response types

use num_bigint::BigInt;
use primitive_types::{H160, H256};
use serde::{Deserialize, Serialize};
use solrig_types::hex::{format_h160, format_quantity, parse_h160, parse_h256, parse_quantity};
use solrig_types::TypeError;

/// Write call submitted through `eth_sendTransaction`
#[derive(Debug, Clone)]
pub struct MethodCall {
    /// Sending account
    pub from: H160,
    /// Deployed contract address
    pub to: H160,
    /// ABI-encoded call data
    pub data: Vec<u8>,
    /// Amount transferred with the call, in wei
    pub value: Option<BigInt>,
    /// Explicit gas limit; the node picks its default when absent
    pub gas: Option<u64>,
}

impl MethodCall {
    /// The same call resubmitted with an explicit gas limit
    pub fn with_gas(&self, gas: u64) -> Self {
        Self {
            gas: Some(gas),
            ..self.clone()
        }
    }
}

/// Wire form of a transaction parameter object
#[derive(Debug, Clone, Default)]
pub struct TxParams {
    /// Sender address
    pub from: Option<H160>,
    /// Recipient address (absent for contract creation)
    pub to: Option<H160>,
    /// Gas limit
    pub gas: Option<u64>,
    /// Value to transfer
    pub value: Option<BigInt>,
    /// Input data
    pub data: Option<Vec<u8>>,
}

impl Serialize for TxParams {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        // Count non-None fields
        let mut count = 0;
        if self.from.is_some() {
            count += 1;
        }
        if self.to.is_some() {
            count += 1;
        }
        if self.gas.is_some() {
            count += 1;
        }
        if self.value.is_some() {
            count += 1;
        }
        if self.data.is_some() {
            count += 1;
        }

        let mut map = serializer.serialize_map(Some(count))?;

        if let Some(from) = &self.from {
            map.serialize_entry("from", &format_h160(from))?;
        }
        if let Some(to) = &self.to {
            map.serialize_entry("to", &format_h160(to))?;
        }
        if let Some(gas) = &self.gas {
            map.serialize_entry("gas", &format_quantity(*gas))?;
        }
        if let Some(value) = &self.value {
            map.serialize_entry("value", &format!("0x{}", value.to_str_radix(16)))?;
        }
        if let Some(data) = &self.data {
            map.serialize_entry("data", &format!("0x{}", hex::encode(data)))?;
        }

        map.end()
    }
}

impl From<&MethodCall> for TxParams {
    fn from(call: &MethodCall) -> Self {
        Self {
            from: Some(call.from),
            to: Some(call.to),
            gas: call.gas,
            value: call.value.clone(),
            data: Some(call.data.clone()),
        }
    }
}

/// Pending deployment: the hash is known before mining completes
#[derive(Debug, Clone)]
pub struct PendingDeploy {
    /// Deployment transaction hash
    pub transaction_hash: H256,
}

/// Outcome of a confirmed method call
#[derive(Debug, Clone)]
pub struct CallOutcome {
    /// Hash of the mined transaction
    pub transaction_hash: H256,
    /// Whether the transaction executed without reverting
    pub success: bool,
}

/// Transaction receipt fields the harness needs
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawReceipt")]
pub struct TxReceipt {
    /// Hash of the mined transaction
    pub transaction_hash: H256,
    /// Execution status
    pub status: bool,
    /// Address of the created contract, for deployments
    pub contract_address: Option<H160>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    contract_address: Option<String>,
}

impl TryFrom<RawReceipt> for TxReceipt {
    type Error = TypeError;

    fn try_from(raw: RawReceipt) -> Result<Self, Self::Error> {
        let status = match raw.status.as_deref() {
            Some(status) => parse_quantity(status)? == 1,
            // Pre-Byzantium receipts carry no status field
            None => true,
        };
        Ok(Self {
            transaction_hash: parse_h256(&raw.transaction_hash)?,
            status,
            contract_address: raw
                .contract_address
                .as_deref()
                .map(parse_h160)
                .transpose()?,
        })
    }
}
