//! Contract ABI registry and call-data encoding
//!
//! The ABI descriptor is parsed as data, never evaluated. Method names
//! resolve through a lookup table bound at load time; unknown names are
//! rejected with a clear error.

mod encode;
mod types;

pub use encode::encode_arguments;
pub use types::ParamType;

use serde::Deserialize;
use sha3::{Digest, Keccak256};
use std::collections::HashMap;
use std::path::Path;

use solrig_types::ArgValue;

use crate::ClientError;

/// One callable function bound at ABI-load time
#[derive(Debug, Clone)]
pub struct AbiFunction {
    /// Function name
    pub name: String,
    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub signature: String,
    /// Four-byte selector
    pub selector: [u8; 4],
    /// Input parameter types
    pub inputs: Vec<ParamType>,
}

/// Parsed contract interface: constructor inputs plus a name-to-function table
#[derive(Debug, Clone, Default)]
pub struct ContractAbi {
    constructor_inputs: Vec<ParamType>,
    functions: HashMap<String, AbiFunction>,
}

/// Wire shape of one ABI descriptor entry
#[derive(Deserialize)]
struct AbiEntry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<AbiInput>,
}

#[derive(Deserialize)]
struct AbiInput {
    #[serde(rename = "type")]
    kind: String,
}

impl ContractAbi {
    /// Parse a standard Solidity ABI JSON array
    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        let entries: Vec<AbiEntry> =
            serde_json::from_str(json).map_err(|e| ClientError::AbiParse(e.to_string()))?;

        let mut abi = ContractAbi::default();
        for entry in entries {
            match entry.kind.as_str() {
                "constructor" => {
                    abi.constructor_inputs = parse_inputs(&entry.inputs)?;
                }
                "function" => {
                    let inputs = parse_inputs(&entry.inputs)?;
                    let signature = format!(
                        "{}({})",
                        entry.name,
                        inputs
                            .iter()
                            .map(ParamType::canonical)
                            .collect::<Vec<_>>()
                            .join(",")
                    );
                    let function = AbiFunction {
                        selector: selector(&signature),
                        name: entry.name.clone(),
                        signature,
                        inputs,
                    };
                    // First definition wins for overloaded names
                    abi.functions.entry(entry.name).or_insert(function);
                }
                // events, errors, fallback, receive: nothing to dispatch
                _ => {}
            }
        }
        Ok(abi)
    }

    /// Constructor input types
    pub fn constructor_inputs(&self) -> &[ParamType] {
        &self.constructor_inputs
    }

    /// Look up a callable by name
    pub fn function(&self, name: &str) -> Option<&AbiFunction> {
        self.functions.get(name)
    }

    /// Encode call data for a named method; unknown names are rejected
    pub fn encode_call(&self, name: &str, args: &[ArgValue]) -> Result<Vec<u8>, ClientError> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| ClientError::UnknownMethod(name.to_string()))?;
        let mut data = function.selector.to_vec();
        data.extend(encode_arguments(&function.inputs, args)?);
        Ok(data)
    }

    /// Encode a deployment payload: creation bytecode plus constructor arguments
    pub fn encode_constructor(
        &self,
        bytecode: &[u8],
        args: &[ArgValue],
    ) -> Result<Vec<u8>, ClientError> {
        let mut data = bytecode.to_vec();
        data.extend(encode_arguments(&self.constructor_inputs, args)?);
        Ok(data)
    }
}

fn parse_inputs(inputs: &[AbiInput]) -> Result<Vec<ParamType>, ClientError> {
    inputs.iter().map(|input| ParamType::parse(&input.kind)).collect()
}

/// Keccak-256 selector from a canonical signature
fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest[..4]);
    out
}

/// Contract artifact: parsed interface plus creation bytecode
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    /// Parsed ABI
    pub abi: ContractAbi,
    /// Creation bytecode
    pub bytecode: Vec<u8>,
}

impl ContractArtifact {
    /// Load the ABI descriptor and bytecode from files (bytecode as hex,
    /// `0x` prefix optional)
    pub fn from_files(abi_path: &Path, bytecode_path: &Path) -> Result<Self, ClientError> {
        let abi_json = std::fs::read_to_string(abi_path)
            .map_err(|e| ClientError::AbiParse(format!("{}: {}", abi_path.display(), e)))?;
        let bytecode_hex = std::fs::read_to_string(bytecode_path)
            .map_err(|e| ClientError::AbiParse(format!("{}: {}", bytecode_path.display(), e)))?;
        Self::from_parts(&abi_json, &bytecode_hex)
    }

    /// Build from in-memory ABI JSON and bytecode hex
    pub fn from_parts(abi_json: &str, bytecode_hex: &str) -> Result<Self, ClientError> {
        let abi = ContractAbi::from_json(abi_json)?;
        let trimmed = bytecode_hex.trim();
        let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytecode =
            hex::decode(stripped).map_err(|e| ClientError::InvalidHex(e.to_string()))?;
        Ok(Self { abi, bytecode })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    const ERC20_SLICE: &str = r#"[
        {"type": "constructor", "inputs": [{"name": "supply", "type": "uint256"}]},
        {"type": "function", "name": "transfer", "stateMutability": "nonpayable",
         "inputs": [{"name": "to", "type": "address"}, {"name": "amount", "type": "uint256"}],
         "outputs": [{"name": "", "type": "bool"}]},
        {"type": "function", "name": "balanceOf", "stateMutability": "view",
         "inputs": [{"name": "owner", "type": "address"}],
         "outputs": [{"name": "", "type": "uint256"}]},
        {"type": "event", "name": "Transfer", "inputs": []}
    ]"#;

    #[test]
    fn test_selector_known_vectors() {
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn test_abi_lookup_binds_at_load() {
        let abi = ContractAbi::from_json(ERC20_SLICE).unwrap();

        let transfer = abi.function("transfer").unwrap();
        assert_eq!(transfer.signature, "transfer(address,uint256)");
        assert_eq!(transfer.selector, [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(transfer.inputs.len(), 2);

        assert!(abi.function("Transfer").is_none()); // events do not dispatch
        assert!(abi.function("mint").is_none());
        assert_eq!(abi.constructor_inputs(), &[ParamType::Uint(256)]);
    }

    #[test]
    fn test_abi_encode_call() {
        let abi = ContractAbi::from_json(ERC20_SLICE).unwrap();
        let data = abi
            .encode_call(
                "transfer",
                &[
                    ArgValue::Str("0x742d35cc6634c0532925a3b844bc9e7595f0ab3d".to_string()),
                    ArgValue::Number(BigInt::from(1000)),
                ],
            )
            .unwrap();
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(data.len(), 68);
    }

    #[test]
    fn test_abi_unknown_method() {
        let abi = ContractAbi::from_json(ERC20_SLICE).unwrap();
        let err = abi.encode_call("mint", &[]).unwrap_err();
        assert!(matches!(err, ClientError::UnknownMethod(name) if name == "mint"));
    }

    #[test]
    fn test_abi_encode_constructor() {
        let abi = ContractAbi::from_json(ERC20_SLICE).unwrap();
        let bytecode = vec![0x60, 0x80, 0x60, 0x40];
        let data = abi
            .encode_constructor(&bytecode, &[ArgValue::Number(BigInt::from(5))])
            .unwrap();
        assert_eq!(&data[..4], &bytecode[..]);
        assert_eq!(data.len(), 36);
        assert_eq!(data[35], 5);
    }

    #[test]
    fn test_abi_rejects_malformed_json() {
        assert!(ContractAbi::from_json("not json").is_err());
        assert!(ContractAbi::from_json(r#"[{"type": "function", "name": "f",
            "inputs": [{"type": "tuple"}]}]"#).is_err());
    }

    #[test]
    fn test_artifact_from_parts() {
        let artifact = ContractArtifact::from_parts(ERC20_SLICE, "0x6080\n").unwrap();
        assert_eq!(artifact.bytecode, vec![0x60, 0x80]);
        assert!(artifact.abi.function("transfer").is_some());
    }
}
