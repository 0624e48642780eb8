//! Hex parsing and formatting helpers shared by the client and the CLI

use primitive_types::{H160, H256};

use crate::TypeError;

/// Parse a 20-byte account address from a hex string, `0x` prefix optional
pub fn parse_h160(s: &str) -> Result<H160, TypeError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(stripped).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
    if bytes.len() != 20 {
        return Err(TypeError::InvalidLength {
            expected: 20,
            got: bytes.len(),
        });
    }
    Ok(H160::from_slice(&bytes))
}

/// Parse a 32-byte hash from a hex string, `0x` prefix optional
pub fn parse_h256(s: &str) -> Result<H256, TypeError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(stripped).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
    if bytes.len() != 32 {
        return Err(TypeError::InvalidLength {
            expected: 32,
            got: bytes.len(),
        });
    }
    Ok(H256::from_slice(&bytes))
}

/// Parse a hex quantity ("0x1c9c380") into a u64
pub fn parse_quantity(s: &str) -> Result<u64, TypeError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(stripped, 16).map_err(|_| TypeError::InvalidQuantity(s.to_string()))
}

/// Format an address as 0x-prefixed lowercase hex
pub fn format_h160(address: &H160) -> String {
    format!("0x{}", hex::encode(address.as_bytes()))
}

/// Format a hash as 0x-prefixed lowercase hex
pub fn format_h256(hash: &H256) -> String {
    format!("0x{}", hex::encode(hash.as_bytes()))
}

/// Format a u64 as a minimal hex quantity
pub fn format_quantity(value: u64) -> String {
    format!("0x{:x}", value)
}
