//! Solidity parameter types

use crate::ClientError;

/// Solidity parameter types the harness encodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// Address
    Address,
    /// Unsigned integer with bit size (8, 16, ..., 256)
    Uint(usize),
    /// Signed integer with bit size
    Int(usize),
    /// Boolean
    Bool,
    /// Dynamic bytes
    Bytes,
    /// Fixed-size bytes (size 1-32)
    FixedBytes(usize),
    /// UTF-8 string
    String,
    /// Dynamic array
    Array(Box<ParamType>),
    /// Fixed-size array
    FixedArray(Box<ParamType>, usize),
}

impl ParamType {
    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            _ => false,
        }
    }

    /// Parse a Solidity type string ("uint256", "address", "bytes32[]")
    pub fn parse(s: &str) -> Result<Self, ClientError> {
        if let Some(rest) = s.strip_suffix("[]") {
            return Ok(ParamType::Array(Box::new(Self::parse(rest)?)));
        }
        if s.ends_with(']') {
            let open = s.rfind('[').ok_or_else(|| unsupported(s))?;
            let size: usize = s[open + 1..s.len() - 1]
                .parse()
                .map_err(|_| unsupported(s))?;
            return Ok(ParamType::FixedArray(Box::new(Self::parse(&s[..open])?), size));
        }

        match s {
            "address" => Ok(ParamType::Address),
            "bool" => Ok(ParamType::Bool),
            "string" => Ok(ParamType::String),
            "bytes" => Ok(ParamType::Bytes),
            // Bare uint/int are aliases for the 256-bit forms
            "uint" => Ok(ParamType::Uint(256)),
            "int" => Ok(ParamType::Int(256)),
            _ => {
                if let Some(bits) = s.strip_prefix("uint") {
                    return parse_bits(bits, s).map(ParamType::Uint);
                }
                if let Some(bits) = s.strip_prefix("int") {
                    return parse_bits(bits, s).map(ParamType::Int);
                }
                if let Some(size) = s.strip_prefix("bytes") {
                    let size: usize = size.parse().map_err(|_| unsupported(s))?;
                    if size == 0 || size > 32 {
                        return Err(unsupported(s));
                    }
                    return Ok(ParamType::FixedBytes(size));
                }
                Err(unsupported(s))
            }
        }
    }

    /// Canonical form, as used when computing a function selector
    pub fn canonical(&self) -> String {
        match self {
            ParamType::Address => "address".to_string(),
            ParamType::Uint(bits) => format!("uint{}", bits),
            ParamType::Int(bits) => format!("int{}", bits),
            ParamType::Bool => "bool".to_string(),
            ParamType::Bytes => "bytes".to_string(),
            ParamType::FixedBytes(size) => format!("bytes{}", size),
            ParamType::String => "string".to_string(),
            ParamType::Array(inner) => format!("{}[]", inner.canonical()),
            ParamType::FixedArray(inner, size) => format!("{}[{}]", inner.canonical(), size),
        }
    }
}

fn parse_bits(bits: &str, full: &str) -> Result<usize, ClientError> {
    let bits: usize = bits.parse().map_err(|_| unsupported(full))?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(unsupported(full));
    }
    Ok(bits)
}

fn unsupported(s: &str) -> ClientError {
    ClientError::AbiParse(format!("unsupported parameter type: {}", s))
}
