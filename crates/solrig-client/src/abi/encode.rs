//! Solidity ABI call-data encoding
//!
//! Head/tail layout per the ABI specification, driven by the parsed
//! parameter types against directive argument values.

use num_bigint::{BigInt, Sign};
use std::str::FromStr;

use solrig_types::hex::parse_h160;
use solrig_types::ArgValue;

use super::types::ParamType;
use crate::ClientError;

/// Encode an argument list against its parameter types
pub fn encode_arguments(types: &[ParamType], args: &[ArgValue]) -> Result<Vec<u8>, ClientError> {
    if types.len() != args.len() {
        return Err(ClientError::AbiEncode(format!(
            "expected {} arguments, got {}",
            types.len(),
            args.len()
        )));
    }

    let head_size: usize = types.iter().map(head_length).sum();
    let mut head = Vec::new();
    let mut tail = Vec::new();

    for (param_type, arg) in types.iter().zip(args.iter()) {
        if param_type.is_dynamic() {
            // Offset into the tail, then the actual data
            head.extend(encode_usize(head_size + tail.len()));
            tail.extend(encode_value(param_type, arg)?);
        } else {
            head.extend(encode_value(param_type, arg)?);
        }
    }

    head.extend(tail);
    Ok(head)
}

/// Head slot width for a type
fn head_length(param_type: &ParamType) -> usize {
    match param_type {
        ParamType::FixedArray(inner, size) if !inner.is_dynamic() => head_length(inner) * size,
        _ => 32,
    }
}

fn encode_value(param_type: &ParamType, arg: &ArgValue) -> Result<Vec<u8>, ClientError> {
    match (param_type, arg) {
        (ParamType::Address, ArgValue::Str(s)) => {
            let address = parse_h160(s)
                .map_err(|e| ClientError::AbiEncode(format!("bad address {}: {}", s, e)))?;
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(address.as_bytes());
            Ok(word.to_vec())
        }
        (ParamType::Uint(bits), arg) => {
            let n = numeric(arg)?;
            if n.sign() == Sign::Minus || n.bits() as usize > *bits {
                return Err(out_of_range(&n, param_type));
            }
            Ok(bigint_word(&n).to_vec())
        }
        (ParamType::Int(bits), arg) => {
            let n = numeric(arg)?;
            let bound = BigInt::from(1) << (bits - 1);
            if n >= bound || n < -&bound {
                return Err(out_of_range(&n, param_type));
            }
            Ok(bigint_word(&n).to_vec())
        }
        (ParamType::Bool, ArgValue::Bool(b)) => {
            let mut word = [0u8; 32];
            word[31] = u8::from(*b);
            Ok(word.to_vec())
        }
        (ParamType::String, ArgValue::Str(s)) => Ok(encode_bytes(s.as_bytes())),
        (ParamType::Bytes, ArgValue::Str(s)) => {
            let data = decode_hex_payload(s)?;
            Ok(encode_bytes(&data))
        }
        (ParamType::FixedBytes(size), ArgValue::Str(s)) => {
            let data = decode_hex_payload(s)?;
            if data.len() > *size {
                return Err(ClientError::AbiEncode(format!(
                    "{} bytes do not fit in {}",
                    data.len(),
                    param_type.canonical()
                )));
            }
            let mut word = [0u8; 32];
            word[..data.len()].copy_from_slice(&data);
            Ok(word.to_vec())
        }
        (ParamType::Array(inner), ArgValue::List(items)) => {
            let mut out = encode_usize(items.len());
            let types = vec![(**inner).clone(); items.len()];
            out.extend(encode_arguments(&types, items)?);
            Ok(out)
        }
        (ParamType::FixedArray(inner, size), ArgValue::List(items)) => {
            if items.len() != *size {
                return Err(ClientError::AbiEncode(format!(
                    "expected {} elements for {}, got {}",
                    size,
                    param_type.canonical(),
                    items.len()
                )));
            }
            let types = vec![(**inner).clone(); items.len()];
            encode_arguments(&types, items)
        }
        (param_type, arg) => Err(ClientError::AbiEncode(format!(
            "cannot encode {:?} as {}",
            arg,
            param_type.canonical()
        ))),
    }
}

/// Numeric coercion: generators emit big values as decimal strings
fn numeric(arg: &ArgValue) -> Result<BigInt, ClientError> {
    match arg {
        ArgValue::Number(n) => Ok(n.clone()),
        ArgValue::Str(s) => BigInt::from_str(s)
            .map_err(|_| ClientError::AbiEncode(format!("not a decimal integer: {}", s))),
        other => Err(ClientError::AbiEncode(format!(
            "expected a numeric value, got {:?}",
            other
        ))),
    }
}

/// Two's complement over 2^256, big-endian
fn bigint_word(n: &BigInt) -> [u8; 32] {
    let two256 = BigInt::from(1) << 256;
    let mut m: BigInt = n % &two256;
    if m.sign() == Sign::Minus {
        m += &two256;
    }
    let (_, bytes) = m.to_bytes_be();
    let mut word = [0u8; 32];
    word[32 - bytes.len()..].copy_from_slice(&bytes);
    word
}

fn encode_usize(value: usize) -> Vec<u8> {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&(value as u64).to_be_bytes());
    word.to_vec()
}

/// Length word followed by right-padded data
fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut out = encode_usize(data.len());
    out.extend_from_slice(data);
    let remainder = data.len() % 32;
    if remainder != 0 {
        out.extend(std::iter::repeat(0u8).take(32 - remainder));
    }
    out
}

fn decode_hex_payload(s: &str) -> Result<Vec<u8>, ClientError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(stripped).map_err(|e| ClientError::AbiEncode(format!("bad hex payload: {}", e)))
}

fn out_of_range(n: &BigInt, param_type: &ParamType) -> ClientError {
    ClientError::AbiEncode(format!("{} out of range for {}", n, param_type.canonical()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: i64) -> ArgValue {
        ArgValue::Number(BigInt::from(n))
    }

    #[test]
    fn test_encode_uint() {
        let encoded = encode_arguments(&[ParamType::Uint(256)], &[num(1)]).unwrap();
        let mut expected = [0u8; 32];
        expected[31] = 1;
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_encode_uint_from_decimal_string() {
        let encoded = encode_arguments(
            &[ParamType::Uint(256)],
            &[ArgValue::Str("255".to_string())],
        )
        .unwrap();
        assert_eq!(encoded[31], 0xff);
    }

    #[test]
    fn test_encode_uint_range_check() {
        assert!(encode_arguments(&[ParamType::Uint(8)], &[num(255)]).is_ok());
        assert!(encode_arguments(&[ParamType::Uint(8)], &[num(256)]).is_err());
        assert!(encode_arguments(&[ParamType::Uint(8)], &[num(-1)]).is_err());
    }

    #[test]
    fn test_encode_negative_int() {
        let encoded = encode_arguments(&[ParamType::Int(256)], &[num(-1)]).unwrap();
        assert_eq!(encoded, [0xffu8; 32]);

        let encoded = encode_arguments(&[ParamType::Int(8)], &[num(-128)]).unwrap();
        assert_eq!(encoded[31], 0x80);
        assert_eq!(encoded[0], 0xff);
        assert!(encode_arguments(&[ParamType::Int(8)], &[num(-129)]).is_err());
        assert!(encode_arguments(&[ParamType::Int(8)], &[num(128)]).is_err());
    }

    #[test]
    fn test_encode_bool_and_address() {
        let encoded = encode_arguments(
            &[ParamType::Bool, ParamType::Address],
            &[
                ArgValue::Bool(true),
                ArgValue::Str("0x742d35cc6634c0532925a3b844bc9e7595f0ab3d".to_string()),
            ],
        )
        .unwrap();
        assert_eq!(encoded.len(), 64);
        assert_eq!(encoded[31], 1);
        assert_eq!(&encoded[44..64], &hex::decode("742d35cc6634c0532925a3b844bc9e7595f0ab3d").unwrap()[..]);
    }

    #[test]
    fn test_encode_string() {
        let encoded = encode_arguments(
            &[ParamType::String],
            &[ArgValue::Str("hello".to_string())],
        )
        .unwrap();
        // offset word, length word, one padded data word
        assert_eq!(encoded.len(), 96);
        assert_eq!(encoded[31], 0x20);
        assert_eq!(encoded[63], 5);
        assert_eq!(&encoded[64..69], b"hello");
        assert!(encoded[69..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_encode_dynamic_array() {
        let encoded = encode_arguments(
            &[ParamType::Array(Box::new(ParamType::Uint(256)))],
            &[ArgValue::List(vec![num(1), num(2)])],
        )
        .unwrap();
        // offset, length, two elements
        assert_eq!(encoded.len(), 128);
        assert_eq!(encoded[31], 0x20);
        assert_eq!(encoded[63], 2);
        assert_eq!(encoded[95], 1);
        assert_eq!(encoded[127], 2);
    }

    #[test]
    fn test_encode_static_head_offsets() {
        // (uint256, string): the string offset counts both head slots
        let encoded = encode_arguments(
            &[ParamType::Uint(256), ParamType::String],
            &[num(7), ArgValue::Str("x".to_string())],
        )
        .unwrap();
        assert_eq!(encoded[31], 7);
        assert_eq!(encoded[63], 0x40);
        assert_eq!(encoded[95], 1);
    }

    #[test]
    fn test_encode_arity_mismatch() {
        let err = encode_arguments(&[ParamType::Uint(256)], &[]).unwrap_err();
        assert!(matches!(err, ClientError::AbiEncode(_)));
    }

    #[test]
    fn test_encode_type_mismatch() {
        assert!(encode_arguments(&[ParamType::Bool], &[num(1)]).is_err());
        assert!(
            encode_arguments(&[ParamType::Uint(256)], &[ArgValue::Bool(true)]).is_err()
        );
    }

    #[test]
    fn test_encode_fixed_bytes() {
        let encoded = encode_arguments(
            &[ParamType::FixedBytes(4)],
            &[ArgValue::Str("0xdeadbeef".to_string())],
        )
        .unwrap();
        assert_eq!(&encoded[..4], &[0xde, 0xad, 0xbe, 0xef]);
        assert!(encoded[4..].iter().all(|b| *b == 0));
    }
}
