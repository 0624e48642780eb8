//! Call directives and their argument values

use num_bigint::BigInt;
use primitive_types::H160;
use serde_json::Value;
use std::str::FromStr;

use crate::TypeError;

/// One directive argument.
///
/// Numeric arguments keep arbitrary precision: they are parsed straight from
/// the JSON literal and never pass through a float.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Integer of unbounded precision
    Number(BigInt),
    /// String (also used for addresses and hex-encoded byte payloads)
    Str(String),
    /// Boolean
    Bool(bool),
    /// Nested sequence of values
    List(Vec<ArgValue>),
}

impl ArgValue {
    /// Convert a JSON value into an argument value.
    ///
    /// Only exact integers are accepted as numbers; fractional or exponent
    /// literals are rejected so precision is never silently lost.
    pub fn from_json(value: &Value) -> Result<Self, TypeError> {
        match value {
            Value::Number(n) => {
                let literal = n.to_string();
                let parsed = BigInt::from_str(&literal).map_err(|_| {
                    TypeError::InvalidArgument(format!(
                        "non-integer numeric literal: {}",
                        literal
                    ))
                })?;
                Ok(ArgValue::Number(parsed))
            }
            Value::String(s) => Ok(ArgValue::Str(s.clone())),
            Value::Bool(b) => Ok(ArgValue::Bool(*b)),
            Value::Array(items) => {
                let parsed = items
                    .iter()
                    .map(Self::from_json)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ArgValue::List(parsed))
            }
            other => Err(TypeError::InvalidArgument(format!(
                "unsupported argument value: {}",
                other
            ))),
        }
    }

    /// Render back to JSON, for raw RPC parameters.
    pub fn to_json(&self) -> Value {
        match self {
            // A decimal BigInt rendering is always a valid JSON number, and
            // the arbitrary-precision number representation keeps it intact
            ArgValue::Number(n) => n
                .to_string()
                .parse::<serde_json::Number>()
                .map(Value::Number)
                .unwrap_or_else(|_| Value::String(n.to_string())),
            ArgValue::Str(s) => Value::String(s.clone()),
            ArgValue::Bool(b) => Value::Bool(*b),
            ArgValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }
}

/// How a directive is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// Deploy a fresh contract instance
    Constructor,
    /// Advance the node clock, no contract call
    PassTime,
    /// Mine an empty block, no contract call
    PassBlocks,
    /// Regular method call against the deployed instance
    Call,
}

/// One planned contract interaction
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    /// Method name; `constructor` and the `passTime`/`passBlocks` prefixes
    /// select deployment and time/block-advance behavior
    pub name: String,
    /// Ordered call arguments
    pub input_args: Vec<ArgValue>,
    /// Sending account
    pub from_account: H160,
    /// Amount transferred with the call, in wei
    pub value: Option<BigInt>,
}

impl Directive {
    /// Create a directive
    pub fn new(
        name: impl Into<String>,
        input_args: Vec<ArgValue>,
        from_account: H160,
        value: Option<BigInt>,
    ) -> Self {
        Self {
            name: name.into(),
            input_args,
            from_account,
            value,
        }
    }

    /// Classify the directive by its name
    pub fn kind(&self) -> DirectiveKind {
        if self.name == "constructor" {
            DirectiveKind::Constructor
        } else if self.name.starts_with("passTime") {
            DirectiveKind::PassTime
        } else if self.name.starts_with("passBlocks") {
            DirectiveKind::PassBlocks
        } else {
            DirectiveKind::Call
        }
    }
}
