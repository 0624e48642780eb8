//! Directive queue: loaded and validated once, never mutated afterwards

use num_bigint::{BigInt, Sign};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;

use solrig_types::hex::parse_h160;
use solrig_types::{ArgValue, Directive, DirectiveKind};

use crate::RunnerError;

/// Ordered, immutable sequence of directives
#[derive(Debug, Clone)]
pub struct DirectiveQueue {
    directives: Vec<Directive>,
}

/// Wire shape of one directive entry
#[derive(Deserialize)]
struct RawDirective {
    name: Option<String>,
    #[serde(rename = "inputVars")]
    input_vars: Option<Vec<Value>>,
    #[serde(rename = "fromAcc")]
    from_acc: Option<String>,
    value: Option<Value>,
}

impl DirectiveQueue {
    /// Load a directive sequence from a JSON file
    pub fn load_file(path: &Path) -> Result<Self, RunnerError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| RunnerError::MalformedInput(format!("{}: {}", path.display(), e)))?;
        Self::load_str(&text)
    }

    /// Load a directive sequence from JSON text
    pub fn load_str(text: &str) -> Result<Self, RunnerError> {
        let raw: Vec<RawDirective> = serde_json::from_str(text)
            .map_err(|e| RunnerError::MalformedInput(e.to_string()))?;

        let mut directives = Vec::with_capacity(raw.len());
        for (index, entry) in raw.into_iter().enumerate() {
            directives.push(convert(index, entry)?);
        }
        validate_order(&directives)?;

        Ok(Self { directives })
    }

    /// Directive count
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Iterate the directives in order
    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.directives.iter()
    }
}

fn convert(index: usize, raw: RawDirective) -> Result<Directive, RunnerError> {
    let name = match raw.name {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(RunnerError::MalformedInput(format!(
                "directive {} is missing a name",
                index
            )))
        }
    };

    // Time/block advances may omit the argument list; everything else
    // must carry one, even if empty.
    let is_advance = name.starts_with("passTime") || name.starts_with("passBlocks");
    let input_args = match raw.input_vars {
        Some(values) => values
            .iter()
            .map(ArgValue::from_json)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| malformed(index, &name, &e.to_string()))?,
        None if is_advance => Vec::new(),
        None => {
            return Err(malformed(index, &name, "missing inputVars"));
        }
    };

    let from_account = match raw.from_acc {
        Some(account) => {
            parse_h160(&account).map_err(|e| malformed(index, &name, &e.to_string()))?
        }
        None => return Err(malformed(index, &name, "missing fromAcc")),
    };

    let value = match raw.value {
        None | Some(Value::Null) => None,
        Some(raw_value) => Some(parse_value(&raw_value).map_err(|e| malformed(index, &name, &e))?),
    };

    Ok(Directive::new(name, input_args, from_account, value))
}

fn parse_value(raw: &Value) -> Result<BigInt, String> {
    let parsed = match ArgValue::from_json(raw).map_err(|e| e.to_string())? {
        ArgValue::Number(n) => n,
        ArgValue::Str(s) => {
            BigInt::from_str(&s).map_err(|_| format!("value is not a decimal integer: {}", s))?
        }
        other => return Err(format!("value must be numeric, got {:?}", other)),
    };
    if parsed.sign() == Sign::Minus {
        return Err(format!("value must not be negative: {}", parsed));
    }
    Ok(parsed)
}

fn malformed(index: usize, name: &str, detail: &str) -> RunnerError {
    RunnerError::MalformedInput(format!("directive {} ({}): {}", index, name, detail))
}

/// The first constructor, when present, must precede every method call
fn validate_order(directives: &[Directive]) -> Result<(), RunnerError> {
    let first_constructor = directives
        .iter()
        .position(|d| d.kind() == DirectiveKind::Constructor);
    let first_call = directives
        .iter()
        .position(|d| d.kind() == DirectiveKind::Call);

    if let (Some(constructor), Some(call)) = (first_constructor, first_call) {
        if call < constructor {
            return Err(RunnerError::MalformedInput(format!(
                "method call at position {} precedes the first constructor at {}",
                call, constructor
            )));
        }
    }
    Ok(())
}
