//! Per-directive output records

use serde::{Serialize, Serializer};
use std::fmt;

use crate::trace::StructLog;

/// Trace cell for one processed directive.
///
/// Serializes as either the nested step log, or a bare string for the
/// placeholder forms, so the trace artifact keeps the per-step shape for
/// real calls.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceRecord {
    /// Full execution log of the resolved transaction
    Steps(Vec<StructLog>),
    /// Placeholder for a constructor whose trace is spliced in later
    None,
    /// Literal marker: a time/block directive name, or `Out of Ether`
    Marker(String),
}

impl Serialize for TraceRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TraceRecord::Steps(logs) => logs.serialize(serializer),
            TraceRecord::None => serializer.serialize_str("None"),
            TraceRecord::Marker(marker) => serializer.serialize_str(marker),
        }
    }
}

/// Status cell for one processed directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallStatus {
    /// Transaction executed without reverting
    Success,
    /// Transaction landed but reverted
    Reverted,
    /// Constructor placeholder
    None,
    /// Sender balance below the transfer value; the call was skipped
    OutOfEther,
    /// Time/block directive, recorded under its own name
    Marker(String),
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallStatus::Success => f.write_str("success"),
            CallStatus::Reverted => f.write_str("reverted"),
            CallStatus::None => f.write_str("None"),
            CallStatus::OutOfEther => f.write_str("Out of Ether"),
            CallStatus::Marker(name) => f.write_str(name),
        }
    }
}

impl Serialize for CallStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
