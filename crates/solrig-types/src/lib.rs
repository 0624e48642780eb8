//! # solrig-types
//!
//! Shared data model for the SolRig contract test harness.
//!
//! - **Directive**: one planned contract interaction (deploy, call, or
//!   time/block advance) with arbitrary-precision arguments
//! - **BlockInfo**: the latest-block snapshot the execution loop works from
//! - **StructLog / TransactionTrace**: the node's low-level execution log
//! - **TraceRecord / CallStatus**: the per-directive output cells

#![warn(missing_docs)]
#![warn(clippy::all)]

mod block;
mod directive;
mod error;
pub mod hex;
mod record;
mod trace;

pub use block::BlockInfo;
pub use directive::{ArgValue, Directive, DirectiveKind};
pub use error::TypeError;
pub use record::{CallStatus, TraceRecord};
pub use trace::{StructLog, TransactionTrace};

// Re-export fixed-width chain types for convenience
pub use primitive_types::{H160, H256};
