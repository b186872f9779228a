//! High-level operations and the host boundary.
//!
//! Hosts invoke capstan operations by name with positional JSON arguments.
//! The boundary converts such calls into the closed [`Operation`] enum up
//! front, so every operation has a statically typed contract and dispatch
//! is a single exhaustive match.

pub mod errors;
pub mod merge;
pub mod pin;

use serde_json::Value;

pub use errors::{ManifestSide, OpError};
pub use merge::{merge, merge_manifest_text};
pub use pin::{pin_reference, resolve};

use crate::sources::RefLookup;
use crate::util::CancelToken;

/// Operation name for manifest merging.
pub const MANIFEST_MERGE: &str = "manifest-merge";

/// Operation name for reference pinning.
pub const REFERENCE_PIN: &str = "reference-pin";

/// A validated operation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Merge two manifest documents; returns the merged document text.
    MergeManifests { base: String, incoming: String },

    /// Pin a mutable action reference; returns the formatted pin line
    /// `<original>@<commit> # <tag>`.
    PinReference { raw: String },
}

impl Operation {
    /// Build an operation from a named call with positional arguments.
    pub fn from_call(name: &str, args: &[Value]) -> Result<Self, OpError> {
        match name {
            MANIFEST_MERGE => Ok(Operation::MergeManifests {
                base: string_arg(MANIFEST_MERGE, args, 0)?,
                incoming: string_arg(MANIFEST_MERGE, args, 1)?,
            }),
            REFERENCE_PIN => Ok(Operation::PinReference {
                raw: string_arg(REFERENCE_PIN, args, 0)?,
            }),
            other => Err(OpError::UnknownOperation {
                name: other.to_string(),
            }),
        }
    }

    /// Execute the operation.
    ///
    /// `lookup` and `cancel` are only consulted by [`Operation::PinReference`];
    /// merging is pure.
    pub fn execute(
        &self,
        lookup: &dyn RefLookup,
        cancel: &CancelToken,
    ) -> Result<String, OpError> {
        match self {
            Operation::MergeManifests { base, incoming } => merge_manifest_text(base, incoming),
            Operation::PinReference { raw } => {
                Ok(pin_reference(raw, lookup, cancel)?.pin_line())
            }
        }
    }
}

fn string_arg(operation: &'static str, args: &[Value], index: usize) -> Result<String, OpError> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(OpError::InvalidArgument {
            operation,
            index,
            expected: "string",
            found: json_type_name(other).to_string(),
        }),
        None => Err(OpError::InvalidArgument {
            operation,
            index,
            expected: "string",
            found: "nothing".to_string(),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
