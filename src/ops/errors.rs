//! Operation error types.

use std::fmt;

use thiserror::Error;

use crate::core::reference::ParseRefError;
use crate::sources::RefNamespace;

/// Which input document a manifest error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestSide {
    Base,
    Incoming,
}

impl fmt::Display for ManifestSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestSide::Base => f.write_str("base"),
            ManifestSide::Incoming => f.write_str("incoming"),
        }
    }
}

/// Error from executing a capstan operation.
///
/// Every failure is scoped to the single invocation; nothing here is fatal
/// to the host process.
#[derive(Debug, Error)]
pub enum OpError {
    /// One of the merge inputs failed to parse. Malformed individual
    /// requirement versions are *not* this error; those are silently
    /// excluded from comparison during the merge.
    #[error("failed to parse {which} manifest: {message}")]
    ManifestParse { which: ManifestSide, message: String },

    #[error(transparent)]
    ReferenceParse(#[from] ParseRefError),

    #[error("failed to bind ref lookup to host `{host}`")]
    HostBinding {
        host: String,
        #[source]
        source: anyhow::Error,
    },

    /// The label matched no candidate namespace.
    #[error("could not resolve `{label}`: tried {}", format_namespaces(.namespaces))]
    ReferenceNotResolvable {
        label: String,
        namespaces: Vec<RefNamespace>,
    },

    /// A lookup probe failed for transport reasons. Escalated immediately
    /// rather than treated as a miss; callers wanting retry-on-transient
    /// wrap the whole resolution.
    #[error("ref lookup for `{label}` failed")]
    Lookup {
        label: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("operation cancelled")]
    Cancelled,

    /// Raised by the boundary layer when a call's arguments do not match
    /// the operation's contract.
    #[error("argument {index} of `{operation}` invalid: expected {expected}, got {found}")]
    InvalidArgument {
        operation: &'static str,
        index: usize,
        expected: &'static str,
        found: String,
    },

    #[error("unknown operation `{name}`")]
    UnknownOperation { name: String },
}

fn format_namespaces(namespaces: &[RefNamespace]) -> String {
    namespaces
        .iter()
        .map(|ns| ns.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
