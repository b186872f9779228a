//! Ref lookup sources.
//!
//! A ref lookup resolves a mutable label (tag or branch name) to a commit
//! SHA within a namespace. The trait keeps the resolution algorithm in
//! [`crate::ops::pin`] independent of any particular transport, so tests can
//! script outcomes and callers can rebind to alternate hosts per reference.

pub mod github;

use std::fmt;

use anyhow::Result;

pub use github::GithubRefSource;

/// The host implied when a reference carries no host qualifier.
pub const DEFAULT_HOST: &str = "https://github.com";

/// Git ref namespace probed during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefNamespace {
    /// `refs/tags/*`
    Tags,
    /// `refs/heads/*`
    Heads,
}

impl RefNamespace {
    pub fn as_str(self) -> &'static str {
        match self {
            RefNamespace::Tags => "tags",
            RefNamespace::Heads => "heads",
        }
    }
}

impl fmt::Display for RefNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of a single ref lookup.
///
/// A definite miss is `NotFound`; transport problems are surfaced as an
/// `Err` from [`RefLookup::get_ref`] so callers never mistake an outage for
/// a missing ref.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The ref exists and points at this commit SHA.
    Found(String),
    /// The ref definitely does not exist in this namespace.
    NotFound,
}

/// Capability to resolve labels to commit SHAs against a remote host.
pub trait RefLookup {
    /// Look up `label` in `namespace` for `org/repo`.
    fn get_ref(
        &self,
        org: &str,
        repo: &str,
        namespace: RefNamespace,
        label: &str,
    ) -> Result<LookupOutcome>;

    /// Produce a lookup scoped to an alternate host (`scheme://host`).
    fn rebind(&self, host: &str) -> Result<Box<dyn RefLookup>>;
}
