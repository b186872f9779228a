//! Capstan - codegen pipeline helpers for manifests and action pins
//!
//! This crate provides the two algorithms a template scaffolding pipeline
//! needs when regenerating projects: merging an existing go.mod with a
//! templated one, and pinning mutable GitHub Action references to immutable
//! commit SHAs.

pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test utilities for capstan unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a scripted ref lookup double for exercising
/// resolution without the network.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{ActionRef, Manifest, PinnedAction};
pub use crate::ops::{merge_manifest_text, pin_reference, OpError, Operation};
pub use crate::sources::{GithubRefSource, LookupOutcome, RefLookup, RefNamespace, DEFAULT_HOST};
pub use crate::util::CancelToken;
