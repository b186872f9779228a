//! Core data model: manifests and action references.

pub mod manifest;
pub mod reference;

pub use manifest::{Manifest, Replacement, Requirement};
pub use reference::{ActionRef, ParseRefError, PinnedAction};
