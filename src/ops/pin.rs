//! Action reference pinning.
//!
//! Resolves a mutable version label to the commit it points at, probing the
//! tag namespace first and falling back to branches. The lookup capability
//! is injected so the algorithm stays testable and host-agnostic.

use crate::core::reference::{ActionRef, PinnedAction};
use crate::ops::errors::OpError;
use crate::sources::{LookupOutcome, RefLookup, RefNamespace};
use crate::util::CancelToken;

/// Namespaces probed in order during resolution.
const CANDIDATE_NAMESPACES: [RefNamespace; 2] = [RefNamespace::Tags, RefNamespace::Heads];

/// Parse a raw reference and resolve its label to a commit pin.
pub fn pin_reference(
    raw: &str,
    lookup: &dyn RefLookup,
    cancel: &CancelToken,
) -> Result<PinnedAction, OpError> {
    let action = ActionRef::parse(raw)?;
    resolve(&action, lookup, cancel)
}

/// Resolve a parsed reference against a lookup capability.
///
/// A host-qualified reference rebinds the capability to that host before
/// probing. A definite `NotFound` advances to the next namespace; a
/// transport error aborts immediately so an outage is never mistaken for a
/// missing ref. The cancellation token is checked before each probe.
pub fn resolve(
    action: &ActionRef,
    lookup: &dyn RefLookup,
    cancel: &CancelToken,
) -> Result<PinnedAction, OpError> {
    let rebound;
    let lookup: &dyn RefLookup = match &action.host {
        Some(host) => {
            rebound = lookup.rebind(host).map_err(|e| OpError::HostBinding {
                host: host.clone(),
                source: e,
            })?;
            rebound.as_ref()
        }
        None => lookup,
    };

    for namespace in CANDIDATE_NAMESPACES {
        if cancel.is_cancelled() {
            return Err(OpError::Cancelled);
        }

        match lookup.get_ref(&action.org, &action.repo, namespace, &action.label) {
            Ok(LookupOutcome::Found(sha)) => {
                tracing::debug!(
                    "Resolved {}/{} {}/{} to {}",
                    action.org,
                    action.repo,
                    namespace,
                    action.label,
                    sha
                );
                return Ok(PinnedAction {
                    action: action.original.clone(),
                    tag: action.label.clone(),
                    commit: sha,
                });
            }
            Ok(LookupOutcome::NotFound) => {
                tracing::debug!(
                    "No {} ref named `{}` in {}/{}",
                    namespace,
                    action.label,
                    action.org,
                    action.repo
                );
            }
            Err(e) => {
                return Err(OpError::Lookup {
                    label: action.label.clone(),
                    source: e,
                });
            }
        }
    }

    Err(OpError::ReferenceNotResolvable {
        label: action.label.clone(),
        namespaces: CANDIDATE_NAMESPACES.to_vec(),
    })
}
