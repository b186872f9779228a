//! Test utilities for capstan unit tests.
//!
//! This module is only available when compiling with `--cfg test` or
//! running tests. It provides a scripted ref lookup double so resolution
//! logic can be exercised without the network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};

use crate::sources::{LookupOutcome, RefLookup, RefNamespace};

/// A [`RefLookup`] whose outcomes are scripted up front.
///
/// Records every probe and rebind so tests can assert on the search order.
/// Unscripted refs report `NotFound`; a failure message, when set, makes
/// every probe return a transport error instead.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRefLookup {
    /// `org/repo ns/label` -> sha
    refs: HashMap<String, String>,

    /// When set, every probe fails with this message.
    fail_with: Option<String>,

    /// When true, `rebind` fails.
    reject_rebinds: bool,

    probes: Arc<Mutex<Vec<String>>>,
    rebinds: Arc<Mutex<Vec<String>>>,
}

fn ref_key(org: &str, repo: &str, namespace: RefNamespace, label: &str) -> String {
    format!("{}/{} {}/{}", org, repo, namespace, label)
}

impl ScriptedRefLookup {
    /// Create an empty lookup; every probe reports `NotFound`.
    pub fn new() -> Self {
        ScriptedRefLookup::default()
    }

    /// Script a tag ref.
    pub fn with_tag(mut self, org: &str, repo: &str, label: &str, sha: &str) -> Self {
        self.refs.insert(
            ref_key(org, repo, RefNamespace::Tags, label),
            sha.to_string(),
        );
        self
    }

    /// Script a branch ref.
    pub fn with_branch(mut self, org: &str, repo: &str, label: &str, sha: &str) -> Self {
        self.refs.insert(
            ref_key(org, repo, RefNamespace::Heads, label),
            sha.to_string(),
        );
        self
    }

    /// Make every probe fail with a transport error.
    pub fn failing(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }

    /// Make `rebind` fail.
    pub fn rejecting_rebinds(mut self) -> Self {
        self.reject_rebinds = true;
        self
    }

    /// All probes made so far, as `org/repo ns/label` strings.
    pub fn probes(&self) -> Vec<String> {
        self.probes.lock().expect("probe log poisoned").clone()
    }

    /// All hosts this lookup was rebound to.
    pub fn rebinds(&self) -> Vec<String> {
        self.rebinds.lock().expect("rebind log poisoned").clone()
    }
}

impl RefLookup for ScriptedRefLookup {
    fn get_ref(
        &self,
        org: &str,
        repo: &str,
        namespace: RefNamespace,
        label: &str,
    ) -> Result<LookupOutcome> {
        let key = ref_key(org, repo, namespace, label);
        self.probes
            .lock()
            .expect("probe log poisoned")
            .push(key.clone());

        if let Some(message) = &self.fail_with {
            bail!("{}", message);
        }

        Ok(match self.refs.get(&key) {
            Some(sha) => LookupOutcome::Found(sha.clone()),
            None => LookupOutcome::NotFound,
        })
    }

    fn rebind(&self, host: &str) -> Result<Box<dyn RefLookup>> {
        if self.reject_rebinds {
            bail!("no lookup available for host `{}`", host);
        }

        self.rebinds
            .lock()
            .expect("rebind log poisoned")
            .push(host.to_string());

        // Clones share the probe and rebind logs, so assertions made on the
        // original see activity on the rebound lookup too.
        Ok(Box::new(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_lookup_basic() {
        let lookup = ScriptedRefLookup::new().with_tag("org", "repo", "v1", "abc123");

        let outcome = lookup
            .get_ref("org", "repo", RefNamespace::Tags, "v1")
            .unwrap();
        assert_eq!(outcome, LookupOutcome::Found("abc123".to_string()));

        let outcome = lookup
            .get_ref("org", "repo", RefNamespace::Heads, "v1")
            .unwrap();
        assert_eq!(outcome, LookupOutcome::NotFound);

        assert_eq!(lookup.probes().len(), 2);
    }

    #[test]
    fn test_scripted_lookup_failure() {
        let lookup = ScriptedRefLookup::new().failing("boom");
        let err = lookup
            .get_ref("org", "repo", RefNamespace::Tags, "v1")
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_rebound_lookup_shares_logs() {
        let lookup = ScriptedRefLookup::new().with_tag("org", "repo", "v1", "abc123");
        let rebound = lookup.rebind("https://ghe.example.com").unwrap();

        rebound
            .get_ref("org", "repo", RefNamespace::Tags, "v1")
            .unwrap();

        assert_eq!(lookup.rebinds(), vec!["https://ghe.example.com"]);
        assert_eq!(lookup.probes().len(), 1);
    }
}
