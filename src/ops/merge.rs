//! Manifest merging.
//!
//! Reconciles an existing ("base") manifest with a templated ("incoming")
//! manifest. The rules favor whatever keeps an existing project working:
//! versions never downgrade, existing replacements win, and the language
//! and toolchain directives track the incoming template.

use std::collections::HashMap;

use semver::Version;

use crate::core::manifest::Manifest;
use crate::ops::errors::{ManifestSide, OpError};

/// Merge two manifest documents and return the canonical merged text.
///
/// Parse failure of either input is fatal for the whole operation; no other
/// step can fail.
pub fn merge_manifest_text(base: &str, incoming: &str) -> Result<String, OpError> {
    let base = Manifest::parse(base).map_err(|e| OpError::ManifestParse {
        which: ManifestSide::Base,
        message: format!("{:#}", e),
    })?;
    let incoming = Manifest::parse(incoming).map_err(|e| OpError::ManifestParse {
        which: ManifestSide::Incoming,
        message: format!("{:#}", e),
    })?;

    Ok(merge(&base, &incoming).serialize())
}

/// Merge two parsed manifests. Neither input is mutated.
///
/// Rules, applied independently per field:
/// - A requirement from `incoming` is taken unless its version is strictly
///   older than the same path's version in `base`. Equal versions keep the
///   incoming version text. Requirements only in `base` are retained.
/// - A replacement from `incoming` is added only when `base` has no
///   directive for the same old path; `base` directives are never
///   overwritten.
/// - `go` and `toolchain` from `incoming`, when present, unconditionally
///   overwrite `base`.
///
/// Requirement versions that do not parse as (tolerant) semver are skipped:
/// they neither land in the result nor serve as a comparison baseline. The
/// downstream toolchain's own validation is the place where malformed
/// versions get reported.
pub fn merge(base: &Manifest, incoming: &Manifest) -> Manifest {
    let mut merged = base.clone();

    let baseline: HashMap<&str, Version> = base
        .requirements()
        .iter()
        .filter_map(|r| parse_tolerant(&r.version).map(|v| (r.path.as_str(), v)))
        .collect();

    for req in incoming.requirements() {
        let Some(version) = parse_tolerant(&req.version) else {
            tracing::debug!(
                "Skipping `{}`: version `{}` is not semver",
                req.path,
                req.version
            );
            continue;
        };

        if let Some(existing) = baseline.get(req.path.as_str()) {
            if version < *existing {
                tracing::debug!(
                    "Keeping `{}` at {} (incoming {} is older)",
                    req.path,
                    existing,
                    version
                );
                continue;
            }
        }

        merged.upsert_requirement(&req.path, &req.version);
    }

    for repl in incoming.replacements() {
        if merged.replacement(&repl.old_path).is_none() {
            merged.add_replacement(repl.clone());
        }
    }

    if incoming.go.is_some() {
        merged.go = incoming.go.clone();
    }
    if incoming.toolchain.is_some() {
        merged.toolchain = incoming.toolchain.clone();
    }

    merged
}

/// Parse a version string leniently: an optional leading `v` and missing
/// minor/patch components are tolerated (`v1.2` parses as `1.2.0`).
fn parse_tolerant(raw: &str) -> Option<Version> {
    let s = raw.trim();
    let s = s.strip_prefix('v').unwrap_or(s);

    if let Ok(v) = Version::parse(s) {
        return Some(v);
    }

    // Pad a bare major or major.minor, keeping any pre-release or build
    // suffix in place.
    let (core, rest) = match s.find(['-', '+']) {
        Some(i) => (&s[..i], &s[i..]),
        None => (s, ""),
    };
    let padded = match core.matches('.').count() {
        0 => format!("{}.0.0{}", core, rest),
        1 => format!("{}.0{}", core, rest),
        _ => return None,
    };

    Version::parse(&padded).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge_text(base: &str, incoming: &str) -> String {
        merge_manifest_text(base, incoming).unwrap()
    }

    #[test]
    fn test_merge_with_empty_is_identity() {
        let content = "module m\n\ngo 1.22\n\nrequire (\n\ta v1.0.0\n\tb v2.0.0\n)\n\nreplace a => c v1.0.1\n";

        assert_eq!(merge_text(content, ""), content);
        // The empty base has no module header, so compare models field by
        // field instead of text.
        let from_empty = Manifest::parse(&merge_text("", content)).unwrap();
        let original = Manifest::parse(content).unwrap();
        assert_eq!(from_empty.requirements(), original.requirements());
        assert_eq!(from_empty.replacements(), original.replacements());
        assert_eq!(from_empty.go, original.go);
    }

    #[test]
    fn test_merge_takes_newer_incoming_version() {
        let merged = merge_text("require foo v1.0.0\n", "require foo v1.1.0\n");
        assert_eq!(merged, "require foo v1.1.0\n");
    }

    #[test]
    fn test_merge_never_downgrades() {
        let merged = merge_text("require foo v1.1.0\n", "require foo v1.0.0\n");
        assert_eq!(merged, "require foo v1.1.0\n");
    }

    #[test]
    fn test_merge_equal_versions_prefer_incoming_text() {
        // v1.1 and v1.1.0 compare equal; the incoming spelling wins.
        let merged = merge_text("require foo v1.1\n", "require foo v1.1.0\n");
        assert_eq!(merged, "require foo v1.1.0\n");
    }

    #[test]
    fn test_merge_keeps_base_only_requirements() {
        let merged = merge_text(
            "require (\n\ta v1.0.0\n\tb v1.0.0\n)\n",
            "require b v2.0.0\n",
        );
        assert_eq!(merged, "require (\n\ta v1.0.0\n\tb v2.0.0\n)\n");
    }

    #[test]
    fn test_merge_skips_invalid_incoming_version() {
        let merged = merge_text("require a v1.0.0\n", "require b not-a-version\n");
        assert_eq!(merged, "require a v1.0.0\n");
    }

    #[test]
    fn test_merge_invalid_base_version_is_no_baseline() {
        // The base version cannot be compared, so the incoming one is taken
        // even though it might look "older".
        let merged = merge_text("require a garbage\n", "require a v0.1.0\n");
        assert_eq!(merged, "require a v0.1.0\n");
    }

    #[test]
    fn test_merge_base_replacement_wins() {
        let merged = merge_text(
            "replace foo => bar v1.0.0\n",
            "replace foo => other v9.9.9\n",
        );
        assert_eq!(merged, "replace foo => bar v1.0.0\n");
    }

    #[test]
    fn test_merge_replacement_from_either_side_is_kept() {
        let expected = "replace foo => bar v1.0.0\n";
        assert_eq!(merge_text("replace foo => bar v1.0.0\n", ""), expected);
        assert_eq!(merge_text("", "replace foo => bar v1.0.0\n"), expected);
    }

    #[test]
    fn test_merge_incoming_directives_override() {
        let merged = merge_text(
            "go 1.21\n\ntoolchain go1.21.0\n",
            "go 1.22\n\ntoolchain go1.22.1\n",
        );
        assert_eq!(merged, "go 1.22\n\ntoolchain go1.22.1\n");
    }

    #[test]
    fn test_merge_retains_base_directives_when_incoming_silent() {
        let merged = merge_text("go 1.21\n", "require a v1.0.0\n");
        assert_eq!(merged, "go 1.21\n\nrequire a v1.0.0\n");
    }

    #[test]
    fn test_merge_retains_base_module_header() {
        let merged = merge_text("module example.com/m\n", "require a v1.0.0\n");
        assert_eq!(merged, "module example.com/m\n\nrequire a v1.0.0\n");
    }

    #[test]
    fn test_merge_does_not_mutate_inputs() {
        let base = Manifest::parse("require a v1.0.0\n").unwrap();
        let incoming = Manifest::parse("require a v2.0.0\n").unwrap();
        let incoming_before = incoming.clone();

        let _ = merge(&base, &incoming);
        assert_eq!(incoming, incoming_before);
    }

    #[test]
    fn test_merge_result_round_trips() {
        let merged = merge_text(
            "module m\n\nrequire (\n\ta v1.0.0\n\tb v1.0.0\n)\n",
            "require (\n\tb v2.0.0\n\tc v1.0.0\n)\n\nreplace a => ../a\n",
        );
        let model = Manifest::parse(&merged).unwrap();
        assert_eq!(model.serialize(), merged);
    }

    #[test]
    fn test_merge_parse_failure_identifies_side() {
        let err = merge_manifest_text("garbage directive\n", "").unwrap_err();
        assert!(err.to_string().contains("base manifest"));

        let err = merge_manifest_text("", "garbage directive\n").unwrap_err();
        assert!(err.to_string().contains("incoming manifest"));
    }

    #[test]
    fn test_parse_tolerant() {
        assert_eq!(parse_tolerant("v1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_tolerant("1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_tolerant("v1.2"), Some(Version::new(1, 2, 0)));
        assert_eq!(parse_tolerant("v2"), Some(Version::new(2, 0, 0)));
        assert_eq!(
            parse_tolerant("v1.2.3-rc.1").map(|v| v.to_string()),
            Some("1.2.3-rc.1".to_string())
        );
        assert_eq!(parse_tolerant("not-a-version"), None);
        assert_eq!(parse_tolerant(""), None);
    }
}
