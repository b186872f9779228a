//! Action reference parsing.
//!
//! An action reference is a human-authored pointer to a versioned GitHub
//! Action, e.g. `jdx/mise-action@v3` or
//! `https://ghe.example.com/org/repo@v1.2.3`. Parsing splits it into an
//! address and a version label; resolution (see [`crate::ops::pin`]) turns
//! the label into an immutable commit pin.

use thiserror::Error;
use url::Url;

/// Error parsing an action reference string.
#[derive(Debug, Error)]
pub enum ParseRefError {
    #[error("invalid action reference `{raw}`: missing `@<version>` label")]
    MissingVersionLabel { raw: String },

    #[error("invalid action reference `{raw}`: expected at least `org/repo@version`")]
    MissingPathSegments { raw: String },

    #[error("invalid action reference `{raw}`: {message}")]
    InvalidAddress { raw: String, message: String },
}

/// A parsed action reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRef {
    /// The reference text without its version label, host-qualified if a
    /// host was present in the input.
    pub original: String,

    /// Host qualifier as `scheme://host`. `None` means the default host
    /// ([`crate::sources::DEFAULT_HOST`]).
    pub host: Option<String>,

    /// Organization (first path segment).
    pub org: String,

    /// Repository name (second path segment).
    pub repo: String,

    /// The mutable version label (tag or branch name).
    pub label: String,
}

/// An immutable resolution of an action reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedAction {
    /// The action address, equal to [`ActionRef::original`].
    pub action: String,

    /// The label that was resolved.
    pub tag: String,

    /// The commit SHA the label pointed to at the time of pinning.
    pub commit: String,
}

impl PinnedAction {
    /// Format as a pin line: `org/action@<commit> # <tag>`.
    pub fn pin_line(&self) -> String {
        format!("{}@{} # {}", self.action, self.commit, self.tag)
    }
}

impl ActionRef {
    /// Parse a raw reference string.
    ///
    /// The version label is everything after the *last* `@`, so addresses
    /// containing `@` elsewhere still parse. Trailing path segments beyond
    /// `org/repo` are accepted (monorepo-style actions) but only the first
    /// two segments participate in resolution.
    pub fn parse(raw: &str) -> Result<Self, ParseRefError> {
        let at = raw.rfind('@').ok_or_else(|| ParseRefError::MissingVersionLabel {
            raw: raw.to_string(),
        })?;

        let (address, label) = (&raw[..at], &raw[at + 1..]);

        // A scheme marks a host-qualified address (GitHub Enterprise and
        // friends); everything else is a plain org/repo path.
        let (host, path) = if address.contains("://") {
            let url = Url::parse(address).map_err(|e| ParseRefError::InvalidAddress {
                raw: raw.to_string(),
                message: e.to_string(),
            })?;

            let host_str = url.host_str().ok_or_else(|| ParseRefError::InvalidAddress {
                raw: raw.to_string(),
                message: "address has a scheme but no host".to_string(),
            })?;

            let qualifier = match url.port() {
                Some(port) => format!("{}://{}:{}", url.scheme(), host_str, port),
                None => format!("{}://{}", url.scheme(), host_str),
            };

            (Some(qualifier), url.path().trim_start_matches('/').to_string())
        } else {
            (None, address.to_string())
        };

        let segments: Vec<&str> = path.split('/').collect();
        if segments.len() < 2 || segments[0].is_empty() || segments[1].is_empty() {
            return Err(ParseRefError::MissingPathSegments {
                raw: raw.to_string(),
            });
        }

        Ok(ActionRef {
            original: address.to_string(),
            host,
            org: segments[0].to_string(),
            repo: segments[1].to_string(),
            label: label.to_string(),
        })
    }
}
