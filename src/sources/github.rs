//! GitHub-backed ref lookup.
//!
//! Resolves refs through the GitHub git-refs API:
//! `GET {api}/repos/{org}/{repo}/git/ref/{namespace}/{label}`. A 404 is a
//! definite miss; any other non-success status is a transport error left to
//! the caller to escalate.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use url::Url;

use crate::sources::{LookupOutcome, RefLookup, RefNamespace, DEFAULT_HOST};

const DEFAULT_API_BASE: &str = "https://api.github.com/";
const USER_AGENT: &str = concat!("capstan/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A ref lookup backed by the GitHub REST API.
pub struct GithubRefSource {
    /// API base URL (always with a trailing slash).
    api_base: Url,

    /// Optional bearer token. Unauthenticated lookups work for public
    /// repositories, at a much lower rate limit.
    token: Option<String>,

    client: reqwest::blocking::Client,
}

/// Response shape of the git-refs endpoint (fields we use).
#[derive(Debug, Deserialize)]
struct GitRef {
    object: GitObject,
}

#[derive(Debug, Deserialize)]
struct GitObject {
    sha: String,
}

impl GithubRefSource {
    /// Create a lookup against github.com.
    pub fn new(token: Option<String>) -> Result<Self> {
        let api_base = Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL");
        Self::with_api_base(api_base, token)
    }

    /// Create a lookup against github.com, taking the token from the
    /// `GITHUB_TOKEN` environment variable if set.
    pub fn from_env() -> Result<Self> {
        Self::new(std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()))
    }

    /// Create a lookup against an explicit API base URL.
    pub fn with_api_base(api_base: Url, token: Option<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(GithubRefSource {
            api_base,
            token,
            client,
        })
    }

    /// Map a `scheme://host` qualifier to its API base.
    ///
    /// github.com uses the dedicated api subdomain; enterprise hosts serve
    /// the API under `/api/v3/`.
    fn api_base_for_host(host: &str) -> Result<Url> {
        if host == DEFAULT_HOST {
            return Ok(Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL"));
        }

        let base = format!("{}/api/v3/", host.trim_end_matches('/'));
        Url::parse(&base).with_context(|| format!("invalid host qualifier `{}`", host))
    }
}

impl RefLookup for GithubRefSource {
    fn get_ref(
        &self,
        org: &str,
        repo: &str,
        namespace: RefNamespace,
        label: &str,
    ) -> Result<LookupOutcome> {
        let url = self
            .api_base
            .join(&format!(
                "repos/{}/{}/git/ref/{}/{}",
                org, repo, namespace, label
            ))
            .context("failed to build ref URL")?;

        tracing::debug!("Looking up ref at {}", url);

        let mut request = self
            .client
            .get(url.clone())
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .with_context(|| format!("request to {} failed", url))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(LookupOutcome::NotFound);
        }
        if !status.is_success() {
            bail!("GitHub API returned HTTP {} for {}", status, url);
        }

        let git_ref: GitRef = response
            .json()
            .with_context(|| format!("failed to decode ref response from {}", url))?;

        Ok(LookupOutcome::Found(git_ref.object.sha))
    }

    fn rebind(&self, host: &str) -> Result<Box<dyn RefLookup>> {
        let api_base = Self::api_base_for_host(host)?;
        Ok(Box::new(Self::with_api_base(api_base, self.token.clone())?))
    }
}
