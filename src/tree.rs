//! Repository metadata and tree enumeration.
//!
//! Talks to the GitHub REST API to resolve a repository's default
//! branch and obtain its full recursive file tree. The remote payloads
//! are loosely typed at the boundary, so everything passes through
//! explicit `serde` structs: `path` and `type` must be present, while
//! an absent `size` decodes as unknown, never as zero.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AcquireError, Result};
use crate::limits::API_BASE;

/// Resolved repository metadata, fetched once per acquisition call and
/// used to construct all subsequent URLs.
#[derive(Debug, Clone)]
pub struct RepositoryInfo {
    pub default_branch: String,
    pub private: bool,
}

/// One entry of the recursive file listing. Only `blob` nodes are
/// files; `tree` and `commit` nodes are ignored downstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeNode {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// The recursive listing plus the server's truncation indicator.
#[derive(Debug)]
pub struct TreeListing {
    pub nodes: Vec<TreeNode>,
    /// The server returned a partial tree (oversized repository). Not a
    /// failure: enumeration proceeds with what was returned.
    pub truncated: bool,
}

#[derive(Deserialize)]
struct RepoMetadata {
    default_branch: Option<String>,
    #[serde(default)]
    private: bool,
}

impl From<RepoMetadata> for RepositoryInfo {
    fn from(meta: RepoMetadata) -> Self {
        Self {
            // Conventional fallback when the metadata omits the branch.
            default_branch: meta.default_branch.unwrap_or_else(|| "main".to_string()),
            private: meta.private,
        }
    }
}

#[derive(Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeNode>,
    #[serde(default)]
    truncated: bool,
}

/// Attach the headers every API call carries: a User-Agent (GitHub
/// rejects requests without one), the JSON accept type, and the bearer
/// credential when one was supplied.
pub(crate) fn api_get(client: &Client, url: &str, token: Option<&str>) -> RequestBuilder {
    let mut req = client
        .get(url)
        .header("User-Agent", crate::limits::USER_AGENT)
        .header("Accept", "application/vnd.github+json");
    if let Some(token) = token {
        req = req.header("Authorization", format!("Bearer {}", token));
    }
    req
}

/// Fetch repository metadata by owner/repo.
///
/// A 403 is surfaced as [`AcquireError::RateLimited`] so the caller can
/// suggest supplying a credential; a 404 becomes
/// [`AcquireError::RepositoryNotFound`], hinting at a private repository
/// only when no credential was present.
pub async fn fetch_repository_info(
    client: &Client,
    owner: &str,
    repo: &str,
    token: Option<&str>,
) -> Result<RepositoryInfo> {
    let url = format!("{}/repos/{}/{}", API_BASE, owner, repo);
    let resp = api_get(client, &url, token).send().await?;

    match resp.status() {
        StatusCode::FORBIDDEN => return Err(AcquireError::RateLimited),
        StatusCode::NOT_FOUND => {
            return Err(AcquireError::RepositoryNotFound {
                private_hint: token.is_none(),
            })
        }
        status if !status.is_success() => {
            return Err(AcquireError::RemoteApiError(format!(
                "repository metadata request returned {}",
                status
            )))
        }
        _ => {}
    }

    let meta: RepoMetadata = resp.json().await?;
    let info = RepositoryInfo::from(meta);
    debug!(owner, repo, branch = %info.default_branch, "resolved repository metadata");
    Ok(info)
}

/// Fetch the full recursive file tree for a branch.
///
/// A server-side `truncated` flag is recorded as a non-fatal diagnostic;
/// whatever was returned still flows through filtering and fetching.
pub async fn fetch_tree(
    client: &Client,
    owner: &str,
    repo: &str,
    branch: &str,
    token: Option<&str>,
) -> Result<TreeListing> {
    let url = format!(
        "{}/repos/{}/{}/git/trees/{}?recursive=1",
        API_BASE, owner, repo, branch
    );
    let resp = api_get(client, &url, token).send().await?;

    if !resp.status().is_success() {
        return Err(AcquireError::TreeFetchFailed(format!(
            "tree request for branch '{}' returned {}",
            branch,
            resp.status()
        )));
    }

    let body: TreeResponse = resp.json().await?;
    if body.truncated {
        warn!(
            owner,
            repo, "remote reported a truncated tree; continuing with partial listing"
        );
    }

    Ok(TreeListing {
        nodes: body.tree,
        truncated: body.truncated,
    })
}
