//! Acquisition pipeline orchestration.
//!
//! The single entry point wiring classification, enumeration,
//! filtering, budgeted fetching, and assembly. One call, one bundle:
//! nothing is persisted between calls, concurrent calls share no state,
//! and the credential (if any) lives only for the duration of the call
//! and is attached to every remote request uniformly.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::bundle::{self, BundleMeta};
use crate::error::{AcquireError, Result};
use crate::fetch::{self, FetchBudget};
use crate::filter;
use crate::limits::REQUEST_TIMEOUT_SECS;
use crate::locator::{self, Locator};
use crate::tree;

/// Acquire the bundle for a locator string.
///
/// For blob and gist locators the returned text is the raw file body,
/// verbatim: no header, no markers, no budget. For repository locators
/// it is the assembled, diagnostic-annotated bundle.
pub async fn acquire(locator_str: &str, token: Option<&str>) -> Result<String> {
    let locator = locator::classify(locator_str)?;
    let client = Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?;

    match locator {
        Locator::Blob { raw_url } | Locator::Gist { raw_url } => {
            info!(url = %raw_url, "fetching single file");
            fetch_single(&client, &raw_url, token).await
        }
        Locator::Repository { owner, repo } => {
            info!(owner = %owner, repo = %repo, "acquiring repository");
            acquire_repository(&client, &owner, &repo, token).await
        }
    }
}

/// Direct raw fetch for blob/gist locators, bypassing the tree and the
/// contents API entirely.
async fn fetch_single(client: &Client, raw_url: &str, token: Option<&str>) -> Result<String> {
    let resp = fetch::raw_get(client, raw_url, token).send().await?;

    match resp.status() {
        reqwest::StatusCode::FORBIDDEN => Err(AcquireError::RateLimited),
        reqwest::StatusCode::NOT_FOUND => Err(AcquireError::FileNotFound {
            private_hint: token.is_none(),
        }),
        status if !status.is_success() => Err(AcquireError::RemoteApiError(format!(
            "raw fetch returned {}",
            status
        ))),
        _ => Ok(resp.text().await?),
    }
}

async fn acquire_repository(
    client: &Client,
    owner: &str,
    repo: &str,
    token: Option<&str>,
) -> Result<String> {
    let info = tree::fetch_repository_info(client, owner, repo, token).await?;
    let listing = tree::fetch_tree(client, owner, repo, &info.default_branch, token).await?;

    let candidates = filter::candidates(&listing.nodes);
    debug!(
        total = listing.nodes.len(),
        candidates = candidates.len(),
        "filtered tree"
    );
    if candidates.is_empty() {
        return Err(AcquireError::NoSuitableFiles);
    }

    let transport =
        fetch::select_transport(client.clone(), owner, repo, &info.default_branch, token);
    let report = fetch::fetch_candidates(transport.as_ref(), &candidates, FetchBudget::default()).await;
    debug!(
        included = report.included_count(),
        attempted = report.outcomes.len(),
        byte_cap_hit = report.byte_cap_hit,
        "fetch loop finished"
    );

    let meta = BundleMeta {
        owner,
        repo,
        private: info.private,
        tree_truncated: listing.truncated,
    };
    bundle::assemble(&meta, &report)
}
