//! Budgeted file fetching.
//!
//! Iterates filtered candidates strictly in tree order, retrieving each
//! body through a [`FileTransport`] chosen once per acquisition call:
//! the authenticated contents endpoint (base64 envelope) when a
//! credential is present, the raw-content host otherwise. Three caps
//! bound the work: file count, per-file bytes, and aggregate bytes. A
//! handful of very large files and a flood of tiny files are separate
//! failure modes, so count and bytes are limited independently.
//!
//! Per-candidate results are collected as [`FetchOutcome`]s rather than
//! a mutable skip flag, keeping the skip/accept policy testable apart
//! from the iteration loop.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::fmt;
use tracing::debug;

use crate::limits::{API_BASE, MAX_FILES, MAX_FILE_BYTES, MAX_TOTAL_BYTES, RAW_HOST, USER_AGENT};
use crate::tree::TreeNode;

/// A successfully retrieved file body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub path: String,
    pub body: String,
}

/// Why a candidate was left out of the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The fetched body exceeded the per-file cap. Catches pathological
    /// minified or generated files whose declared size was absent or
    /// understated.
    OverSize { actual: usize },
    /// The transport failed for this file (non-success status, decode
    /// failure, network error).
    Transport(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::OverSize { actual } => {
                write!(f, "body of {} bytes exceeds per-file cap", actual)
            }
            SkipReason::Transport(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

/// The outcome of one fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Included(FileContent),
    Skipped { path: String, reason: SkipReason },
}

/// Running counters checked before and after each fetch.
#[derive(Debug, Clone)]
pub struct FetchBudget {
    max_files: usize,
    max_file_bytes: usize,
    max_total_bytes: usize,
    files: usize,
    bytes: usize,
}

impl Default for FetchBudget {
    fn default() -> Self {
        Self::with_caps(MAX_FILES, MAX_FILE_BYTES, MAX_TOTAL_BYTES)
    }
}

impl FetchBudget {
    pub(crate) fn with_caps(max_files: usize, max_file_bytes: usize, max_total_bytes: usize) -> Self {
        Self {
            max_files,
            max_file_bytes,
            max_total_bytes,
            files: 0,
            bytes: 0,
        }
    }

    fn has_file_slot(&self) -> bool {
        self.files < self.max_files
    }

    fn bytes_full(&self) -> bool {
        self.bytes >= self.max_total_bytes
    }

    /// Per-file cap against the actual fetched length.
    fn admits_len(&self, len: usize) -> bool {
        len <= self.max_file_bytes
    }

    /// Aggregate pre-check: would accepting this body overshoot the cap?
    fn fits(&self, len: usize) -> bool {
        self.bytes + len <= self.max_total_bytes
    }

    fn accept(&mut self, len: usize) {
        self.files += 1;
        self.bytes += len;
    }
}

/// Everything the fetch loop produced, in candidate order.
#[derive(Debug)]
pub struct FetchReport {
    pub outcomes: Vec<FetchOutcome>,
    /// The aggregate byte cap stopped iteration. File-count exhaustion
    /// does not set this; only the size limit does.
    pub byte_cap_hit: bool,
}

impl FetchReport {
    pub fn included(&self) -> impl Iterator<Item = &FileContent> {
        self.outcomes.iter().filter_map(|o| match o {
            FetchOutcome::Included(f) => Some(f),
            FetchOutcome::Skipped { .. } => None,
        })
    }

    pub fn included_count(&self) -> usize {
        self.included().count()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Transports
// ═══════════════════════════════════════════════════════════════════════

/// One of the two transport paths for retrieving file bodies. Selected
/// once per acquisition call based on credential presence, never mixed
/// within a call.
#[async_trait]
pub trait FileTransport: Send + Sync {
    /// Retrieve the body of one repo-relative path as text.
    async fn fetch_file(&self, path: &str) -> Result<String>;
}

/// Pick the transport for this acquisition call.
pub fn select_transport(
    client: Client,
    owner: &str,
    repo: &str,
    branch: &str,
    token: Option<&str>,
) -> Box<dyn FileTransport> {
    match token {
        Some(token) => Box::new(ContentsApiTransport {
            client,
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
            token: token.to_string(),
        }),
        None => Box::new(RawHostTransport {
            client,
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
        }),
    }
}

/// Authenticated path: the contents endpoint returns the body inside a
/// JSON envelope, base64-encoded.
pub struct ContentsApiTransport {
    client: Client,
    owner: String,
    repo: String,
    branch: String,
    token: String,
}

#[derive(Deserialize)]
struct ContentsEnvelope {
    content: String,
    encoding: String,
}

#[async_trait]
impl FileTransport for ContentsApiTransport {
    async fn fetch_file(&self, path: &str) -> Result<String> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            API_BASE, self.owner, self.repo, path, self.branch
        );
        let resp = crate::tree::api_get(&self.client, &url, Some(&self.token))
            .send()
            .await
            .with_context(|| format!("contents request for '{}'", path))?;

        if !resp.status().is_success() {
            bail!("contents request for '{}' returned {}", path, resp.status());
        }

        let envelope: ContentsEnvelope = resp
            .json()
            .await
            .with_context(|| format!("contents envelope for '{}'", path))?;
        decode_envelope(&envelope.content, &envelope.encoding)
    }
}

/// Decode the contents-endpoint envelope to raw text. GitHub wraps the
/// base64 payload across lines, so whitespace is stripped first.
fn decode_envelope(content: &str, encoding: &str) -> Result<String> {
    if encoding != "base64" {
        bail!("unsupported contents encoding '{}'", encoding);
    }
    let compact: String = content.split_whitespace().collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .context("invalid base64 in contents envelope")?;
    Ok(String::from_utf8_lossy(&bytes).to_string())
}

/// Unauthenticated path: the raw-content host serves the body verbatim.
pub struct RawHostTransport {
    client: Client,
    owner: String,
    repo: String,
    branch: String,
}

#[async_trait]
impl FileTransport for RawHostTransport {
    async fn fetch_file(&self, path: &str) -> Result<String> {
        let url = format!(
            "{}/{}/{}/{}/{}",
            RAW_HOST, self.owner, self.repo, self.branch, path
        );
        let resp = raw_get(&self.client, &url, None)
            .send()
            .await
            .with_context(|| format!("raw fetch for '{}'", path))?;

        if !resp.status().is_success() {
            bail!("raw fetch for '{}' returned {}", path, resp.status());
        }

        Ok(resp.text().await?)
    }
}

/// Plain-text GET against the raw-content host. Shared with the direct
/// blob/gist path, which attaches the credential when one was supplied.
pub(crate) fn raw_get(client: &Client, url: &str, token: Option<&str>) -> RequestBuilder {
    let mut req = client.get(url).header("User-Agent", USER_AGENT);
    if let Some(token) = token {
        req = req.header("Authorization", format!("Bearer {}", token));
    }
    req
}

// ═══════════════════════════════════════════════════════════════════════
// Fetch loop
// ═══════════════════════════════════════════════════════════════════════

/// Fetch candidates in order until a budget cap stops iteration.
///
/// Stopping is a normal terminal condition, not an error. Per-file
/// transport failures are skipped and iteration continues; a body over
/// the per-file cap is discarded without consuming a file slot.
pub async fn fetch_candidates(
    transport: &dyn FileTransport,
    candidates: &[&TreeNode],
    mut budget: FetchBudget,
) -> FetchReport {
    let mut outcomes = Vec::new();
    let mut byte_cap_hit = false;

    for node in candidates {
        if !budget.has_file_slot() {
            debug!(path = %node.path, "file-count budget exhausted, stopping");
            break;
        }
        if budget.bytes_full() {
            debug!(path = %node.path, "aggregate byte budget exhausted, stopping");
            byte_cap_hit = true;
            break;
        }

        let body = match transport.fetch_file(&node.path).await {
            Ok(body) => body,
            Err(e) => {
                debug!(path = %node.path, error = %e, "skipping file");
                outcomes.push(FetchOutcome::Skipped {
                    path: node.path.clone(),
                    reason: SkipReason::Transport(e.to_string()),
                });
                continue;
            }
        };

        // The tree may have declared no size, or lied. Re-check against
        // the actual decoded length.
        if !budget.admits_len(body.len()) {
            debug!(path = %node.path, bytes = body.len(), "skipping oversized file");
            outcomes.push(FetchOutcome::Skipped {
                path: node.path.clone(),
                reason: SkipReason::OverSize { actual: body.len() },
            });
            continue;
        }

        if !budget.fits(body.len()) {
            debug!(path = %node.path, "file would overflow aggregate budget, stopping");
            byte_cap_hit = true;
            break;
        }

        budget.accept(body.len());
        outcomes.push(FetchOutcome::Included(FileContent {
            path: node.path.clone(),
            body,
        }));
    }

    FetchReport {
        outcomes,
        byte_cap_hit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct StubTransport {
        files: HashMap<String, String>,
    }

    impl StubTransport {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                files: entries
                    .iter()
                    .map(|(p, b)| (p.to_string(), b.to_string()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl FileTransport for StubTransport {
        async fn fetch_file(&self, path: &str) -> Result<String> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("stub: no such file '{}'", path))
        }
    }

    fn node(path: &str) -> TreeNode {
        TreeNode {
            path: path.to_string(),
            kind: "blob".to_string(),
            size: None,
        }
    }

    #[tokio::test]
    async fn stops_at_file_count_cap_in_order() {
        let nodes: Vec<TreeNode> = (0..25).map(|i| node(&format!("f{:02}.rs", i))).collect();
        let entries: Vec<(String, String)> = nodes
            .iter()
            .map(|n| (n.path.clone(), "fn main() {}".to_string()))
            .collect();
        let entry_refs: Vec<(&str, &str)> = entries
            .iter()
            .map(|(p, b)| (p.as_str(), b.as_str()))
            .collect();
        let transport = StubTransport::new(&entry_refs);
        let refs: Vec<&TreeNode> = nodes.iter().collect();

        let report = fetch_candidates(&transport, &refs, FetchBudget::default()).await;

        assert_eq!(report.included_count(), 20);
        assert!(!report.byte_cap_hit);
        let paths: Vec<&str> = report.included().map(|f| f.path.as_str()).collect();
        let expected: Vec<String> = (0..20).map(|i| format!("f{:02}.rs", i)).collect();
        assert_eq!(paths, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn aggregate_pre_check_stops_before_overflow() {
        let nodes = vec![node("a.rs"), node("b.rs"), node("c.rs")];
        let (a, b, c) = ("x".repeat(60), "y".repeat(60), "z".repeat(10));
        let transport = StubTransport::new(&[
            ("a.rs", a.as_str()),
            ("b.rs", b.as_str()),
            ("c.rs", c.as_str()),
        ]);
        let refs: Vec<&TreeNode> = nodes.iter().collect();

        let report =
            fetch_candidates(&transport, &refs, FetchBudget::with_caps(20, 1_000, 100)).await;

        // 60 + 60 would overshoot the 100-byte cap, so the loop stops
        // with only the first file included.
        assert_eq!(report.included_count(), 1);
        assert!(report.byte_cap_hit);
    }

    #[tokio::test]
    async fn exact_fill_then_more_candidates_reports_cap_hit() {
        let nodes = vec![node("a.rs"), node("b.rs")];
        let exact = "x".repeat(100);
        let transport = StubTransport::new(&[("a.rs", exact.as_str()), ("b.rs", "leftover")]);
        let refs: Vec<&TreeNode> = nodes.iter().collect();

        let report =
            fetch_candidates(&transport, &refs, FetchBudget::with_caps(20, 1_000, 100)).await;

        assert_eq!(report.included_count(), 1);
        assert!(report.byte_cap_hit);
    }

    #[tokio::test]
    async fn oversized_body_is_discarded_without_consuming_a_slot() {
        let nodes = vec![node("big.rs"), node("small.rs")];
        let big = "x".repeat(80);
        let transport = StubTransport::new(&[("big.rs", big.as_str()), ("small.rs", "ok")]);
        let refs: Vec<&TreeNode> = nodes.iter().collect();

        // One file slot only: the oversized body must not take it.
        let report =
            fetch_candidates(&transport, &refs, FetchBudget::with_caps(1, 50, 1_000)).await;

        assert_eq!(report.included_count(), 1);
        let included: Vec<&str> = report.included().map(|f| f.path.as_str()).collect();
        assert_eq!(included, vec!["small.rs"]);
        assert!(matches!(
            report.outcomes[0],
            FetchOutcome::Skipped {
                reason: SkipReason::OverSize { actual: 80 },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn transport_failure_skips_and_continues() {
        let nodes = vec![node("missing.rs"), node("present.rs")];
        let transport = StubTransport::new(&[("present.rs", "pub fn x() {}")]);
        let refs: Vec<&TreeNode> = nodes.iter().collect();

        let report = fetch_candidates(&transport, &refs, FetchBudget::default()).await;

        assert_eq!(report.included_count(), 1);
        assert!(matches!(
            report.outcomes[0],
            FetchOutcome::Skipped {
                reason: SkipReason::Transport(_),
                ..
            }
        ));
    }

    #[test]
    fn envelope_decodes_base64_with_line_wrapping() {
        // "hello world" wrapped the way the API wraps long payloads
        let body = decode_envelope("aGVsbG8g\nd29ybGQ=\n", "base64").unwrap();
        assert_eq!(body, "hello world");
    }

    #[test]
    fn envelope_rejects_unknown_encoding() {
        assert!(decode_envelope("whatever", "none").is_err());
    }

    #[test]
    fn envelope_rejects_invalid_base64() {
        assert!(decode_envelope("!!not-base64!!", "base64").is_err());
    }
}
