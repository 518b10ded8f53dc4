//! Locator classification.
//!
//! The pipeline accepts one loosely-specified string naming a remote
//! code resource. Classification decides which acquisition strategy
//! applies: a single raw fetch (blob or gist) or full repository
//! enumeration. A [`Locator`] is immutable once classified; a new
//! acquisition call re-classifies from scratch.

use crate::error::{AcquireError, Result};
use url::Url;

/// A classified locator and everything derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// A single file inside a repository. Carries the one canonical
    /// raw-content URL; no enumeration or budgeting follows.
    Blob { raw_url: String },
    /// A gist. Same single-fetch strategy as a blob.
    Gist { raw_url: String },
    /// A whole repository, to be enumerated, filtered, and fetched
    /// under budget.
    Repository { owner: String, repo: String },
}

/// Classify a raw locator string.
///
/// Scheme-less input (`github.com/owner/repo`) is accepted by assuming
/// `https://`. A trailing `.git` on the repository segment is stripped.
pub fn classify(input: &str) -> Result<Locator> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AcquireError::InvalidLocator(
            "empty locator string".to_string(),
        ));
    }

    let normalized = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    // A blob path names exactly one file: rewrite to the raw-content
    // host and fetch it directly, skipping enumeration entirely.
    if normalized.contains("/blob/") {
        let raw_url = normalized
            .replacen("github.com", "raw.githubusercontent.com", 1)
            .replacen("/blob/", "/", 1);
        return Ok(Locator::Blob { raw_url });
    }

    if normalized.contains("gist.github.com") {
        let raw_url = format!("{}/raw", normalized.trim_end_matches('/'));
        return Ok(Locator::Gist { raw_url });
    }

    let parsed = Url::parse(&normalized)
        .map_err(|e| AcquireError::InvalidLocator(format!("{}: {}", trimmed, e)))?;

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    if segments.len() < 2 {
        return Err(AcquireError::InvalidLocator(format!(
            "expected owner/repo form, got '{}'",
            trimmed
        )));
    }

    let owner = segments[0].to_string();
    let repo = segments[1].trim_end_matches(".git").to_string();

    Ok(Locator::Repository { owner, repo })
}
