//! Failure taxonomy for the acquisition pipeline.
//!
//! Every error is a terminal, human-readable outcome of one acquisition
//! call. Nothing here is retried automatically: the pipeline is a
//! best-effort, single-pass design where per-file problems are skipped
//! and only whole-pipeline problems surface as an `AcquireError`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AcquireError>;

#[derive(Error, Debug)]
pub enum AcquireError {
    /// The input string could not be classified as a repository, blob,
    /// or gist locator.
    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    /// The remote API refused the call with a rate-limit status. A
    /// credential raises the limit substantially, so suggest one.
    #[error("GitHub API rate limit exceeded. Provide an access token to continue.")]
    RateLimited,

    /// Repository metadata lookup returned 404. When the caller supplied
    /// no credential the repository may simply be private, so the
    /// message hints at that possibility.
    #[error("Repository not found.{}", private_hint_suffix(.private_hint))]
    RepositoryNotFound { private_hint: bool },

    /// A blob or gist locator resolved to nothing.
    #[error("File not found.{}", private_hint_suffix(.private_hint))]
    FileNotFound { private_hint: bool },

    /// Any other non-success status from a required metadata call.
    #[error("GitHub API error: {0}")]
    RemoteApiError(String),

    /// The recursive tree listing could not be retrieved.
    #[error("Failed to fetch repository file tree: {0}")]
    TreeFetchFailed(String),

    /// Enumeration and filtering left zero candidate files.
    #[error("No suitable source files found in the repository.")]
    NoSuitableFiles,

    /// Every fetch attempt failed, or the assembled bundle fell below
    /// the minimal-content threshold.
    #[error("Could not retrieve any file content from the repository.")]
    NoContentRetrieved,

    /// Transport-level failure before an HTTP status existed (DNS,
    /// connect, timeout).
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),
}

fn private_hint_suffix(hint: &bool) -> &'static str {
    if *hint {
        " If it is private, provide an access token."
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_hints_private_without_credential() {
        let err = AcquireError::RepositoryNotFound { private_hint: true };
        assert!(err.to_string().contains("private"));
    }

    #[test]
    fn not_found_omits_hint_with_credential() {
        let err = AcquireError::RepositoryNotFound {
            private_hint: false,
        };
        assert!(!err.to_string().contains("private"));
    }

    #[test]
    fn rate_limit_suggests_token() {
        assert!(AcquireError::RateLimited.to_string().contains("token"));
    }
}
