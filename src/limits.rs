//! Fixed acquisition policy.
//!
//! These caps bound how much content one acquisition call may retrieve.
//! They are compile-time policy, not runtime configuration: every caller
//! gets the same deterministic, bounded behavior for the same repository
//! snapshot.

/// Maximum number of files included in one bundle.
pub const MAX_FILES: usize = 20;

/// Maximum size of a single included file, in bytes.
///
/// Applied twice: against the declared tree size before fetching (saves
/// the round trip) and against the actual body length after fetching,
/// since the tree may omit or understate sizes.
pub const MAX_FILE_BYTES: usize = 150_000;

/// Maximum aggregate size of all included file bodies, in bytes.
pub const MAX_TOTAL_BYTES: usize = 800_000;

/// Minimum plausible bundle length. Anything shorter is treated as a
/// failed acquisition rather than returned as an empty success.
pub const MIN_BUNDLE_BYTES: usize = 100;

/// Base URL of the GitHub REST API.
pub const API_BASE: &str = "https://api.github.com";

/// Host serving raw file bodies for unauthenticated fetches.
pub const RAW_HOST: &str = "https://raw.githubusercontent.com";

/// User-Agent sent with every remote request. GitHub rejects requests
/// without one.
pub const USER_AGENT: &str = "repo-bundle/0.1";

/// Timeout applied to each remote request.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
