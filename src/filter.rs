//! Source-file filtering.
//!
//! Pure predicates deciding which repository paths are worth fetching.
//! The policy favors plain human-authored source text: binary assets,
//! media, lockfiles, minified bundles, and declarative data files are
//! rejected by suffix; dependency and build-output directories are
//! rejected wholesale by path substring.

use crate::limits::MAX_FILE_BYTES;
use crate::tree::TreeNode;

/// Suffixes rejected case-insensitively. Ordinary extensions plus
/// compound suffixes like `.min.js` that a plain extension check would
/// misclassify as JavaScript source.
const DENIED_SUFFIXES: &[&str] = &[
    // images
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".webp", ".bmp",
    // archives
    ".zip", ".tar", ".gz", ".tgz", ".rar", ".7z", ".jar",
    // fonts
    ".woff", ".woff2", ".ttf", ".otf", ".eot",
    // audio / video
    ".mp3", ".mp4", ".wav", ".ogg", ".avi", ".mov", ".webm",
    // compiled and binary artifacts
    ".exe", ".dll", ".so", ".dylib", ".bin", ".pdf", ".pyc", ".class",
    // generated bundles and their source maps
    ".min.js", ".min.css", ".bundle.js", ".map",
    // lockfiles and declarative data
    ".lock", ".json", ".md", ".css", ".csv",
];

/// Path substrings marking non-source directories. The trailing slash
/// keeps file names like `builder.rs` from matching `build`.
const DENIED_DIR_SEGMENTS: &[&str] = &[
    "node_modules/",
    "bower_components/",
    "vendor/",
    "dist/",
    "build/",
    ".git/",
    "__pycache__/",
    ".idea/",
    ".vscode/",
];

/// Whether a repo-relative path looks like human-authored source text.
pub fn is_source_path(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();

    if DENIED_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return false;
    }
    if DENIED_DIR_SEGMENTS.iter().any(|d| lower.contains(d)) {
        return false;
    }
    true
}

/// Whether a declared tree size permits fetching.
///
/// Nodes at or over the per-file cap are rejected before any fetch
/// attempt. An absent size is unknown, not zero: the node passes and is
/// size-checked after fetching instead.
pub fn declared_size_ok(size: Option<u64>) -> bool {
    match size {
        Some(s) => s < MAX_FILE_BYTES as u64,
        None => true,
    }
}

/// Retain the tree's fetchable candidates, in enumeration order.
///
/// Only `blob` nodes are files; everything else (subtrees, submodule
/// commits) is ignored.
pub fn candidates(nodes: &[TreeNode]) -> Vec<&TreeNode> {
    nodes
        .iter()
        .filter(|n| n.kind == "blob")
        .filter(|n| is_source_path(&n.path))
        .filter(|n| declared_size_ok(n.size))
        .collect()
}
