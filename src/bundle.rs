//! Bundle assembly.
//!
//! Concatenates accepted file bodies into the single text artifact
//! handed to downstream analysis: a diagnostic header followed by each
//! body wrapped in start/end path markers, in fetch order. The budget
//! truncation flag and the server-side tree truncation are reported as
//! distinct diagnostics; only the former appears in the `Truncated`
//! field.

use crate::error::{AcquireError, Result};
use crate::fetch::FetchReport;
use crate::limits::MIN_BUNDLE_BYTES;

/// Header facts resolved earlier in the pipeline.
#[derive(Debug)]
pub struct BundleMeta<'a> {
    pub owner: &'a str,
    pub repo: &'a str,
    pub private: bool,
    /// The remote served a partial file listing.
    pub tree_truncated: bool,
}

/// Assemble the final bundle text.
///
/// An implausibly short bundle (below the minimal-content threshold) is
/// a hard failure: an empty or near-empty artifact is never returned as
/// success.
pub fn assemble(meta: &BundleMeta<'_>, report: &FetchReport) -> Result<String> {
    let mut header = vec![
        format!(
            "// Repository: {}/{}{}",
            meta.owner,
            meta.repo,
            if meta.private { " (Private)" } else { "" }
        ),
        format!("// Analyzed Files: {}", report.included_count()),
        format!(
            "// Truncated: {}",
            if report.byte_cap_hit {
                "Yes (Size Limit)"
            } else {
                "No"
            }
        ),
    ];
    if meta.tree_truncated {
        header.push("// Note: file listing truncated by the remote API".to_string());
    }

    let mut out = header.join("\n");
    for file in report.included() {
        out.push_str(&format!(
            "\n\n--- START OF FILE: {} ---\n{}\n--- END OF FILE: {} ---\n",
            file.path, file.body, file.path
        ));
    }

    if out.len() < MIN_BUNDLE_BYTES {
        return Err(AcquireError::NoContentRetrieved);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchOutcome, FileContent, SkipReason};

    fn meta<'a>() -> BundleMeta<'a> {
        BundleMeta {
            owner: "octocat",
            repo: "hello",
            private: false,
            tree_truncated: false,
        }
    }

    fn report_with(files: &[(&str, &str)], byte_cap_hit: bool) -> FetchReport {
        FetchReport {
            outcomes: files
                .iter()
                .map(|(p, b)| {
                    FetchOutcome::Included(FileContent {
                        path: p.to_string(),
                        body: b.to_string(),
                    })
                })
                .collect(),
            byte_cap_hit,
        }
    }

    #[test]
    fn header_count_matches_markers() {
        let report = report_with(
            &[
                ("src/a.rs", "fn a() {}\nfn a2() {}"),
                ("src/b.rs", "fn b() {}\nfn b2() {}"),
                ("src/c.rs", "fn c() {}\nfn c2() {}"),
            ],
            false,
        );
        let text = assemble(&meta(), &report).unwrap();

        assert!(text.contains("// Analyzed Files: 3\n"));
        assert_eq!(text.matches("--- START OF FILE:").count(), 3);
        assert_eq!(text.matches("--- END OF FILE:").count(), 3);
    }

    #[test]
    fn skipped_outcomes_do_not_count() {
        let body = "fn kept() {}".repeat(10);
        let mut report = report_with(&[("src/kept.rs", body.as_str())], false);
        report.outcomes.push(FetchOutcome::Skipped {
            path: "src/gone.rs".to_string(),
            reason: SkipReason::Transport("404".to_string()),
        });
        let text = assemble(&meta(), &report).unwrap();

        assert!(text.contains("// Analyzed Files: 1\n"));
        assert!(!text.contains("gone.rs"));
    }

    #[test]
    fn truncation_field_reflects_byte_cap_only() {
        let body = "x".repeat(200);
        let report = report_with(&[("a.rs", body.as_str())], true);
        let text = assemble(&meta(), &report).unwrap();
        assert!(text.contains("// Truncated: Yes (Size Limit)\n"));

        let report = report_with(&[("a.rs", body.as_str())], false);
        let text = assemble(&meta(), &report).unwrap();
        assert!(text.contains("// Truncated: No\n"));
    }

    #[test]
    fn private_repository_is_flagged_in_header() {
        let body = "y".repeat(200);
        let report = report_with(&[("a.rs", body.as_str())], false);
        let m = BundleMeta {
            private: true,
            ..meta()
        };
        let text = assemble(&m, &report).unwrap();
        assert!(text.starts_with("// Repository: octocat/hello (Private)\n"));
    }

    #[test]
    fn tree_truncation_is_a_distinct_note() {
        let body = "z".repeat(200);
        let report = report_with(&[("a.rs", body.as_str())], false);
        let m = BundleMeta {
            tree_truncated: true,
            ..meta()
        };
        let text = assemble(&m, &report).unwrap();
        assert!(text.contains("// Note: file listing truncated by the remote API\n"));
        assert!(text.contains("// Truncated: No\n"));
    }

    #[test]
    fn file_block_format_is_exact() {
        let body = "pub mod x;".repeat(12);
        let report = report_with(&[("src/lib.rs", body.as_str())], false);
        let text = assemble(&meta(), &report).unwrap();
        let expected = format!(
            "\n\n--- START OF FILE: src/lib.rs ---\n{}\n--- END OF FILE: src/lib.rs ---\n",
            body
        );
        assert!(text.ends_with(&expected));
    }

    #[test]
    fn zero_file_bundle_is_a_hard_failure() {
        // The header alone sits below the minimal-content threshold: an
        // all-skips acquisition must not look like success.
        let report = report_with(&[], false);
        assert!(matches!(
            assemble(&meta(), &report),
            Err(AcquireError::NoContentRetrieved)
        ));
    }
}
