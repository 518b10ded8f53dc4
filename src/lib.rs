//! # Repo Bundle
//!
//! Bounded acquisition of remote repository source into a single
//! analyzable text bundle.
//!
//! Point the pipeline at a loosely-specified locator string (a full
//! repository URL, a single blob URL, or a gist) and receive one
//! deterministic, diagnostic-annotated text artifact suitable for
//! downstream analysis by an AI summarizer external to this crate.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐  repo   ┌────────────┐   ┌────────┐   ┌──────────┐   ┌───────────┐
//! │ Classifier │────────▶│    Tree     │──▶│ Filter │──▶│ Budgeted │──▶│  Bundle    │
//! │            │         │ Enumerator │   │        │   │ Fetcher  │   │ Assembler │
//! └─────┬──────┘         └────────────┘   └────────┘   └──────────┘   └───────────┘
//!       │ blob / gist
//!       └─────────────▶ direct raw fetch (no header, no budget)
//! ```
//!
//! Acquisition is best-effort and hard-bounded: at most 20 files,
//! 150 kB per file, 800 kB in aggregate. Per-file fetch failures are
//! skipped; only a bundle with no usable content at all is a failure.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), repo_bundle::AcquireError> {
//! let bundle = repo_bundle::acquire("https://github.com/tokio-rs/tokio", None).await?;
//! println!("{}", bundle);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`locator`] | Locator classification (blob / gist / repository) |
//! | [`tree`] | Repository metadata and recursive tree enumeration |
//! | [`filter`] | Source-file predicates and size prechecks |
//! | [`fetch`] | Transport selection, budget counters, fetch loop |
//! | [`bundle`] | Header and marker-delimited bundle assembly |
//! | [`acquire`] | Pipeline orchestration |
//! | [`error`] | Failure taxonomy |
//! | [`limits`] | Fixed acquisition policy |

pub mod acquire;
pub mod bundle;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod limits;
pub mod locator;
pub mod tree;

pub use acquire::acquire;
pub use error::AcquireError;
pub use locator::Locator;
