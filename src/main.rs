//! # Repo Bundle CLI (`rbundle`)
//!
//! Thin command-line wrapper around the acquisition pipeline.
//!
//! ## Usage
//!
//! ```bash
//! # Fetch a public repository into a bundle on stdout
//! rbundle fetch https://github.com/tokio-rs/tokio
//!
//! # Write the bundle to a file, authenticated
//! rbundle fetch https://github.com/acme/private-repo --token ghp_... --out bundle.txt
//!
//! # A single blob or gist returns the raw file body
//! rbundle fetch https://gist.github.com/someone/abc123
//!
//! # Show how a locator string is classified
//! rbundle classify github.com/rust-lang/rust
//! ```
//!
//! The access token may also be supplied via the `GITHUB_TOKEN`
//! environment variable. It is used for every remote call of one
//! acquisition and never written to output or logs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use repo_bundle::{acquire, locator};

#[derive(Parser)]
#[command(
    name = "rbundle",
    about = "Bounded acquisition of remote repository source into a single analyzable text bundle",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Acquire a bundle for a locator.
    ///
    /// Repository locators are enumerated, filtered, and fetched under
    /// the fixed budgets (20 files, 150 kB per file, 800 kB total).
    /// Blob and gist locators are fetched directly and printed verbatim.
    Fetch {
        /// Repository, blob, or gist locator (URL; scheme optional).
        locator: String,

        /// GitHub access token. Falls back to the GITHUB_TOKEN
        /// environment variable.
        #[arg(long)]
        token: Option<String>,

        /// Write the bundle to a file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Classify a locator string without fetching anything.
    ///
    /// Useful for checking how an input will be interpreted before
    /// spending API budget on it.
    Classify {
        /// Locator string to classify.
        locator: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            locator,
            token,
            out,
        } => {
            let token = token.or_else(|| std::env::var("GITHUB_TOKEN").ok());
            let bundle = acquire(&locator, token.as_deref()).await?;

            match out {
                Some(path) => {
                    std::fs::write(&path, &bundle)?;
                    eprintln!("Wrote {} bytes to {}", bundle.len(), path.display());
                }
                None => print!("{}", bundle),
            }
        }
        Commands::Classify { locator } => match locator::classify(&locator)? {
            locator::Locator::Blob { raw_url } => println!("blob: {}", raw_url),
            locator::Locator::Gist { raw_url } => println!("gist: {}", raw_url),
            locator::Locator::Repository { owner, repo } => {
                println!("repository: {}/{}", owner, repo)
            }
        },
    }

    Ok(())
}
