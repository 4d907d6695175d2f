//! gh-commit: commit local files to GitHub through the git data API.
//!
//! # Usage
//!
//! ```text
//! gh-commit <files>... -B <branch> -m <message>
//! gh-commit --all [--untracked] -B <branch> -m <message>
//! gh-commit <files>... -B <base> -m <message> --use-pr [-H <head>] [-T <title>] [-D <body>] [-l <label>]...
//! gh-commit ... --dry-run
//! ```
//!
//! Commits are created server-side, so they are signed by the forge and
//! nothing is pushed from the local clone.

mod commands;

use anyhow::Result;
use clap::Parser;

use commands::commit::CommitArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "gh-commit",
    version,
    about = "Create signed commits on GitHub from local files",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    commit: CommitArgs,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    cli.commit.run()
}

/// Diagnostics go to stderr so stdout stays the command's report.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
