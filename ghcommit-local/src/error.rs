//! Error types for ghcommit-local.

use thiserror::Error;

/// Precondition failures from the local repository, all raised before any
/// network call is made.
#[derive(Debug, Error)]
pub enum LocalError {
    /// Explicit paths were combined with `--all` / `--untracked`.
    #[error("`all` and `untracked` cannot be used with explicit file selection")]
    ConflictingSelection,

    /// Nothing to commit: no explicit paths and no `--all`, or no changes.
    #[error("no files were selected for commit")]
    NoFilesSelected,

    #[error("not a git repository")]
    NotARepository,

    #[error("git repository has no remotes configured")]
    NoRemote,

    #[error("the pattern(s) {patterns} did not match any files")]
    PatternMatchedNothing { patterns: String },

    #[error("remote URL '{url}' does not name an owner/repository")]
    UnrecognizedRemote { url: String },

    /// The command could not be started at all.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran and exited unsuccessfully.
    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
}
