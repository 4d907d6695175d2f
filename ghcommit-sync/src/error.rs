//! Error types for ghcommit-sync.

use std::path::PathBuf;

use thiserror::Error;

use ghcommit_forge::ForgeError;

/// All errors that can arise while running the commit protocol.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A forge call failed; carries the operation and its target.
    #[error(transparent)]
    Forge(#[from] ForgeError),

    /// A requested label does not exist on the repository.
    #[error("label '{label}' not found; create the label first")]
    LabelNotFound { label: String },

    /// The change set was empty.
    #[error("no changes to commit")]
    EmptyChangeSet,

    /// The repository's default branch has no commit to build on.
    #[error("branch '{branch}' has no commits; the repository needs an initial commit")]
    MissingInitialCommit { branch: String },

    /// Reading a local file failed for a reason other than absence.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
