//! # ghcommit-local
//!
//! Local file discovery for `gh-commit`.
//!
//! Resolves which files to commit from the caller's flags using `git`
//! plumbing, and names the remote repository from the remote URL. Nothing
//! here talks to the forge.

pub mod error;
pub mod git;
pub mod remote;
pub mod selection;

pub use error::LocalError;
pub use git::{remote_url, validate_local_git, CommandExecutor, SystemExecutor};
pub use remote::{parse_remote, RemoteRepo};
pub use selection::{select_files, FileSelection, FileStatus, SelectedFile};
