//! Error types for ghcommit-core.

use thiserror::Error;

/// Problems with the run configuration, detected before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// `--branch` was empty.
    #[error("--branch is required")]
    MissingBranch,

    /// `--message` was empty.
    #[error("--message is required")]
    MissingMessage,

    /// A head ref equal to the base ref would make the PR diff empty.
    #[error("head ref '{0}' must differ from the base branch")]
    HeadEqualsBase(String),

    /// A label was passed as an empty string.
    #[error("labels must not be empty")]
    EmptyLabel,

    /// No forge token was found in the environment.
    #[error("no forge token found; set GH_TOKEN or GITHUB_TOKEN")]
    MissingToken,
}
