//! ghcommit core library: domain types, run settings and forge configuration.
//!
//! - [`types`]: newtypes and git object shapes
//! - [`settings`]: [`RunSettings`] and its defaults
//! - [`config`]: [`ForgeConfig`] from the environment
//! - [`error`]: [`SettingsError`]

pub mod config;
pub mod error;
pub mod settings;
pub mod types;

pub use config::{CiEnvironment, ForgeConfig};
pub use error::SettingsError;
pub use settings::{CommitSettings, RunOptions, RunSettings};
pub use types::{
    BlobEntry, BranchName, BranchRef, CommitObject, FileMode, ObjectId, ObjectKind, PullRequest,
    PullRequestSpec, RepoContext, TreeNode,
};
