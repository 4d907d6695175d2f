//! Domain types for the remote commit protocol.
//!
//! Object ids are always server-assigned; nothing in this module computes a
//! hash. Paths inside [`BlobEntry`] are repository-relative and use `/`.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed branch name (without the `refs/heads/` prefix).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchName(pub String);

impl BranchName {
    /// Fully-qualified ref name, e.g. `refs/heads/main`.
    pub fn full_ref(&self) -> String {
        format!("refs/heads/{}", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for BranchName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BranchName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A git object id (commit, tree or blob SHA) as returned by the forge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ObjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Tree entry file mode. Entries are always regular, non-executable files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FileMode {
    #[default]
    #[serde(rename = "100644")]
    Regular,
}

/// Kind of git object a tree entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    #[default]
    Blob,
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// Identity of the target repository, resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoContext {
    pub owner: String,
    pub name: String,
    pub default_branch: BranchName,
    pub default_branch_sha: ObjectId,
}

impl RepoContext {
    /// `owner/name`.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// A named pointer into the commit graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    pub name: BranchName,
    pub tip: ObjectId,
}

/// One tree entry: a file's blob, or a deletion marker when `sha` is `None`.
///
/// Serializes to the forge's tree entry shape, keeping `"sha": null` for
/// deletions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobEntry {
    pub path: String,
    pub mode: FileMode,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    pub sha: Option<ObjectId>,
}

impl BlobEntry {
    /// Entry for a regular file whose content is stored as `sha`.
    pub fn file(path: impl Into<String>, sha: ObjectId) -> Self {
        Self {
            path: path.into(),
            mode: FileMode::Regular,
            kind: ObjectKind::Blob,
            sha: Some(sha),
        }
    }

    /// Entry removing `path` from the base tree.
    pub fn deletion(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: FileMode::Regular,
            kind: ObjectKind::Blob,
            sha: None,
        }
    }
}

/// A tree to be created on top of `base_tree`.
///
/// Paths not listed in `entries` are inherited from the base tree by the
/// forge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub base_tree: ObjectId,
    #[serde(rename = "tree")]
    pub entries: Vec<BlobEntry>,
}

/// A single-parent commit to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitObject {
    pub message: String,
    pub tree: ObjectId,
    pub parents: Vec<ObjectId>,
}

impl CommitObject {
    pub fn new(message: impl Into<String>, tree: ObjectId, parent: ObjectId) -> Self {
        Self {
            message: message.into(),
            tree,
            parents: vec![parent],
        }
    }
}

/// Desired pull request metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestSpec {
    pub base: BranchName,
    pub head: BranchName,
    pub title: String,
    pub description: String,
    pub labels: Vec<String>,
}

/// A pull request as reported back by the forge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub url: String,
}
