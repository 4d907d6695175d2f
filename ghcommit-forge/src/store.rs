//! The object store seam between the protocol and the forge.

use ghcommit_core::{BranchName, BranchRef, CommitObject, ObjectId, PullRequest, TreeNode};

use crate::error::ForgeError;
use crate::wire::{CommitInfo, Label, NewBlob, NewPullRequest, RepositoryInfo};

/// Typed operations over one repository on the forge.
///
/// Implementations classify every failure into [`ForgeError`] and never
/// retry; retry policy belongs to the caller.
pub trait ObjectStore {
    /// Repository metadata, used for the default branch.
    fn get_repository(&self) -> Result<RepositoryInfo, ForgeError>;

    /// Look up a branch and its tip. A missing branch is
    /// [`ForgeError::NotFound`].
    fn get_branch(&self, name: &BranchName) -> Result<BranchRef, ForgeError>;

    /// Read a commit, mainly for its tree.
    fn get_commit(&self, sha: &ObjectId) -> Result<CommitInfo, ForgeError>;

    /// Create `refs/heads/{name}` pointing at `sha`.
    fn create_ref(&self, name: &BranchName, sha: &ObjectId) -> Result<(), ForgeError>;

    fn create_blob(&self, blob: &NewBlob) -> Result<ObjectId, ForgeError>;

    fn create_tree(&self, tree: &TreeNode) -> Result<ObjectId, ForgeError>;

    fn create_commit(&self, commit: &CommitObject) -> Result<ObjectId, ForgeError>;

    /// Move `refs/heads/{name}` to `sha`. Non-fast-forward updates are
    /// rejected by the forge as [`ForgeError::Conflict`].
    fn update_ref(&self, name: &BranchName, sha: &ObjectId) -> Result<(), ForgeError>;

    fn get_label(&self, name: &str) -> Result<Label, ForgeError>;

    fn create_pull_request(&self, request: &NewPullRequest) -> Result<PullRequest, ForgeError>;

    /// Attach `labels` to the issue/PR `number` in one call.
    fn add_labels(&self, number: u64, labels: &[String]) -> Result<(), ForgeError>;
}
