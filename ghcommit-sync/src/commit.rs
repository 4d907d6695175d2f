//! Commit Assembler: one single-parent commit, then a fast-forward of the
//! branch ref.

use ghcommit_core::{BranchName, CommitObject, ObjectId};
use ghcommit_forge::ObjectStore;

use crate::error::SyncError;
use crate::outputs::CiOutputs;

/// Create a commit of `tree` whose only parent is `parent`.
pub fn create_commit(
    store: &dyn ObjectStore,
    parent: &ObjectId,
    tree: &ObjectId,
    message: &str,
) -> Result<ObjectId, SyncError> {
    let commit = CommitObject::new(message, tree.clone(), parent.clone());
    let sha = store.create_commit(&commit)?;
    tracing::debug!(%parent, %tree, commit = %sha, "commit");
    Ok(sha)
}

/// Move `branch` to `commit`. The forge rejects non-fast-forward moves; that
/// rejection is returned as-is and never retried.
///
/// On success the commit SHA is exported as the `sha` CI output.
pub fn advance_ref(
    store: &dyn ObjectStore,
    branch: &BranchName,
    commit: &ObjectId,
    outputs: &CiOutputs,
) -> Result<(), SyncError> {
    store.update_ref(branch, commit)?;
    tracing::info!(%branch, %commit, "advanced branch");
    outputs.export("sha", commit.as_str());
    Ok(())
}
