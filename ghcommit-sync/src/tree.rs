//! Tree Builder: local files to blobs, blobs to a tree on a base tree.
//!
//! No local diffing happens here. Which paths changed is decided by the
//! caller; a path that no longer exists on disk becomes a deletion entry.

use std::io::ErrorKind;
use std::path::Path;

use ghcommit_core::{BlobEntry, ObjectId, TreeNode};
use ghcommit_forge::{NewBlob, ObjectStore};

use crate::error::{io_err, SyncError};

/// Upload one blob per existing file and emit a deletion entry for every
/// missing one, preserving the order of `paths`.
pub fn build_blobs(
    store: &dyn ObjectStore,
    root: &Path,
    paths: &[String],
) -> Result<Vec<BlobEntry>, SyncError> {
    let mut entries = Vec::with_capacity(paths.len());
    for path in paths {
        let local = root.join(path);
        let entry = match std::fs::read(&local) {
            Ok(data) => {
                let sha = store.create_blob(&NewBlob::from_bytes(&data))?;
                tracing::debug!(path = %path, %sha, bytes = data.len(), "blob");
                BlobEntry::file(path.as_str(), sha)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path, "deletion");
                BlobEntry::deletion(path.as_str())
            }
            Err(e) => return Err(io_err(local, e)),
        };
        entries.push(entry);
    }
    Ok(entries)
}

/// The tree of commit `tip`, used as the base for the new tree.
pub fn base_tree(store: &dyn ObjectStore, tip: &ObjectId) -> Result<ObjectId, SyncError> {
    Ok(store.get_commit(tip)?.tree)
}

/// Create a tree layering `entries` over `base_tree`.
pub fn build_tree(
    store: &dyn ObjectStore,
    base_tree: &ObjectId,
    entries: Vec<BlobEntry>,
) -> Result<ObjectId, SyncError> {
    if entries.is_empty() {
        return Err(SyncError::EmptyChangeSet);
    }
    let node = TreeNode {
        base_tree: base_tree.clone(),
        entries,
    };
    let sha = store.create_tree(&node)?;
    tracing::debug!(base = %base_tree, tree = %sha, entries = node.entries.len(), "tree");
    Ok(sha)
}
