//! Branch Resolver: make sure the branches a run writes to exist.

use ghcommit_core::{BranchName, BranchRef, ObjectId, RepoContext};
use ghcommit_forge::ObjectStore;

use crate::error::SyncError;

/// Return `name`'s current tip, creating the branch at `fallback` when it
/// does not exist. Any failure other than not-found is fatal.
pub fn ensure_branch(
    store: &dyn ObjectStore,
    name: &BranchName,
    fallback: &ObjectId,
) -> Result<BranchRef, SyncError> {
    match store.get_branch(name) {
        Ok(found) => {
            tracing::debug!(branch = %name, tip = %found.tip, "branch exists");
            Ok(found)
        }
        Err(err) if err.is_not_found() => {
            store.create_ref(name, fallback)?;
            tracing::info!(branch = %name, from = %fallback, "created branch");
            Ok(BranchRef {
                name: name.clone(),
                tip: fallback.clone(),
            })
        }
        Err(err) => Err(err.into()),
    }
}

/// The branches resolved for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsuredBranches {
    pub base: BranchRef,
    /// Present in the pull-request workflow only.
    pub head: Option<BranchRef>,
}

impl EnsuredBranches {
    /// The branch the new commit is built on and advanced.
    pub fn commit_target(&self) -> &BranchRef {
        self.head.as_ref().unwrap_or(&self.base)
    }
}

/// Resolve `base` from the default branch tip, then `head` (if any) from
/// the base branch's resolved tip.
pub fn ensure_branches(
    store: &dyn ObjectStore,
    repo: &RepoContext,
    base: &BranchName,
    head: Option<&BranchName>,
) -> Result<EnsuredBranches, SyncError> {
    let base = ensure_branch(store, base, &repo.default_branch_sha)?;
    let head = match head {
        Some(head) => Some(ensure_branch(store, head, &base.tip)?),
        None => None,
    };
    Ok(EnsuredBranches { base, head })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghcommit_forge::{ForgeError, MemoryStore, Operation};

    fn repo(store: &MemoryStore) -> RepoContext {
        RepoContext {
            owner: "octo".into(),
            name: "hello".into(),
            default_branch: BranchName::from("main"),
            default_branch_sha: store.tip("main").unwrap(),
        }
    }

    #[test]
    fn existing_branch_is_not_touched() {
        let store = MemoryStore::new("main");
        let tip = store.tip("main").unwrap();
        let found = ensure_branch(&store, &BranchName::from("main"), &ObjectId::from("x")).unwrap();
        assert_eq!(found.tip, tip);
        assert_eq!(store.count(Operation::CreateRef), 0);
    }

    #[test]
    fn ensure_is_idempotent() {
        let store = MemoryStore::new("main");
        let fallback = store.tip("main").unwrap();
        let name = BranchName::from("topic");
        let first = ensure_branch(&store, &name, &fallback).unwrap();
        let second = ensure_branch(&store, &name, &fallback).unwrap();
        assert_eq!(first.tip, second.tip);
        assert_eq!(store.count(Operation::CreateRef), 1);
    }

    #[test]
    fn auth_failure_on_lookup_is_fatal() {
        let store = MemoryStore::new("main").deny(Operation::GetBranch);
        let err = ensure_branch(&store, &BranchName::from("main"), &ObjectId::from("x"))
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::Forge(ForgeError::Unauthorized { .. })
        ));
        assert_eq!(store.count(Operation::CreateRef), 0);
    }

    #[test]
    fn head_is_created_from_base_tip_not_default() {
        let store = MemoryStore::new("main").with_branch_from("release", "main");
        let release_tip = store.advance_externally("release").unwrap();
        let ctx = repo(&store);
        assert_ne!(ctx.default_branch_sha, release_tip);

        let branches = ensure_branches(
            &store,
            &ctx,
            &BranchName::from("release"),
            Some(&BranchName::from("release-1")),
        )
        .unwrap();
        assert_eq!(branches.base.tip, release_tip);
        assert_eq!(branches.commit_target().tip, release_tip);
        assert_eq!(store.tip("release-1"), Some(release_tip));
    }
}
