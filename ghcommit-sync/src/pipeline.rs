//! Run Orchestrator: the protocol's entry point.
//!
//! Direct commit:
//!   ensure target → blobs → tree on target tip → commit on target tip →
//!   advance target
//!
//! Pull-request commit:
//!   ensure base → ensure head (from base tip) → blobs → tree on head tip →
//!   commit on head tip → advance head → validate labels → PR → labels
//!
//! Nothing is rolled back. Objects created before a failed ref update stay
//! unreferenced on the forge.

use std::path::PathBuf;

use ghcommit_core::{BranchName, ObjectId, PullRequest, RepoContext, RunSettings};
use ghcommit_forge::{ForgeError, ObjectStore};

use crate::branch::{ensure_branch, ensure_branches};
use crate::commit::{advance_ref, create_commit};
use crate::error::SyncError;
use crate::outputs::CiOutputs;
use crate::publish::publish;
use crate::tree::{base_tree, build_blobs, build_tree};

/// Everything a run needs besides its settings. Built once, passed down.
pub struct RunContext<'a> {
    pub store: &'a dyn ObjectStore,
    pub repo: RepoContext,
    /// Local repository root; selected paths are relative to it.
    pub root: PathBuf,
    pub outputs: CiOutputs,
}

/// Result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Dry run: nothing was sent to the forge.
    DryRun { files: Vec<String> },
    Committed {
        branch: BranchName,
        commit: ObjectId,
        pull_request: Option<PullRequest>,
    },
}

/// Read the repository's default branch and its tip.
///
/// The forge answers ref lookups in an empty repository with 409 rather
/// than 404; both mean there is no initial commit to build on.
pub fn resolve_repository(
    store: &dyn ObjectStore,
    owner: &str,
    name: &str,
) -> Result<RepoContext, SyncError> {
    let info = store.get_repository()?;
    let default_branch = info.default_branch;
    let tip = match store.get_branch(&default_branch) {
        Ok(branch) => branch.tip,
        Err(err) if err.is_not_found() || matches!(err, ForgeError::Conflict { .. }) => {
            return Err(SyncError::MissingInitialCommit {
                branch: default_branch.0,
            })
        }
        Err(err) => return Err(err.into()),
    };
    let repo = RepoContext {
        owner: owner.to_string(),
        name: name.to_string(),
        default_branch,
        default_branch_sha: tip,
    };
    tracing::debug!(
        repo = %repo.slug(),
        branch = %repo.default_branch,
        tip = %repo.default_branch_sha,
        "resolved repository"
    );
    Ok(repo)
}

/// Run the protocol for `settings`.
pub fn run(ctx: &RunContext<'_>, settings: &RunSettings) -> Result<RunOutcome, SyncError> {
    if settings.files.is_empty() {
        return Err(SyncError::EmptyChangeSet);
    }
    if settings.dry_run {
        return Ok(RunOutcome::DryRun {
            files: settings.files.clone(),
        });
    }

    let store = ctx.store;
    let target = &settings.commit.branch;
    let tip = match &settings.pull_request {
        Some(pr) => ensure_branches(store, &ctx.repo, &pr.base, Some(&pr.head))?
            .commit_target()
            .tip
            .clone(),
        None => ensure_branch(store, target, &ctx.repo.default_branch_sha)?.tip,
    };

    let entries = build_blobs(store, &ctx.root, &settings.files)?;
    let base = base_tree(store, &tip)?;
    let tree = build_tree(store, &base, entries)?;
    let commit = create_commit(store, &tip, &tree, &settings.commit.message)?;
    advance_ref(store, target, &commit, &ctx.outputs)?;

    let pull_request = match &settings.pull_request {
        Some(spec) => Some(publish(store, spec, &ctx.outputs)?),
        None => None,
    };

    Ok(RunOutcome::Committed {
        branch: target.clone(),
        commit,
        pull_request,
    })
}
