//! In-process forge with git's object rules.
//!
//! [`MemoryStore`] keeps refs, commits, trees, blobs, labels and pull
//! requests in memory and records every [`Call`] made against it. Object ids
//! are derived from content, so identical requests produce identical ids.
//! Ref updates are checked for fast-forward the same way the forge does.
//! Used by the protocol tests; it performs no I/O.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use sha2::{Digest, Sha256};

use ghcommit_core::{BranchName, BranchRef, CommitObject, ObjectId, PullRequest, TreeNode};

use crate::error::{ForgeError, Operation};
use crate::store::ObjectStore;
use crate::wire::{CommitInfo, Label, NewBlob, NewPullRequest, RepositoryInfo};

/// One recorded request, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetRepository,
    GetBranch(BranchName),
    GetCommit(ObjectId),
    CreateRef { name: BranchName, sha: ObjectId },
    CreateBlob(NewBlob),
    CreateTree(TreeNode),
    CreateCommit(CommitObject),
    UpdateRef { name: BranchName, sha: ObjectId },
    GetLabel(String),
    CreatePullRequest(NewPullRequest),
    AddLabels { number: u64, labels: Vec<String> },
}

impl Call {
    pub fn operation(&self) -> Operation {
        match self {
            Self::GetRepository => Operation::GetRepository,
            Self::GetBranch(_) => Operation::GetBranch,
            Self::GetCommit(_) => Operation::GetCommit,
            Self::CreateRef { .. } => Operation::CreateRef,
            Self::CreateBlob(_) => Operation::CreateBlob,
            Self::CreateTree(_) => Operation::CreateTree,
            Self::CreateCommit(_) => Operation::CreateCommit,
            Self::UpdateRef { .. } => Operation::UpdateRef,
            Self::GetLabel(_) => Operation::GetLabel,
            Self::CreatePullRequest(_) => Operation::CreatePullRequest,
            Self::AddLabels { .. } => Operation::AddLabels,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    default_branch: BranchName,
    branches: BTreeMap<String, ObjectId>,
    commits: HashMap<ObjectId, CommitObject>,
    trees: HashSet<ObjectId>,
    blobs: HashMap<ObjectId, Vec<u8>>,
    labels: BTreeSet<String>,
    pulls: Vec<NewPullRequest>,
    issue_labels: BTreeMap<u64, Vec<String>>,
    denied: HashSet<Operation>,
    calls: Vec<Call>,
}

impl State {
    /// Is `ancestor` reachable from `descendant` through parent links?
    fn is_ancestor(&self, ancestor: &ObjectId, descendant: &ObjectId) -> bool {
        let mut pending = vec![descendant.clone()];
        let mut seen = HashSet::new();
        while let Some(sha) = pending.pop() {
            if &sha == ancestor {
                return true;
            }
            if !seen.insert(sha.clone()) {
                continue;
            }
            if let Some(commit) = self.commits.get(&sha) {
                pending.extend(commit.parents.iter().cloned());
            }
        }
        false
    }
}

/// In-memory [`ObjectStore`].
#[derive(Debug)]
pub struct MemoryStore {
    owner: String,
    repo: String,
    state: Mutex<State>,
}

impl MemoryStore {
    /// A repository whose default branch holds one root commit.
    pub fn new(default_branch: &str) -> Self {
        let store = Self::without_commits(default_branch);
        {
            let mut state = store.state();
            let tree = object_id("tree", b"");
            let root = CommitObject {
                message: "initial commit".to_string(),
                tree: tree.clone(),
                parents: Vec::new(),
            };
            let sha = commit_id(&root);
            state.trees.insert(tree);
            state.commits.insert(sha.clone(), root);
            state.branches.insert(default_branch.to_string(), sha);
        }
        store
    }

    /// A repository with a default branch name but no commits at all. Ref
    /// lookups answer 409, as the forge does for empty repositories.
    pub fn without_commits(default_branch: &str) -> Self {
        Self {
            owner: "octo".to_string(),
            repo: "hello".to_string(),
            state: Mutex::new(State {
                default_branch: BranchName::from(default_branch),
                ..State::default()
            }),
        }
    }

    /// Point `branch` at a root commit with the given explicit ids.
    pub fn with_branch_at(self, branch: &str, sha: &str, tree: &str) -> Self {
        {
            let mut state = self.state();
            let tree = ObjectId::from(tree);
            state.trees.insert(tree.clone());
            state.commits.insert(
                ObjectId::from(sha),
                CommitObject {
                    message: format!("tip of {branch}"),
                    tree,
                    parents: Vec::new(),
                },
            );
            state
                .branches
                .insert(branch.to_string(), ObjectId::from(sha));
        }
        self
    }

    /// Create `branch` at the current tip of `from`.
    pub fn with_branch_from(self, branch: &str, from: &str) -> Self {
        {
            let mut state = self.state();
            if let Some(tip) = state.branches.get(from).cloned() {
                state.branches.insert(branch.to_string(), tip);
            }
        }
        self
    }

    pub fn with_label(self, name: &str) -> Self {
        self.state().labels.insert(name.to_string());
        self
    }

    /// Answer every `operation` with 403.
    pub fn deny(self, operation: Operation) -> Self {
        self.state().denied.insert(operation);
        self
    }

    /// Move `branch` forward by one commit, as another writer would.
    pub fn advance_externally(&self, branch: &str) -> Option<ObjectId> {
        let mut state = self.state();
        let tip = state.branches.get(branch)?.clone();
        let tree = state.commits.get(&tip)?.tree.clone();
        let commit = CommitObject::new(format!("external change on {branch}"), tree, tip);
        let sha = commit_id(&commit);
        state.commits.insert(sha.clone(), commit);
        state.branches.insert(branch.to_string(), sha.clone());
        Some(sha)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// Number of recorded calls of one kind.
    pub fn count(&self, operation: Operation) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    pub fn tip(&self, branch: &str) -> Option<ObjectId> {
        self.state().branches.get(branch).cloned()
    }

    pub fn commit(&self, sha: &ObjectId) -> Option<CommitObject> {
        self.state().commits.get(sha).cloned()
    }

    pub fn blob(&self, sha: &ObjectId) -> Option<Vec<u8>> {
        self.state().blobs.get(sha).cloned()
    }

    pub fn pull_requests(&self) -> Vec<NewPullRequest> {
        self.state().pulls.clone()
    }

    pub fn labels_on(&self, number: u64) -> Vec<String> {
        self.state()
            .issue_labels
            .get(&number)
            .cloned()
            .unwrap_or_default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `call`, then refuse it if its operation is denied.
    fn begin(&self, call: Call, target: &str) -> Result<MutexGuard<'_, State>, ForgeError> {
        let operation = call.operation();
        let mut state = self.state();
        state.calls.push(call);
        if state.denied.contains(&operation) {
            return Err(ForgeError::from_status(operation, target, 403, "Resource not accessible"));
        }
        Ok(state)
    }
}

fn object_id(kind: &str, content: &[u8]) -> ObjectId {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update([0u8]);
    hasher.update(content);
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(40);
    ObjectId(digest)
}

fn commit_id(commit: &CommitObject) -> ObjectId {
    let mut content = format!("tree {}\n", commit.tree);
    for parent in &commit.parents {
        content.push_str(&format!("parent {parent}\n"));
    }
    content.push('\n');
    content.push_str(&commit.message);
    object_id("commit", content.as_bytes())
}

fn unprocessable(operation: Operation, target: &str, message: &str) -> ForgeError {
    ForgeError::from_status(operation, target, 422, message)
}

impl ObjectStore for MemoryStore {
    fn get_repository(&self) -> Result<RepositoryInfo, ForgeError> {
        let target = format!("{}/{}", self.owner, self.repo);
        let state = self.begin(Call::GetRepository, &target)?;
        Ok(RepositoryInfo {
            default_branch: state.default_branch.clone(),
        })
    }

    fn get_branch(&self, name: &BranchName) -> Result<BranchRef, ForgeError> {
        let state = self.begin(Call::GetBranch(name.clone()), &name.0)?;
        if state.commits.is_empty() {
            return Err(ForgeError::from_status(
                Operation::GetBranch,
                &name.0,
                409,
                "Git Repository is empty.",
            ));
        }
        match state.branches.get(&name.0) {
            Some(tip) => Ok(BranchRef {
                name: name.clone(),
                tip: tip.clone(),
            }),
            None => Err(ForgeError::from_status(Operation::GetBranch, &name.0, 404, "Not Found")),
        }
    }

    fn get_commit(&self, sha: &ObjectId) -> Result<CommitInfo, ForgeError> {
        let state = self.begin(Call::GetCommit(sha.clone()), &sha.0)?;
        match state.commits.get(sha) {
            Some(commit) => Ok(CommitInfo {
                sha: sha.clone(),
                tree: commit.tree.clone(),
            }),
            None => Err(ForgeError::from_status(Operation::GetCommit, &sha.0, 404, "Not Found")),
        }
    }

    fn create_ref(&self, name: &BranchName, sha: &ObjectId) -> Result<(), ForgeError> {
        let call = Call::CreateRef {
            name: name.clone(),
            sha: sha.clone(),
        };
        let mut state = self.begin(call, &name.0)?;
        if state.branches.contains_key(&name.0) {
            return Err(unprocessable(Operation::CreateRef, &name.0, "Reference already exists"));
        }
        if !state.commits.contains_key(sha) {
            return Err(unprocessable(Operation::CreateRef, &name.0, "Object does not exist"));
        }
        state.branches.insert(name.0.clone(), sha.clone());
        Ok(())
    }

    fn create_blob(&self, blob: &NewBlob) -> Result<ObjectId, ForgeError> {
        let target = format!("{} base64 bytes", blob.content.len());
        let mut state = self.begin(Call::CreateBlob(blob.clone()), &target)?;
        let bytes = blob
            .decoded()
            .ok_or_else(|| unprocessable(Operation::CreateBlob, &target, "invalid base64"))?;
        let sha = object_id("blob", &bytes);
        state.blobs.insert(sha.clone(), bytes);
        Ok(sha)
    }

    fn create_tree(&self, tree: &TreeNode) -> Result<ObjectId, ForgeError> {
        let target = tree.base_tree.0.clone();
        let mut state = self.begin(Call::CreateTree(tree.clone()), &target)?;
        if !state.trees.contains(&tree.base_tree) {
            return Err(unprocessable(Operation::CreateTree, &target, "base_tree is not a valid tree"));
        }
        for entry in &tree.entries {
            if let Some(sha) = &entry.sha {
                if !state.blobs.contains_key(sha) {
                    return Err(unprocessable(
                        Operation::CreateTree,
                        &entry.path,
                        "tree.sha is not a valid blob",
                    ));
                }
            }
        }
        let content = serde_json::to_vec(tree).map_err(|e| ForgeError::Other {
            operation: Operation::CreateTree,
            target: target.clone(),
            message: e.to_string(),
        })?;
        let sha = object_id("tree", &content);
        state.trees.insert(sha.clone());
        Ok(sha)
    }

    fn create_commit(&self, commit: &CommitObject) -> Result<ObjectId, ForgeError> {
        let target = commit.tree.0.clone();
        let mut state = self.begin(Call::CreateCommit(commit.clone()), &target)?;
        if !state.trees.contains(&commit.tree) {
            return Err(unprocessable(Operation::CreateCommit, &target, "Tree SHA does not exist"));
        }
        if commit.parents.iter().any(|p| !state.commits.contains_key(p)) {
            return Err(unprocessable(Operation::CreateCommit, &target, "Parent SHA does not exist"));
        }
        let sha = commit_id(commit);
        state.commits.insert(sha.clone(), commit.clone());
        Ok(sha)
    }

    fn update_ref(&self, name: &BranchName, sha: &ObjectId) -> Result<(), ForgeError> {
        let call = Call::UpdateRef {
            name: name.clone(),
            sha: sha.clone(),
        };
        let mut state = self.begin(call, &name.0)?;
        let current = state
            .branches
            .get(&name.0)
            .cloned()
            .ok_or_else(|| unprocessable(Operation::UpdateRef, &name.0, "Reference does not exist"))?;
        if !state.commits.contains_key(sha) {
            return Err(unprocessable(Operation::UpdateRef, &name.0, "Object does not exist"));
        }
        if !state.is_ancestor(&current, sha) {
            return Err(unprocessable(Operation::UpdateRef, &name.0, "Update is not a fast forward"));
        }
        state.branches.insert(name.0.clone(), sha.clone());
        Ok(())
    }

    fn get_label(&self, name: &str) -> Result<Label, ForgeError> {
        let state = self.begin(Call::GetLabel(name.to_string()), name)?;
        if state.labels.contains(name) {
            Ok(Label {
                name: name.to_string(),
            })
        } else {
            Err(ForgeError::from_status(Operation::GetLabel, name, 404, "Not Found"))
        }
    }

    fn create_pull_request(&self, request: &NewPullRequest) -> Result<PullRequest, ForgeError> {
        let target = request.head.clone();
        let mut state = self.begin(Call::CreatePullRequest(request.clone()), &target)?;
        for branch in [&request.base, &request.head] {
            if !state.branches.contains_key(branch) {
                return Err(unprocessable(
                    Operation::CreatePullRequest,
                    branch,
                    "Validation Failed",
                ));
            }
        }
        state.pulls.push(request.clone());
        let number = state.pulls.len() as u64;
        Ok(PullRequest {
            number,
            url: format!("https://github.com/{}/{}/pull/{number}", self.owner, self.repo),
        })
    }

    fn add_labels(&self, number: u64, labels: &[String]) -> Result<(), ForgeError> {
        let call = Call::AddLabels {
            number,
            labels: labels.to_vec(),
        };
        let target = format!("#{number}");
        let mut state = self.begin(call, &target)?;
        if number == 0 || number as usize > state.pulls.len() {
            return Err(ForgeError::from_status(Operation::AddLabels, &target, 404, "Not Found"));
        }
        state
            .issue_labels
            .entry(number)
            .or_default()
            .extend(labels.iter().cloned());
        Ok(())
    }
}
