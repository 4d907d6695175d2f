//! Blocking GitHub REST client.
//!
//! One [`GitHubClient`] is bound to one repository. Requests are sent
//! sequentially over a shared `ureq` agent; there is no retry loop.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use ghcommit_core::{
    BranchName, BranchRef, CommitObject, ForgeConfig, ObjectId, PullRequest, TreeNode,
};

use crate::error::{ForgeError, Operation};
use crate::store::ObjectStore;
use crate::wire::{
    CommitInfo, ErrorBody, Label, LabelsRequest, NewBlob, NewPullRequest, NewRef,
    PullRequestResponse, RefResponse, RefUpdate, RepositoryInfo, ShaResponse,
};

const TIMEOUT: Duration = Duration::from_secs(60);
const API_VERSION: &str = "2022-11-28";

/// Authenticated client for a single `owner/repo`.
pub struct GitHubClient {
    agent: ureq::Agent,
    base: Url,
    token: String,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Build a client from resolved configuration.
    pub fn new(
        config: &ForgeConfig,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Result<Self, ForgeError> {
        let owner = owner.into();
        let repo = repo.into();
        let target = format!("{owner}/{repo}");
        let base = Url::parse(&config.api_url).map_err(|e| ForgeError::Other {
            operation: Operation::GetRepository,
            target: target.clone(),
            message: format!("invalid API URL '{}': {e}", config.api_url),
        })?;
        if base.cannot_be_a_base() {
            return Err(ForgeError::Other {
                operation: Operation::GetRepository,
                target,
                message: format!("invalid API URL '{}'", config.api_url),
            });
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(TIMEOUT)
            .user_agent(concat!("gh-commit/", env!("CARGO_PKG_VERSION")))
            .build();

        Ok(Self {
            agent,
            base,
            token: config.token.clone(),
            owner,
            repo,
        })
    }

    /// `{base}/repos/{owner}/{repo}/{segments...}`, each segment
    /// percent-encoded on its own.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .push("repos")
                .push(&self.owner)
                .push(&self.repo)
                .extend(segments);
        }
        url
    }

    fn ref_endpoint(&self, kind: &str, branch: &BranchName) -> Url {
        self.endpoint(["git", kind, "heads"].into_iter().chain(branch.0.split('/')))
    }

    fn execute(
        &self,
        operation: Operation,
        target: &str,
        method: &str,
        url: &Url,
        body: Option<&impl Serialize>,
    ) -> Result<ureq::Response, ForgeError> {
        tracing::debug!(%operation, subject = target, %url, "{method}");
        let request = self
            .agent
            .request_url(method, url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", API_VERSION);

        let result = match body {
            Some(body) => {
                let value = serde_json::to_value(body).map_err(|e| ForgeError::Other {
                    operation,
                    target: target.to_string(),
                    message: format!("failed to encode request: {e}"),
                })?;
                request.send_json(value)
            }
            None => request.call(),
        };

        result.map_err(|err| classify(operation, target, err))
    }

    fn send<T: DeserializeOwned>(
        &self,
        operation: Operation,
        target: &str,
        method: &str,
        url: &Url,
        body: Option<&impl Serialize>,
    ) -> Result<T, ForgeError> {
        let response = self.execute(operation, target, method, url, body)?;
        response.into_json::<T>().map_err(|e| ForgeError::Other {
            operation,
            target: target.to_string(),
            message: format!("failed to decode response: {e}"),
        })
    }
}

/// Map a `ureq` failure onto the forge taxonomy.
fn classify(operation: Operation, target: &str, err: ureq::Error) -> ForgeError {
    match err {
        ureq::Error::Status(status, response) => {
            let message = response
                .into_string()
                .ok()
                .and_then(|raw| serde_json::from_str::<ErrorBody>(&raw).ok())
                .map(|body| body.message)
                .unwrap_or_default();
            ForgeError::from_status(operation, target, status, message)
        }
        ureq::Error::Transport(transport) => ForgeError::Transient {
            operation,
            target: target.to_string(),
            message: transport.to_string(),
        },
    }
}

const NO_BODY: Option<&()> = None;

impl ObjectStore for GitHubClient {
    fn get_repository(&self) -> Result<RepositoryInfo, ForgeError> {
        let target = format!("{}/{}", self.owner, self.repo);
        let url = self.endpoint(std::iter::empty());
        self.send(Operation::GetRepository, &target, "GET", &url, NO_BODY)
    }

    fn get_branch(&self, name: &BranchName) -> Result<BranchRef, ForgeError> {
        let url = self.ref_endpoint("ref", name);
        let found: RefResponse = self.send(Operation::GetBranch, &name.0, "GET", &url, NO_BODY)?;
        Ok(BranchRef {
            name: name.clone(),
            tip: found.object.sha,
        })
    }

    fn get_commit(&self, sha: &ObjectId) -> Result<CommitInfo, ForgeError> {
        let url = self.endpoint(["git", "commits", sha.as_str()]);
        self.send(Operation::GetCommit, &sha.0, "GET", &url, NO_BODY)
    }

    fn create_ref(&self, name: &BranchName, sha: &ObjectId) -> Result<(), ForgeError> {
        let url = self.endpoint(["git", "refs"]);
        let body = NewRef::branch(name, sha);
        self.execute(Operation::CreateRef, &name.0, "POST", &url, Some(&body))?;
        Ok(())
    }

    fn create_blob(&self, blob: &NewBlob) -> Result<ObjectId, ForgeError> {
        let url = self.endpoint(["git", "blobs"]);
        let created: ShaResponse = self.send(
            Operation::CreateBlob,
            &format!("{} base64 bytes", blob.content.len()),
            "POST",
            &url,
            Some(blob),
        )?;
        Ok(created.sha)
    }

    fn create_tree(&self, tree: &TreeNode) -> Result<ObjectId, ForgeError> {
        let url = self.endpoint(["git", "trees"]);
        let created: ShaResponse =
            self.send(Operation::CreateTree, &tree.base_tree.0, "POST", &url, Some(tree))?;
        Ok(created.sha)
    }

    fn create_commit(&self, commit: &CommitObject) -> Result<ObjectId, ForgeError> {
        let url = self.endpoint(["git", "commits"]);
        let created: ShaResponse =
            self.send(Operation::CreateCommit, &commit.tree.0, "POST", &url, Some(commit))?;
        Ok(created.sha)
    }

    fn update_ref(&self, name: &BranchName, sha: &ObjectId) -> Result<(), ForgeError> {
        let url = self.ref_endpoint("refs", name);
        let body = RefUpdate {
            sha: sha.clone(),
            force: false,
        };
        self.execute(Operation::UpdateRef, &name.0, "PATCH", &url, Some(&body))?;
        Ok(())
    }

    fn get_label(&self, name: &str) -> Result<Label, ForgeError> {
        let url = self.endpoint(["labels", name]);
        self.send(Operation::GetLabel, name, "GET", &url, NO_BODY)
    }

    fn create_pull_request(&self, request: &NewPullRequest) -> Result<PullRequest, ForgeError> {
        let url = self.endpoint(["pulls"]);
        let created: PullRequestResponse = self.send(
            Operation::CreatePullRequest,
            &request.head,
            "POST",
            &url,
            Some(request),
        )?;
        Ok(PullRequest {
            number: created.number,
            url: created.html_url,
        })
    }

    fn add_labels(&self, number: u64, labels: &[String]) -> Result<(), ForgeError> {
        let number = number.to_string();
        let url = self.endpoint(["issues", number.as_str(), "labels"]);
        let body = LabelsRequest {
            labels: labels.to_vec(),
        };
        self.execute(Operation::AddLabels, &format!("#{number}"), "POST", &url, Some(&body))?;
        Ok(())
    }
}
