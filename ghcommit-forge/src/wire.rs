//! Request and response bodies of the forge REST API.
//!
//! Every body is a typed struct serialized through serde; no JSON is ever
//! assembled by string concatenation. Response structs only name the fields
//! the protocol reads.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use ghcommit_core::{BranchName, ObjectId};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// `POST git/refs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRef {
    #[serde(rename = "ref")]
    pub full_ref: String,
    pub sha: ObjectId,
}

impl NewRef {
    pub fn branch(name: &BranchName, sha: &ObjectId) -> Self {
        Self {
            full_ref: name.full_ref(),
            sha: sha.clone(),
        }
    }
}

/// `POST git/blobs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBlob {
    pub content: String,
    pub encoding: &'static str,
}

impl NewBlob {
    /// Base64-encode raw file bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self {
            content: STANDARD.encode(data),
            encoding: "base64",
        }
    }

    /// Decode the content back into bytes.
    pub fn decoded(&self) -> Option<Vec<u8>> {
        STANDARD.decode(&self.content).ok()
    }
}

/// `PATCH git/refs/heads/{branch}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefUpdate {
    pub sha: ObjectId,
    /// Always `false`: only fast-forward updates are requested.
    pub force: bool,
}

/// `POST pulls`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPullRequest {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

/// `POST issues/{number}/labels`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelsRequest {
    pub labels: Vec<String>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// `GET repos/{owner}/{repo}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryInfo {
    pub default_branch: BranchName,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ShaResponse {
    pub sha: ObjectId,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RefResponse {
    pub object: ShaResponse,
}

/// `GET git/commits/{sha}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitInfo {
    pub sha: ObjectId,
    #[serde(deserialize_with = "tree_sha")]
    pub tree: ObjectId,
}

fn tree_sha<'de, D>(deserializer: D) -> Result<ObjectId, D::Error>
where
    D: serde::Deserializer<'de>,
{
    ShaResponse::deserialize(deserializer).map(|s| s.sha)
}

/// `GET labels/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PullRequestResponse {
    pub number: u64,
    pub html_url: String,
}

/// Error payload the forge attaches to 4xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_content_is_base64() {
        let blob = NewBlob::from_bytes(b"hello \"world\"\n");
        assert_eq!(blob.encoding, "base64");
        assert_eq!(blob.decoded().unwrap(), b"hello \"world\"\n");
        let json = serde_json::to_value(&blob).unwrap();
        assert_eq!(json["content"], "aGVsbG8gIndvcmxkIgo=");
    }

    #[test]
    fn new_ref_uses_full_ref_name() {
        let body = NewRef::branch(&BranchName::from("topic"), &ObjectId::from("abc"));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"ref": "refs/heads/topic", "sha": "abc"}));
    }

    #[test]
    fn commit_info_flattens_tree_sha() {
        let info: CommitInfo = serde_json::from_str(
            r#"{"sha":"c1","tree":{"sha":"t1","url":"x"},"message":"m","parents":[]}"#,
        )
        .unwrap();
        assert_eq!(info.tree, ObjectId::from("t1"));
    }
}
