//! Wire-level tests for `GitHubClient` against a `mockito` server.
//!
//! Each mock pins the method, path, auth header and JSON body it expects;
//! `assert()` fails the test when the client sent something else.

use std::net::TcpListener;

use ghcommit_core::{
    BlobEntry, BranchName, CiEnvironment, CommitObject, ForgeConfig, ObjectId, TreeNode,
};
use ghcommit_forge::{ForgeError, GitHubClient, NewBlob, NewPullRequest, ObjectStore, Operation};
use mockito::{Matcher, Server};
use serde_json::json;

const AUTH: &str = "Bearer secret-token";

fn client(api_url: &str) -> GitHubClient {
    let config = ForgeConfig {
        api_url: api_url.to_string(),
        token: "secret-token".to_string(),
        ci: CiEnvironment::default(),
    };
    GitHubClient::new(&config, "octo", "hello").expect("client")
}

// ---------------------------------------------------------------------------
// Request shapes
// ---------------------------------------------------------------------------

#[test]
fn get_branch_reads_ref_tip() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/repos/octo/hello/git/ref/heads/main")
        .match_header("authorization", AUTH)
        .match_header("x-github-api-version", "2022-11-28")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"ref": "refs/heads/main", "object": {"sha": "abc123", "type": "commit"}})
                .to_string(),
        )
        .create();

    let branch = client(&server.url())
        .get_branch(&BranchName::from("main"))
        .expect("branch");

    mock.assert();
    assert_eq!(branch.tip, ObjectId::from("abc123"));
}

#[test]
fn get_commit_reads_nested_tree() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/repos/octo/hello/git/commits/abc123")
        .with_status(200)
        .with_body(json!({"sha": "abc123", "tree": {"sha": "tree0"}}).to_string())
        .create();

    let commit = client(&server.url())
        .get_commit(&ObjectId::from("abc123"))
        .expect("commit");

    mock.assert();
    assert_eq!(commit.tree, ObjectId::from("tree0"));
}

#[test]
fn blob_tree_and_commit_bodies() {
    let mut server = Server::new();
    let blob_mock = server
        .mock("POST", "/repos/octo/hello/git/blobs")
        .match_header("authorization", AUTH)
        .match_body(Matcher::Json(json!({"content": "aGk=", "encoding": "base64"})))
        .with_status(201)
        .with_body(json!({"sha": "blob1"}).to_string())
        .create();
    let tree_mock = server
        .mock("POST", "/repos/octo/hello/git/trees")
        .match_body(Matcher::Json(json!({
            "base_tree": "base",
            "tree": [
                {"path": "a.txt", "mode": "100644", "type": "blob", "sha": "blob1"},
                {"path": "old.txt", "mode": "100644", "type": "blob", "sha": null}
            ]
        })))
        .with_status(201)
        .with_body(json!({"sha": "tree1"}).to_string())
        .create();
    let commit_mock = server
        .mock("POST", "/repos/octo/hello/git/commits")
        .match_body(Matcher::Json(
            json!({"message": "msg \"quoted\"", "tree": "tree1", "parents": ["abc123"]}),
        ))
        .with_status(201)
        .with_body(json!({"sha": "commit1"}).to_string())
        .create();

    let c = client(&server.url());
    let blob = c.create_blob(&NewBlob::from_bytes(b"hi")).expect("blob");
    let tree = c
        .create_tree(&TreeNode {
            base_tree: ObjectId::from("base"),
            entries: vec![
                BlobEntry::file("a.txt", blob),
                BlobEntry::deletion("old.txt"),
            ],
        })
        .expect("tree");
    let commit = c
        .create_commit(&CommitObject::new(
            "msg \"quoted\"",
            tree,
            ObjectId::from("abc123"),
        ))
        .expect("commit");

    blob_mock.assert();
    tree_mock.assert();
    commit_mock.assert();
    assert_eq!(commit, ObjectId::from("commit1"));
}

#[test]
fn ref_creation_body() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/repos/octo/hello/git/refs")
        .match_body(Matcher::Json(
            json!({"ref": "refs/heads/feat/x", "sha": "abc"}),
        ))
        .with_status(201)
        .with_body(json!({"ref": "refs/heads/feat/x", "object": {"sha": "abc"}}).to_string())
        .create();

    client(&server.url())
        .create_ref(&BranchName::from("feat/x"), &ObjectId::from("abc"))
        .expect("create ref");
    mock.assert();
}

#[test]
fn pull_request_and_labels() {
    let mut server = Server::new();
    let pr_mock = server
        .mock("POST", "/repos/octo/hello/pulls")
        .match_body(Matcher::Json(
            json!({"title": "t", "body": "b", "head": "main-1", "base": "main"}),
        ))
        .with_status(201)
        .with_body(
            json!({"number": 7, "html_url": "https://github.com/octo/hello/pull/7"}).to_string(),
        )
        .create();
    let labels_mock = server
        .mock("POST", "/repos/octo/hello/issues/7/labels")
        .match_body(Matcher::Json(json!({"labels": ["docs"]})))
        .with_status(200)
        .with_body(json!([{"name": "docs"}]).to_string())
        .create();

    let c = client(&server.url());
    let pr = c
        .create_pull_request(&NewPullRequest {
            title: "t".into(),
            body: "b".into(),
            head: "main-1".into(),
            base: "main".into(),
        })
        .expect("pr");
    c.add_labels(pr.number, &["docs".to_string()]).expect("labels");

    pr_mock.assert();
    labels_mock.assert();
    assert_eq!(pr.number, 7);
    assert_eq!(pr.url, "https://github.com/octo/hello/pull/7");
}

// ---------------------------------------------------------------------------
// Failure classification
// ---------------------------------------------------------------------------

#[test]
fn missing_branch_is_not_found() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/repos/octo/hello/git/ref/heads/nope")
        .with_status(404)
        .with_body(json!({"message": "Not Found"}).to_string())
        .create();

    let err = client(&server.url())
        .get_branch(&BranchName::from("nope"))
        .unwrap_err();

    mock.assert();
    assert!(err.is_not_found(), "got {err}");
}

#[test]
fn empty_repository_lookup_is_conflict() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/repos/octo/hello/git/ref/heads/main")
        .with_status(409)
        .with_body(json!({"message": "Git Repository is empty."}).to_string())
        .create();

    let err = client(&server.url())
        .get_branch(&BranchName::from("main"))
        .unwrap_err();
    assert!(matches!(err, ForgeError::Conflict { .. }), "got {err}");
}

#[test]
fn non_fast_forward_update_is_conflict() {
    let mut server = Server::new();
    let mock = server
        .mock("PATCH", "/repos/octo/hello/git/refs/heads/main")
        .match_body(Matcher::Json(json!({"sha": "c2", "force": false})))
        .with_status(422)
        .with_body(json!({"message": "Update is not a fast forward"}).to_string())
        .create();

    let err = client(&server.url())
        .update_ref(&BranchName::from("main"), &ObjectId::from("c2"))
        .unwrap_err();

    mock.assert();
    match err {
        ForgeError::Conflict {
            operation,
            target,
            message,
        } => {
            assert_eq!(operation, Operation::UpdateRef);
            assert_eq!(target, "main");
            assert_eq!(message, "Update is not a fast forward");
        }
        other => panic!("expected conflict, got {other}"),
    }
}

#[test]
fn forbidden_ref_creation_names_the_branch() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/repos/octo/hello/git/refs")
        .with_status(403)
        .with_body(json!({"message": "Resource not accessible"}).to_string())
        .create();

    let err = client(&server.url())
        .create_ref(&BranchName::from("release"), &ObjectId::from("abc"))
        .unwrap_err();

    assert!(err.to_string().contains("release"), "got {err}");
    assert!(matches!(err, ForgeError::Unauthorized { status: 403, .. }));
}

#[test]
fn server_error_is_transient() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/repos/octo/hello")
        .with_status(502)
        .with_body(json!({"message": "Bad Gateway"}).to_string())
        .create();

    let err = client(&server.url()).get_repository().unwrap_err();

    mock.assert();
    assert!(matches!(err, ForgeError::Transient { .. }), "got {err}");
}

#[test]
fn refused_connection_is_transient() {
    // Bind then drop to obtain a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = client(&format!("http://{addr}"))
        .get_label("bug")
        .unwrap_err();
    assert!(matches!(err, ForgeError::Transient { .. }), "got {err}");
    assert_eq!(err.target(), "bug");
}
