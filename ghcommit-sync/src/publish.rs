//! Pull Request Publisher.
//!
//! Linear: validate labels, create the PR, attach labels, export outputs.
//! A missing label stops everything before the PR exists.

use ghcommit_core::{PullRequest, PullRequestSpec};
use ghcommit_forge::{NewPullRequest, ObjectStore};

use crate::error::SyncError;
use crate::outputs::CiOutputs;

/// Confirm every label exists on the repository.
pub fn validate_labels(store: &dyn ObjectStore, labels: &[String]) -> Result<(), SyncError> {
    for label in labels {
        match store.get_label(label) {
            Ok(_) => {}
            Err(err) if err.is_not_found() => {
                return Err(SyncError::LabelNotFound {
                    label: label.clone(),
                })
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Open the pull request described by `spec` and label it.
pub fn publish(
    store: &dyn ObjectStore,
    spec: &PullRequestSpec,
    outputs: &CiOutputs,
) -> Result<PullRequest, SyncError> {
    let labels = dedup(&spec.labels);
    validate_labels(store, &labels)?;

    let request = NewPullRequest {
        title: spec.title.clone(),
        body: spec.description.clone(),
        head: spec.head.0.clone(),
        base: spec.base.0.clone(),
    };
    let pr = store.create_pull_request(&request)?;
    tracing::info!(number = pr.number, url = %pr.url, "opened pull request");

    if !labels.is_empty() {
        store.add_labels(pr.number, &labels)?;
    }

    outputs.export("pr-number", &pr.number.to_string());
    outputs.export("branch", spec.head.as_str());
    Ok(pr)
}

fn dedup(labels: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        if !out.contains(label) {
            out.push(label.clone());
        }
    }
    out
}
