//! Run configuration: what to commit, where, and whether to open a PR.
//!
//! [`RunSettings::configure`] is the only constructor; it applies every
//! default so downstream code never has to re-check blank strings.

use uuid::Uuid;

use crate::error::SettingsError;
use crate::types::{BranchName, PullRequestSpec};

/// Options as supplied by the caller, before defaults are applied.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub branch: String,
    pub message: String,
    pub use_pr: bool,
    pub head_ref: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub labels: Vec<String>,
    pub dry_run: bool,
}

/// Where the commit lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSettings {
    pub message: String,
    /// Branch that is advanced: the target in the direct workflow, the head
    /// ref in the pull-request workflow.
    pub branch: BranchName,
}

/// Fully-resolved configuration of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub commit: CommitSettings,
    pub pull_request: Option<PullRequestSpec>,
    pub files: Vec<String>,
    pub dry_run: bool,
}

impl RunSettings {
    /// Validate `options` and apply defaults.
    pub fn configure(options: RunOptions, files: Vec<String>) -> Result<Self, SettingsError> {
        let branch = options.branch.trim();
        if branch.is_empty() {
            return Err(SettingsError::MissingBranch);
        }
        if options.message.trim().is_empty() {
            return Err(SettingsError::MissingMessage);
        }
        if options.labels.iter().any(|l| l.trim().is_empty()) {
            return Err(SettingsError::EmptyLabel);
        }

        let base = BranchName::from(branch);
        let message = options.message;

        if !options.use_pr {
            return Ok(Self {
                commit: CommitSettings {
                    message,
                    branch: base,
                },
                pull_request: None,
                files,
                dry_run: options.dry_run,
            });
        }

        let head = match non_blank(options.head_ref) {
            Some(head) if head == base.0 => return Err(SettingsError::HeadEqualsBase(head)),
            Some(head) => BranchName(head),
            None => generate_head_ref(&base),
        };
        let title = non_blank(options.title).unwrap_or_else(|| message.clone());
        let description = non_blank(options.description).unwrap_or_else(|| message.clone());

        Ok(Self {
            commit: CommitSettings {
                message,
                branch: head.clone(),
            },
            pull_request: Some(PullRequestSpec {
                base,
                head,
                title,
                description,
                labels: options.labels,
            }),
            files,
            dry_run: options.dry_run,
        })
    }
}

/// `<base>-<uuid>`.
pub fn generate_head_ref(base: &BranchName) -> BranchName {
    BranchName(format!("{}-{}", base, Uuid::new_v4()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
