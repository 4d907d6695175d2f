//! Defaulting rules for run settings.

use ghcommit_core::{BranchName, RunOptions, RunSettings, SettingsError};
use rstest::rstest;

fn pr_options(title: Option<&str>, description: Option<&str>) -> RunOptions {
    RunOptions {
        branch: "main".into(),
        message: "update docs".into(),
        use_pr: true,
        title: title.map(str::to_string),
        description: description.map(str::to_string),
        labels: vec!["docs".into()],
        ..RunOptions::default()
    }
}

#[rstest]
#[case(None, None, "update docs", "update docs")]
#[case(Some("T"), None, "T", "update docs")]
#[case(None, Some("D"), "update docs", "D")]
#[case(Some(""), Some(""), "update docs", "update docs")]
#[case(Some("T"), Some("D"), "T", "D")]
fn pr_title_and_description_defaults(
    #[case] title: Option<&str>,
    #[case] description: Option<&str>,
    #[case] want_title: &str,
    #[case] want_description: &str,
) {
    let settings = RunSettings::configure(pr_options(title, description), vec![]).expect("settings");
    let pr = settings.pull_request.expect("pr spec");
    assert_eq!(pr.title, want_title);
    assert_eq!(pr.description, want_description);
    assert_eq!(pr.labels, vec!["docs".to_string()]);
}

#[test]
fn pr_workflow_commits_to_head_ref() {
    let mut opts = pr_options(None, None);
    opts.head_ref = Some("feature-x".into());
    let settings = RunSettings::configure(opts, vec!["a.txt".into()]).expect("settings");
    let pr = settings.pull_request.as_ref().expect("pr spec");
    assert_eq!(settings.commit.branch, BranchName::from("feature-x"));
    assert_eq!(pr.base, BranchName::from("main"));
    assert_eq!(pr.head, BranchName::from("feature-x"));
}

#[test]
fn omitted_head_ref_is_generated_from_base() {
    let settings = RunSettings::configure(pr_options(None, None), vec![]).expect("settings");
    let pr = settings.pull_request.expect("pr spec");
    assert!(pr.head.0.starts_with("main-"), "got {}", pr.head);
    assert_ne!(pr.head, pr.base);
}

#[rstest]
#[case("", "msg", SettingsError::MissingBranch)]
#[case("main", "  ", SettingsError::MissingMessage)]
fn required_fields(#[case] branch: &str, #[case] message: &str, #[case] want: SettingsError) {
    let opts = RunOptions {
        branch: branch.into(),
        message: message.into(),
        ..RunOptions::default()
    };
    assert_eq!(RunSettings::configure(opts, vec![]).unwrap_err(), want);
}

#[test]
fn empty_label_is_rejected() {
    let mut opts = pr_options(None, None);
    opts.labels.push(String::new());
    assert_eq!(
        RunSettings::configure(opts, vec![]).unwrap_err(),
        SettingsError::EmptyLabel
    );
}
