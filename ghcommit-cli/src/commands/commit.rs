//! `gh-commit`: select files locally, then commit them on the forge.
//!
//! Every check that needs neither git nor the network runs first, so a bad
//! flag combination fails without touching the repository.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use ghcommit_core::{ForgeConfig, RunOptions, RunSettings};
use ghcommit_forge::GitHubClient;
use ghcommit_local::{
    parse_remote, remote_url, select_files, validate_local_git, FileSelection, FileStatus,
    SelectedFile, SystemExecutor,
};
use ghcommit_sync::{resolve_repository, run, CiOutputs, RunContext, RunOutcome};

/// Arguments for `gh-commit`.
#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Files or patterns to commit, relative to the repository root.
    pub files: Vec<String>,

    /// Branch to commit to; the base branch when opening a pull request.
    #[arg(short = 'B', long)]
    pub branch: Option<String>,

    /// Commit message.
    #[arg(short = 'm', long)]
    pub message: Option<String>,

    /// Commit to a new head branch and open a pull request against --branch.
    #[arg(short = 'P', long)]
    pub use_pr: bool,

    /// Head branch for the pull request. Defaults to `<branch>-<uuid>`.
    #[arg(short = 'H', long)]
    pub head_ref: Option<String>,

    /// Pull request title. Defaults to the commit message.
    #[arg(short = 'T', long)]
    pub title: Option<String>,

    /// Pull request body. Defaults to the commit message.
    #[arg(short = 'D', long = "pr-description")]
    pub description: Option<String>,

    /// Label to add to the pull request. Repeatable.
    #[arg(short = 'l', long = "label")]
    pub labels: Vec<String>,

    /// Commit every changed tracked file.
    #[arg(short = 'A', long)]
    pub all: bool,

    /// With --all, include untracked files as well.
    #[arg(short = 'U', long)]
    pub untracked: bool,

    /// Show what would be committed without contacting the forge.
    #[arg(short = 'd', long)]
    pub dry_run: bool,
}

impl CommitArgs {
    pub fn run(self) -> Result<()> {
        let selection = FileSelection {
            paths: self.files.clone(),
            all: self.all,
            untracked: self.untracked,
        };
        selection.validate()?;
        let mut settings = RunSettings::configure(self.options(), Vec::new())?;

        let cwd = std::env::current_dir().context("could not determine current directory")?;
        let root = validate_local_git(&SystemExecutor::new(cwd))?;
        let git = SystemExecutor::new(root.clone());
        let selected = select_files(&git, &root, &selection)?;

        if settings.dry_run {
            println!("{}", "The following files would be committed:".bold());
            print_selection(&selected);
            return Ok(());
        }
        print_selection(&selected);
        settings.files = selected.into_iter().map(|f| f.path).collect();

        let remote = parse_remote(&remote_url(&git)?)?;
        let config = ForgeConfig::from_env(&remote.host)?;
        let client = GitHubClient::new(&config, &remote.owner, &remote.name)?;
        let repo = resolve_repository(&client, &remote.owner, &remote.name)
            .with_context(|| format!("failed to resolve {}/{}", remote.owner, remote.name))?;

        let ctx = RunContext {
            store: &client,
            repo,
            root,
            outputs: CiOutputs::from_ci(&config.ci),
        };
        let outcome = run(&ctx, &settings)?;
        print_outcome(&outcome);
        Ok(())
    }

    fn options(&self) -> RunOptions {
        RunOptions {
            branch: self.branch.clone().unwrap_or_default(),
            message: self.message.clone().unwrap_or_default(),
            use_pr: self.use_pr,
            head_ref: self.head_ref.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            labels: self.labels.clone(),
            dry_run: self.dry_run,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Tabled)]
struct SelectionRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "file")]
    path: String,
    #[tabled(rename = "change")]
    change: &'static str,
}

fn print_selection(files: &[SelectedFile]) {
    let rows: Vec<SelectionRow> = files
        .iter()
        .enumerate()
        .map(|(i, f)| SelectionRow {
            index: i + 1,
            path: f.path.clone(),
            change: match f.status {
                FileStatus::Present => "update",
                FileStatus::Deleted => "delete",
            },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn print_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::DryRun { files } => {
            println!("{} file(s) would be committed", files.len());
        }
        RunOutcome::Committed {
            branch,
            commit,
            pull_request,
        } => {
            println!(
                "{} {} on {}",
                "✓ committed".green().bold(),
                commit.as_str().yellow(),
                branch.as_str().cyan()
            );
            if let Some(pr) = pull_request {
                println!(
                    "{} #{} {}",
                    "✓ opened pull request".green().bold(),
                    pr.number,
                    pr.url.underline()
                );
            }
        }
    }
}
