//! Thin wrappers over `git` plumbing.
//!
//! Every invocation goes through [`CommandExecutor`] so callers can swap in
//! a scripted executor.

use std::path::PathBuf;
use std::process::Command;

use crate::error::LocalError;

/// Runs an external command and returns its stdout.
pub trait CommandExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, LocalError>;
}

/// Executes real processes inside `dir`.
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    dir: PathBuf,
}

impl SystemExecutor {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl CommandExecutor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, LocalError> {
        let command = format!("{program} {}", args.join(" "));
        tracing::debug!(dir = %self.dir.display(), "{command}");
        let output = Command::new(program)
            .args(args)
            .current_dir(&self.dir)
            .output()
            .map_err(|source| LocalError::Spawn {
                command: command.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(LocalError::CommandFailed {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn lines(out: &str) -> Vec<String> {
    out.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ensure we are inside a work tree with at least one remote; returns the
/// repository root.
pub fn validate_local_git(exec: &dyn CommandExecutor) -> Result<PathBuf, LocalError> {
    exec.run("git", &["rev-parse", "--is-inside-work-tree"])
        .map_err(|_| LocalError::NotARepository)?;
    let root = exec.run("git", &["rev-parse", "--show-toplevel"])?;
    if lines(&exec.run("git", &["remote"])?).is_empty() {
        return Err(LocalError::NoRemote);
    }
    Ok(PathBuf::from(root.trim()))
}

/// URL of `origin`, or of the first configured remote when there is no
/// `origin`.
pub fn remote_url(exec: &dyn CommandExecutor) -> Result<String, LocalError> {
    if let Ok(url) = exec.run("git", &["remote", "get-url", "origin"]) {
        return Ok(url.trim().to_string());
    }
    let remotes = lines(&exec.run("git", &["remote"])?);
    let first = remotes.first().ok_or(LocalError::NoRemote)?;
    Ok(exec.run("git", &["remote", "get-url", first.as_str()])?.trim().to_string())
}

/// Paths from `-z` output. Unlike line output, these are never C-quoted.
fn nul_separated(out: &str) -> Vec<String> {
    out.split('\0')
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn list_untracked(exec: &dyn CommandExecutor) -> Result<Vec<String>, LocalError> {
    Ok(nul_separated(&exec.run(
        "git",
        &["ls-files", "--others", "--exclude-standard", "-z"],
    )?))
}

pub fn list_staged(exec: &dyn CommandExecutor) -> Result<Vec<String>, LocalError> {
    Ok(nul_separated(&exec.run(
        "git",
        &["diff", "--name-only", "--cached", "-z"],
    )?))
}

/// Expand pathspecs into changed files via `git add --dry-run --verbose`.
///
/// Output lines look like `add 'path'` or `remove 'path'`.
pub fn list_by_pattern(
    exec: &dyn CommandExecutor,
    patterns: &[String],
) -> Result<Vec<String>, LocalError> {
    let mut args = vec!["add", "--dry-run", "--verbose"];
    args.extend(patterns.iter().map(String::as_str));
    let out = exec
        .run("git", &args)
        .map_err(|_| LocalError::PatternMatchedNothing {
            patterns: patterns.join(" "),
        })?;

    Ok(out
        .lines()
        .filter_map(|line| line.split_once('\''))
        .map(|(_, rest)| rest.trim_end().trim_end_matches('\'').to_string())
        .filter(|p| !p.is_empty())
        .collect())
}
