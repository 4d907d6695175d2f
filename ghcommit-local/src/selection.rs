//! File selection: which paths go into the commit.
//!
//! Rules:
//! - explicit paths exclude `--all` and `--untracked`
//! - without explicit paths, `--all` is required
//! - `--all` takes every changed tracked file, plus untracked files only
//!   with `--untracked`
//! - staged files are always appended; duplicates are dropped, first
//!   occurrence wins

use std::collections::HashSet;
use std::path::Path;

use crate::error::LocalError;
use crate::git::{list_by_pattern, list_staged, list_untracked, CommandExecutor};

/// The caller's selection flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    pub paths: Vec<String>,
    pub all: bool,
    pub untracked: bool,
}

impl FileSelection {
    /// Flag combination checks that need no repository access.
    pub fn validate(&self) -> Result<(), LocalError> {
        if (self.all || self.untracked) && !self.paths.is_empty() {
            return Err(LocalError::ConflictingSelection);
        }
        if self.paths.is_empty() && !self.all {
            return Err(LocalError::NoFilesSelected);
        }
        Ok(())
    }
}

/// Whether a selected path still exists in the working tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Present,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: String,
    pub status: FileStatus,
}

/// Resolve `selection` against the repository at `root`.
pub fn select_files(
    exec: &dyn CommandExecutor,
    root: &Path,
    selection: &FileSelection,
) -> Result<Vec<SelectedFile>, LocalError> {
    selection.validate()?;

    let staged = list_staged(exec).unwrap_or_default();
    if !staged.is_empty() {
        tracing::warn!("{} file(s) are already staged for commit", staged.len());
    }

    let candidates = if selection.all {
        let changed = list_by_pattern(exec, &["*".to_string()])?;
        if selection.untracked {
            changed
        } else {
            let untracked: HashSet<String> = list_untracked(exec)?.into_iter().collect();
            changed
                .into_iter()
                .filter(|f| !untracked.contains(f))
                .collect()
        }
    } else {
        list_by_pattern(exec, &selection.paths)?
    };

    let mut seen = HashSet::new();
    let files: Vec<SelectedFile> = candidates
        .into_iter()
        .chain(staged)
        .filter(|path| seen.insert(path.clone()))
        .map(|path| {
            let status = if root.join(&path).exists() {
                FileStatus::Present
            } else {
                FileStatus::Deleted
            };
            SelectedFile { path, status }
        })
        .collect();

    if files.is_empty() {
        return Err(LocalError::NoFilesSelected);
    }
    Ok(files)
}
