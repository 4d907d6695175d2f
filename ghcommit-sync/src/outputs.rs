//! CI outputs: `key=value` lines appended to the file named by the CI
//! environment. Best effort; a failed write is logged, never returned.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use ghcommit_core::CiEnvironment;

/// Sink for CI outputs. Inert outside CI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiOutputs {
    file: Option<PathBuf>,
}

impl CiOutputs {
    /// Writes only when CI is active and names an output file.
    pub fn from_ci(ci: &CiEnvironment) -> Self {
        Self {
            file: ci.output_file.clone().filter(|_| ci.active),
        }
    }

    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    pub fn export(&self, key: &str, value: &str) {
        let Some(path) = &self.file else { return };
        match append(path, key, value) {
            Ok(()) => tracing::debug!(key, value, "exported CI output"),
            Err(err) => {
                tracing::warn!(path = %path.display(), key, error = %err, "failed to write CI output")
            }
        }
    }
}

fn append(path: &Path, key: &str, value: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{key}={value}")
}
