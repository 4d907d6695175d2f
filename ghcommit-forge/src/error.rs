//! Forge failure taxonomy.
//!
//! Raw transport and HTTP errors never leave this crate; every failure is
//! classified into one of the [`ForgeError`] variants together with the
//! [`Operation`] that failed and the ref, branch, label or path it targeted.

use std::fmt;

use thiserror::Error;

/// The object store operation that was being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetRepository,
    GetBranch,
    GetCommit,
    CreateRef,
    CreateBlob,
    CreateTree,
    CreateCommit,
    UpdateRef,
    GetLabel,
    CreatePullRequest,
    AddLabels,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetRepository => "get repository",
            Self::GetBranch => "get branch",
            Self::GetCommit => "get commit",
            Self::CreateRef => "create ref",
            Self::CreateBlob => "create blob",
            Self::CreateTree => "create tree",
            Self::CreateCommit => "create commit",
            Self::UpdateRef => "update ref",
            Self::GetLabel => "get label",
            Self::CreatePullRequest => "create pull request",
            Self::AddLabels => "add labels",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All errors that can arise from object store operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForgeError {
    /// 404: the ref, label or object does not exist.
    #[error("{operation} failed: '{target}' not found")]
    NotFound { operation: Operation, target: String },

    /// 401/403: the token may not perform this operation on this target.
    #[error("you are not authorized to {operation} '{target}' (HTTP {status})")]
    Unauthorized {
        operation: Operation,
        target: String,
        status: u16,
    },

    /// 409/422: the forge rejected the change, e.g. a non-fast-forward ref
    /// update or a ref that already exists.
    #[error("{operation} '{target}' was rejected as conflicting: {message}")]
    Conflict {
        operation: Operation,
        target: String,
        message: String,
    },

    /// Network failure, 5xx or rate limiting. Not retried here.
    #[error("{operation} '{target}' failed transiently: {message}")]
    Transient {
        operation: Operation,
        target: String,
        message: String,
    },

    /// Any other status, or a payload that could not be decoded.
    #[error("{operation} '{target}' failed: {message}")]
    Other {
        operation: Operation,
        target: String,
        message: String,
    },
}

impl ForgeError {
    /// Classify an HTTP error status.
    pub fn from_status(
        operation: Operation,
        target: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        let target = target.into();
        let message = message.into();
        match status {
            404 => Self::NotFound { operation, target },
            401 | 403 => Self::Unauthorized {
                operation,
                target,
                status,
            },
            409 | 422 => Self::Conflict {
                operation,
                target,
                message,
            },
            429 | 500..=599 => Self::Transient {
                operation,
                target,
                message: format!("HTTP {status}: {message}"),
            },
            _ => Self::Other {
                operation,
                target,
                message: format!("HTTP {status}: {message}"),
            },
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::NotFound { operation, .. }
            | Self::Unauthorized { operation, .. }
            | Self::Conflict { operation, .. }
            | Self::Transient { operation, .. }
            | Self::Other { operation, .. } => *operation,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Self::NotFound { target, .. }
            | Self::Unauthorized { target, .. }
            | Self::Conflict { target, .. }
            | Self::Transient { target, .. }
            | Self::Other { target, .. } => target,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(404, "not_found")]
    #[case(401, "unauthorized")]
    #[case(403, "unauthorized")]
    #[case(409, "conflict")]
    #[case(422, "conflict")]
    #[case(429, "transient")]
    #[case(502, "transient")]
    #[case(400, "other")]
    fn status_classification(#[case] status: u16, #[case] want: &str) {
        let err = ForgeError::from_status(Operation::UpdateRef, "main", status, "boom");
        let got = match err {
            ForgeError::NotFound { .. } => "not_found",
            ForgeError::Unauthorized { .. } => "unauthorized",
            ForgeError::Conflict { .. } => "conflict",
            ForgeError::Transient { .. } => "transient",
            ForgeError::Other { .. } => "other",
        };
        assert_eq!(got, want);
    }

    #[test]
    fn unauthorized_message_names_the_branch() {
        let err = ForgeError::from_status(Operation::CreateRef, "release", 403, "");
        assert_eq!(
            err.to_string(),
            "you are not authorized to create ref 'release' (HTTP 403)"
        );
        assert_eq!(err.target(), "release");
        assert_eq!(err.operation(), Operation::CreateRef);
    }
}
