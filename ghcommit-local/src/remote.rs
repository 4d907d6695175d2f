//! Repository identity from a git remote URL.

use crate::error::LocalError;

/// `host/owner/name` as named by a remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepo {
    pub host: String,
    pub owner: String,
    pub name: String,
}

/// Parse HTTPS, `ssh://` and scp-like (`git@host:owner/name`) remote URLs.
///
/// The owner and name are the last two path segments, so paths with extra
/// prefixes still resolve.
pub fn parse_remote(url: &str) -> Result<RemoteRepo, LocalError> {
    let unrecognized = || LocalError::UnrecognizedRemote {
        url: url.to_string(),
    };
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let (authority, path) = match trimmed.split_once("://") {
        Some((_, rest)) => rest.split_once('/').ok_or_else(unrecognized)?,
        None => trimmed.split_once(':').ok_or_else(unrecognized)?,
    };

    let host = authority.rsplit('@').next().unwrap_or(authority);
    let host = host.split(':').next().unwrap_or(host);
    if host.is_empty() {
        return Err(unrecognized());
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [.., owner, name] => Ok(RemoteRepo {
            host: host.to_string(),
            owner: owner.to_string(),
            name: name.to_string(),
        }),
        _ => Err(unrecognized()),
    }
}
