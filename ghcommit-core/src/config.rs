//! Forge connection settings read from the process environment.

use std::path::PathBuf;

use crate::error::SettingsError;

/// REST endpoint for github.com remotes when `GITHUB_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// REST endpoint implied by a remote's host: github.com uses
/// [`DEFAULT_API_URL`], any other host is treated as GitHub Enterprise.
pub fn api_url_for_host(host: &str) -> String {
    if host.eq_ignore_ascii_case("github.com") || host.is_empty() {
        DEFAULT_API_URL.to_string()
    } else {
        format!("https://{host}/api/v3")
    }
}

/// Where and how to talk to the forge, plus CI integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeConfig {
    pub api_url: String,
    pub token: String,
    pub ci: CiEnvironment,
}

/// CI detection result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiEnvironment {
    /// `GITHUB_ACTIONS=true`.
    pub active: bool,
    /// `GITHUB_OUTPUT`, the file CI outputs are appended to.
    pub output_file: Option<PathBuf>,
}

impl CiEnvironment {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            active: lookup("GITHUB_ACTIONS").as_deref() == Some("true"),
            output_file: lookup("GITHUB_OUTPUT")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl ForgeConfig {
    /// Resolve from an arbitrary key lookup for a remote on `host`.
    ///
    /// `GH_TOKEN` wins over `GITHUB_TOKEN`. `GITHUB_API_URL` wins over the
    /// host-derived endpoint. A trailing `/` on the API URL is dropped.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        host: &str,
    ) -> Result<Self, SettingsError> {
        let token = ["GH_TOKEN", "GITHUB_TOKEN"]
            .iter()
            .filter_map(|key| lookup(key))
            .find(|t| !t.trim().is_empty())
            .ok_or(SettingsError::MissingToken)?;

        let api_url = lookup("GITHUB_API_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| api_url_for_host(host))
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_url,
            token,
            ci: CiEnvironment::from_lookup(&lookup),
        })
    }

    pub fn from_env(host: &str) -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok(), host)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup<'a>(vars: &'a HashMap<&str, &str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| vars.get(key).map(|v| v.to_string())
    }

    #[test]
    fn gh_token_takes_precedence() {
        let vars = HashMap::from([("GH_TOKEN", "a"), ("GITHUB_TOKEN", "b")]);
        let config = ForgeConfig::from_lookup(lookup(&vars), "github.com").unwrap();
        assert_eq!(config.token, "a");
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn missing_token_is_an_error() {
        let vars = HashMap::from([("GH_TOKEN", " ")]);
        assert_eq!(
            ForgeConfig::from_lookup(lookup(&vars), "github.com").unwrap_err(),
            SettingsError::MissingToken
        );
    }

    #[test]
    fn enterprise_url_loses_trailing_slash() {
        let vars = HashMap::from([
            ("GITHUB_TOKEN", "t"),
            ("GITHUB_API_URL", "https://ghe.example.com/api/v3/"),
        ]);
        let config = ForgeConfig::from_lookup(lookup(&vars), "github.com").unwrap();
        assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn enterprise_host_implies_api_v3() {
        let vars = HashMap::from([("GITHUB_TOKEN", "t")]);
        let config = ForgeConfig::from_lookup(lookup(&vars), "ghe.example.com").unwrap();
        assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn explicit_api_url_beats_remote_host() {
        let vars = HashMap::from([
            ("GITHUB_TOKEN", "t"),
            ("GITHUB_API_URL", "http://127.0.0.1:8080"),
        ]);
        let config = ForgeConfig::from_lookup(lookup(&vars), "ghe.example.com").unwrap();
        assert_eq!(config.api_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn github_host_uses_public_api() {
        assert_eq!(api_url_for_host("GitHub.com"), DEFAULT_API_URL);
    }

    #[test]
    fn ci_requires_literal_true() {
        let vars = HashMap::from([("GITHUB_ACTIONS", "1"), ("GITHUB_OUTPUT", "/tmp/out")]);
        let ci = CiEnvironment::from_lookup(lookup(&vars));
        assert!(!ci.active);
        assert_eq!(ci.output_file, Some(PathBuf::from("/tmp/out")));
    }
}
