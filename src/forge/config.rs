//! Connection settings for the remote formula repository.
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

use crate::{BrewsmithError, Result};

/// Environment variable the GitHub token is read from.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Remote repository connection configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// API base URL, e.g. `https://api.github.com`.
    pub api_url: String,
    /// Access token for authentication.
    pub token: SecretString,
    /// Log mutating calls instead of performing them.
    pub dry_run: bool,
    /// Upper bound on a single remote call.
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            owner: "".to_string(),
            repo: "".to_string(),
            api_url: crate::config::DEFAULT_API_URL.to_string(),
            token: SecretString::from("".to_string()),
            dry_run: false,
            timeout: Duration::from_secs(
                crate::config::DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
        }
    }
}

impl RemoteConfig {
    /// `owner/repo`
    pub fn path(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Split a repository reference into `(owner, repo)`.
///
/// Accepts `owner/repo`, `https://github.com/owner/repo(.git)` and
/// `git@github.com:owner/repo.git`.
pub fn parse_repository(value: &str) -> Result<(String, String)> {
    let value = value.trim();

    let path = if let Some(rest) = value.strip_prefix("git@") {
        rest.split_once(':').map(|(_, path)| path.to_string())
    } else if value.contains("://") {
        Some(Url::parse(value)?.path().to_string())
    } else {
        Some(value.to_string())
    };

    let path = path.unwrap_or_default();
    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    match path.split('/').collect::<Vec<_>>().as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(BrewsmithError::InvalidArgs(format!(
            "expected a repository in owner/repo form: {value}"
        ))),
    }
}

/// Pick the explicit token if given, otherwise the environment value.
pub fn resolve_token(
    explicit: Option<String>,
    environment: Option<String>,
) -> Result<SecretString> {
    explicit
        .into_iter()
        .chain(environment)
        .find(|t| !t.trim().is_empty())
        .map(SecretString::from)
        .ok_or(BrewsmithError::MissingToken)
}

/// [`resolve_token`] against the process environment.
pub fn token_from_env(explicit: Option<String>) -> Result<SecretString> {
    resolve_token(explicit, std::env::var(TOKEN_ENV_VAR).ok())
}
