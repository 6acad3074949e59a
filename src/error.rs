//! Custom error types for Brewsmith with improved type safety and error handling.

use thiserror::Error;

/// Main error type for Brewsmith operations.
#[derive(Error, Debug)]
pub enum BrewsmithError {
    // Cli args errors
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "GitHub token not configured: pass --github-token or set GITHUB_TOKEN"
    )]
    MissingToken,

    // Registry / download errors
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Invalid release metadata for '{package}': {reason}")]
    InvalidRelease { package: String, reason: String },

    // Formula generation errors
    #[error("Unresolved formula placeholder: {0}")]
    Template(String),

    // Remote repository errors
    #[error(
        "Conflicting write to '{path}' on branch '{branch}': remote file changed since it was read"
    )]
    Conflict { path: String, branch: String },

    #[error("Remote operation failed: {0}")]
    Remote(String),

    // Validator errors
    #[error("{kind} failed:\n{diagnostic}")]
    ValidationFailure { kind: String, diagnostic: String },

    // Parsing errors - automatic conversions via #[from]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using BrewsmithError
pub type Result<T> = std::result::Result<T, BrewsmithError>;

impl BrewsmithError {
    /// Create a fetch error with context
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an invalid release error for a package
    pub fn invalid_release(
        package: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidRelease {
            package: package.into(),
            reason: reason.into(),
        }
    }

    /// Create a conflict error for a path on a branch
    pub fn conflict(path: impl Into<String>, branch: impl Into<String>) -> Self {
        Self::Conflict {
            path: path.into(),
            branch: branch.into(),
        }
    }

    /// Create a validation failure carrying the validator's diagnostics
    pub fn validation_failure(
        kind: impl Into<String>,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self::ValidationFailure {
            kind: kind.into(),
            diagnostic: diagnostic.into(),
        }
    }
}

// Registry and tarball downloads go through reqwest
impl From<reqwest::Error> for BrewsmithError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::Fetch(format!("unexpected status {status}: {err}"))
        } else {
            Self::Fetch(err.to_string())
        }
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for BrewsmithError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. } => Self::Remote(format!(
                "GitHub API error ({}): {}",
                source.status_code, source.message
            )),
            _ => Self::Remote(format!("GitHub API error: {}", err)),
        }
    }
}

impl From<tokio::time::error::Elapsed> for BrewsmithError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        Self::Remote(format!("remote call timed out: {err}"))
    }
}
