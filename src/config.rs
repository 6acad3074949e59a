//! Configuration loading and parsing for `brewsmith.toml` files.
//!
//! Every field is optional; missing values fall back to the public npm
//! registry, github.com, and the `Formula` directory convention used by taps.
use serde::Deserialize;
use std::path::Path;
use url::Url;

use crate::{BrewsmithError, Result};

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "brewsmith.toml";
/// Default branch pull requests are opened against.
pub const DEFAULT_BASE_BRANCH: &str = "main";
/// Default directory formulae live in within a tap.
pub const DEFAULT_FORMULA_DIR: &str = "Formula";
/// Default npm registry.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";
/// Default public package page used in pull request bodies.
pub const DEFAULT_PACKAGE_URL: &str = "https://npmjs.com/package";
/// Default GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Repository checked to decide whether a formula is already published.
pub const DEFAULT_PUBLISHED_REPO: &str = "homebrew/homebrew-core";
/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Root configuration structure for `brewsmith.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Branch pull requests target (default: "main").
    pub base_branch: String,
    /// Directory within the tap that formulae are written to.
    pub formula_dir: String,
    /// Base URL of the npm registry.
    pub registry_url: String,
    /// Base URL of the human facing package page.
    pub package_url: String,
    /// GitHub API base URL, set this for GitHub Enterprise.
    pub api_url: String,
    /// `owner/repo` checked by the published-formula lookup.
    pub published_repo: String,
    /// Timeout applied to every network call.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_branch: DEFAULT_BASE_BRANCH.into(),
            formula_dir: DEFAULT_FORMULA_DIR.into(),
            registry_url: DEFAULT_REGISTRY_URL.into(),
            package_url: DEFAULT_PACKAGE_URL.into(),
            api_url: DEFAULT_API_URL.into(),
            published_repo: DEFAULT_PUBLISHED_REPO.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or from [`DEFAULT_CONFIG_FILE`] in
    /// the current directory. A missing default file yields the defaults; a
    /// missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        if !path.exists() {
            if explicit {
                return Err(BrewsmithError::invalid_config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            log::debug!("no configuration found: using default");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.base_branch.trim().is_empty() {
            return Err(BrewsmithError::invalid_config(
                "base_branch must not be empty",
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(BrewsmithError::invalid_config(
                "request_timeout_secs must be greater than zero",
            ));
        }

        for (field, value) in [
            ("registry_url", &self.registry_url),
            ("package_url", &self.package_url),
            ("api_url", &self.api_url),
        ] {
            let parsed = Url::parse(value).map_err(|e| {
                BrewsmithError::invalid_config(format!(
                    "{field} is not a valid URL ({e}): {value}"
                ))
            })?;

            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(BrewsmithError::invalid_config(format!(
                    "{field} must be an http(s) URL: {value}"
                )));
            }
        }

        let owner_repo = self.published_repo.split_once('/');
        let valid_repo = matches!(
            owner_repo,
            Some((owner, repo))
                if !owner.trim().is_empty()
                    && !repo.trim().is_empty()
                    && !repo.contains('/')
        );

        if !valid_repo {
            return Err(BrewsmithError::invalid_config(format!(
                "published_repo must be in owner/repo form: {}",
                self.published_repo
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_defaults_for_empty_file() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.base_branch, "main");
        assert_eq!(config.formula_dir, "Formula");
    }

    #[test]
    fn overrides_selected_fields() {
        let config = Config::from_toml(
            r#"
base_branch = "trunk"
request_timeout_secs = 5
"#,
        )
        .unwrap();

        assert_eq!(config.base_branch, "trunk");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.registry_url, DEFAULT_REGISTRY_URL);
    }

    #[test]
    fn rejects_zero_timeout() {
        let result = Config::from_toml("request_timeout_secs = 0");
        assert!(matches!(result, Err(BrewsmithError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_malformed_published_repo() {
        for repo in ["homebrew", "/x", "homebrew/", "a/b/c"] {
            let result =
                Config::from_toml(&format!("published_repo = \"{repo}\""));
            assert!(
                matches!(result, Err(BrewsmithError::InvalidConfig(_))),
                "{repo} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_unparseable_urls() {
        for field in ["registry_url", "package_url", "api_url"] {
            let result =
                Config::from_toml(&format!("{field} = \"registry.local\""));
            assert!(
                matches!(result, Err(BrewsmithError::InvalidConfig(_))),
                "{field} should be rejected"
            );
        }

        let result = Config::from_toml(r#"api_url = "ftp://example.com""#);
        assert!(matches!(result, Err(BrewsmithError::InvalidConfig(_))));
    }

    #[test]
    fn accepts_enterprise_api_url() {
        let config =
            Config::from_toml(r#"api_url = "https://ghe.example.com/api/v3""#)
                .unwrap();
        assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn load_reads_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"formula_dir = "Casks""#).unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.formula_dir, "Casks");
    }

    #[test]
    fn load_fails_for_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let result = Config::load(Some(&missing));
        assert!(matches!(result, Err(BrewsmithError::InvalidConfig(_))));
    }
}
