//! npm registry implementation of [`ReleaseSource`].
use async_trait::async_trait;
use log::*;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    BrewsmithError, Result,
    config::Config,
    formula::naming,
    registry::{
        ReleaseSource,
        record::{ReleaseRecord, VersionManifest},
    },
};

#[derive(Debug, Deserialize)]
struct DistTags {
    latest: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PackageDocument {
    #[serde(rename = "dist-tags")]
    dist_tags: Option<DistTags>,
    #[serde(default)]
    versions: Map<String, Value>,
}

/// Reads package documents from an npm compatible registry and checks the
/// published tap through the GitHub contents API.
#[derive(Debug, Clone)]
pub struct NpmRegistry {
    client: reqwest::Client,
    registry_url: String,
    api_url: String,
    published_repo: String,
    formula_dir: String,
}

impl NpmRegistry {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            registry_url: config.registry_url.trim_end_matches('/').into(),
            api_url: config.api_url.trim_end_matches('/').into(),
            published_repo: config.published_repo.clone(),
            formula_dir: config.formula_dir.trim_matches('/').into(),
        }
    }

    fn package_url(&self, package: &str) -> String {
        // scoped names must keep the slash escaped
        format!("{}/{}", self.registry_url, package.replace('/', "%2F"))
    }

    fn published_url(&self, release: &ReleaseRecord) -> String {
        format!(
            "{}/repos/{}/contents/{}/{}",
            self.api_url,
            self.published_repo,
            self.formula_dir,
            naming::formula_filename(&release.name)
        )
    }
}

#[async_trait]
impl ReleaseSource for NpmRegistry {
    async fn fetch_latest(&self, package: &str) -> Result<ReleaseRecord> {
        let url = self.package_url(package);
        debug!("fetching package document: {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(BrewsmithError::fetch(format!(
                "failed to fetch {package} from registry: status {status}"
            )));
        }

        let document: PackageDocument = response.json().await?;

        let latest = document
            .dist_tags
            .and_then(|t| t.latest)
            .ok_or_else(|| {
                BrewsmithError::invalid_release(
                    package,
                    "registry document has no latest dist-tag",
                )
            })?;

        let manifest = document.versions.get(&latest).ok_or_else(|| {
            BrewsmithError::invalid_release(
                package,
                format!("latest version {latest} missing from versions"),
            )
        })?;

        let manifest: VersionManifest =
            serde_json::from_value(manifest.clone()).map_err(|e| {
                BrewsmithError::invalid_release(
                    package,
                    format!("malformed manifest for {latest}: {e}"),
                )
            })?;

        let record = ReleaseRecord::from_manifest(package, manifest)?;

        info!("found {}@{}", record.name, record.version);

        Ok(record)
    }

    async fn published_file_exists(
        &self,
        release: &ReleaseRecord,
    ) -> Result<bool> {
        let url = self.published_url(release);
        debug!("checking for published formula: {url}");

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            s if s.is_success() => Ok(true),
            s => Err(BrewsmithError::fetch(format!(
                "failed to check published formula {url}: status {s}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn config_for(server: &Server) -> Config {
        Config {
            registry_url: server.url(),
            api_url: server.url(),
            ..Config::default()
        }
    }

    const DOCUMENT: &str = r#"{
        "name": "my-cli",
        "dist-tags": { "latest": "2.0.0", "next": "3.0.0-beta.1" },
        "versions": {
            "1.0.0": {
                "name": "my-cli",
                "version": "1.0.0",
                "description": "old",
                "homepage": "https://example.com",
                "dist": { "tarball": "https://example.com/my-cli-1.0.0.tgz" },
                "bin": { "my-cli": "cli.js" }
            },
            "2.0.0": {
                "name": "my-cli",
                "version": "2.0.0",
                "description": "The command line helper",
                "homepage": "https://example.com",
                "license": "Apache-2.0",
                "dist": { "tarball": "https://example.com/my-cli-2.0.0.tgz" },
                "bin": { "my-cli": "cli.js", "mc": "cli.js" }
            }
        }
    }"#;

    #[tokio::test]
    async fn fetches_latest_version() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/my-cli")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(DOCUMENT)
            .create_async()
            .await;

        let registry =
            NpmRegistry::new(reqwest::Client::new(), &config_for(&server));
        let record = registry.fetch_latest("my-cli").await.unwrap();

        assert_eq!(record.version, "2.0.0");
        assert_eq!(record.license, "Apache-2.0");
        assert_eq!(record.binaries, vec!["my-cli", "mc"]);
        assert_eq!(record.tarball_url, "https://example.com/my-cli-2.0.0.tgz");
    }

    #[tokio::test]
    async fn escapes_scoped_package_names() {
        let mut server = Server::new_async().await;
        let m = server
            .mock(
                "GET",
                mockito::Matcher::Regex(r"^/@acme(%2[Ff]|/)tool$".into()),
            )
            .with_status(404)
            .create_async()
            .await;

        let registry =
            NpmRegistry::new(reqwest::Client::new(), &config_for(&server));
        let result = registry.fetch_latest("@acme/tool").await;

        m.assert_async().await;
        assert!(matches!(result, Err(BrewsmithError::Fetch(_))));
    }

    #[tokio::test]
    async fn rejects_document_without_latest_tag() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/odd")
            .with_status(200)
            .with_body(r#"{ "versions": {} }"#)
            .create_async()
            .await;

        let registry =
            NpmRegistry::new(reqwest::Client::new(), &config_for(&server));
        let result = registry.fetch_latest("odd").await;

        assert!(matches!(result, Err(BrewsmithError::InvalidRelease { .. })));
    }

    fn release() -> ReleaseRecord {
        ReleaseRecord {
            name: "My_Cli".into(),
            version: "2.0.0".into(),
            description: "cli".into(),
            homepage: "https://example.com".into(),
            license: "MIT".into(),
            tarball_url: "https://example.com/my-cli.tgz".into(),
            sha256: None,
            binaries: vec!["my-cli".into()],
        }
    }

    #[tokio::test]
    async fn published_file_exists_on_success() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock(
                "GET",
                "/repos/homebrew/homebrew-core/contents/Formula/my-cli.rb",
            )
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let registry =
            NpmRegistry::new(reqwest::Client::new(), &config_for(&server));

        assert!(registry.published_file_exists(&release()).await.unwrap());
    }

    #[tokio::test]
    async fn published_file_missing_is_false() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock(
                "GET",
                "/repos/homebrew/homebrew-core/contents/Formula/my-cli.rb",
            )
            .with_status(404)
            .create_async()
            .await;

        let registry =
            NpmRegistry::new(reqwest::Client::new(), &config_for(&server));

        assert!(!registry.published_file_exists(&release()).await.unwrap());
    }

    #[tokio::test]
    async fn published_check_propagates_other_failures() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock(
                "GET",
                "/repos/homebrew/homebrew-core/contents/Formula/my-cli.rb",
            )
            .with_status(500)
            .create_async()
            .await;

        let registry =
            NpmRegistry::new(reqwest::Client::new(), &config_for(&server));
        let result = registry.published_file_exists(&release()).await;

        assert!(matches!(result, Err(BrewsmithError::Fetch(_))));
    }
}
