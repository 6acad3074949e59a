//! Common functionality shared between commands
use log::*;
use std::time::Duration;

use crate::{
    Result,
    formula::TestSpec,
    hasher::TarballHasher,
    registry::{ReleaseRecord, ReleaseSource},
};

/// User agent sent with registry and tarball requests.
pub const USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client used for the registry and tarball downloads.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;

    Ok(client)
}

/// Both halves of a custom formula test, or nothing.
pub fn test_spec(
    command: Option<String>,
    output: Option<String>,
) -> Option<TestSpec> {
    match (command, output) {
        (Some(command), Some(output)) => Some(TestSpec { command, output }),
        _ => None,
    }
}

/// Fetch the latest release of `package` and attach its tarball digest.
pub async fn fetch_hashed_release(
    source: &dyn ReleaseSource,
    hasher: &TarballHasher,
    package: &str,
) -> Result<ReleaseRecord> {
    info!("fetching release info for {package}");
    let release = source.fetch_latest(package).await?;

    info!("hashing tarball for {}@{}", release.name, release.version);
    let digest = hasher.hash(&release.tarball_url).await?;

    Ok(release.with_sha256(digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{registry::MockReleaseSource, test_helpers::create_test_release};

    #[test]
    fn test_spec_requires_both_halves() {
        assert!(test_spec(Some("foo --help".into()), None).is_none());
        assert!(test_spec(None, Some("usage".into())).is_none());

        let spec = test_spec(Some("foo --help".into()), Some("usage".into()))
            .unwrap();
        assert_eq!(spec.command, "foo --help");
        assert_eq!(spec.output, "usage");
    }

    #[tokio::test]
    async fn attaches_digest_of_downloaded_tarball() {
        let mut server = mockito::Server::new_async().await;
        let _m1 = server
            .mock("GET", "/foo-1.0.0.tgz")
            .with_status(200)
            .with_body("tarball-bytes")
            .create_async()
            .await;

        let tarball_url = format!("{}/foo-1.0.0.tgz", server.url());
        let mut source = MockReleaseSource::new();
        source.expect_fetch_latest().returning(move |_| {
            let mut release = create_test_release("foo", "1.0.0");
            release.sha256 = None;
            release.tarball_url = tarball_url.clone();
            Ok(release)
        });

        let hasher =
            TarballHasher::new(http_client(Duration::from_secs(5)).unwrap());
        let release = fetch_hashed_release(&source, &hasher, "foo")
            .await
            .unwrap();

        assert_eq!(
            release.sha256.unwrap().as_str(),
            crate::hasher::Sha256Digest::of(b"tarball-bytes").as_str()
        );
    }
}
