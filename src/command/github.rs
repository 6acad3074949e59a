//! `github` command: publish a formula to a tap as a pull request.
use log::*;

use crate::{
    Result,
    command::common,
    formula::{FormulaGenerator, TestSpec, naming},
    hasher::TarballHasher,
    registry::ReleaseSource,
    sync::{RemoteSync, SyncOutcome, SyncTarget, SyncTargetBuilder},
};

#[derive(Debug, Clone)]
pub struct GithubParams {
    pub package: String,
    pub owner: String,
    pub repo: String,
    pub base_branch: String,
    pub formula_dir: String,
    pub test: Option<TestSpec>,
}

/// Target file and branches for `package` in the tap.
pub fn sync_target(params: &GithubParams, package: &str) -> Result<SyncTarget> {
    let dir = params.formula_dir.trim_matches('/');
    let filename = naming::formula_filename(package);
    let path = if dir.is_empty() {
        filename
    } else {
        format!("{dir}/{filename}")
    };

    SyncTargetBuilder::default()
        .owner(params.owner.as_str())
        .repo(params.repo.as_str())
        .base_branch(params.base_branch.as_str())
        .working_branch(naming::working_branch(package))
        .path(path)
        .build()
}

/// Fetch, hash and render the package, then sync it to the tap.
pub async fn execute(
    source: &dyn ReleaseSource,
    hasher: &TarballHasher,
    generator: &FormulaGenerator,
    sync: &RemoteSync,
    params: &GithubParams,
) -> Result<SyncOutcome> {
    let release =
        common::fetch_hashed_release(source, hasher, &params.package).await?;

    info!("generating formula for {}@{}", release.name, release.version);
    let artifact = generator.generate(&release, params.test.as_ref())?;

    let target = sync_target(params, &release.name)?;

    info!(
        "syncing {} to {}/{} on {}",
        target.path, target.owner, target.repo, target.working_branch
    );

    let outcome = sync.sync(&target, &artifact).await?;

    match &outcome {
        SyncOutcome::Unchanged => {
            info!("{} is already up to date", target.path)
        }
        SyncOutcome::Updated {
            pull_request,
            created: true,
        } => info!("created pull request #{}", pull_request.number),
        SyncOutcome::Updated { pull_request, .. } => {
            info!("updated pull request #{}", pull_request.number)
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        forge::manager::ForgeManager,
        registry::MockReleaseSource,
        test_helpers::{
            FakeForge, create_test_release, create_test_remote_config,
        },
    };
    use std::time::Duration;

    fn params() -> GithubParams {
        GithubParams {
            package: "@acme/fooBar".into(),
            owner: "acme".into(),
            repo: "homebrew-tap".into(),
            base_branch: "main".into(),
            formula_dir: "Formula".into(),
            test: None,
        }
    }

    #[test]
    fn derives_target_from_package_name() {
        let target = sync_target(&params(), "@acme/fooBar").unwrap();

        assert_eq!(target.path, "Formula/acme-foo-bar.rb");
        assert_eq!(target.working_branch, "update-acme-foo-bar-formula");
        assert_eq!(target.base_branch, "main");
    }

    #[test]
    fn empty_formula_dir_writes_at_root() {
        let mut params = params();
        params.formula_dir = "".into();

        let target = sync_target(&params, "foo").unwrap();

        assert_eq!(target.path, "foo.rb");
    }

    #[test_log::test(tokio::test)]
    async fn publishes_and_reuses_pull_request() {
        let mut server = mockito::Server::new_async().await;
        let _m1 = server
            .mock("GET", "/foo-1.0.0.tgz")
            .with_status(200)
            .with_body("tarball")
            .create_async()
            .await;

        let tarball_url = format!("{}/foo-1.0.0.tgz", server.url());
        let mut source = MockReleaseSource::new();
        source.expect_fetch_latest().returning(move |_| {
            let mut release = create_test_release("foo", "1.0.0");
            release.tarball_url = tarball_url.clone();
            Ok(release)
        });
        source.expect_published_file_exists().never();

        let fake = FakeForge::new(create_test_remote_config());
        let sync = RemoteSync::new(ForgeManager::new(Box::new(fake.clone())));
        let hasher = TarballHasher::new(
            common::http_client(Duration::from_secs(5)).unwrap(),
        );
        let generator = FormulaGenerator::new(&Config::default());

        let mut params = params();
        params.package = "foo".into();

        let first = execute(&source, &hasher, &generator, &sync, &params)
            .await
            .unwrap();
        let second = execute(&source, &hasher, &generator, &sync, &params)
            .await
            .unwrap();

        assert!(matches!(first, SyncOutcome::Updated { created: true, .. }));
        assert_eq!(second, SyncOutcome::Unchanged);

        fake.with_state(|s| {
            assert!(s.file("update-foo-formula", "Formula/foo.rb").is_some());
            assert_eq!(s.open_prs().len(), 1);
        });
    }
}
