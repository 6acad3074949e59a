//! Command execution and orchestration for brewsmith.
//!
//! Each command wires the configured collaborators together and sequences
//! them:
//!
//! - **generate**: release source -> hasher -> formula generator -> local
//!   file -> brew validations, then a next-step hint.
//! - **github**: release source -> hasher -> formula generator -> remote
//!   sync against a tap repository.
//! - **install / test / audit / livecheck**: a single brew validation.
//!
//! Collaborators are passed in as trait objects so every command can be
//! exercised against mocks.
use log::*;
use std::time::Duration;

use crate::{
    Result,
    cli::{Args, Command},
    forge::{
        config::{RemoteConfig, parse_repository, token_from_env},
        github::Github,
        manager::ForgeManager,
    },
    formula::FormulaGenerator,
    hasher::TarballHasher,
    registry::npm::NpmRegistry,
    sync::RemoteSync,
    validation::brew::BrewRunner,
};

/// Shared helpers: HTTP client, test spec, fetch-and-hash.
pub mod common;

/// Local formula generation and validation.
pub mod generate;

/// Publishing to a tap repository as a pull request.
pub mod github;

/// Standalone brew validations.
pub mod validate;

/// Run the parsed command line. Returns text to print for the operator.
pub async fn execute(args: &Args) -> Result<Option<String>> {
    if let Some((kind, formula)) = args.command.validation() {
        validate::execute(&BrewRunner::default(), kind, formula).await?;
        return Ok(None);
    }

    let config = args.resolve_config()?;
    debug!("resolved config: {config:#?}");

    let timeout = Duration::from_secs(config.request_timeout_secs);

    match &args.command {
        Command::Generate {
            package,
            outdir,
            test,
            no_install,
            no_test,
            no_audit,
            no_livecheck,
        } => {
            let client = common::http_client(timeout)?;
            let source = NpmRegistry::new(client.clone(), &config);
            let hasher = TarballHasher::new(client);
            let generator = FormulaGenerator::new(&config);

            let params = generate::GenerateParams {
                package: package.clone(),
                outdir: outdir.clone(),
                test: test.spec(),
                plan: generate::ValidationPlan {
                    install: !no_install,
                    test: !no_test,
                    audit: !no_audit,
                    livecheck: !no_livecheck,
                },
            };

            let hint = generate::execute(
                &source,
                &hasher,
                &generator,
                &BrewRunner::default(),
                &params,
            )
            .await?;

            Ok(Some(hint))
        }
        Command::Github {
            package,
            repo,
            test,
            github_token,
            dry_run,
            ..
        } => {
            // token and repository are checked before any network call
            let token = token_from_env(github_token.clone())?;
            let (owner, repo) = parse_repository(repo)?;

            let remote = RemoteConfig {
                owner: owner.clone(),
                repo: repo.clone(),
                api_url: config.api_url.clone(),
                token,
                dry_run: *dry_run,
                timeout,
            };

            let forge = ForgeManager::new(Box::new(Github::new(remote)?));
            let sync = RemoteSync::new(forge);

            let client = common::http_client(timeout)?;
            let source = NpmRegistry::new(client.clone(), &config);
            let hasher = TarballHasher::new(client);
            let generator = FormulaGenerator::new(&config);

            let params = github::GithubParams {
                package: package.clone(),
                owner,
                repo,
                base_branch: config.base_branch.clone(),
                formula_dir: config.formula_dir.clone(),
                test: test.spec(),
            };

            github::execute(&source, &hasher, &generator, &sync, &params)
                .await?;

            Ok(None)
        }
        // validators are handled above
        Command::Install { .. }
        | Command::Test { .. }
        | Command::Audit { .. }
        | Command::Livecheck { .. } => Ok(None),
    }
}
