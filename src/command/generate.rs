//! `generate` command: write a formula locally and validate it with brew.
use log::*;
use std::path::{Path, PathBuf};

use crate::{
    Result,
    command::common,
    formula::{FormulaGenerator, TestSpec},
    hasher::TarballHasher,
    registry::ReleaseSource,
    validation::{ValidationKind, ValidationRunner, run_checked},
};

/// Which validations run after the formula is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPlan {
    /// When false no validation runs at all.
    pub install: bool,
    pub test: bool,
    pub audit: bool,
    pub livecheck: bool,
}

impl Default for ValidationPlan {
    fn default() -> Self {
        Self {
            install: true,
            test: true,
            audit: true,
            livecheck: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerateParams {
    pub package: String,
    pub outdir: PathBuf,
    pub test: Option<TestSpec>,
    pub plan: ValidationPlan,
}

/// Fetch, hash and render `package`, write it to the output directory, run
/// the planned validations, and return the next-step hint for the operator.
pub async fn execute(
    source: &dyn ReleaseSource,
    hasher: &TarballHasher,
    generator: &FormulaGenerator,
    runner: &dyn ValidationRunner,
    params: &GenerateParams,
) -> Result<String> {
    let release =
        common::fetch_hashed_release(source, hasher, &params.package).await?;

    let published = source.published_file_exists(&release).await?;
    debug!("{} published upstream: {published}", release.name);

    let artifact = generator.generate(&release, params.test.as_ref())?;

    tokio::fs::create_dir_all(&params.outdir).await?;
    let outfile = params.outdir.join(&artifact.filename);
    tokio::fs::write(&outfile, &artifact.content).await?;

    info!("created `{}`", artifact.filename);

    let hint = next_step_hint(
        published,
        &outfile,
        &artifact.commit_message(!published),
    );

    if !params.plan.install {
        return Ok(hint);
    }

    let formula_path = outfile.display().to_string();

    run_checked(runner, ValidationKind::Install, &formula_path).await?;

    if params.plan.test {
        run_checked(runner, ValidationKind::Test, &formula_path).await?;
    }

    if params.plan.audit {
        run_checked(runner, ValidationKind::Audit, &artifact.name).await?;
    }

    if params.plan.livecheck {
        run_checked(runner, ValidationKind::Livecheck, &formula_path).await?;
    }

    Ok(hint)
}

/// What the operator should do with the generated file.
pub fn next_step_hint(
    published: bool,
    outfile: &Path,
    commit_message: &str,
) -> String {
    if published {
        return "Done! Publish a new version with:\n\nbrew bump-formula-pr"
            .to_string();
    }

    format!(
        "Done! Commit the formula with:\n\ngit add {}\ngit commit -m '{}'",
        outfile.display(),
        commit_message
    )
}
