//! [`ValidationRunner`] that shells out to `brew`.
use async_trait::async_trait;
use log::*;
use std::path::PathBuf;
use tokio::process::Command;

use crate::{
    Result,
    validation::{ValidationKind, ValidationOutcome, ValidationRunner},
};

/// Tap whose presence in audit output means the local clone is outdated.
const STALE_TAP: &str = "homebrew/core";

const STALE_TAP_HINT: &str = "It looks like your homebrew-core is outdated. It's a git repo that needs to be updated. You can find the location of the repo with `brew --repo homebrew/core`";

#[derive(Debug, Clone)]
pub struct BrewRunner {
    program: PathBuf,
}

impl Default for BrewRunner {
    fn default() -> Self {
        Self {
            program: PathBuf::from("brew"),
        }
    }
}

impl BrewRunner {
    /// Use a specific `brew` executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(kind: ValidationKind, target: &str) -> Vec<String> {
        let args: &[&str] = match kind {
            ValidationKind::Install => {
                &["install", "--build-from-source", "--formula"]
            }
            ValidationKind::Test => &["test"],
            ValidationKind::Audit => &["audit", "--strict", "--online", "--formula"],
            ValidationKind::Livecheck => &["livecheck", "--formula"],
        };

        args.iter()
            .map(|a| a.to_string())
            .chain(std::iter::once(target.to_string()))
            .collect()
    }
}

#[async_trait]
impl ValidationRunner for BrewRunner {
    async fn run(
        &self,
        kind: ValidationKind,
        target: &str,
    ) -> Result<ValidationOutcome> {
        let args = Self::args(kind, target);
        debug!("{} {}", self.program.display(), args.join(" "));

        let output = match Command::new(&self.program).args(&args).output().await
        {
            Ok(output) => output,
            Err(err) => {
                return Ok(ValidationOutcome::failed(format!(
                    "failed to run {}: {err}\n",
                    self.program.display()
                )));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            return Ok(ValidationOutcome::passed(Some(stdout)));
        }

        let first = if stdout.is_empty() {
            format!("{} exited with {}", kind, output.status)
        } else {
            stdout.clone()
        };

        let mut message = vec![first, stderr];

        if kind == ValidationKind::Audit && mentions_stale_tap(&stdout) {
            message.push(STALE_TAP_HINT.to_string());
        }

        Ok(ValidationOutcome::failed(message.join("\n")))
    }
}

/// Audit lists the offending taps on lines of their own; a bare
/// `homebrew/core` entry means the local tap metadata is stale.
pub fn mentions_stale_tap(stdout: &str) -> bool {
    stdout
        .lines()
        .filter(|line| line.starts_with(|c: char| c.is_ascii_alphabetic()))
        .any(|line| line == STALE_TAP)
}
