//! Formula validation through the target package manager.
//!
//! The core treats the validator as a black box: any non-ok outcome stops
//! the run and its diagnostics are shown to the operator verbatim.
use async_trait::async_trait;
use log::*;
use std::fmt;

#[cfg(test)]
use mockall::automock;

use crate::{BrewsmithError, Result};

/// `brew` backed validator.
pub mod brew;

/// Validation operations, run in this order by `generate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    Install,
    Test,
    Audit,
    Livecheck,
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Install => "brew install",
            Self::Test => "brew test",
            Self::Audit => "brew audit",
            Self::Livecheck => "brew livecheck",
        };
        write!(f, "{name}")
    }
}

/// Result of a single validator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub ok: bool,
    pub diagnostic: Option<String>,
}

impl ValidationOutcome {
    pub fn passed(diagnostic: Option<String>) -> Self {
        Self {
            ok: true,
            diagnostic,
        }
    }

    pub fn failed(diagnostic: impl Into<String>) -> Self {
        Self {
            ok: false,
            diagnostic: Some(diagnostic.into()),
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ValidationRunner: Send + Sync {
    /// Run `kind` against `target`, a formula path or name.
    async fn run(
        &self,
        kind: ValidationKind,
        target: &str,
    ) -> Result<ValidationOutcome>;
}

/// Run a validation and turn a failed outcome into
/// [`BrewsmithError::ValidationFailure`].
pub async fn run_checked(
    runner: &dyn ValidationRunner,
    kind: ValidationKind,
    target: &str,
) -> Result<()> {
    info!("running `{kind}`");

    let outcome = runner.run(kind, target).await?;

    if outcome.ok {
        info!("passed `{kind}`");
        if let Some(output) = outcome.diagnostic.filter(|d| !d.is_empty()) {
            debug!("{output}");
        }
        return Ok(());
    }

    error!("failed `{kind}`");

    Err(BrewsmithError::validation_failure(
        kind.to_string(),
        outcome.diagnostic.unwrap_or_default(),
    ))
}
