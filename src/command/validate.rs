//! Standalone `install`, `test`, `audit` and `livecheck` commands.
use crate::{
    Result,
    validation::{ValidationKind, ValidationRunner, run_checked},
};

/// Run a single validation against an existing formula.
pub async fn execute(
    runner: &dyn ValidationRunner,
    kind: ValidationKind,
    formula: &str,
) -> Result<()> {
    run_checked(runner, kind, formula).await
}
