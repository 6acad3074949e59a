//! CLI argument parsing.
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::{config::Config, formula::TestSpec, validation::ValidationKind};

/// Global CLI arguments.
#[derive(Parser, Debug)]
#[command(version, about = "Brew on GitHub from the command line", long_about = None)]
pub struct Args {
    #[arg(long, global = true)]
    /// Path to a brewsmith.toml file. Defaults to ./brewsmith.toml when present.
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    /// Timeout in seconds for each network call.
    pub timeout: Option<u64>,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Custom assertion added to the formula's test block.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct FormulaTestArgs {
    #[arg(long, requires = "test_output")]
    /// Test command to add.
    pub test_command: Option<String>,

    #[arg(long, requires = "test_command")]
    /// Output that the test command should produce.
    pub test_output: Option<String>,
}

impl FormulaTestArgs {
    pub fn spec(&self) -> Option<TestSpec> {
        crate::command::common::test_spec(
            self.test_command.clone(),
            self.test_output.clone(),
        )
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a formula for an npm package and validate it with brew.
    Generate {
        /// Package name.
        package: String,

        /// Destination directory.
        #[arg(default_value = ".")]
        outdir: PathBuf,

        #[command(flatten)]
        test: FormulaTestArgs,

        #[arg(long, default_value_t = false)]
        /// Skip install and every later validation.
        no_install: bool,

        #[arg(long, default_value_t = false)]
        /// Skip `brew test`.
        no_test: bool,

        #[arg(long, default_value_t = false)]
        /// Skip `brew audit`.
        no_audit: bool,

        #[arg(long, default_value_t = false)]
        /// Skip `brew livecheck`.
        no_livecheck: bool,
    },

    /// Install a formula from source.
    Install {
        /// Formula file.
        formula: String,
    },

    /// Run a formula's test block.
    Test {
        /// Formula file.
        formula: String,
    },

    /// Audit a formula.
    Audit {
        /// Formula name or file.
        formula: String,
    },

    /// Check a formula for newer upstream versions.
    Livecheck {
        /// Formula file.
        formula: String,
    },

    /// Generate a formula and open or update a pull request on a tap.
    Github {
        /// Package name.
        package: String,

        /// GitHub repository (owner/repo or https://github.com/owner/repo).
        repo: String,

        #[command(flatten)]
        test: FormulaTestArgs,

        #[arg(long)]
        /// GitHub personal access token. Falls back to GITHUB_TOKEN env var.
        github_token: Option<String>,

        #[arg(long)]
        /// Branch the pull request targets.
        base_branch: Option<String>,

        #[arg(long)]
        /// Directory formulae are written to within the repository.
        formula_dir: Option<String>,

        #[arg(long, default_value_t = false)]
        /// Log remote changes instead of making them.
        dry_run: bool,
    },
}

impl Command {
    /// The validation a standalone validator subcommand runs.
    pub fn validation(&self) -> Option<(ValidationKind, &str)> {
        let (kind, formula) = match self {
            Command::Install { formula } => (ValidationKind::Install, formula),
            Command::Test { formula } => (ValidationKind::Test, formula),
            Command::Audit { formula } => (ValidationKind::Audit, formula),
            Command::Livecheck { formula } => {
                (ValidationKind::Livecheck, formula)
            }
            _ => return None,
        };

        Some((kind, formula.as_str()))
    }
}

impl Args {
    /// Load the configuration file and apply command line overrides.
    pub fn resolve_config(&self) -> crate::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err(crate::BrewsmithError::InvalidArgs(
                    "--timeout must be greater than zero".into(),
                ));
            }
            config.request_timeout_secs = timeout;
        }

        if let Command::Github {
            base_branch,
            formula_dir,
            ..
        } = &self.command
        {
            if let Some(branch) = base_branch {
                config.base_branch = branch.clone();
            }
            if let Some(dir) = formula_dir {
                config.formula_dir = dir.clone();
            }
        }

        Ok(config)
    }
}
