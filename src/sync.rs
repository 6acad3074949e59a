//! Synchronizes a generated formula with a remote repository.
//!
//! A sync attempt walks `branch ensured -> file compared -> (no-op | file
//! updated) -> pull request upserted`. Every step re-reads remote state
//! immediately before acting; nothing is cached between attempts, so
//! re-running a sync with an unchanged artifact is a no-op after the compare
//! step.
//!
//! Pull requests are only touched after a write. A closed pull request for
//! an unchanged artifact therefore stays closed until the base branch moves
//! and the working branch is reset and rewritten.
//!
//! The remote's conditional write token is the only concurrency control. A
//! concurrent writer makes the second write fail with
//! [`BrewsmithError::Conflict`], which is surfaced and never retried.
use derive_builder::Builder;
use log::*;

use crate::{
    BrewsmithError, Result,
    forge::{
        manager::ForgeManager,
        request::{
            CreateBranchOutcome, CreatePrRequest, GetPrRequest, PullRequest,
            PutFileRequest, UpdatePrRequest,
        },
    },
    formula::Artifact,
};

/// Where an artifact is synchronized to.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into), build_fn(private, name = "_build"))]
pub struct SyncTarget {
    pub owner: String,
    pub repo: String,
    /// Branch pull requests target.
    pub base_branch: String,
    /// Branch owned by this package's sync. Kept while it contains the base
    /// head, force-reset to the base otherwise.
    pub working_branch: String,
    /// File path within the repository.
    pub path: String,
}

impl SyncTargetBuilder {
    pub fn build(&self) -> Result<SyncTarget> {
        let target = self._build().map_err(|e| {
            BrewsmithError::InvalidArgs(format!(
                "failed to build sync target: {e}"
            ))
        })?;

        let fields = [
            ("owner", &target.owner),
            ("repo", &target.repo),
            ("base_branch", &target.base_branch),
            ("working_branch", &target.working_branch),
            ("path", &target.path),
        ];

        if let Some((name, _)) =
            fields.iter().find(|(_, value)| value.trim().is_empty())
        {
            return Err(BrewsmithError::InvalidArgs(format!(
                "sync target {name} must not be empty"
            )));
        }

        if target.base_branch == target.working_branch {
            return Err(BrewsmithError::InvalidArgs(format!(
                "working branch must differ from base branch: {}",
                target.base_branch
            )));
        }

        Ok(target)
    }
}

/// Snapshot of the target file on the working branch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteFileState {
    /// Empty when the file does not exist.
    pub content: String,
    /// Revision token required to overwrite the file.
    pub revision: Option<String>,
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Remote content already matched; nothing was written.
    Unchanged,
    Updated {
        pull_request: PullRequest,
        /// Whether the pull request was opened by this sync.
        created: bool,
    },
}

/// Whole-file comparison ignoring leading and trailing whitespace, so a
/// trailing-newline-only difference counts as unchanged.
pub fn same_content(remote: &str, local: &str) -> bool {
    remote.trim() == local.trim()
}

pub struct RemoteSync {
    forge: ForgeManager,
}

impl RemoteSync {
    pub fn new(forge: ForgeManager) -> Self {
        Self { forge }
    }

    /// Push `artifact` to `target` and make sure exactly one open pull
    /// request exists for it.
    pub async fn sync(
        &self,
        target: &SyncTarget,
        artifact: &Artifact,
    ) -> Result<SyncOutcome> {
        self.check_target(target)?;

        self.ensure_branch(target).await?;

        let state = self.read_file(target).await?;

        if same_content(&state.content, &artifact.content) {
            info!(
                "{} is up to date on {}: nothing to do",
                target.path, target.working_branch
            );
            return Ok(SyncOutcome::Unchanged);
        }

        self.write_file(target, artifact, &state).await?;

        let (pull_request, created) = self.upsert_pr(target, artifact).await?;

        Ok(SyncOutcome::Updated {
            pull_request,
            created,
        })
    }

    fn check_target(&self, target: &SyncTarget) -> Result<()> {
        let remote = self.forge.remote_config();

        if remote.owner != target.owner || remote.repo != target.repo {
            return Err(BrewsmithError::InvalidArgs(format!(
                "sync target {}/{} does not match remote {}",
                target.owner,
                target.repo,
                remote.path()
            )));
        }

        Ok(())
    }

    /// Make sure the working branch exists and is based on the current head
    /// of the base branch. A branch that is behind or has diverged from the
    /// base is force-reset to it, discarding its commits; a branch already
    /// built on the current base head is left alone.
    pub async fn ensure_branch(&self, target: &SyncTarget) -> Result<String> {
        let base_sha = self.forge.get_branch_sha(&target.base_branch).await?;

        match self
            .forge
            .create_branch(&target.working_branch, &base_sha)
            .await?
        {
            CreateBranchOutcome::Created => {
                info!(
                    "created branch {} from {} at {base_sha}",
                    target.working_branch, target.base_branch
                );
            }
            CreateBranchOutcome::AlreadyExists => {
                if self
                    .forge
                    .branch_contains(&target.working_branch, &base_sha)
                    .await?
                {
                    info!(
                        "branch {} is already based on {} at {base_sha}",
                        target.working_branch, target.base_branch
                    );
                } else {
                    info!(
                        "branch {} is behind or diverged from {}: resetting to {base_sha}",
                        target.working_branch, target.base_branch
                    );
                    self.forge
                        .update_branch(&target.working_branch, &base_sha)
                        .await?;
                }
            }
        }

        Ok(base_sha)
    }

    /// Read the target file from the working branch. A missing file is an
    /// empty, non-existent state.
    pub async fn read_file(
        &self,
        target: &SyncTarget,
    ) -> Result<RemoteFileState> {
        let file = self
            .forge
            .get_file(&target.path, &target.working_branch)
            .await?;

        Ok(match file {
            Some(file) => RemoteFileState {
                content: file.content,
                revision: Some(file.sha),
                exists: true,
            },
            None => {
                debug!("{} does not exist yet", target.path);
                RemoteFileState::default()
            }
        })
    }

    async fn write_file(
        &self,
        target: &SyncTarget,
        artifact: &Artifact,
        state: &RemoteFileState,
    ) -> Result<()> {
        info!("writing {} to {}", target.path, target.working_branch);

        self.forge
            .put_file(PutFileRequest {
                path: target.path.clone(),
                content: artifact.content.clone(),
                message: artifact.commit_message(!state.exists),
                branch: target.working_branch.clone(),
                sha: state.revision.clone().filter(|_| state.exists),
            })
            .await
    }

    async fn upsert_pr(
        &self,
        target: &SyncTarget,
        artifact: &Artifact,
    ) -> Result<(PullRequest, bool)> {
        let open = self
            .forge
            .list_open_prs(GetPrRequest {
                head_branch: target.working_branch.clone(),
                base_branch: target.base_branch.clone(),
            })
            .await?;

        if open.len() > 1 {
            warn!(
                "found {} open pull requests for {}: updating #{}",
                open.len(),
                target.working_branch,
                open[0].number
            );
        }

        if let Some(existing) = open.into_iter().next() {
            info!("updating pull request #{}", existing.number);

            self.forge
                .update_pr(UpdatePrRequest {
                    pr_number: existing.number,
                    title: artifact.pull_request_title.clone(),
                    body: artifact.pull_request_body.clone(),
                })
                .await?;

            return Ok((
                PullRequest {
                    number: existing.number,
                    title: artifact.pull_request_title.clone(),
                    body: artifact.pull_request_body.clone(),
                },
                false,
            ));
        }

        info!("creating pull request");

        let pr = self
            .forge
            .create_pr(CreatePrRequest {
                head_branch: target.working_branch.clone(),
                base_branch: target.base_branch.clone(),
                title: artifact.pull_request_title.clone(),
                body: artifact.pull_request_body.clone(),
            })
            .await?;

        Ok((pr, true))
    }
}
