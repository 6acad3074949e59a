//! Traits related to the remote formula repository
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::{
    Result,
    forge::{
        config::RemoteConfig,
        request::{
            CreateBranchOutcome, CreatePrRequest, GetPrRequest, PullRequest,
            PutFileRequest, RemoteFile, UpdatePrRequest,
        },
    },
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    fn remote_config(&self) -> RemoteConfig;

    /// Head commit of `branch`.
    async fn get_branch_sha(&self, branch: &str) -> Result<String>;

    /// Create `branch` pointing at `sha`. An existing branch is reported as
    /// [`CreateBranchOutcome::AlreadyExists`], not as an error.
    async fn create_branch(
        &self,
        branch: &str,
        sha: &str,
    ) -> Result<CreateBranchOutcome>;

    /// Whether commit `sha` is reachable from the head of `branch`.
    async fn branch_contains(&self, branch: &str, sha: &str) -> Result<bool>;

    /// Force `branch` to point at `sha`.
    async fn update_branch(&self, branch: &str, sha: &str) -> Result<()>;

    /// Read `path` at `branch`. A missing file is `Ok(None)`.
    async fn get_file(
        &self,
        path: &str,
        branch: &str,
    ) -> Result<Option<RemoteFile>>;

    /// Create or overwrite a file. A stale or missing `sha` fails with
    /// [`crate::BrewsmithError::Conflict`].
    async fn put_file(&self, req: PutFileRequest) -> Result<()>;

    async fn list_open_prs(&self, req: GetPrRequest) -> Result<Vec<PullRequest>>;

    async fn create_pr(&self, req: CreatePrRequest) -> Result<PullRequest>;

    async fn update_pr(&self, req: UpdatePrRequest) -> Result<()>;
}
