//! Manager that wraps forge implementations
use log::*;
use std::future::Future;

use crate::{
    Result,
    forge::{
        config::RemoteConfig,
        request::{
            CreateBranchOutcome, CreatePrRequest, GetPrRequest, PullRequest,
            PutFileRequest, RemoteFile, UpdatePrRequest,
        },
        traits::Forge,
    },
};

/// Applies the per-call timeout to every remote call and short-circuits
/// mutating calls in dry-run mode.
pub struct ForgeManager {
    forge: Box<dyn Forge>,
    remote_config: RemoteConfig,
}

impl ForgeManager {
    pub fn new(forge: Box<dyn Forge>) -> Self {
        let remote_config = forge.remote_config();
        Self {
            forge,
            remote_config,
        }
    }

    pub fn remote_config(&self) -> RemoteConfig {
        self.remote_config.clone()
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        tokio::time::timeout(self.remote_config.timeout, call).await?
    }

    pub async fn get_branch_sha(&self, branch: &str) -> Result<String> {
        debug!("resolving head of branch: {branch}");
        self.bounded(self.forge.get_branch_sha(branch)).await
    }

    pub async fn create_branch(
        &self,
        branch: &str,
        sha: &str,
    ) -> Result<CreateBranchOutcome> {
        if self.remote_config.dry_run {
            warn!("dry_run: would create branch: {branch} at {sha}");
            return Ok(CreateBranchOutcome::Created);
        }
        self.bounded(self.forge.create_branch(branch, sha)).await
    }

    pub async fn branch_contains(
        &self,
        branch: &str,
        sha: &str,
    ) -> Result<bool> {
        self.bounded(self.forge.branch_contains(branch, sha)).await
    }

    pub async fn update_branch(&self, branch: &str, sha: &str) -> Result<()> {
        if self.remote_config.dry_run {
            warn!("dry_run: would force update branch: {branch} to {sha}");
            return Ok(());
        }
        self.bounded(self.forge.update_branch(branch, sha)).await
    }

    pub async fn get_file(
        &self,
        path: &str,
        branch: &str,
    ) -> Result<Option<RemoteFile>> {
        debug!("reading {path} on branch {branch}");
        self.bounded(self.forge.get_file(path, branch)).await
    }

    pub async fn put_file(&self, req: PutFileRequest) -> Result<()> {
        if self.remote_config.dry_run {
            warn!(
                "dry_run: would write {} on branch {}: message: {}",
                req.path, req.branch, req.message
            );
            return Ok(());
        }
        self.bounded(self.forge.put_file(req)).await
    }

    pub async fn list_open_prs(
        &self,
        req: GetPrRequest,
    ) -> Result<Vec<PullRequest>> {
        self.bounded(self.forge.list_open_prs(req)).await
    }

    pub async fn create_pr(&self, req: CreatePrRequest) -> Result<PullRequest> {
        if self.remote_config.dry_run {
            warn!("dry_run: would create PR: req: {:#?}", req);
            return Ok(PullRequest {
                number: 0,
                title: req.title,
                body: req.body,
            });
        }
        self.bounded(self.forge.create_pr(req)).await
    }

    pub async fn update_pr(&self, req: UpdatePrRequest) -> Result<()> {
        if self.remote_config.dry_run {
            warn!("dry_run: would update PR: req: {:#?}", req);
            return Ok(());
        }
        self.bounded(self.forge.update_pr(req)).await
    }
}
