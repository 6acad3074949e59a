//! Implements the Forge trait for Github
use async_trait::async_trait;
use log::*;
use octocrab::{
    Octocrab,
    models::repos::Object,
    params::{self, repos::Reference},
};
use reqwest::StatusCode;

use crate::{
    BrewsmithError, Result,
    forge::{
        config::RemoteConfig,
        request::{
            CreateBranchOutcome, CreatePrRequest, GetPrRequest, PullRequest,
            PutFileRequest, RemoteFile, UpdatePrRequest,
        },
        traits::Forge,
    },
};

/// Status code of a GitHub API error, if the error came from the API.
fn api_status(err: &octocrab::Error) -> Option<StatusCode> {
    match err {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code),
        _ => None,
    }
}

/// GitHub forge implementation using the Octocrab client for branch,
/// contents and pull request operations.
pub struct Github {
    config: RemoteConfig,
    base_uri: String,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with personal access token authentication and API
    /// base URL configuration.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let base_uri = config.api_url.trim_end_matches('/').to_string();
        let builder = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(base_uri.clone())?;
        let instance = builder.build()?;

        Ok(Self {
            config,
            base_uri,
            instance,
        })
    }
}

#[async_trait]
impl Forge for Github {
    fn remote_config(&self) -> RemoteConfig {
        self.config.clone()
    }

    async fn get_branch_sha(&self, branch: &str) -> Result<String> {
        let branch_ref = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .get_ref(&Reference::Branch(branch.to_string()))
            .await?;

        match branch_ref.object {
            Object::Commit { sha, .. } => Ok(sha),
            _ => Err(BrewsmithError::remote(format!(
                "branch {branch} does not point at a commit"
            ))),
        }
    }

    async fn create_branch(
        &self,
        branch: &str,
        sha: &str,
    ) -> Result<CreateBranchOutcome> {
        let result = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .create_ref(&Reference::Branch(branch.to_string()), sha)
            .await;

        match result {
            Ok(_) => Ok(CreateBranchOutcome::Created),
            Err(err)
                if api_status(&err) == Some(StatusCode::UNPROCESSABLE_ENTITY) =>
            {
                // 422 also covers invalid names and shas, so confirm the ref
                let existing = self
                    .instance
                    .repos(&self.config.owner, &self.config.repo)
                    .get_ref(&Reference::Branch(branch.to_string()))
                    .await;

                if existing.is_ok() {
                    Ok(CreateBranchOutcome::AlreadyExists)
                } else {
                    Err(err.into())
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn branch_contains(&self, branch: &str, sha: &str) -> Result<bool> {
        let endpoint = format!(
            "{}/repos/{}/{}/compare/{}...{}",
            self.base_uri, self.config.owner, self.config.repo, sha, branch
        );

        let comparison: serde_json::Value =
            self.instance.get(endpoint, None::<&()>).await?;

        // head is ahead of or identical to sha when sha is an ancestor
        match comparison["status"].as_str() {
            Some("ahead") | Some("identical") => Ok(true),
            Some(_) => Ok(false),
            None => Err(BrewsmithError::remote(format!(
                "unexpected compare response for {branch}"
            ))),
        }
    }

    async fn update_branch(&self, branch: &str, sha: &str) -> Result<()> {
        let endpoint = format!(
            "{}/repos/{}/{}/git/refs/heads/{}",
            self.base_uri, self.config.owner, self.config.repo, branch
        );

        let _: serde_json::Value = self
            .instance
            .patch(
                endpoint,
                Some(&serde_json::json!({
                  "sha": sha,
                  "force": true
                })),
            )
            .await?;

        Ok(())
    }

    async fn get_file(
        &self,
        path: &str,
        branch: &str,
    ) -> Result<Option<RemoteFile>> {
        let result = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .get_content()
            .path(path)
            .r#ref(branch)
            .send()
            .await;

        match result {
            Err(err) if api_status(&err) == Some(StatusCode::NOT_FOUND) => {
                debug!("no file found for path: {path} on {branch}");
                Ok(None)
            }
            Err(err) => Err(err.into()),
            Ok(mut data) => {
                let items = data.take_items();

                let Some(item) = items.first() else {
                    debug!("no file found for path: {path} on {branch}");
                    return Ok(None);
                };

                let content = item.decoded_content().ok_or_else(|| {
                    BrewsmithError::remote(format!(
                        "failed to decode file content for path: {path}"
                    ))
                })?;

                Ok(Some(RemoteFile {
                    content,
                    sha: item.sha.clone(),
                }))
            }
        }
    }

    async fn put_file(&self, req: PutFileRequest) -> Result<()> {
        let repos = self.instance.repos(&self.config.owner, &self.config.repo);

        let result = match &req.sha {
            Some(sha) => {
                repos
                    .update_file(&req.path, &req.message, &req.content, sha)
                    .branch(&req.branch)
                    .send()
                    .await
            }
            None => {
                repos
                    .create_file(&req.path, &req.message, &req.content)
                    .branch(&req.branch)
                    .send()
                    .await
            }
        };

        match result {
            Ok(_) => Ok(()),
            Err(err) => match api_status(&err) {
                Some(StatusCode::CONFLICT) => {
                    Err(BrewsmithError::conflict(req.path, req.branch))
                }
                // the file appeared after it was read as missing
                Some(StatusCode::UNPROCESSABLE_ENTITY) if req.sha.is_none() => {
                    Err(BrewsmithError::conflict(req.path, req.branch))
                }
                _ => Err(err.into()),
            },
        }
    }

    async fn list_open_prs(&self, req: GetPrRequest) -> Result<Vec<PullRequest>> {
        let prs = self
            .instance
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .state(params::State::Open)
            .head(format!("{}:{}", self.config.owner, req.head_branch))
            .base(req.base_branch)
            .send()
            .await?;

        Ok(prs
            .into_iter()
            .map(|pr| PullRequest {
                number: pr.number,
                title: pr.title.unwrap_or_default(),
                body: pr.body.unwrap_or_default(),
            })
            .collect())
    }

    async fn create_pr(&self, req: CreatePrRequest) -> Result<PullRequest> {
        let pr = self
            .instance
            .pulls(&self.config.owner, &self.config.repo)
            .create(req.title, req.head_branch, req.base_branch)
            .body(req.body)
            .send()
            .await?;

        Ok(PullRequest {
            number: pr.number,
            title: pr.title.unwrap_or_default(),
            body: pr.body.unwrap_or_default(),
        })
    }

    async fn update_pr(&self, req: UpdatePrRequest) -> Result<()> {
        self.instance
            .pulls(&self.config.owner, &self.config.repo)
            .update(req.pr_number)
            .title(req.title)
            .body(req.body)
            .send()
            .await?;

        Ok(())
    }
}
