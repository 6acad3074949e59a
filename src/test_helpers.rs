//! Common test helper functions shared across test modules.
//!
//! Provides fixtures for release records and artifacts plus [`FakeForge`],
//! an in-memory repository that honors branch, revision token and pull
//! request semantics so sync properties can be checked end to end.
use async_trait::async_trait;
use secrecy::SecretString;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

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
    hasher::Sha256Digest,
    registry::ReleaseRecord,
    sync::{SyncTarget, SyncTargetBuilder},
};

/// Creates a test RemoteConfig for `acme/homebrew-tap`.
pub fn create_test_remote_config() -> RemoteConfig {
    RemoteConfig {
        owner: "acme".to_string(),
        repo: "homebrew-tap".to_string(),
        token: SecretString::from("test-token".to_string()),
        ..RemoteConfig::default()
    }
}

/// Creates a release record with every required field populated.
pub fn create_test_release(name: &str, version: &str) -> ReleaseRecord {
    ReleaseRecord {
        name: name.to_string(),
        version: version.to_string(),
        description: "A command line tool for testing".to_string(),
        homepage: "https://example.com".to_string(),
        license: "MIT".to_string(),
        tarball_url: format!(
            "https://registry.npmjs.org/{name}/-/{name}-{version}.tgz"
        ),
        sha256: Some(Sha256Digest::of(version.as_bytes())),
        binaries: vec![name.to_string()],
    }
}

/// Sync target for `Formula/<name>.rb` on `update-<name>-formula`.
pub fn create_test_target(name: &str) -> SyncTarget {
    SyncTargetBuilder::default()
        .owner("acme")
        .repo("homebrew-tap")
        .base_branch("main")
        .working_branch(format!("update-{name}-formula"))
        .path(format!("Formula/{name}.rb"))
        .build()
        .unwrap()
}

#[derive(Debug, Clone)]
pub struct FakePr {
    pub number: u64,
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
    pub open: bool,
}

#[derive(Debug, Clone)]
struct FakeBlob {
    content: String,
    sha: String,
}

#[derive(Debug, Default)]
pub struct FakeState {
    /// branch name -> commit id
    pub branches: HashMap<String, String>,
    /// commit id -> path -> blob
    trees: HashMap<String, HashMap<String, FakeBlob>>,
    /// commit id -> parent commit id
    parents: HashMap<String, String>,
    pub prs: Vec<FakePr>,
    pub file_writes: usize,
    pub pr_creates: usize,
    pub pr_updates: usize,
    pub pr_lists: usize,
    next_id: u64,
}

impl FakeState {
    fn next(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    /// Commit `content` at `path` directly on `branch`.
    pub fn commit_file(&mut self, branch: &str, path: &str, content: &str) {
        let head = self.branches.get(branch).cloned().unwrap_or_default();
        let mut tree = self.trees.get(&head).cloned().unwrap_or_default();
        let sha = self.next("blob");
        tree.insert(
            path.to_string(),
            FakeBlob {
                content: content.to_string(),
                sha,
            },
        );
        let commit = self.next("commit");
        self.trees.insert(commit.clone(), tree);
        if !head.is_empty() {
            self.parents.insert(commit.clone(), head);
        }
        self.branches.insert(branch.to_string(), commit);
    }

    pub fn file(&self, branch: &str, path: &str) -> Option<String> {
        let head = self.branches.get(branch)?;
        self.trees
            .get(head)?
            .get(path)
            .map(|blob| blob.content.clone())
    }

    pub fn contains(&self, branch: &str, sha: &str) -> bool {
        let mut cursor = self.branches.get(branch);
        while let Some(commit) = cursor {
            if commit == sha {
                return true;
            }
            cursor = self.parents.get(commit);
        }
        false
    }

    pub fn open_prs(&self) -> Vec<&FakePr> {
        self.prs.iter().filter(|pr| pr.open).collect()
    }
}

/// In-memory [`Forge`]. Clones share state, so a test can keep a handle
/// after boxing one into a [`crate::forge::manager::ForgeManager`].
#[derive(Debug, Clone)]
pub struct FakeForge {
    config: RemoteConfig,
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeForge {
    /// A repository whose `main` branch holds a single empty commit.
    pub fn new(config: RemoteConfig) -> Self {
        let mut state = FakeState::default();
        let root = state.next("commit");
        state.trees.insert(root.clone(), HashMap::new());
        state.branches.insert("main".into(), root);

        Self {
            config,
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn with_state<T>(&self, f: impl FnOnce(&mut FakeState) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }
}

#[async_trait]
impl Forge for FakeForge {
    fn remote_config(&self) -> RemoteConfig {
        self.config.clone()
    }

    async fn get_branch_sha(&self, branch: &str) -> Result<String> {
        self.with_state(|s| {
            s.branches.get(branch).cloned().ok_or_else(|| {
                BrewsmithError::remote(format!("no such branch: {branch}"))
            })
        })
    }

    async fn create_branch(
        &self,
        branch: &str,
        sha: &str,
    ) -> Result<CreateBranchOutcome> {
        self.with_state(|s| {
            if s.branches.contains_key(branch) {
                return Ok(CreateBranchOutcome::AlreadyExists);
            }
            s.branches.insert(branch.to_string(), sha.to_string());
            Ok(CreateBranchOutcome::Created)
        })
    }

    async fn branch_contains(&self, branch: &str, sha: &str) -> Result<bool> {
        self.with_state(|s| Ok(s.contains(branch, sha)))
    }

    async fn update_branch(&self, branch: &str, sha: &str) -> Result<()> {
        self.with_state(|s| {
            if !s.trees.contains_key(sha) {
                return Err(BrewsmithError::remote(format!("no commit {sha}")));
            }
            s.branches.insert(branch.to_string(), sha.to_string());
            Ok(())
        })
    }

    async fn get_file(
        &self,
        path: &str,
        branch: &str,
    ) -> Result<Option<RemoteFile>> {
        self.with_state(|s| {
            let Some(head) = s.branches.get(branch) else {
                return Ok(None);
            };
            Ok(s.trees.get(head).and_then(|tree| tree.get(path)).map(|blob| {
                RemoteFile {
                    content: blob.content.clone(),
                    sha: blob.sha.clone(),
                }
            }))
        })
    }

    async fn put_file(&self, req: PutFileRequest) -> Result<()> {
        self.with_state(|s| {
            let head = s.branches.get(&req.branch).cloned().ok_or_else(|| {
                BrewsmithError::remote(format!("no such branch: {}", req.branch))
            })?;

            let current = s
                .trees
                .get(&head)
                .and_then(|tree| tree.get(&req.path))
                .map(|blob| blob.sha.clone());

            if current != req.sha {
                return Err(BrewsmithError::conflict(req.path, req.branch));
            }

            s.commit_file(&req.branch, &req.path, &req.content);
            s.file_writes += 1;
            Ok(())
        })
    }

    async fn list_open_prs(&self, req: GetPrRequest) -> Result<Vec<PullRequest>> {
        self.with_state(|s| {
            s.pr_lists += 1;
            Ok(s.prs
                .iter()
                .filter(|pr| {
                    pr.open
                        && pr.head == req.head_branch
                        && pr.base == req.base_branch
                })
                .map(|pr| PullRequest {
                    number: pr.number,
                    title: pr.title.clone(),
                    body: pr.body.clone(),
                })
                .collect())
        })
    }

    async fn create_pr(&self, req: CreatePrRequest) -> Result<PullRequest> {
        self.with_state(|s| {
            let number = s.prs.len() as u64 + 1;
            s.prs.push(FakePr {
                number,
                head: req.head_branch,
                base: req.base_branch,
                title: req.title.clone(),
                body: req.body.clone(),
                open: true,
            });
            s.pr_creates += 1;
            Ok(PullRequest {
                number,
                title: req.title,
                body: req.body,
            })
        })
    }

    async fn update_pr(&self, req: UpdatePrRequest) -> Result<()> {
        self.with_state(|s| {
            let pr = s
                .prs
                .iter_mut()
                .find(|pr| pr.number == req.pr_number)
                .ok_or_else(|| {
                    BrewsmithError::remote(format!(
                        "no such pull request: {}",
                        req.pr_number
                    ))
                })?;
            pr.title = req.title;
            pr.body = req.body;
            s.pr_updates += 1;
            Ok(())
        })
    }
}
