#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of attempting to create a branch.
pub enum CreateBranchOutcome {
    Created,
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A file read from the remote at a specific branch.
pub struct RemoteFile {
    pub content: String,
    /// Blob version identifier, required to overwrite the file.
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to create or overwrite a file on a branch.
pub struct PutFileRequest {
    pub path: String,
    pub content: String,
    pub message: String,
    pub branch: String,
    /// Version the caller last observed. `None` means the file must not
    /// exist yet.
    pub sha: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Pull request information.
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to get pull requests by branch names.
pub struct GetPrRequest {
    pub head_branch: String,
    pub base_branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to create a new pull request.
pub struct CreatePrRequest {
    pub head_branch: String,
    pub base_branch: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to update existing pull request.
pub struct UpdatePrRequest {
    pub pr_number: u64,
    pub title: String,
    pub body: String,
}
