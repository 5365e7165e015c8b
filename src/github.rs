//! Repository content gateway.
//!
//! Defines the [`RepoGateway`] trait the pipeline depends on and the
//! GitHub-backed implementation. The trait keeps the network edge swappable
//! for deterministic fakes in tests.
//!
//! Unauthenticated GitHub API calls are heavily rate limited; set
//! `GITHUB_TOKEN` in the environment to raise the limit. GitHub also
//! rejects requests without a `User-Agent`, so one is always sent.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::GithubConfig;
use crate::error::{DocError, Result};

/// External source of repository metadata and raw file content.
#[async_trait]
pub trait RepoGateway: Send + Sync {
    /// Resolve the repository's default branch name.
    async fn default_branch(&self, owner: &str, repo: &str) -> Result<String>;

    /// List every file path (blobs only, no directories) in the repository
    /// tree at its default branch, in tree order.
    async fn list_file_paths(&self, owner: &str, repo: &str) -> Result<Vec<String>>;

    /// Fetch the raw text content of one file at the given branch.
    async fn fetch_content(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<String>;
}

/// GitHub REST v3 gateway.
pub struct GithubGateway {
    client: reqwest::Client,
    api_base: String,
    raw_base: String,
    token: Option<String>,
}

impl GithubGateway {
    /// Build a gateway from configuration, picking up `GITHUB_TOKEN` from
    /// the environment when present.
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("docforge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DocError::TreeFetchFailed(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            raw_base: config.raw_base.trim_end_matches('/').to_string(),
            token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.get(url);
        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        req
    }
}

/// Subset of the `GET /repos/{owner}/{repo}` response.
#[derive(Deserialize)]
struct RepoInfo {
    default_branch: String,
}

/// Subset of the `GET /repos/{owner}/{repo}/git/trees/{branch}?recursive=1`
/// response.
#[derive(Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
}

#[derive(Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[async_trait]
impl RepoGateway for GithubGateway {
    async fn default_branch(&self, owner: &str, repo: &str) -> Result<String> {
        let url = format!("{}/repos/{}/{}", self.api_base, owner, repo);
        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| DocError::RepositoryNotFound(format!("{}/{}: {}", owner, repo, e)))?;

        if !response.status().is_success() {
            return Err(DocError::RepositoryNotFound(format!(
                "{}/{} (HTTP {})",
                owner,
                repo,
                response.status()
            )));
        }

        let info: RepoInfo = response
            .json()
            .await
            .map_err(|e| DocError::RepositoryNotFound(format!("{}/{}: {}", owner, repo, e)))?;

        Ok(info.default_branch)
    }

    async fn list_file_paths(&self, owner: &str, repo: &str) -> Result<Vec<String>> {
        let branch = self.default_branch(owner, repo).await?;

        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, owner, repo, branch
        );
        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| DocError::TreeFetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DocError::TreeFetchFailed(format!(
                "{}/{} tree at {} (HTTP {})",
                owner,
                repo,
                branch,
                response.status()
            )));
        }

        let tree: TreeResponse = response
            .json()
            .await
            .map_err(|e| DocError::TreeFetchFailed(e.to_string()))?;

        Ok(tree
            .tree
            .into_iter()
            .filter(|entry| entry.kind == "blob")
            .map(|entry| entry.path)
            .collect())
    }

    async fn fetch_content(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<String> {
        let url = format!("{}/{}/{}/{}/{}", self.raw_base, owner, repo, branch, path);
        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|_| DocError::FileFetchFailed(path.to_string()))?;

        if !response.status().is_success() {
            return Err(DocError::FileFetchFailed(path.to_string()));
        }

        response
            .text()
            .await
            .map_err(|_| DocError::FileFetchFailed(path.to_string()))
    }
}
