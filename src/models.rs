//! Core data types shared across the documentation pipeline.

use serde::Serialize;

use crate::error::DocError;

/// An `owner/repo` pair parsed from a GitHub URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    /// Parse a browser-style GitHub URL into an owner/repo pair.
    ///
    /// Accepts `https://github.com/owner/repo` with an optional trailing
    /// `.git` suffix or extra path segments (`/tree/main`, ...), which are
    /// ignored. Any other host is rejected with [`DocError::InvalidInput`].
    pub fn parse(repo_url: &str) -> Result<Self, DocError> {
        let trimmed = repo_url.trim();

        let rest = trimmed
            .strip_prefix("https://github.com/")
            .or_else(|| trimmed.strip_prefix("http://github.com/"))
            .ok_or_else(|| DocError::InvalidInput(format!("not a GitHub URL: {}", trimmed)))?;

        let mut segments = rest.split('/').filter(|s| !s.is_empty());
        let owner = segments
            .next()
            .ok_or_else(|| DocError::InvalidInput("URL is missing the repository owner".into()))?;
        let repo = segments
            .next()
            .ok_or_else(|| DocError::InvalidInput("URL is missing the repository name".into()))?;

        let repo = repo.trim_end_matches(".git");
        if repo.is_empty() {
            return Err(DocError::InvalidInput(
                "URL is missing the repository name".into(),
            ));
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

/// Function and class names extracted from one file.
///
/// Both lists are deduplicated and lexicographically sorted; see
/// [`crate::scanner::scan`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub functions: Vec<String>,
    pub classes: Vec<String>,
}

impl ScanResult {
    /// True when the scanner found no structural signals at all.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty()
    }
}

/// The documentation record for a single file: the structural extraction
/// plus the generated narrative. Serialized verbatim as the response body
/// of `POST /generate-file-doc`.
#[derive(Debug, Clone, Serialize)]
pub struct FileDoc {
    pub file: String,
    pub functions: Vec<String>,
    pub classes: Vec<String>,
    pub documentation: String,
}
