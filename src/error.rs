//! Failure taxonomy for the documentation pipeline.
//!
//! Every fallible stage surfaces one of these variants so the HTTP layer can
//! map failures to status codes without inspecting message strings. All
//! failures are terminal for the request that hit them: nothing is retried
//! at this level (the generator performs its own bounded backoff internally)
//! and no partial README is ever assembled from a failed batch.

use thiserror::Error;

/// Errors produced by the documentation pipeline and its collaborators.
#[derive(Debug, Error)]
pub enum DocError {
    /// Malformed client input: a non-GitHub URL, a URL without an
    /// `owner/repo` path, or blank source code.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The repository lookup did not succeed upstream.
    #[error("repository not found: {0}")]
    RepositoryNotFound(String),

    /// The recursive tree listing for the default branch failed.
    #[error("failed to fetch repository file tree: {0}")]
    TreeFetchFailed(String),

    /// A raw-content fetch for a specific file failed.
    #[error("failed to fetch file: {0}")]
    FileFetchFailed(String),

    /// The text-generation service failed (quota, timeout, malformed
    /// response) after retries were exhausted.
    #[error("documentation generation failed: {0}")]
    GenerationFailed(String),
}

pub type Result<T> = std::result::Result<T, DocError>;
