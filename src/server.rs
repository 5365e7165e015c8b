//! JSON HTTP API for the documentation generator.
//!
//! Thin request/response mapping over [`DocPipeline`]; all pipeline logic
//! lives in the library modules.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `POST` | `/validate-repo` | Check a GitHub URL points at a reachable repo |
//! | `POST` | `/generate-readme` | Generate a README for a repository |
//! | `POST` | `/download-readme` | Same, as a `README.md` attachment |
//! | `POST` | `/generate-file-doc` | Document a single inline file |
//! | `POST` | `/generate-file-doc/upload` | Same, via multipart upload |
//! | `POST` | `/download-single-file-readme` | Single-file README attachment |
//!
//! # Error Contract
//!
//! All error responses share one schema:
//!
//! ```json
//! { "error": { "code": "invalid_input", "message": "not a GitHub URL" } }
//! ```
//!
//! Error codes: `invalid_input` (400), `not_found` (404), `upstream` (502).
//!
//! # CORS
//!
//! Browser access is restricted to the single origin configured in
//! `[server].cors_origin` (the development frontend).

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::error::DocError;
use crate::generate::OpenAiGenerator;
use crate::github::{GithubGateway, RepoGateway};
use crate::models::{FileDoc, RepoRef};
use crate::pipeline::DocPipeline;
use crate::readme::{build_readme, build_single_file_readme};

/// Shared application state passed to all route handlers via Axum's `State`
/// extractor.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<DocPipeline>,
    gateway: Arc<dyn RepoGateway>,
    /// Files documented per repository request.
    max_files: usize,
}

impl AppState {
    pub fn new(pipeline: Arc<DocPipeline>, gateway: Arc<dyn RepoGateway>, max_files: usize) -> Self {
        Self {
            pipeline,
            gateway,
            max_files,
        }
    }
}

/// Starts the HTTP server with real GitHub and OpenAI collaborators.
///
/// Binds to `[server].bind` and runs until the process is terminated.
/// Fails fast when `OPENAI_API_KEY` is missing.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let gateway = Arc::new(GithubGateway::new(&config.github)?);
    let generator = Arc::new(OpenAiGenerator::new(&config.generation)?);

    let pipeline = Arc::new(DocPipeline::new(
        gateway.clone(),
        generator,
        &config.generation,
        config.filter.ignored_folders.clone(),
    ));

    let state = AppState::new(pipeline, gateway, config.generation.max_files);

    let cors_origin = config
        .server
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|_| anyhow::anyhow!("invalid server.cors_origin: {}", config.server.cors_origin))?;

    let app = build_router(state, cors_origin);

    println!("docforge API listening on http://{}", config.server.bind);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Assembles the router; split out from [`run_server`] so tests can drive
/// the routes without binding a socket.
pub fn build_router(state: AppState, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/validate-repo", post(handle_validate_repo))
        .route("/generate-readme", post(handle_generate_readme))
        .route("/download-readme", post(handle_download_readme))
        .route("/generate-file-doc", post(handle_generate_file_doc))
        .route("/generate-file-doc/upload", post(handle_file_doc_upload))
        .route(
            "/download-single-file-readme",
            post(handle_download_single_file_readme),
        )
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Inner error detail with a machine-readable code and human-readable
/// message.
#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 400 Bad Request error.
fn invalid_input(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "invalid_input".to_string(),
        message: message.into(),
    }
}

impl From<DocError> for AppError {
    fn from(err: DocError) -> Self {
        let (status, code) = match &err {
            DocError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            DocError::RepositoryNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            DocError::TreeFetchFailed(_)
            | DocError::FileFetchFailed(_)
            | DocError::GenerationFailed(_) => (StatusCode::BAD_GATEWAY, "upstream"),
        };
        AppError {
            status,
            code: code.to_string(),
            message: err.to_string(),
        }
    }
}

// ============ Request/response bodies ============

#[derive(Deserialize)]
struct RepoRequest {
    repo_url: String,
}

#[derive(Serialize)]
struct ValidateResponse {
    status: String,
    repo: String,
}

#[derive(Serialize)]
struct ReadmeResponse {
    readme: String,
}

#[derive(Deserialize)]
struct FileDocRequest {
    filename: String,
    code: String,
    #[serde(default)]
    #[allow(dead_code)]
    language: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

// ============ Handlers ============

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handler for `POST /validate-repo`.
///
/// 400 for non-GitHub URLs, 404 when the upstream repository lookup fails.
async fn handle_validate_repo(
    State(state): State<AppState>,
    Json(req): Json<RepoRequest>,
) -> Result<Json<ValidateResponse>, AppError> {
    let repo_ref = RepoRef::parse(&req.repo_url)?;

    state
        .gateway
        .default_branch(&repo_ref.owner, &repo_ref.repo)
        .await?;

    Ok(Json(ValidateResponse {
        status: "valid".to_string(),
        repo: req.repo_url,
    }))
}

/// Handler for `POST /generate-readme`.
async fn handle_generate_readme(
    State(state): State<AppState>,
    Json(req): Json<RepoRequest>,
) -> Result<Json<ReadmeResponse>, AppError> {
    let readme = generate_repo_readme(&state, &req.repo_url).await?;
    Ok(Json(ReadmeResponse { readme }))
}

/// Handler for `POST /download-readme`.
///
/// Same pipeline as `generate-readme`, returned as a file attachment.
async fn handle_download_readme(
    State(state): State<AppState>,
    Json(req): Json<RepoRequest>,
) -> Result<Response, AppError> {
    let readme = generate_repo_readme(&state, &req.repo_url).await?;
    Ok(markdown_attachment(readme))
}

/// Handler for `POST /generate-file-doc`.
///
/// Documents one inline file; always invokes the generator (no cache).
async fn handle_generate_file_doc(
    State(state): State<AppState>,
    Json(req): Json<FileDocRequest>,
) -> Result<Json<FileDoc>, AppError> {
    let doc = state.pipeline.document_file(&req.filename, &req.code).await?;
    Ok(Json(doc))
}

/// Handler for `POST /generate-file-doc/upload`.
///
/// Multipart variant: a `file` part carries the source text, an optional
/// `language` part is accepted and currently unused.
async fn handle_file_doc_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<FileDoc>, AppError> {
    let mut filename = None;
    let mut code = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| invalid_input(format!("malformed multipart body: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                filename = field.file_name().map(|n| n.to_string());
                code = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| invalid_input(format!("unreadable file part: {}", e)))?,
                );
            }
            // `language` accepted for API compatibility; the prompt does
            // not use it.
            _ => continue,
        }
    }

    let code = code.ok_or_else(|| invalid_input("missing file upload"))?;
    let filename = filename.unwrap_or_else(|| "uploaded-file".to_string());

    let doc = state.pipeline.document_file(&filename, &code).await?;
    Ok(Json(doc))
}

/// Handler for `POST /download-single-file-readme`.
async fn handle_download_single_file_readme(
    State(state): State<AppState>,
    Json(req): Json<FileDocRequest>,
) -> Result<Response, AppError> {
    let doc = state.pipeline.document_file(&req.filename, &req.code).await?;
    let readme = build_single_file_readme(&req.filename, &doc);
    Ok(markdown_attachment(readme))
}

// ============ Helpers ============

async fn generate_repo_readme(state: &AppState, repo_url: &str) -> Result<String, AppError> {
    let repo_ref = RepoRef::parse(repo_url)?;
    let docs = state
        .pipeline
        .generate_repo_docs(&repo_ref.owner, &repo_ref.repo, state.max_files)
        .await?;
    Ok(build_readme(&repo_ref.repo, &docs))
}

fn markdown_attachment(content: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=README.md",
            ),
        ],
        content,
    )
        .into_response()
}
