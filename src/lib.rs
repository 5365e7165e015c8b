//! # docforge
//!
//! An AI-assisted README and documentation generator for GitHub
//! repositories.
//!
//! docforge fetches a repository's file tree, filters it down to relevant
//! source files, extracts function/class names with a lexical scanner, asks
//! an LLM for a short per-file explanation (cached per repo+file for the
//! process lifetime), and assembles everything into a deterministic markdown
//! README. The same pipeline also documents single pasted or uploaded files.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐   ┌────────┐   ┌─────────┐   ┌──────────┐   ┌────────┐
//! │ GitHub  │──▶│ Filter │──▶│ Scanner │──▶│ Pipeline │──▶│ README │
//! │ gateway │   │        │   │ (regex) │   │ + cache  │   │ render │
//! └─────────┘   └────────┘   └─────────┘   └────┬─────┘   └────────┘
//!                                               │
//!                                          ┌────┴─────┐
//!                                          │  OpenAI  │
//!                                          │generator │
//!                                          └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Typed pipeline failures |
//! | [`models`] | Core data types |
//! | [`scanner`] | Lexical function/class extraction |
//! | [`filter`] | Source-file filtering heuristics |
//! | [`github`] | Repository content gateway |
//! | [`generate`] | Text-generation collaborator |
//! | [`pipeline`] | Orchestrator and documentation cache |
//! | [`readme`] | Deterministic markdown assembly |
//! | [`server`] | JSON HTTP API |

pub mod config;
pub mod error;
pub mod filter;
pub mod generate;
pub mod github;
pub mod models;
pub mod pipeline;
pub mod readme;
pub mod scanner;
pub mod server;
