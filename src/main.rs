//! # docforge CLI
//!
//! The `docforge` binary serves the HTTP API and offers one-shot commands
//! for generating a README or inspecting the scanner output locally.
//!
//! ## Usage
//!
//! ```bash
//! docforge --config ./config/docforge.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docforge serve` | Start the JSON HTTP API |
//! | `docforge readme <repo_url>` | Generate a README and print it to stdout |
//! | `docforge scan <file>` | Print extracted functions/classes as JSON |
//!
//! `serve` and `readme` require `OPENAI_API_KEY` in the environment;
//! `GITHUB_TOKEN` is optional but raises the GitHub rate limit.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use docforge::config::load_config;
use docforge::generate::OpenAiGenerator;
use docforge::github::GithubGateway;
use docforge::pipeline::DocPipeline;
use docforge::readme::build_readme;
use docforge::scanner::scan;
use docforge::server::run_server;

/// docforge — AI-assisted README and documentation generator for GitHub
/// repositories.
#[derive(Parser)]
#[command(
    name = "docforge",
    about = "AI-assisted README and documentation generator for GitHub repositories",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/docforge.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the JSON HTTP API server.
    Serve,

    /// Generate a README for a repository and print it to stdout.
    Readme {
        /// GitHub repository URL (https://github.com/owner/repo).
        repo_url: String,

        /// Maximum number of source files to document.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Scan a local file and print extracted functions/classes as JSON.
    ///
    /// Offline utility; does not touch GitHub or the LLM.
    Scan {
        /// Path to the source file.
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Serve => run_server(&config).await,

        Commands::Readme { repo_url, limit } => {
            let repo_ref = docforge::models::RepoRef::parse(&repo_url)?;
            let gateway = Arc::new(GithubGateway::new(&config.github)?);
            let generator = Arc::new(OpenAiGenerator::new(&config.generation)?);
            let pipeline = DocPipeline::new(
                gateway,
                generator,
                &config.generation,
                config.filter.ignored_folders.clone(),
            );

            let limit = limit.unwrap_or(config.generation.max_files);
            let docs = pipeline
                .generate_repo_docs(&repo_ref.owner, &repo_ref.repo, limit)
                .await?;

            println!("{}", build_readme(&repo_ref.repo, &docs));
            Ok(())
        }

        Commands::Scan { file } => {
            let code = std::fs::read_to_string(&file)?;
            let result = scan(&code);
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}
