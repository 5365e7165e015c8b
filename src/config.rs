use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
    /// Browser origin allowed by CORS (the development frontend).
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_cors_origin() -> String {
    "http://localhost:5173".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct GithubConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_raw_base")]
    pub raw_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            raw_base: default_raw_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}
fn default_raw_base() -> String {
    "https://raw.githubusercontent.com".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Files documented per repository request.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Code snippet budget (chars) when the scanner found structure.
    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,
    /// Smaller budget when no functions or classes were found.
    #[serde(default = "default_snippet_chars_bare")]
    pub snippet_chars_bare: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_files: default_max_files(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
            snippet_chars: default_snippet_chars(),
            snippet_chars_bare: default_snippet_chars_bare(),
        }
    }
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}
fn default_temperature() -> f64 {
    0.3
}
fn default_max_files() -> usize {
    5
}
fn default_max_retries() -> u32 {
    5
}
fn default_snippet_chars() -> usize {
    1500
}
fn default_snippet_chars_bare() -> usize {
    800
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilterConfig {
    /// Lowercase folder tokens excluded from documentation; any path
    /// containing one of these substrings is skipped.
    #[serde(default = "default_ignored_folders")]
    pub ignored_folders: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            ignored_folders: default_ignored_folders(),
        }
    }
}

fn default_ignored_folders() -> Vec<String> {
    [
        "node_modules",
        "dist",
        "build",
        "coverage",
        "vendor",
        "public",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.generation.max_files == 0 {
        anyhow::bail!("generation.max_files must be > 0");
    }

    if !(0.0..=2.0).contains(&config.generation.temperature) {
        anyhow::bail!("generation.temperature must be in [0.0, 2.0]");
    }

    if config.generation.snippet_chars < config.generation.snippet_chars_bare {
        anyhow::bail!("generation.snippet_chars must be >= generation.snippet_chars_bare");
    }

    if config.github.timeout_secs == 0 || config.generation.timeout_secs == 0 {
        anyhow::bail!("timeout_secs must be > 0");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let f = write_config("[server]\nbind = \"127.0.0.1:8080\"\n");
        let config = load_config(f.path()).unwrap();

        assert_eq!(config.server.cors_origin, "http://localhost:5173");
        assert_eq!(config.generation.max_files, 5);
        assert_eq!(config.generation.snippet_chars, 1500);
        assert_eq!(config.generation.snippet_chars_bare, 800);
        assert!(config
            .filter
            .ignored_folders
            .contains(&"node_modules".to_string()));
    }

    #[test]
    fn rejects_zero_max_files() {
        let f = write_config(
            "[server]\nbind = \"127.0.0.1:8080\"\n\n[generation]\nmax_files = 0\n",
        );
        assert!(load_config(f.path()).is_err());
    }

    #[test]
    fn rejects_inverted_snippet_budgets() {
        let f = write_config(
            "[server]\nbind = \"127.0.0.1:8080\"\n\n[generation]\nsnippet_chars = 100\nsnippet_chars_bare = 500\n",
        );
        assert!(load_config(f.path()).is_err());
    }
}
