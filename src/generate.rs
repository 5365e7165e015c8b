//! Text-generation collaborator.
//!
//! Defines the [`TextGenerator`] trait consumed by the pipeline and the
//! OpenAI chat-completions implementation. Requires the `OPENAI_API_KEY`
//! environment variable.
//!
//! # Retry Strategy
//!
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: doubles per attempt starting at 1s, capped at 32s

use async_trait::async_trait;
use std::time::Duration;

use crate::config::GenerationConfig;
use crate::error::{DocError, Result};

/// Opaque prompt-in, text-out generation service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce narrative text for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Render the per-file documentation prompt from the path, extracted
/// structure, and a bounded code snippet.
pub fn build_file_prompt(
    file_path: &str,
    functions: &[String],
    classes: &[String],
    code_snippet: &str,
) -> String {
    format!(
        "You are a senior software engineer and technical writer.\n\
         \n\
         File path:\n{file_path}\n\
         \n\
         Functions:\n{functions:?}\n\
         \n\
         Classes:\n{classes:?}\n\
         \n\
         Code snippet:\n{code_snippet}\n\
         \n\
         Task:\n\
         Explain the purpose of this file in the context of the project.\n\
         Use clear, professional technical language.\n\
         If functions or classes exist:\n\
         - Explain what problem they solve\n\
         - Explain how they are used\n\
         Avoid repeating code.\n\
         Do not speculate beyond the given code.\n\
         Write 3-5 concise sentences.\n"
    )
}

/// OpenAI chat-completions generator.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    model: String,
    temperature: f64,
    max_retries: u32,
}

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_PROMPT: &str = "You generate high-quality technical documentation.";

impl OpenAiGenerator {
    /// Build a generator from configuration.
    ///
    /// Fails early with [`DocError::GenerationFailed`] when
    /// `OPENAI_API_KEY` is not set, so misconfiguration surfaces at startup
    /// rather than on the first request.
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        if std::env::var("OPENAI_API_KEY").is_err() {
            return Err(DocError::GenerationFailed(
                "OPENAI_API_KEY environment variable not set".into(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DocError::GenerationFailed(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_retries: config.max_retries,
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| DocError::GenerationFailed("OPENAI_API_KEY not set".into()))?;

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "temperature": self.temperature,
        });

        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, 8s, ...
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post(OPENAI_CHAT_URL)
                .header("Authorization", format!("Bearer {}", api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response
                            .json()
                            .await
                            .map_err(|e| DocError::GenerationFailed(e.to_string()))?;
                        return parse_chat_response(&json);
                    }

                    // Rate limited or server error — retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err = Some(DocError::GenerationFailed(format!(
                            "OpenAI API error {}: {}",
                            status, body_text
                        )));
                        continue;
                    }

                    // Client error (not 429) — don't retry
                    let body_text = response.text().await.unwrap_or_default();
                    return Err(DocError::GenerationFailed(format!(
                        "OpenAI API error {}: {}",
                        status, body_text
                    )));
                }
                Err(e) => {
                    last_err = Some(DocError::GenerationFailed(e.to_string()));
                    continue;
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| DocError::GenerationFailed("generation failed after retries".into())))
    }
}

/// Extract `choices[0].message.content` from a chat-completions response.
fn parse_chat_response(json: &serde_json::Value) -> Result<String> {
    json.get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.trim().to_string())
        .ok_or_else(|| {
            DocError::GenerationFailed("invalid OpenAI response: missing message content".into())
        })
}
