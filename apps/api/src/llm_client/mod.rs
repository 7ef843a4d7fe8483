/// LLM Client — the single point of entry for all model-server calls.
///
/// ARCHITECTURAL RULE: No other module may talk to the Ollama REST API directly.
/// Callers depend on the `TextGenerator` trait; `OllamaClient` is the production
/// implementation and tests substitute stubs.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

/// The status probe must answer quickly even when the generate timeout is long.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Failed to communicate with the model server: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model server returned status {status}: {message}")]
    Api { status: u16, message: String },
}

/// Sampling options forwarded to the model server.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    /// Upper bound on output tokens (`num_predict` on the wire).
    #[serde(rename = "num_predict")]
    pub max_tokens: u32,
}

/// One non-streaming completion request.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub options: GenerationOptions,
    pub stream: bool,
}

impl<'a> CompletionRequest<'a> {
    pub fn new(model: &'a str, prompt: &'a str, options: GenerationOptions) -> Self {
        Self {
            model,
            prompt,
            options,
            stream: false,
        }
    }
}

/// The text-generation collaborator. Implement this to swap model backends
/// without touching the generator, assembler or handlers.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Names of the models the server has registered.
    async fn list_models(&self) -> Result<Vec<String>, LlmError>;

    /// Runs a completion and returns the raw generated text.
    async fn generate(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError>;
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaErrorBody {
    error: String,
}

/// REST client for a locally hosted Ollama server.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        let tags: TagsResponse = response.json().await?;
        Ok(tags
            .models
            .into_iter()
            .map(|m| m.name)
            .filter(|name| !name.is_empty())
            .collect())
    }

    async fn generate(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError> {
        debug!(
            "Sending generate request: model={}, num_predict={}",
            request.model, request.options.max_tokens
        );

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        let generated: GenerateResponse = response.json().await?;
        debug!(
            "Generate call succeeded: eval_count={:?}",
            generated.eval_count
        );

        Ok(generated.response)
    }
}

/// Prefers the `{"error": "..."}` message Ollama sends over the raw body.
fn api_error(status: u16, body: String) -> LlmError {
    let message = serde_json::from_str::<OllamaErrorBody>(&body)
        .map(|e| e.error)
        .unwrap_or(body);
    LlmError::Api { status, message }
}
