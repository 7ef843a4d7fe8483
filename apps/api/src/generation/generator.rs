//! Generated strategy: writes each section with the model server.
//!
//! Flow per request: probe_model (once) → for each section:
//!   availability check → TextGenerator::generate → length floor.
//! Prompts arrive already built; see `generation::prompts`.
//!
//! Failures are returned per section; the assembler decides how to surface them.
//! Nothing here retries.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::generation::registry::SectionSpec;
use crate::generation::{word_count, GenerationError};
use crate::llm_client::{CompletionRequest, GenerationOptions, TextGenerator};
use crate::models::document::normalize_body;

/// Generated sections shorter than this are rejected.
pub const MIN_SECTION_WORDS: usize = 10;
/// Output-token floor; long sections get twice their word target.
const MIN_MAX_TOKENS: u32 = 1000;

/// Reachability of the model server and registration of the configured model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelStatus {
    #[serde(rename = "ollama_running")]
    pub reachable: bool,
    pub model_available: bool,
    pub models: Vec<String>,
    pub exact_match: bool,
    pub flexible_match: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ModelStatus {
    fn unreachable(error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Fails fast when the model server cannot serve `model`.
    pub fn ensure_ready(&self, model: &str) -> Result<(), GenerationError> {
        if !self.reachable {
            return Err(GenerationError::ServiceUnavailable);
        }
        if !self.model_available {
            return Err(GenerationError::ModelNotFound(model.to_string()));
        }
        Ok(())
    }
}

/// Lists the server's models and matches `model` exactly or as a substring
/// (so `llama3.1` matches `llama3.1:8b`).
pub async fn probe_model(client: &dyn TextGenerator, model: &str) -> ModelStatus {
    let models = match client.list_models().await {
        Ok(models) => models,
        Err(e) => {
            warn!("Model server probe failed: {e}");
            return ModelStatus::unreachable(e.to_string());
        }
    };

    let exact_match = models.iter().any(|name| name == model);
    let flexible_match = models.iter().any(|name| name.contains(model));
    debug!(
        "Model probe: looking for '{model}', available={models:?}, exact={exact_match}, flexible={flexible_match}"
    );

    ModelStatus {
        reachable: true,
        model_available: exact_match || flexible_match,
        models,
        exact_match,
        flexible_match,
        error: None,
    }
}

/// `max(word_target × 2, 1000)`.
pub fn max_tokens_for(word_target: u32) -> u32 {
    word_target.saturating_mul(2).max(MIN_MAX_TOKENS)
}

/// Writes sections through a [`TextGenerator`] with fixed model settings.
#[derive(Clone)]
pub struct GeneratedWriter {
    client: Arc<dyn TextGenerator>,
    model: String,
    temperature: f32,
}

impl GeneratedWriter {
    pub fn new(client: Arc<dyn TextGenerator>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            client,
            model: model.into(),
            temperature,
        }
    }

    /// Probes the model server. Call once per request and share the result.
    pub async fn probe(&self) -> ModelStatus {
        probe_model(self.client.as_ref(), &self.model).await
    }

    /// Generates one section body from its prompt, given a probe taken earlier
    /// in the same request.
    pub async fn write_section(
        &self,
        spec: &SectionSpec,
        prompt: &str,
        status: &ModelStatus,
    ) -> Result<String, GenerationError> {
        status.ensure_ready(&self.model)?;

        let options = GenerationOptions {
            temperature: self.temperature,
            max_tokens: max_tokens_for(spec.word_target),
        };
        info!(
            "Generating section '{}' (target {} words, {} tokens)",
            spec.key, spec.word_target, options.max_tokens
        );

        let request = CompletionRequest::new(&self.model, prompt, options);
        let generated = self.client.generate(&request).await?;

        let body = normalize_body(&generated);
        let words = word_count(&body);
        debug!("Generated {words} words for section '{}'", spec.key);

        if words < MIN_SECTION_WORDS {
            return Err(GenerationError::ContentTooShort {
                section: spec.key.to_string(),
                words,
            });
        }

        Ok(body)
    }
}
