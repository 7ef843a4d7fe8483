// SOP generation pipeline.
// registry -> prompts -> (templated | generator) -> assembler.
// All model calls go through llm_client; nothing here speaks HTTP to Ollama.

pub mod assembler;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod registry;
pub mod templated;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::LlmError;

/// How section bodies are produced. Selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Each section is written by the model server.
    Generated,
    /// Each section is built from fixed paragraphs and field substitution.
    Templated,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Generated => write!(f, "generated"),
            Strategy::Templated => write!(f, "templated"),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown generation strategy: {0}")]
pub struct UnknownStrategy(String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "generated" | "ollama" | "llm" => Ok(Strategy::Generated),
            "templated" | "template" => Ok(Strategy::Templated),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

/// Why a single section could not be produced.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Section '{0}' not found")]
    SectionNotFound(String),

    #[error("Ollama service is not running. Please start Ollama and try again.")]
    ServiceUnavailable,

    #[error("Model '{0}' not found. Please install it using: ollama pull {0}")]
    ModelNotFound(String),

    #[error("Generated content for {section} is too short ({words} words)")]
    ContentTooShort { section: String, words: usize },

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Whitespace-delimited word count, as used for every length check.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parses_aliases_case_insensitively() {
        assert_eq!("Generated".parse::<Strategy>().unwrap(), Strategy::Generated);
        assert_eq!("ollama".parse::<Strategy>().unwrap(), Strategy::Generated);
        assert_eq!(" TEMPLATED ".parse::<Strategy>().unwrap(), Strategy::Templated);
        assert!("markov".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_strategy_display_matches_config_values() {
        assert_eq!(Strategy::Generated.to_string(), "generated");
        assert_eq!(Strategy::Templated.to_string(), "templated");
    }

    #[test]
    fn test_word_count_ignores_repeated_whitespace() {
        assert_eq!(word_count("  one two\n\nthree\tfour "), 4);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_model_not_found_message_names_the_model() {
        let err = GenerationError::ModelNotFound("llama3.1:8b".to_string());
        assert_eq!(
            err.to_string(),
            "Model 'llama3.1:8b' not found. Please install it using: ollama pull llama3.1:8b"
        );
    }
}
