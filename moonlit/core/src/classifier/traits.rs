//! Emotion Classifier Traits
//!
//! Trait definitions for emotion classifiers. The Observatory takes any
//! [`EmotionClassifier`] so the model behind it (a local Ollama server, a hosted
//! chat-completions API, a scripted fake in tests) can change without touching
//! the sky.
//!
//! # Contract
//!
//! `classify` never fails. Empty text, network errors, bad status codes and
//! unparseable replies all come back as [`EmotionCategory::Received`].

use async_trait::async_trait;
use thiserror::Error;

use crate::entries::EmotionCategory;

/// Emotion classifier trait
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Classifier name for logs (e.g., "Ollama")
    fn name(&self) -> &str;

    /// Classify a note, falling back to `Received` on any failure
    async fn classify(&self, text: &str) -> EmotionCategory;
}

/// Errors raised inside a classifier before it fails open
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Request could not be sent or the body could not be read
    #[error("classifier request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("classifier returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Response did not have the expected shape
    #[error("unexpected classifier response: {0}")]
    Decode(String),
}

/// Classifier connection configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassifierConfig {
    /// Local Ollama server
    Ollama {
        /// Ollama host address
        host: String,
        /// Ollama port number
        port: u16,
        /// Model name
        model: String,
    },
    /// OpenAI-compatible chat-completions API
    Chat {
        /// Base URL, without the `/chat/completions` suffix
        base_url: String,
        /// Bearer token
        api_key: String,
        /// Model name
        model: String,
    },
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::Ollama {
            host: "localhost".to_string(),
            port: 11434,
            model: "llama3.2".to_string(),
        }
    }
}

impl ClassifierConfig {
    /// Create Ollama configuration
    pub fn ollama(host: impl Into<String>, port: u16, model: impl Into<String>) -> Self {
        Self::Ollama {
            host: host.into(),
            port,
            model: model.into(),
        }
    }

    /// Create chat-completions configuration
    pub fn chat(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self::Chat {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Configured model name
    #[must_use]
    pub fn model(&self) -> &str {
        match self {
            Self::Ollama { model, .. } | Self::Chat { model, .. } => model,
        }
    }
}

/// Build the instruction sent to every model
#[must_use]
pub fn build_prompt(text: &str) -> String {
    format!(
        "Classify the emotion of the following note. Answer with exactly one of these \
         English words and nothing else:\n\
         - positive\n\
         - negative\n\
         - received (neutral)\n\n\
         Note:\n\"{text}\"\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_config_default() {
        match ClassifierConfig::default() {
            ClassifierConfig::Ollama { host, port, model } => {
                assert_eq!(host, "localhost");
                assert_eq!(port, 11434);
                assert_eq!(model, "llama3.2");
            }
            other => panic!("Expected Ollama config, got {other:?}"),
        }
    }

    #[test]
    fn test_prompt_quotes_text() {
        let prompt = build_prompt("the sea was calm");
        assert!(prompt.contains("\"the sea was calm\""));
        assert!(prompt.contains("positive"));
        assert!(prompt.contains("negative"));
    }
}
