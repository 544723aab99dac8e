//! Emotion Classification
//!
//! Abstracted access to the model that decides whether a note is positive,
//! negative or neutral, through a common trait.
//!
//! # Available Classifiers
//!
//! - **Ollama**: Local LLM server (default)
//! - **Chat completions**: Any OpenAI-compatible API (DeepSeek, OpenAI, ...)
//!
//! # Usage
//!
//! ```ignore
//! use moonlit_core::classifier::{AnyClassifier, ClassifierConfig, EmotionClassifier};
//!
//! let classifier = AnyClassifier::from_config(&ClassifierConfig::default());
//! let category = classifier.classify("the stars were out tonight").await;
//! ```

mod chat;
mod ollama;
mod traits;

use async_trait::async_trait;

pub use chat::ChatCompletionsClassifier;
pub use ollama::OllamaClassifier;
pub use traits::{build_prompt, ClassifierConfig, ClassifierError, EmotionClassifier};

use crate::entries::EmotionCategory;

/// Classifier chosen at runtime from configuration
#[derive(Clone, Debug)]
pub enum AnyClassifier {
    /// Ollama backend
    Ollama(OllamaClassifier),
    /// Chat-completions backend
    Chat(ChatCompletionsClassifier),
}

impl AnyClassifier {
    /// Build the classifier described by `config`
    #[must_use]
    pub fn from_config(config: &ClassifierConfig) -> Self {
        match config {
            ClassifierConfig::Ollama { host, port, model } => {
                Self::Ollama(OllamaClassifier::new(host.clone(), *port, model.clone()))
            }
            ClassifierConfig::Chat {
                base_url,
                api_key,
                model,
            } => Self::Chat(ChatCompletionsClassifier::new(
                base_url.clone(),
                api_key.clone(),
                model.clone(),
            )),
        }
    }
}

#[async_trait]
impl EmotionClassifier for AnyClassifier {
    fn name(&self) -> &str {
        match self {
            Self::Ollama(c) => c.name(),
            Self::Chat(c) => c.name(),
        }
    }

    async fn classify(&self, text: &str) -> EmotionCategory {
        match self {
            Self::Ollama(c) => c.classify(text).await,
            Self::Chat(c) => c.classify(text).await,
        }
    }
}
