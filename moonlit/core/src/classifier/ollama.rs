//! Ollama Classifier
//!
//! Classifies notes with a model served by Ollama (local LLM server), using the
//! non-streaming `/api/generate` endpoint: the answer is a single word, so there
//! is nothing to stream.

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{build_prompt, ClassifierConfig, ClassifierError, EmotionClassifier};
use crate::entries::EmotionCategory;

/// Ollama classifier client
#[derive(Clone, Debug)]
pub struct OllamaClassifier {
    /// Host address
    host: String,
    /// Port number
    port: u16,
    /// Model name
    model: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl OllamaClassifier {
    /// Create a new Ollama classifier
    pub fn new(host: impl Into<String>, port: u16, model: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            model: model.into(),
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Create from `ClassifierConfig`
    #[must_use]
    pub fn from_config(config: &ClassifierConfig) -> Option<Self> {
        match config {
            ClassifierConfig::Ollama { host, port, model } => {
                Some(Self::new(host.clone(), *port, model.clone()))
            }
            ClassifierConfig::Chat { .. } => None,
        }
    }

    /// Get generate endpoint URL
    fn generate_url(&self) -> String {
        format!("http://{}:{}/api/generate", self.host, self.port)
    }

    /// Ask the model and map its answer
    pub async fn try_classify(&self, text: &str) -> Result<EmotionCategory, ClassifierError> {
        let json_request = serde_json::json!({
            "model": self.model,
            "prompt": build_prompt(text),
            "stream": false,
            "options": {
                "temperature": 0.2,
                "num_predict": 20,
            },
        });

        let response = self
            .http_client
            .post(self.generate_url())
            .json(&json_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status { status, body });
        }

        let data: serde_json::Value = response.json().await?;
        let reply = data
            .get("response")
            .and_then(|r| r.as_str())
            .ok_or_else(|| ClassifierError::Decode("missing \"response\" field".to_string()))?;

        Ok(EmotionCategory::from_model_reply(reply))
    }
}

impl Default for OllamaClassifier {
    fn default() -> Self {
        Self::new("localhost", 11434, "llama3.2")
    }
}

#[async_trait]
impl EmotionClassifier for OllamaClassifier {
    fn name(&self) -> &'static str {
        "Ollama"
    }

    async fn classify(&self, text: &str) -> EmotionCategory {
        if text.trim().is_empty() {
            return EmotionCategory::Received;
        }

        match self.try_classify(text).await {
            Ok(category) => category,
            Err(e) => {
                tracing::warn!(error = %e, model = %self.model, "Ollama classification failed, using received");
                EmotionCategory::Received
            }
        }
    }
}
