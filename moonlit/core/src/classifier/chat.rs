//! Chat-Completions Classifier
//!
//! Classifies notes with any OpenAI-compatible `chat/completions` endpoint
//! (DeepSeek, OpenAI, a local proxy). The note goes out as a single user message
//! and the first choice's content is mapped onto a category.

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{build_prompt, ClassifierConfig, ClassifierError, EmotionClassifier};
use crate::entries::EmotionCategory;

/// Chat-completions classifier client
#[derive(Clone, Debug)]
pub struct ChatCompletionsClassifier {
    base_url: String,
    api_key: String,
    model: String,
    http_client: reqwest::Client,
}

impl ChatCompletionsClassifier {
    /// Create a new chat-completions classifier
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
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
            ClassifierConfig::Chat {
                base_url,
                api_key,
                model,
            } => Some(Self::new(base_url.clone(), api_key.clone(), model.clone())),
            ClassifierConfig::Ollama { .. } => None,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Ask the model and map its answer
    pub async fn try_classify(&self, text: &str) -> Result<EmotionCategory, ClassifierError> {
        let json_request = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": build_prompt(text) }],
            "temperature": 0.2,
            "max_tokens": 20,
        });

        let response = self
            .http_client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
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
            .pointer("/choices/0/message/content")
            .and_then(|c| c.as_str())
            .ok_or_else(|| ClassifierError::Decode("no choices[0].message.content".to_string()))?;

        Ok(EmotionCategory::from_model_reply(reply))
    }
}

#[async_trait]
impl EmotionClassifier for ChatCompletionsClassifier {
    fn name(&self) -> &'static str {
        "ChatCompletions"
    }

    async fn classify(&self, text: &str) -> EmotionCategory {
        if text.trim().is_empty() {
            return EmotionCategory::Received;
        }

        match self.try_classify(text).await {
            Ok(category) => category,
            Err(e) => {
                tracing::warn!(error = %e, model = %self.model, "Chat classification failed, using received");
                EmotionCategory::Received
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url_tolerates_trailing_slash() {
        let a = ChatCompletionsClassifier::new("https://api.deepseek.com/v1", "k", "deepseek-chat");
        let b = ChatCompletionsClassifier::new("https://api.deepseek.com/v1/", "k", "deepseek-chat");
        assert_eq!(a.completions_url(), "https://api.deepseek.com/v1/chat/completions");
        assert_eq!(a.completions_url(), b.completions_url());
    }

    #[tokio::test]
    async fn test_unreachable_server_fails_open() {
        let classifier = ChatCompletionsClassifier::new("http://127.0.0.1:1/v1", "k", "m");
        assert_eq!(
            classifier.classify("I lost my keys").await,
            EmotionCategory::Received
        );
    }
}
