use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            temperature,
            max_tokens,
        }
    }
}

/// Text-completion service (an OpenAI-compatible chat model in production).
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedEntity {
    pub text: String,
    pub label: String,
}

impl RecognizedEntity {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }

    /// Person labels differ between models: `PERSON`, `PER`, `person`.
    pub fn is_person(&self) -> bool {
        matches!(
            self.label.to_ascii_lowercase().as_str(),
            "person" | "per"
        )
    }
}

/// Named-entity recognition service.
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    async fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>>;
}
