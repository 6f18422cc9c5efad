//! OpenAI-compatible chat completion client.
//!
//! Any server exposing `POST {endpoint}/chat/completions` with the OpenAI
//! request and response shape works (OpenAI, Azure proxies, vLLM, Ollama).

use crate::domain::ports::{CompletionClient, CompletionRequest};
use crate::utils::error::{ExtractError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "llm";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

pub struct OpenAiCompletionClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl OpenAiCompletionClient {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout_seconds: u64,
    ) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(timeout_seconds),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.endpoint);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!("Calling completion endpoint: {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ExtractError::service(
                SERVICE,
                format!("completion endpoint returned {}: {}", status, detail),
            ));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::malformed(SERVICE, e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ExtractError::malformed(SERVICE, "response has no message content"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = ChatCompletionRequest {
            model: "gpt-3.5-turbo",
            messages: vec![ChatMessage {
                role: "user",
                content: "hola",
            }],
            temperature: 0.1,
            max_tokens: 50,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 50);
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let client = OpenAiCompletionClient::new("https://api.openai.com/v1/", "gpt-4o-mini", "key", 30);
        assert_eq!(client.endpoint, "https://api.openai.com/v1");
        assert_eq!(client.model, "gpt-4o-mini");
    }
}
