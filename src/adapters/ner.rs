//! Client for a GLiNER-style NER sidecar.
//!
//! The sidecar answers `POST {base_url}/extract` with
//! `{"text": ..., "entity_types": [...], "threshold": ...}` and returns
//! `{"entities": [{"text", "label", "score", "start", "end"}]}`.

use crate::domain::ports::{EntityRecognizer, RecognizedEntity};
use crate::utils::error::{ExtractError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "ner";
const PERSON_TYPES: &[&str] = &["person"];

#[derive(Serialize)]
struct ExtractRequest<'a> {
    text: &'a str,
    entity_types: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    threshold: Option<f32>,
}

#[derive(Deserialize)]
struct ExtractResponse {
    entities: Vec<SidecarEntity>,
}

#[derive(Deserialize)]
struct SidecarEntity {
    text: String,
    label: String,
}

pub struct HttpEntityRecognizer {
    client: Client,
    base_url: String,
    threshold: Option<f32>,
    timeout: Duration,
}

impl HttpEntityRecognizer {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            threshold: None,
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }
}

#[async_trait]
impl EntityRecognizer for HttpEntityRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>> {
        let url = format!("{}/extract", self.base_url);
        let request = ExtractRequest {
            text,
            entity_types: PERSON_TYPES,
            threshold: self.threshold,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::service(
                SERVICE,
                format!("sidecar returned {}: {}", status, body),
            ));
        }

        let parsed: ExtractResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::malformed(SERVICE, e.to_string()))?;

        Ok(parsed
            .entities
            .into_iter()
            .map(|e| RecognizedEntity::new(e.text, e.label))
            .collect())
    }
}
