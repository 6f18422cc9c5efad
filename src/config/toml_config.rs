use crate::adapters::{HttpEntityRecognizer, OpenAiCompletionClient};
use crate::core::AggregateWeighting;
use crate::domain::ports::{CompletionClient, EntityRecognizer};
use crate::utils::error::{ExtractError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub llm: LlmConfig,
    pub ner: NerConfig,
    pub arbitration: ArbitrationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    /// Falls back to `OPENAI_API_KEY`; with neither the LLM stays off.
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key: None,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NerConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub threshold: Option<f32>,
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://localhost:8090".to_string(),
            timeout_seconds: 30,
            threshold: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbitrationConfig {
    pub weighting: AggregateWeighting,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ExtractError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ExtractError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn api_key(&self) -> Option<String> {
        self.api_key_with(|name| std::env::var(name).ok())
    }

    fn api_key_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        let usable = |key: &String| !key.trim().is_empty() && !key.starts_with("${");
        self.llm
            .api_key
            .clone()
            .filter(usable)
            .or_else(|| env(API_KEY_ENV).filter(usable))
    }

    /// The configured LLM client, or `None` when disabled or no key is available.
    pub fn completion_client(&self) -> Option<Arc<dyn CompletionClient>> {
        if !self.llm.enabled {
            return None;
        }
        let Some(api_key) = self.api_key() else {
            tracing::warn!("LLM enabled but no API key found; continuing without it");
            return None;
        };
        Some(Arc::new(OpenAiCompletionClient::new(
            &self.llm.endpoint,
            &self.llm.model,
            api_key,
            self.llm.timeout_seconds,
        )))
    }

    pub fn entity_recognizer(&self) -> Option<Arc<dyn EntityRecognizer>> {
        if !self.ner.enabled {
            return None;
        }
        let mut recognizer = HttpEntityRecognizer::new(&self.ner.endpoint, self.ner.timeout_seconds);
        if let Some(threshold) = self.ner.threshold {
            recognizer = recognizer.with_threshold(threshold);
        }
        Some(Arc::new(recognizer))
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.llm.enabled {
            validate_url("llm.endpoint", &self.llm.endpoint)?;
            validate_non_empty_string("llm.model", &self.llm.model)?;
            validate_positive_number("llm.timeout_seconds", self.llm.timeout_seconds, 1)?;
        }

        if self.ner.enabled {
            validate_url("ner.endpoint", &self.ner.endpoint)?;
            validate_positive_number("ner.timeout_seconds", self.ner.timeout_seconds, 1)?;
            if let Some(threshold) = self.ner.threshold {
                validate_range("ner.threshold", threshold, 0.0, 1.0)?;
            }
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
