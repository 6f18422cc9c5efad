use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid pattern table: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("{service} service error: {message}")]
    ServiceError { service: String, message: String },

    #[error("Malformed {service} response: {message}")]
    MalformedResponseError { service: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    ExternalService,
    Input,
    Internal,
}

impl ExtractError {
    pub fn service(service: &str, message: impl Into<String>) -> Self {
        ExtractError::ServiceError {
            service: service.to_string(),
            message: message.into(),
        }
    }

    pub fn malformed(service: &str, message: impl Into<String>) -> Self {
        ExtractError::MalformedResponseError {
            service: service.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ExtractError::ConfigError { .. }
            | ExtractError::InvalidConfigValueError { .. }
            | ExtractError::MissingConfigError { .. }
            | ExtractError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            ExtractError::HttpError(_)
            | ExtractError::ServiceError { .. }
            | ExtractError::MalformedResponseError { .. } => ErrorCategory::ExternalService,
            ExtractError::IoError(_) | ExtractError::SerializationError(_) => ErrorCategory::Input,
            ExtractError::PatternError(_) => ErrorCategory::Internal,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the TOML configuration file and the referenced environment variables"
            }
            ErrorCategory::ExternalService => {
                "Verify the service endpoint and credentials, or run with --no-llm / --no-ner"
            }
            ErrorCategory::Input => "Make sure the input file exists and is readable UTF-8 text",
            ErrorCategory::Internal => "This is a bug in a built-in pattern table, please report it",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ExtractError::MissingConfigError { field } => {
                format!("The configuration is missing '{}'", field)
            }
            ExtractError::InvalidConfigValueError { field, reason, .. } => {
                format!("The configuration value for '{}' is invalid: {}", field, reason)
            }
            ExtractError::IoError(e) => format!("Could not read the input: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
