use thiserror::Error;

use crate::reporting::ExportFormat;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Request blocked by provider policy: {0}")]
    PromptBlocked(String),

    #[error("Provider response contains no candidate")]
    NoCandidate,

    #[error("Invalid JSON payload in model response: {0}")]
    InvalidJson(String),

    #[error("Response blocked by safety filters")]
    SafetyBlocked,

    #[error("Empty model response (finish reason: {})", finish_reason.as_deref().unwrap_or("none"))]
    EmptyResponse { finish_reason: Option<String> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited: {0}")]
    RateLimit(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error ({format}): {message}")]
    Export { format: ExportFormat, message: String },

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReportError {
    pub fn export(format: ExportFormat, message: impl Into<String>) -> Self {
        ReportError::Export { format, message: message.into() }
    }

    /// Errors raised by the local environment (config files, disk, prompt
    /// templates, saved report files) rather than by the generation round
    /// trip. Their detail is useful to the operator and is shown as is.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ReportError::Config(_)
                | ReportError::Prompt(_)
                | ReportError::Io(_)
                | ReportError::Json(_)
                | ReportError::Yaml(_)
        )
    }
}
