use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Internal error in {provider}: {message}")]
    Internal { provider: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Upstream,
    Internal,
}

impl LookupError {
    pub fn internal(provider: impl Into<String>, message: impl Into<String>) -> Self {
        LookupError::Internal {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            LookupError::ConfigError { .. }
            | LookupError::InvalidConfigValueError { .. }
            | LookupError::MissingConfigError { .. } => ErrorCategory::Configuration,
            LookupError::HttpError(_) => ErrorCategory::Upstream,
            LookupError::IoError(_)
            | LookupError::SerializationError(_)
            | LookupError::Internal { .. } => ErrorCategory::Internal,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LookupError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            LookupError::MissingConfigError { field } => {
                format!("Configuration field '{}' is required", field)
            }
            LookupError::ConfigError { message } => format!("Configuration problem: {}", message),
            LookupError::HttpError(_) => "Could not reach an upstream provider".to_string(),
            _ => "The lookup failed because of an internal error".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the command line flags and the TOML configuration file"
            }
            ErrorCategory::Upstream => "Check network connectivity to the provider endpoints",
            ErrorCategory::Internal => "Check the provider base URLs and the service logs",
        }
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
