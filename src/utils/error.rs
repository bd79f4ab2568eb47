use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid query: {field}: {reason}")]
    InvalidQuery { field: String, reason: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Response decoding error: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Source {source_name} unavailable: {message}")]
    SourceUnavailable {
        source_name: String,
        message: String,
    },
}

impl SearchError {
    pub fn invalid_query(field: &str, reason: impl Into<String>) -> Self {
        SearchError::InvalidQuery {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn source_unavailable(source_name: &str, message: impl Into<String>) -> Self {
        SearchError::SourceUnavailable {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
