use thiserror::Error;

use crate::config::ConfigError;

/// Errors that abort a run before or outside validation
///
/// Problems found inside a document are never errors; they are
/// [`Issue`](crate::issue::Issue) values.
#[derive(Error, Debug)]
pub enum XmlCheckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status error: {status} for {url} - {message}")]
    HttpStatus {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Request timeout: {url} after {timeout_seconds} seconds")]
    Timeout { url: String, timeout_seconds: u64 },

    #[error("Invalid source: {source_name} - {reason}")]
    InvalidSource { source_name: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ConfigError> for XmlCheckError {
    fn from(err: ConfigError) -> Self {
        XmlCheckError::Config(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, XmlCheckError>;
