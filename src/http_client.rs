use crate::error::XmlCheckError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::time::timeout;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: format!("xmlcheck/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client for fetching remote documents
///
/// A single GET per document. Any status other than 200 is a fatal error and
/// nothing is retried.
pub struct HttpFetcher {
    client: Client,
    config: HttpClientConfig,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self, XmlCheckError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()
            .map_err(XmlCheckError::from)?;

        Ok(Self { client, config })
    }

    /// Download the full body of `url`
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, XmlCheckError> {
        let limit = Duration::from_secs(self.config.timeout_seconds);

        let response = timeout(limit, self.client.get(url).send())
            .await
            .map_err(|_| self.timeout_error(url))?
            .map_err(XmlCheckError::from)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(XmlCheckError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                message: format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            });
        }

        let bytes = timeout(limit, response.bytes())
            .await
            .map_err(|_| self.timeout_error(url))?
            .map_err(XmlCheckError::from)?;
        log::debug!("downloaded {} bytes from {}", bytes.len(), url);

        Ok(bytes.to_vec())
    }

    fn timeout_error(&self, url: &str) -> XmlCheckError {
        XmlCheckError::Timeout {
            url: url.to_string(),
            timeout_seconds: self.config.timeout_seconds,
        }
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}
