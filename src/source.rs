//! Content acquisition
//!
//! Loads a document once, from a local path or an `http(s)://` URL. Everything after
//! this point reads the same immutable buffer.

use std::fmt;
use std::path::PathBuf;

use crate::error::{Result, XmlCheckError};
use crate::http_client::{HttpClientConfig, HttpFetcher};

/// Where a document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Local(PathBuf),
    Remote(String),
}

impl DocumentSource {
    /// Classify a command-line argument; `http://` and `https://` prefixes mean remote
    pub fn parse(arg: &str) -> Result<Self> {
        if arg.trim().is_empty() {
            return Err(XmlCheckError::InvalidSource {
                source_name: arg.to_string(),
                reason: "empty path or URL".to_string(),
            });
        }
        if arg.starts_with("http://") || arg.starts_with("https://") {
            Ok(DocumentSource::Remote(arg.to_string()))
        } else {
            Ok(DocumentSource::Local(PathBuf::from(arg)))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, DocumentSource::Remote(_))
    }

    /// Read the whole document into memory
    pub async fn load(&self, http: &HttpClientConfig) -> Result<Document> {
        let bytes = match self {
            DocumentSource::Remote(url) => {
                log::info!("Downloading from URL...");
                HttpFetcher::new(http.clone())?.fetch(url).await?
            }
            DocumentSource::Local(path) => {
                log::info!("Reading local file...");
                tokio::fs::read(path).await.map_err(XmlCheckError::Io)?
            }
        };
        log::debug!("loaded {} bytes from {}", bytes.len(), self);

        Ok(Document::new(self.to_string(), bytes))
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::Local(path) => write!(f, "{}", path.display()),
            DocumentSource::Remote(url) => f.write_str(url),
        }
    }
}

/// An immutable document buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Path or URL the document was loaded from
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_source_kinds() {
        assert_eq!(
            DocumentSource::parse("https://example.com/wp.xml").unwrap(),
            DocumentSource::Remote("https://example.com/wp.xml".to_string())
        );
        assert!(DocumentSource::parse("http://example.com/a.xml").unwrap().is_remote());
        assert_eq!(
            DocumentSource::parse("exports/site.xml").unwrap(),
            DocumentSource::Local(PathBuf::from("exports/site.xml"))
        );
        // scheme match is exact
        assert!(!DocumentSource::parse("ftp://example.com/a.xml").unwrap().is_remote());
        assert!(DocumentSource::parse("  ").is_err());
    }

    #[tokio::test]
    async fn test_load_local_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "<root/>").unwrap();

        let source = DocumentSource::Local(file.path().to_path_buf());
        let document = source.load(&HttpClientConfig::default()).await.unwrap();
        assert_eq!(document.as_bytes(), b"<root/>");
        assert_eq!(document.len(), 7);
        assert_eq!(document.name(), file.path().display().to_string());
    }

    #[tokio::test]
    async fn test_missing_local_file_is_io_error() {
        let source = DocumentSource::Local(PathBuf::from("/nonexistent/xmlcheck/export.xml"));
        let result = source.load(&HttpClientConfig::default()).await;
        assert!(matches!(result, Err(XmlCheckError::Io(_))));
    }
}
