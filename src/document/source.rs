//! Where the blueprint text comes from
//!
//! The document is fetched exactly once at startup, either over HTTP or
//! from a local file. There is no retry: a failed load stays failed until
//! the application is restarted.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::model::Section;
use super::parser::parse_sections;

/// Default document location, relative to the working directory
pub const DEFAULT_DOCUMENT: &str = "Blueprint.md";

/// Errors that can occur while loading the blueprint
#[derive(Debug, Error)]
pub enum DocumentError {
    /// HTTP request could not be completed
    #[error("Failed to load blueprint: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Failed to load blueprint: HTTP {status} {reason}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase
        reason: String,
    },

    /// Local file could not be read
    #[error("Failed to load blueprint from {path:?}: {source}")]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },
}

/// Location of the blueprint text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Fetched with a single HTTP GET
    Url(String),
    /// Read from the local filesystem
    File(PathBuf),
}

impl DocumentSource {
    /// Interpret a location string; `http://` and `https://` mean a URL
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }

    /// Short name for headers and log lines
    pub fn display_name(&self) -> String {
        match self {
            Self::Url(url) => url.rsplit('/').find(|s| !s.is_empty()).unwrap_or(url.as_str()).to_string(),
            Self::File(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    /// Fetch the raw document text
    pub async fn fetch_text(&self, http: &reqwest::Client) -> Result<String, DocumentError> {
        match self {
            Self::Url(url) => {
                let response = http.get(url).send().await?;
                let status = response.status();

                if !status.is_success() {
                    return Err(DocumentError::Status {
                        status: status.as_u16(),
                        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                    });
                }

                Ok(response.text().await?)
            }
            Self::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|source| DocumentError::Io { path: path.clone(), source }),
        }
    }

    /// Fetch and parse the document into sections
    pub async fn load_sections(&self, http: &reqwest::Client) -> Result<Vec<Section>, DocumentError> {
        tracing::info!("Loading blueprint from {}", self);
        let text = self.fetch_text(http).await?;
        Ok(parse_sections(&text))
    }
}

impl Default for DocumentSource {
    fn default() -> Self {
        Self::File(PathBuf::from(DEFAULT_DOCUMENT))
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
