use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use boldscan_logging::scan_info;

use crate::decode::decode_html;
use crate::fetch::Fetcher;
use crate::FetchError;

/// The page a cycle scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTarget {
    Url(String),
    File(PathBuf),
}

impl PageTarget {
    /// `http(s)://` targets are fetched; anything else is read as a local file.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            PageTarget::Url(trimmed.to_string())
        } else {
            PageTarget::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for PageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageTarget::Url(url) => write!(f, "{url}"),
            PageTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPage {
    pub html: String,
    pub encoding_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("No active page found")]
    NoActiveTarget,
    #[error("could not fetch page: {0}")]
    Fetch(#[from] FetchError),
    #[error("could not read {path}: {message}")]
    Read { path: String, message: String },
    #[error("extraction aborted: {0}")]
    Aborted(String),
}

pub struct PageLoader {
    fetcher: Arc<dyn Fetcher>,
}

impl PageLoader {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn load(&self, target: &PageTarget) -> Result<LoadedPage, LoadError> {
        let (bytes, content_type) = match target {
            PageTarget::Url(url) => {
                let output = self.fetcher.fetch(url).await?;
                (output.bytes, output.metadata.content_type)
            }
            PageTarget::File(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|err| LoadError::Read {
                    path: path.display().to_string(),
                    message: err.to_string(),
                })?;
                (bytes, None)
            }
        };

        let decoded = decode_html(&bytes, content_type.as_deref());
        scan_info!(
            "loaded {} ({} bytes, {})",
            target,
            bytes.len(),
            decoded.encoding_label
        );
        Ok(LoadedPage {
            html: decoded.html,
            encoding_label: decoded.encoding_label,
        })
    }
}
