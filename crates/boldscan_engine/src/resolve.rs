//! Phrase → video lookup against a YouTube-style search endpoint.
//!
//! The resolver always produces an id. Every failure, including bad input and a
//! missing credential, is logged and replaced by the configured fallback id, so one
//! bad lookup never disturbs the other entries.

use std::time::Duration;

use boldscan_logging::{scan_debug, scan_warn};
use serde::Deserialize;

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";
pub const DEFAULT_FALLBACK_VIDEO_ID: &str = "dQw4w9WgXcQ";

#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub endpoint: String,
    /// Search API credential. Without one every lookup returns the fallback.
    pub api_key: Option<String>,
    pub fallback_video_id: String,
    pub request_timeout: Duration,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            api_key: None,
            fallback_video_id: DEFAULT_FALLBACK_VIDEO_ID.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[async_trait::async_trait]
pub trait VideoResolver: Send + Sync {
    /// Returns a video id for `phrase`, or the fallback id.
    async fn resolve(&self, phrase: Option<&str>) -> String;

    fn fallback_video_id(&self) -> &str;
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    #[error("invalid search endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("search api returned {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("malformed response: {0}")]
    InvalidBody(String),
    #[error("no videos found for this query")]
    NoItems,
    #[error("no video id found in response")]
    MissingVideoId,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Option<Vec<SearchItem>>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: Option<SearchItemId>,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId", default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

/// Holds one pooled HTTP client for every lookup it serves.
#[derive(Debug, Clone)]
pub struct YoutubeResolver {
    settings: ResolverSettings,
    client: reqwest::Client,
}

impl YoutubeResolver {
    pub fn new(settings: ResolverSettings) -> Result<Self, LookupFailure> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| LookupFailure::Transport(err.to_string()))?;
        Ok(Self { settings, client })
    }

    /// One search request; any deviation from the expected shape is an error.
    pub async fn search(&self, query: &str, api_key: &str) -> Result<String, LookupFailure> {
        let url = reqwest::Url::parse_with_params(
            &self.settings.endpoint,
            &[
                ("part", "snippet"),
                ("q", query),
                ("key", api_key),
                ("maxResults", "1"),
                ("type", "video"),
                ("videoEmbeddable", "true"),
                ("videoSyndicated", "true"),
            ],
        )
        .map_err(|err| LookupFailure::InvalidEndpoint(err.to_string()))?;

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|parsed| parsed.error)
                .and_then(|error| error.message)
                .unwrap_or_else(|| "search request failed".to_string());
            return Err(LookupFailure::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|err| LookupFailure::InvalidBody(err.to_string()))?;
        let first = parsed
            .items
            .and_then(|items| items.into_iter().next())
            .ok_or(LookupFailure::NoItems)?;
        first
            .id
            .and_then(|id| id.video_id)
            .filter(|video_id| !video_id.trim().is_empty())
            .ok_or(LookupFailure::MissingVideoId)
    }
}

#[async_trait::async_trait]
impl VideoResolver for YoutubeResolver {
    async fn resolve(&self, phrase: Option<&str>) -> String {
        let fallback = self.settings.fallback_video_id.clone();
        let Some(query) = phrase.map(str::trim).filter(|q| !q.is_empty()) else {
            scan_warn!("invalid search query, using fallback video");
            return fallback;
        };
        let Some(api_key) = self.settings.api_key.as_deref() else {
            scan_warn!("no search api key configured, using fallback video for {query:?}");
            return fallback;
        };

        match self.search(query, api_key).await {
            Ok(video_id) => {
                scan_debug!("resolved {query:?} to {video_id}");
                video_id
            }
            Err(err) => {
                scan_warn!("video lookup for {query:?} failed: {err}");
                fallback
            }
        }
    }

    fn fallback_video_id(&self) -> &str {
        &self.settings.fallback_video_id
    }
}

fn map_reqwest_error(err: reqwest::Error) -> LookupFailure {
    if err.is_timeout() {
        LookupFailure::Timeout
    } else {
        LookupFailure::Transport(err.to_string())
    }
}
