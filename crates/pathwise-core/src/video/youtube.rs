//! YouTube Data API v3 client implementation
//!
//! Implements [`VideoBackend`] with `search.list` and `videos.list` calls.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::backend::{LookupError, SearchHit, VideoBackend, VideoItem};

/// Error reasons the API uses for exhausted quota.
const QUOTA_REASONS: &[&str] = &["quotaExceeded", "dailyLimitExceeded", "rateLimitExceeded"];

/// Facets requested from `videos.list`.
const VIDEO_PARTS: &str = "snippet,status,contentDetails,statistics";

/// Connection settings for [`YouTubeClient`].
#[derive(Debug, Clone)]
pub struct YouTubeConfig {
    pub api_key: String,
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl YouTubeConfig {
    pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP client for the YouTube Data API.
///
/// Holds no per-request state; share it behind an `Arc` across concurrent
/// lookups.
pub struct YouTubeClient {
    api_key: String,
    base_url: String,
    http: Client,
    timeout: Duration,
}

impl YouTubeClient {
    pub fn new(config: YouTubeConfig) -> Result<Self, LookupError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(LookupError::Network)?;

        Ok(Self {
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            timeout: config.timeout,
        })
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/youtube/v3/{resource}", self.base_url)
    }

    /// Send a GET and decode the `items` array of the response.
    async fn fetch_items<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<T>, LookupError> {
        let response = request
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "fetch_items: API error");
            return Err(classify_api_error(status.as_u16(), &body));
        }

        let list: ItemList<T> = serde_json::from_str(&body)
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;
        Ok(list.items)
    }

    fn transport_error(&self, err: reqwest::Error) -> LookupError {
        if err.is_timeout() {
            LookupError::Timeout(self.timeout)
        } else {
            // The request URL carries the query string; keep it out of messages.
            LookupError::Network(err.without_url())
        }
    }
}

#[async_trait]
impl VideoBackend for YouTubeClient {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, LookupError> {
        debug!(%query, max_results, "search: called");
        let max_results = max_results.to_string();
        let request = self.http.get(self.url("search")).query(&[
            ("part", "snippet"),
            ("q", query),
            ("type", "video"),
            ("maxResults", max_results.as_str()),
            ("order", "relevance"),
        ]);
        self.fetch_items(request).await
    }

    async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoItem>, LookupError> {
        debug!(count = ids.len(), "list_videos: called");
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let joined = ids.join(",");
        let request = self
            .http
            .get(self.url("videos"))
            .query(&[("part", VIDEO_PARTS), ("id", joined.as_str())]);
        self.fetch_items(request).await
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct ItemList<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    reason: String,
}

/// Map a non-2xx response to a [`LookupError`].
fn classify_api_error(status: u16, body: &str) -> LookupError {
    let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) else {
        return LookupError::Api {
            status,
            message: body.trim().to_string(),
        };
    };

    let quota = envelope
        .error
        .errors
        .iter()
        .any(|d| QUOTA_REASONS.contains(&d.reason.as_str()));
    if quota {
        return LookupError::QuotaExceeded(envelope.error.message);
    }

    LookupError::Api {
        status,
        message: envelope.error.message,
    }
}
