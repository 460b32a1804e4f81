//! The `VideoBackend` trait -- the raw interface to a video index.
//!
//! [`super::YouTubeClient`] implements it over HTTP. [`super::VideoLookup`]
//! builds recommendations and verification results on top of it, so the
//! lookup rules can be exercised against an in-memory backend.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Transport or auth-level failure talking to the video service.
///
/// An empty result set is never an error.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Raw access to a video search index and its metadata endpoint.
#[async_trait]
pub trait VideoBackend: Send + Sync {
    /// Ranked search for videos matching `query`, best match first.
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, LookupError>;

    /// Fetch snippet, status, content details, and statistics for `ids`.
    ///
    /// Callers must not pass more ids than the service accepts per request.
    /// Ids the service does not know are simply absent from the result.
    async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoItem>, LookupError>;
}

// Compile-time assertion: VideoBackend must be usable as `dyn VideoBackend`.
const _: () = {
    fn _assert_object_safe(_: &dyn VideoBackend) {}
};

// ---------------------------------------------------------------------------
// Search results
// ---------------------------------------------------------------------------

/// One item of a search response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub id: SearchHitId,
    #[serde(default)]
    pub snippet: Option<SearchSnippet>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHitId {
    /// Absent when the hit is a channel or playlist.
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub title: Option<String>,
    pub channel_title: Option<String>,
}

impl SearchHit {
    /// Convenience constructor for a video hit.
    pub fn video(id: &str, title: &str, channel: &str) -> Self {
        Self {
            id: SearchHitId {
                video_id: Some(id.to_string()),
            },
            snippet: Some(SearchSnippet {
                title: Some(title.to_string()),
                channel_title: Some(channel.to_string()),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Video metadata
// ---------------------------------------------------------------------------

/// One item of a `videos.list` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<VideoSnippet>,
    #[serde(default)]
    pub status: Option<VideoStatus>,
    #[serde(default)]
    pub content_details: Option<ContentDetails>,
    #[serde(default)]
    pub statistics: Option<Statistics>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: Option<String>,
    pub channel_title: Option<String>,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatus {
    /// "public", "unlisted", or "private".
    pub privacy_status: Option<String>,
    /// Only present when the uploader set it; absence means embeddable.
    pub embeddable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContentDetails {
    /// ISO-8601 period, e.g. `PT4M13S`.
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Decimal string, as the API returns it.
    pub view_count: Option<String>,
}

impl VideoItem {
    pub fn is_public(&self) -> bool {
        self.status
            .as_ref()
            .and_then(|s| s.privacy_status.as_deref())
            == Some("public")
    }

    /// Embeddable unless the status explicitly says otherwise.
    pub fn is_embeddable(&self) -> bool {
        self.status.as_ref().and_then(|s| s.embeddable) != Some(false)
    }
}
