//! Video recommendation and verification on top of a [`VideoBackend`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::backend::{LookupError, VideoBackend, VideoItem};
use super::duration::format_duration;
use super::url::{extract_video_id, thumbnail_url, watch_url};
use crate::plan::RecommendedVideo;

/// Most ids the metadata endpoint accepts in one request.
pub const MAX_IDS_PER_REQUEST: usize = 50;

const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_CHANNEL: &str = "Unknown Channel";

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Availability of one video.
///
/// Lookup problems (bad reference, unknown id, API failure) are reported in
/// `error` with `is_valid = false`, never as an `Err`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoVerification {
    /// The id resolves to an existing video.
    pub is_valid: bool,
    /// The video is public and embeddable.
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
    /// `H:MM:SS` or `M:SS`; empty when the service reported no usable length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A [`VideoVerification`] paired with the reference the caller passed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchVerification {
    pub reference: String,
    #[serde(flatten)]
    pub result: VideoVerification,
}

/// Wording for availability problems. Single and batch checks phrase them
/// differently.
struct AvailabilityMessages {
    not_public: &'static str,
    not_embeddable: &'static str,
}

const SINGLE_MESSAGES: AvailabilityMessages = AvailabilityMessages {
    not_public: "Video is not public",
    not_embeddable: "Video is not embeddable",
};

const BATCH_MESSAGES: AvailabilityMessages = AvailabilityMessages {
    not_public: "Video is private or unlisted",
    not_embeddable: "Video embedding disabled",
};

impl VideoVerification {
    /// A result for a reference that does not resolve to a usable video.
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    fn api_error(err: &LookupError) -> Self {
        Self::invalid(format!("API Error: {err}"))
    }

    fn from_item(item: &VideoItem, messages: &AvailabilityMessages) -> Self {
        let public = item.is_public();
        let embeddable = item.is_embeddable();
        let snippet = item.snippet.as_ref();

        let error = if !public {
            Some(messages.not_public.to_string())
        } else if !embeddable {
            Some(messages.not_embeddable.to_string())
        } else {
            None
        };

        Self {
            is_valid: true,
            is_public: public && embeddable,
            title: snippet.and_then(|s| s.title.clone()),
            channel_title: snippet.and_then(|s| s.channel_title.clone()),
            duration: Some(format_duration(
                item.content_details
                    .as_ref()
                    .and_then(|c| c.duration.as_deref())
                    .unwrap_or_default(),
            )),
            published_at: snippet.and_then(|s| s.published_at.clone()),
            view_count: item.statistics.as_ref().and_then(|s| s.view_count.clone()),
            error,
        }
    }
}

// ---------------------------------------------------------------------------
// Lookup client
// ---------------------------------------------------------------------------

/// Resolves search queries to recommended videos and verifies video ids.
#[derive(Clone)]
pub struct VideoLookup {
    backend: Arc<dyn VideoBackend>,
}

impl VideoLookup {
    pub fn new(backend: Arc<dyn VideoBackend>) -> Self {
        Self { backend }
    }

    /// Best single match for `query`, ordered by relevance.
    ///
    /// Returns `Ok(None)` when nothing matches or the top hit has no video
    /// id. Only transport and auth failures are errors.
    pub async fn search(&self, query: &str) -> Result<Option<RecommendedVideo>, LookupError> {
        let hits = self.backend.search(query, 1).await?;

        let Some(hit) = hits.into_iter().next() else {
            debug!(%query, "no video results");
            return Ok(None);
        };
        let Some(video_id) = hit.id.video_id.filter(|id| !id.is_empty()) else {
            debug!(%query, "top result has no video id");
            return Ok(None);
        };

        let snippet = hit.snippet.unwrap_or_default();
        Ok(Some(RecommendedVideo {
            title: snippet.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            video_link: watch_url(&video_id),
            thumbnail_link: thumbnail_url(&video_id),
            channel: snippet
                .channel_title
                .unwrap_or_else(|| UNKNOWN_CHANNEL.to_string()),
        }))
    }

    /// Check that one video exists, is public, and can be embedded.
    pub async fn verify(&self, reference: &str) -> VideoVerification {
        let Some(video_id) = extract_video_id(reference) else {
            return VideoVerification::invalid("Invalid YouTube URL or video ID");
        };

        match self.backend.list_videos(std::slice::from_ref(&video_id)).await {
            Ok(items) => match items.iter().find(|item| item.id == video_id) {
                Some(item) => VideoVerification::from_item(item, &SINGLE_MESSAGES),
                None => VideoVerification::invalid("Video not found"),
            },
            Err(err) => {
                warn!(%video_id, error = %err, "video verification failed");
                VideoVerification::api_error(&err)
            }
        }
    }

    /// Verify many references, one backend call per chunk of at most
    /// [`MAX_IDS_PER_REQUEST`].
    ///
    /// The output has exactly one entry per input, in input order. A failed
    /// chunk marks only its own references invalid.
    pub async fn verify_batch(&self, references: &[String]) -> Vec<BatchVerification> {
        let mut results = Vec::with_capacity(references.len());
        for chunk in references.chunks(MAX_IDS_PER_REQUEST) {
            results.extend(self.verify_chunk(chunk).await);
        }
        results
    }

    async fn verify_chunk(&self, references: &[String]) -> Vec<BatchVerification> {
        let ids: Vec<Option<String>> = references.iter().map(|r| extract_video_id(r)).collect();

        let mut unique_ids: Vec<String> = Vec::with_capacity(ids.len());
        for id in ids.iter().flatten() {
            if !unique_ids.contains(id) {
                unique_ids.push(id.clone());
            }
        }

        let fetched = if unique_ids.is_empty() {
            Ok(Vec::new())
        } else {
            self.backend.list_videos(&unique_ids).await
        };

        if let Err(err) = &fetched {
            warn!(count = unique_ids.len(), error = %err, "video batch verification failed");
        }

        let items: HashMap<&str, &VideoItem> = match &fetched {
            Ok(items) => items.iter().map(|item| (item.id.as_str(), item)).collect(),
            Err(_) => HashMap::new(),
        };

        references
            .iter()
            .zip(&ids)
            .map(|(reference, id)| {
                let result = match (id, &fetched) {
                    (None, _) => VideoVerification::invalid("Invalid YouTube URL"),
                    (Some(_), Err(err)) => VideoVerification::api_error(err),
                    (Some(id), Ok(_)) => match items.get(id.as_str()) {
                        Some(item) => VideoVerification::from_item(item, &BATCH_MESSAGES),
                        None => VideoVerification::invalid("Video not found or unavailable"),
                    },
                };
                BatchVerification {
                    reference: reference.clone(),
                    result,
                }
            })
            .collect()
    }
}
