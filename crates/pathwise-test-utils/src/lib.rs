//! Shared test doubles for pathwise integration tests.
//!
//! - [`ScriptedGenerator`] stands in for the generation service and records
//!   every prompt it receives.
//! - [`StubVideoBackend`] stands in for the video service. Each search query
//!   can be scripted to hit, miss, fail, stall, or panic, and every
//!   `list_videos` call is recorded so chunking can be asserted.
//! - [`plan_json`] and [`wrapped_reply`] build generation output fixtures.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use pathwise_core::SkillLevel;
use pathwise_core::llm::{LlmError, TextGenerator};
use pathwise_core::video::{
    ContentDetails, LookupError, SearchHit, Statistics, VideoBackend, VideoItem, VideoSnippet,
    VideoStatus,
};

// ---------------------------------------------------------------------------
// Plan fixtures
// ---------------------------------------------------------------------------

/// Query used for module `index` of a fixture plan about `topic`.
pub fn module_query(topic: &str, index: usize) -> String {
    format!("{topic} lesson {index}")
}

/// A plan JSON object whose module hours are `module_hours` and whose
/// `totalHours` is their sum.
pub fn plan_json(topic: &str, level: SkillLevel, module_hours: &[u32]) -> String {
    let total: u32 = module_hours.iter().sum();
    let modules: Vec<serde_json::Value> = module_hours
        .iter()
        .enumerate()
        .map(|(i, hours)| {
            serde_json::json!({
                "title": format!("{topic} part {i}"),
                "hours": hours,
                "outcome": format!("Can explain {topic} part {i}"),
                "checkpoints": [format!("Quiz {i}"), format!("Exercise {i}")],
                "query": module_query(topic, i),
            })
        })
        .collect();

    serde_json::json!({
        "topic": topic,
        "level": level.to_string(),
        "totalHours": total,
        "summary": format!("A practical path through {topic}"),
        "strategy": ["Watch first", "Then build something"],
        "modules": modules,
    })
    .to_string()
}

/// Generation output the way models tend to return it: prose around a
/// fenced JSON block.
pub fn wrapped_reply(json: &str) -> String {
    format!("Here is your plan:\n```json\n{json}\n```\nEnjoy!")
}

// ---------------------------------------------------------------------------
// Generation service double
// ---------------------------------------------------------------------------

enum Script {
    Reply(String),
    ApiError { status: u16, message: String },
    Timeout(Duration),
}

/// A [`TextGenerator`] that always gives the same scripted answer.
pub struct ScriptedGenerator {
    script: Script,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Answer every prompt with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_script(Script::Reply(text.into()))
    }

    /// Fail every prompt with an HTTP-level API error.
    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self::with_script(Script::ApiError {
            status,
            message: message.into(),
        })
    }

    /// Fail every prompt with a timeout.
    pub fn timing_out(after: Duration) -> Self {
        Self::with_script(Script::Timeout(after))
    }

    fn with_script(script: Script) -> Self {
        Self {
            script,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::ApiError { status, message } => Err(LlmError::ApiError {
                status: *status,
                message: message.clone(),
            }),
            Script::Timeout(after) => Err(LlmError::Timeout(*after)),
        }
    }
}

// ---------------------------------------------------------------------------
// Video service double
// ---------------------------------------------------------------------------

/// Scripted answer to one search query.
#[derive(Debug, Clone)]
pub enum SearchScript {
    Hit(SearchHit),
    /// Zero results.
    Empty,
    /// Top result is a channel, not a video.
    NoVideoId,
    /// Service-level error (e.g. quota exceeded).
    Fail(String),
    /// Panic inside the lookup.
    Panic,
}

/// An in-memory [`VideoBackend`].
///
/// Unscripted queries return a hit whose id is derived from the query, so a
/// fully successful run needs no setup.
#[derive(Default)]
pub struct StubVideoBackend {
    searches: HashMap<String, SearchScript>,
    delays: HashMap<String, Duration>,
    videos: HashMap<String, VideoItem>,
    failing_ids: HashSet<String>,
    search_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    list_calls: Mutex<Vec<Vec<String>>>,
}

/// Deterministic video id for an unscripted query.
pub fn stub_video_id(query: &str) -> String {
    format!("vid-{}", query.replace(' ', "_"))
}

impl StubVideoBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, query: impl Into<String>, script: SearchScript) -> Self {
        self.searches.insert(query.into(), script);
        self
    }

    /// Hold the search for `query` for `delay` before answering.
    pub fn with_delay(mut self, query: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(query.into(), delay);
        self
    }

    pub fn with_video(mut self, item: VideoItem) -> Self {
        self.videos.insert(item.id.clone(), item);
        self
    }

    /// Fail any `list_videos` call whose id list includes `id`.
    pub fn failing_list_for(mut self, id: impl Into<String>) -> Self {
        self.failing_ids.insert(id.into());
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Highest number of searches that were running at the same time.
    pub fn max_concurrent_searches(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Id lists passed to each `list_videos` call, in call order.
    pub fn list_calls(&self) -> Vec<Vec<String>> {
        self.list_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoBackend for StubVideoBackend {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, LookupError> {
        assert_eq!(max_results, 1, "lookups should request a single result");
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.searches.get(query) {
            None => {
                let id = stub_video_id(query);
                Ok(vec![SearchHit::video(&id, &format!("Video for {query}"), "Stub Channel")])
            }
            Some(SearchScript::Hit(hit)) => Ok(vec![hit.clone()]),
            Some(SearchScript::Empty) => Ok(vec![]),
            Some(SearchScript::NoVideoId) => Ok(vec![SearchHit::default()]),
            Some(SearchScript::Fail(message)) => Err(LookupError::QuotaExceeded(message.clone())),
            Some(SearchScript::Panic) => panic!("stub backend panicked on {query:?}"),
        }
    }

    async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoItem>, LookupError> {
        self.list_calls.lock().unwrap().push(ids.to_vec());

        if ids.iter().any(|id| self.failing_ids.contains(id)) {
            return Err(LookupError::Api {
                status: 500,
                message: "backend error".to_string(),
            });
        }

        Ok(ids
            .iter()
            .filter_map(|id| self.videos.get(id).cloned())
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Video item fixtures
// ---------------------------------------------------------------------------

/// A video item with the given privacy status and embeddable flag.
pub fn video_item(id: &str, privacy: &str, embeddable: Option<bool>) -> VideoItem {
    VideoItem {
        id: id.to_string(),
        snippet: Some(VideoSnippet {
            title: Some(format!("Title {id}")),
            channel_title: Some("Stub Channel".to_string()),
            published_at: Some("2024-05-01T12:00:00Z".to_string()),
        }),
        status: Some(VideoStatus {
            privacy_status: Some(privacy.to_string()),
            embeddable,
        }),
        content_details: Some(ContentDetails {
            duration: Some("PT12M5S".to_string()),
        }),
        statistics: Some(Statistics {
            view_count: Some("1000".to_string()),
        }),
    }
}

/// A public, embeddable video item.
pub fn public_video(id: &str) -> VideoItem {
    video_item(id, "public", Some(true))
}
