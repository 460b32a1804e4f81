//! Plan enrichment: attach one recommended video to every module.
//!
//! Lookups for all modules run concurrently on a [`JoinSet`]. Each task
//! reports `(index, outcome)`, and outcomes are written into a slot per
//! module, so the output order always matches the input order no matter
//! which lookup finishes first.
//!
//! Enrichment is strictly additive. A failed, empty, or timed-out lookup
//! leaves that one module without a video. If the fan-out itself breaks (a
//! lookup task panics or is cancelled), the original plan is returned
//! unchanged.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::plan::{LearningPlan, Module, RecommendedVideo};
use crate::video::VideoLookup;

/// Tuning for [`enrich_plan`].
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    /// Upper bound on a single module's lookup, on top of the transport's own
    /// timeout.
    pub lookup_timeout: Duration,
}

impl EnrichConfig {
    pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(20);
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            lookup_timeout: Self::DEFAULT_LOOKUP_TIMEOUT,
        }
    }
}

/// Result of one module's lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(RecommendedVideo),
    NotFound,
    Failed(String),
    TimedOut,
}

impl LookupOutcome {
    fn into_video(self) -> Option<RecommendedVideo> {
        match self {
            Self::Found(video) => Some(video),
            Self::NotFound | Self::Failed(_) | Self::TimedOut => None,
        }
    }
}

/// Run one lookup under the per-module timeout.
async fn lookup_module(lookup: &VideoLookup, query: &str, timeout: Duration) -> LookupOutcome {
    match tokio::time::timeout(timeout, lookup.search(query)).await {
        Ok(Ok(Some(video))) => LookupOutcome::Found(video),
        Ok(Ok(None)) => LookupOutcome::NotFound,
        Ok(Err(err)) => LookupOutcome::Failed(err.to_string()),
        Err(_) => LookupOutcome::TimedOut,
    }
}

/// Attach a best-effort recommended video to every module of `plan`.
///
/// Never fails: the worst case is the unenriched plan.
pub async fn enrich_plan(
    plan: LearningPlan,
    lookup: Arc<VideoLookup>,
    config: &EnrichConfig,
) -> LearningPlan {
    let total = plan.modules.len();
    info!(topic = %plan.topic, modules = total, "enriching plan with videos");

    let mut set = JoinSet::new();
    for (index, module) in plan.modules.iter().enumerate() {
        let lookup = Arc::clone(&lookup);
        let query = module.query.clone();
        let timeout = config.lookup_timeout;
        set.spawn(async move {
            let outcome = lookup_module(&lookup, &query, timeout).await;
            (index, outcome)
        });
    }

    let mut slots: Vec<Option<LookupOutcome>> = vec![None; total];
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, outcome)) => {
                let query = &plan.modules[index].query;
                match &outcome {
                    LookupOutcome::Found(video) => {
                        debug!(index, %query, video = %video.video_link, "video found");
                    }
                    LookupOutcome::NotFound => {
                        debug!(index, %query, "no video found");
                    }
                    LookupOutcome::Failed(reason) => {
                        warn!(index, %query, %reason, "video lookup failed");
                    }
                    LookupOutcome::TimedOut => {
                        warn!(index, %query, "video lookup timed out");
                    }
                }
                slots[index] = Some(outcome);
            }
            Err(err) => {
                error!(error = %err, "video enrichment aborted; returning plan without videos");
                set.abort_all();
                return plan;
            }
        }
    }

    let mut enriched = plan;
    enriched.modules = enriched
        .modules
        .into_iter()
        .zip(slots)
        .map(|(module, slot)| Module {
            recommended_video: slot.and_then(LookupOutcome::into_video),
            ..module
        })
        .collect();

    let found = enriched.video_count();
    info!(topic = %enriched.topic, found, total, "found {found}/{total} videos");
    enriched
}
