//! Plan service layer.
//!
//! Validates a [`PlanRequest`], generates the plan, and enriches it with
//! videos. Generation failures are surfaced; video failures never are.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::enrich::{EnrichConfig, enrich_plan};
use crate::plan::{GenerateError, InvalidRequest, LearningPlan, PlanGenerator, PlanRequest};
use crate::video::VideoLookup;

/// Errors that reach the caller of [`PlanService::create_plan`].
#[derive(Debug, Error)]
pub enum PlanServiceError {
    #[error("invalid request: {0}")]
    InvalidInput(#[from] InvalidRequest),

    #[error(transparent)]
    Generation(#[from] GenerateError),
}

/// Generate-then-enrich pipeline shared by the HTTP server and the CLI.
#[derive(Clone)]
pub struct PlanService {
    generator: PlanGenerator,
    lookup: Option<Arc<VideoLookup>>,
    enrich_config: EnrichConfig,
}

impl PlanService {
    /// Build a service. Without a `lookup`, plans are returned unenriched.
    pub fn new(generator: PlanGenerator, lookup: Option<Arc<VideoLookup>>) -> Self {
        Self {
            generator,
            lookup,
            enrich_config: EnrichConfig::default(),
        }
    }

    pub fn with_enrich_config(mut self, config: EnrichConfig) -> Self {
        self.enrich_config = config;
        self
    }

    /// Whether plans from this service get recommended videos.
    pub fn has_video_lookup(&self) -> bool {
        self.lookup.is_some()
    }

    /// Validate, generate, and enrich one plan.
    ///
    /// Invalid input is rejected before any external call.
    pub async fn create_plan(&self, request: PlanRequest) -> Result<LearningPlan, PlanServiceError> {
        request.validate()?;

        let plan = self.generator.generate(&request).await?;

        match &self.lookup {
            Some(lookup) => Ok(enrich_plan(plan, Arc::clone(lookup), &self.enrich_config).await),
            None => {
                warn!(topic = %plan.topic, "no video lookup configured; returning plan without videos");
                Ok(plan)
            }
        }
    }
}
