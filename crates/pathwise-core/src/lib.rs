//! Core library for pathwise: learning-plan generation and video enrichment.
//!
//! ```text
//! PlanRequest --PlanGenerator (LLM)--> LearningPlan --enrich_plan (N lookups)--> LearningPlan
//! ```

pub mod enrich;
pub mod llm;
pub mod plan;
pub mod service;
pub mod video;

pub use enrich::{EnrichConfig, LookupOutcome, enrich_plan};
pub use plan::{LearningPlan, Module, PlanRequest, RecommendedVideo, SkillLevel};
pub use service::{PlanService, PlanServiceError};
