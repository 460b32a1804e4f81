//! Plan generation: prompt construction and the single generation call.
//!
//! [`PlanGenerator`] sends one prompt to a [`TextGenerator`] and parses the
//! reply into an unenriched [`LearningPlan`]. Attaching videos is left to
//! [`crate::enrich`], so generation and enrichment fail independently.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::parser::{MAX_MODULES, MIN_MODULES, PlanParseError, audit_plan, parse_plan};
use super::types::{LearningPlan, SkillLevel};
use crate::llm::{LlmError, TextGenerator};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What the learner asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub topic: String,
    /// Total hours the learner can invest.
    pub time_to_invest: u32,
    pub skill_level: SkillLevel,
}

/// Errors from a [`PlanRequest`] that must be rejected before any call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRequest {
    #[error("topic must not be empty")]
    EmptyTopic,
    #[error("time to invest must be a positive number of hours")]
    ZeroHours,
}

impl PlanRequest {
    pub fn new(topic: impl Into<String>, time_to_invest: u32, skill_level: SkillLevel) -> Self {
        Self {
            topic: topic.into(),
            time_to_invest,
            skill_level,
        }
    }

    /// Check the fields the type system cannot.
    pub fn validate(&self) -> Result<(), InvalidRequest> {
        if self.topic.trim().is_empty() {
            return Err(InvalidRequest::EmptyTopic);
        }
        if self.time_to_invest == 0 {
            return Err(InvalidRequest::ZeroHours);
        }
        Ok(())
    }
}

/// Errors from a generation attempt.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The generation service could not be reached or rejected the call.
    #[error("generation service error: {0}")]
    Service(#[from] LlmError),

    /// The service answered but the text is not a usable plan.
    #[error("malformed plan: {0}")]
    Malformed(#[from] PlanParseError),
}

// ---------------------------------------------------------------------------
// Prompt construction
// ---------------------------------------------------------------------------

/// Build the instructional prompt for one plan.
///
/// The prompt embeds the exact JSON schema, pre-filled with the request's
/// topic, level, and hours, so the reply can be parsed with
/// [`parse_plan`].
pub fn build_prompt(request: &PlanRequest) -> String {
    let topic = request.topic.trim();
    let hours = request.time_to_invest;
    let level = request.skill_level;
    // JSON-escape the topic so a quote in it cannot break the schema example.
    let topic_json = serde_json::Value::String(topic.to_string()).to_string();

    let mut prompt = String::with_capacity(2048);

    prompt.push_str(&format!(
        "You are an expert learning designer. Based on the user's topic {topic_json}, \
         {hours} hours of time to invest, and {level} skill level, generate a realistic \
         learning plan in **strict JSON** format.\n\n"
    ));
    prompt.push_str(&format!(
        "The plan should have {MIN_MODULES}-{MAX_MODULES} modules whose hours add up to \
         exactly {hours} hours total. Modules are studied in order; each module may assume \
         the previous ones are complete. Each module should include a YouTube search query \
         that will help find the best educational video for that specific topic.\n\n"
    ));
    prompt.push_str("Return ONLY valid JSON in this exact schema:\n");
    prompt.push_str(&format!(
        r#"{{
  "topic": {topic_json},
  "level": "{level}",
  "totalHours": {hours},
  "summary": "A brief overview of what the learner will achieve",
  "strategy": ["Key learning strategy 1", "Key learning strategy 2", "Key learning strategy 3"],
  "modules": [
    {{
      "title": "Module title",
      "hours": 4,
      "outcome": "What the learner will achieve after this module",
      "checkpoints": ["Checkpoint 1", "Checkpoint 2", "Checkpoint 3"],
      "query": "Specific YouTube search query to find the best video for this module topic"
    }}
  ]
}}"#
    ));
    prompt.push_str("\n\n");
    prompt.push_str(
        "Make sure each module has a well-crafted search query that will help find \
         one educational video on that module's narrow subtopic. Search queries should \
         be specific and educational in nature.",
    );

    prompt
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Produces unenriched plans from a text-generation service.
#[derive(Clone)]
pub struct PlanGenerator {
    llm: Arc<dyn TextGenerator>,
}

impl PlanGenerator {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    /// Generate one plan with a single call to the generation service.
    ///
    /// No retries. Soft-contract deviations (module count, hour sum) are
    /// logged but do not fail the call.
    pub async fn generate(&self, request: &PlanRequest) -> Result<LearningPlan, GenerateError> {
        let prompt = build_prompt(request);
        debug!(
            generator = self.llm.name(),
            prompt_len = prompt.len(),
            "generate: sending prompt"
        );

        let text = self.llm.complete(&prompt).await?;
        let plan = parse_plan(&text)?;

        for warning in audit_plan(&plan) {
            warn!(topic = %plan.topic, %warning, "generated plan deviates from prompt");
        }

        info!(
            topic = %plan.topic,
            modules = plan.modules.len(),
            total_hours = plan.total_hours,
            "generated learning plan"
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rust_request() -> PlanRequest {
        PlanRequest::new("Rust", 20, SkillLevel::Beginner)
    }

    #[test]
    fn prompt_contains_request_fields() {
        let prompt = build_prompt(&rust_request());
        assert!(prompt.contains(r#""topic": "Rust""#));
        assert!(prompt.contains(r#""level": "Beginner""#));
        assert!(prompt.contains(r#""totalHours": 20"#));
        assert!(prompt.contains("add up to exactly 20 hours"));
    }

    #[test]
    fn prompt_requests_strict_json_and_module_range() {
        let prompt = build_prompt(&rust_request());
        assert!(prompt.contains("strict JSON"));
        assert!(prompt.contains("4-8 modules"));
        assert!(prompt.contains("YouTube search query"));
    }

    #[test]
    fn prompt_escapes_quotes_in_topic() {
        let request = PlanRequest::new(r#"The "Rust" book"#, 5, SkillLevel::Advanced);
        let prompt = build_prompt(&request);
        assert!(prompt.contains(r#""topic": "The \"Rust\" book""#));
    }

    #[test]
    fn validate_rejects_blank_topic_and_zero_hours() {
        assert_eq!(
            PlanRequest::new("   ", 5, SkillLevel::Beginner).validate(),
            Err(InvalidRequest::EmptyTopic)
        );
        assert_eq!(
            PlanRequest::new("Go", 0, SkillLevel::Beginner).validate(),
            Err(InvalidRequest::ZeroHours)
        );
        assert!(rust_request().validate().is_ok());
    }
}
