//! Plan extraction and validation.
//!
//! Generation output is untrusted free text: the model may wrap the JSON in
//! prose or code fences. Parsing happens in two stages:
//! - [`extract_json_span`] finds the outermost brace-delimited span.
//! - [`parse_plan`] deserializes that span and checks the plan structure.
//!
//! [`audit_plan`] reports soft-contract deviations (module count, hour sum)
//! without rejecting the plan.

use thiserror::Error;

use super::types::LearningPlan;

/// Fewest modules the prompt asks for.
pub const MIN_MODULES: usize = 4;
/// Most modules the prompt asks for.
pub const MAX_MODULES: usize = 8;

/// Errors that make generated text unusable as a plan.
#[derive(Debug, Error)]
pub enum PlanParseError {
    #[error("no JSON object found in generated text")]
    NoJsonObject,

    #[error("plan JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("plan topic is empty")]
    EmptyTopic,

    #[error("plan totalHours must be positive")]
    ZeroTotalHours,

    #[error("plan must contain at least one module")]
    NoModules,

    #[error("module {index} ({title:?}) has zero hours")]
    ZeroModuleHours { index: usize, title: String },
}

/// A soft-contract deviation in an otherwise valid plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanWarning {
    /// Module count is outside `MIN_MODULES..=MAX_MODULES`.
    ModuleCount { count: usize },
    /// Module hours do not add up to `totalHours`.
    HoursMismatch { total_hours: u32, module_hours: u32 },
}

impl std::fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ModuleCount { count } => write!(
                f,
                "plan has {count} modules (expected {MIN_MODULES}-{MAX_MODULES})"
            ),
            Self::HoursMismatch {
                total_hours,
                module_hours,
            } => write!(
                f,
                "module hours sum to {module_hours}, plan totalHours is {total_hours}"
            ),
        }
    }
}

/// Return the span from the first `{` to the last `}` inclusive.
///
/// The search runs across the whole text, not per line, so a multi-line
/// object surrounded by commentary is returned whole.
pub fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Extract, deserialize, and validate a plan from raw generation output.
///
/// The result is always unenriched: any `recommendedVideo` the model wrote
/// is discarded, since only a video lookup may attach one.
pub fn parse_plan(text: &str) -> Result<LearningPlan, PlanParseError> {
    let span = extract_json_span(text).ok_or(PlanParseError::NoJsonObject)?;
    let mut plan: LearningPlan = serde_json::from_str(span)?;
    validate(&plan)?;
    for module in &mut plan.modules {
        module.recommended_video = None;
    }
    Ok(plan)
}

/// Validate the parsed plan structure.
fn validate(plan: &LearningPlan) -> Result<(), PlanParseError> {
    if plan.topic.trim().is_empty() {
        return Err(PlanParseError::EmptyTopic);
    }
    if plan.total_hours == 0 {
        return Err(PlanParseError::ZeroTotalHours);
    }
    if plan.modules.is_empty() {
        return Err(PlanParseError::NoModules);
    }
    for (index, module) in plan.modules.iter().enumerate() {
        if module.hours == 0 {
            return Err(PlanParseError::ZeroModuleHours {
                index,
                title: module.title.clone(),
            });
        }
    }
    Ok(())
}

/// Report deviations from what the prompt asked for.
///
/// An empty result means the plan honors every soft contract.
pub fn audit_plan(plan: &LearningPlan) -> Vec<PlanWarning> {
    let mut warnings = Vec::new();

    let count = plan.modules.len();
    if !(MIN_MODULES..=MAX_MODULES).contains(&count) {
        warnings.push(PlanWarning::ModuleCount { count });
    }

    let module_hours = plan.module_hours();
    if module_hours != plan.total_hours {
        warnings.push(PlanWarning::HoursMismatch {
            total_hours: plan.total_hours,
            module_hours,
        });
    }

    warnings
}
