//! Learning plans: data model, parsing, and generation.

pub mod generate;
pub mod parser;
pub mod types;

pub use generate::{GenerateError, InvalidRequest, PlanGenerator, PlanRequest, build_prompt};
pub use parser::{PlanParseError, PlanWarning, audit_plan, extract_json_span, parse_plan};
pub use types::{LearningPlan, Module, RecommendedVideo, SkillLevel, SkillLevelParseError};
