//! Learning plan data model.
//!
//! These types map directly to the JSON object the generation service is
//! asked to emit, and to the JSON returned by `POST /api/plan`. Field names
//! are camelCase on the wire.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Skill level
// ---------------------------------------------------------------------------

/// Learner skill level the plan is pitched at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    /// All levels, in ascending order of difficulty.
    pub const ALL: [SkillLevel; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        };
        f.write_str(s)
    }
}

impl FromStr for SkillLevel {
    type Err = SkillLevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(SkillLevelParseError(s.to_owned())),
        }
    }
}

// Case-insensitive on the way in; models are not always consistent about it.
impl<'de> Deserialize<'de> for SkillLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Error returned when parsing an invalid [`SkillLevel`] string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid skill level {0:?} (expected Beginner, Intermediate, or Advanced)")]
pub struct SkillLevelParseError(pub String);

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// A complete learning roadmap for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPlan {
    /// Subject the learner asked about.
    pub topic: String,
    pub level: SkillLevel,
    /// Target total study time, in hours.
    pub total_hours: u32,
    /// What the learner will be able to do at the end.
    pub summary: String,
    /// Short strategy statements, in display order.
    #[serde(default)]
    pub strategy: Vec<String>,
    /// Modules in learning order. Module N assumes module N-1 is done.
    pub modules: Vec<Module>,
}

impl LearningPlan {
    /// Sum of every module's hour budget.
    pub fn module_hours(&self) -> u32 {
        self.modules.iter().map(|m| m.hours).sum()
    }

    /// Number of modules that carry a recommended video.
    pub fn video_count(&self) -> usize {
        self.modules
            .iter()
            .filter(|m| m.recommended_video.is_some())
            .count()
    }
}

/// One sequential unit of a [`LearningPlan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub title: String,
    /// Hour budget for this module.
    pub hours: u32,
    /// What the learner can do after completing the module.
    pub outcome: String,
    #[serde(default)]
    pub checkpoints: Vec<String>,
    /// Search phrase used to find one educational video for this module.
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_video: Option<RecommendedVideo>,
}

/// Best-effort video attached to a module during enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedVideo {
    pub title: String,
    /// Canonical watch URL.
    pub video_link: String,
    /// Thumbnail URL derived from the video id; not independently checked.
    pub thumbnail_link: String,
    pub channel: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_level_display_roundtrip() {
        for level in SkillLevel::ALL {
            let parsed: SkillLevel = level.to_string().parse().unwrap();
            assert_eq!(parsed, level);
        }
    }

    #[test]
    fn skill_level_parse_is_case_insensitive() {
        assert_eq!("beginner".parse::<SkillLevel>().unwrap(), SkillLevel::Beginner);
        assert_eq!(" ADVANCED ".parse::<SkillLevel>().unwrap(), SkillLevel::Advanced);
        assert!("expert".parse::<SkillLevel>().is_err());
    }

    #[test]
    fn deserialize_camel_case_plan() {
        let json = r#"{
            "topic": "Rust",
            "level": "intermediate",
            "totalHours": 6,
            "summary": "Ownership in depth",
            "strategy": ["Read", "Build"],
            "modules": [
                {
                    "title": "Borrowing",
                    "hours": 6,
                    "outcome": "Explain borrow rules",
                    "checkpoints": ["Fix a borrow error"],
                    "query": "rust borrow checker explained"
                }
            ]
        }"#;
        let plan: LearningPlan = serde_json::from_str(json).expect("should parse");
        assert_eq!(plan.level, SkillLevel::Intermediate);
        assert_eq!(plan.total_hours, 6);
        assert_eq!(plan.modules.len(), 1);
        assert!(plan.modules[0].recommended_video.is_none());
    }

    #[test]
    fn missing_video_is_omitted_from_json() {
        let module = Module {
            title: "Intro".to_string(),
            hours: 2,
            outcome: "Know the basics".to_string(),
            checkpoints: vec![],
            query: "intro".to_string(),
            recommended_video: None,
        };
        let value = serde_json::to_value(&module).unwrap();
        assert!(value.get("recommendedVideo").is_none());
        assert_eq!(value["hours"], 2);
    }

    #[test]
    fn video_serializes_camel_case() {
        let video = RecommendedVideo {
            title: "T".to_string(),
            video_link: "https://www.youtube.com/watch?v=abc".to_string(),
            thumbnail_link: "https://i.ytimg.com/vi/abc/hqdefault.jpg".to_string(),
            channel: "C".to_string(),
        };
        let value = serde_json::to_value(&video).unwrap();
        assert_eq!(value["videoLink"], "https://www.youtube.com/watch?v=abc");
        assert_eq!(value["thumbnailLink"], "https://i.ytimg.com/vi/abc/hqdefault.jpg");
    }
}
