//! Frame-activity windows and their classification.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::segment::TimeRange;

/// Scores below this are static.
pub const STATIC_BELOW: f64 = 5.0;
/// Scores below this (and at least `STATIC_BELOW`) are low activity.
pub const LOW_ACTIVITY_BELOW: f64 = 15.0;
/// Scores below this (and at least `LOW_ACTIVITY_BELOW`) are medium activity.
pub const MEDIUM_ACTIVITY_BELOW: f64 = 35.0;

/// How much visual change a window contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActivityClass {
    Static,
    LowActivity,
    MediumActivity,
    HighActivity,
}

/// What the editor should do with a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Recommendation {
    #[serde(rename = "cut")]
    Cut,
    #[serde(rename = "speedup_4x")]
    Speedup4x,
    #[serde(rename = "speedup_2x")]
    Speedup2x,
    #[serde(rename = "keep")]
    Keep,
}

impl ActivityClass {
    /// Classify a diff score (0-100). Lower bounds are inclusive.
    pub fn from_score(score: f64) -> Self {
        if score < STATIC_BELOW {
            Self::Static
        } else if score < LOW_ACTIVITY_BELOW {
            Self::LowActivity
        } else if score < MEDIUM_ACTIVITY_BELOW {
            Self::MediumActivity
        } else {
            Self::HighActivity
        }
    }

    /// The fixed recommendation for this activity level.
    pub fn recommendation(&self) -> Recommendation {
        match self {
            Self::Static => Recommendation::Cut,
            Self::LowActivity => Recommendation::Speedup4x,
            Self::MediumActivity => Recommendation::Speedup2x,
            Self::HighActivity => Recommendation::Keep,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::LowActivity => "low_activity",
            Self::MediumActivity => "medium_activity",
            Self::HighActivity => "high_activity",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recommendation::Cut => write!(f, "cut"),
            Recommendation::Speedup4x => write!(f, "speedup_4x"),
            Recommendation::Speedup2x => write!(f, "speedup_2x"),
            Recommendation::Keep => write!(f, "keep"),
        }
    }
}

/// A scored activity window, or a run of merged windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrameDiffSegment {
    pub start_sec: f64,
    pub end_sec: f64,
    pub avg_diff_score: f64,
    pub min_diff_score: f64,
    pub max_diff_score: f64,
    pub classification: ActivityClass,
    pub recommendation: Recommendation,
}

impl FrameDiffSegment {
    /// A single window with one score.
    pub fn from_score(start_sec: f64, end_sec: f64, score: f64) -> Self {
        let classification = ActivityClass::from_score(score);
        Self {
            start_sec,
            end_sec,
            avg_diff_score: score,
            min_diff_score: score,
            max_diff_score: score,
            classification,
            recommendation: classification.recommendation(),
        }
    }
}

impl TimeRange for FrameDiffSegment {
    fn start_sec(&self) -> f64 {
        self.start_sec
    }

    fn end_sec(&self) -> f64 {
        self.end_sec
    }
}
