//! Edit suggestions produced by the synthesizer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::segment::{TimeRange, TimeSegment};

/// Kind of edit being proposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    /// Cut the range out entirely
    RemovePause,
    /// Explicitly preserve the range
    KeepSegment,
    /// Play the range faster
    SpeedUp,
}

/// A proposed edit with a confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrimSuggestion {
    pub start_sec: f64,
    pub end_sec: f64,
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    pub confidence: f64,
    pub reason: String,
}

impl TrimSuggestion {
    /// A `remove_pause` suggestion.
    pub fn remove_pause(start_sec: f64, end_sec: f64, confidence: f64, reason: impl Into<String>) -> Self {
        Self {
            start_sec,
            end_sec,
            suggestion_type: SuggestionType::RemovePause,
            confidence: confidence.clamp(0.0, 1.0),
            reason: reason.into(),
        }
    }

    pub fn is_removal(&self) -> bool {
        self.suggestion_type == SuggestionType::RemovePause
    }

    pub fn range(&self) -> TimeSegment {
        TimeSegment::new(self.start_sec, self.end_sec)
    }
}

impl TimeRange for TrimSuggestion {
    fn start_sec(&self) -> f64 {
        self.start_sec
    }

    fn end_sec(&self) -> f64 {
        self.end_sec
    }
}
