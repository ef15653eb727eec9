//! Representative still frames.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::action::ActionTiming;

/// A keyframe captured at a scene change or sampled evenly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeyframeInfo {
    pub timestamp_sec: f64,
    /// Path of the PNG written under `<video-dir>/keyframes/`
    pub thumbnail_path: String,
    /// The action running when this frame was shown, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_action: Option<ActionTiming>,
    /// Scene-change score reported by the filter (absent for sampled frames)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_change_score: Option<f64>,
}

impl KeyframeInfo {
    pub fn new(timestamp_sec: f64, thumbnail_path: impl Into<String>) -> Self {
        Self {
            timestamp_sec,
            thumbnail_path: thumbnail_path.into(),
            associated_action: None,
            scene_change_score: None,
        }
    }

    pub fn with_score(mut self, score: Option<f64>) -> Self {
        self.scene_change_score = score;
        self
    }
}
