//! The persisted analysis artifact and trim results.
//!
//! `VideoAnalysis` is written to `<video-dir>/analysis.json` after a
//! successful analysis run and read back by the trimmer. It has no identity
//! beyond the video it describes; re-running analysis overwrites it.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::action::ActionTiming;
use crate::frame_diff::FrameDiffSegment;
use crate::keyframe::KeyframeInfo;
use crate::segment::{TimeRange, TimeSegment};
use crate::silence::SilenceSegment;
use crate::suggestion::TrimSuggestion;

/// File name of the analysis sidecar.
pub const ANALYSIS_FILE_NAME: &str = "analysis.json";

/// Everything the pipeline learned about one video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysis {
    pub video_path: String,
    /// Duration in seconds
    pub duration: f64,
    pub silences: Vec<SilenceSegment>,
    pub keyframes: Vec<KeyframeInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionTiming>>,
    pub suggestions: Vec<TrimSuggestion>,
    pub frame_diffs: Vec<FrameDiffSegment>,
    /// Aggregate numbers for quick display
    #[serde(default)]
    pub summary: AnalysisSummary,
    /// When the analysis finished
    #[serde(default = "Utc::now")]
    pub analyzed_at: DateTime<Utc>,
}

impl VideoAnalysis {
    /// `remove_pause` suggestions in ascending start order.
    pub fn removal_suggestions(&self) -> Vec<&TrimSuggestion> {
        let mut removals: Vec<_> = self.suggestions.iter().filter(|s| s.is_removal()).collect();
        removals.sort_by(|a, b| a.start_sec.total_cmp(&b.start_sec));
        removals
    }
}

/// Aggregate statistics stored with the artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub silence_count: usize,
    pub total_silence_sec: f64,
    pub removable_silence_count: usize,
    pub suggestion_count: usize,
    /// Seconds covered by `remove_pause` suggestions
    pub removable_sec: f64,
    pub keyframe_count: usize,
}

impl AnalysisSummary {
    /// Compute the summary from analysis parts.
    pub fn compute(
        silences: &[SilenceSegment],
        keyframes: &[KeyframeInfo],
        suggestions: &[TrimSuggestion],
    ) -> Self {
        Self {
            silence_count: silences.len(),
            total_silence_sec: silences.iter().map(|s| s.duration_sec).sum(),
            removable_silence_count: silences.iter().filter(|s| !s.keep_pause).count(),
            suggestion_count: suggestions.len(),
            removable_sec: suggestions
                .iter()
                .filter(|s| s.is_removal())
                .map(|s| s.duration_sec())
                .sum(),
            keyframe_count: keyframes.len(),
        }
    }
}

/// Outcome of trimming a video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrimResult {
    pub original_path: String,
    pub trimmed_path: String,
    pub original_duration: f64,
    pub trimmed_duration: f64,
    pub removed_segments: Vec<TimeSegment>,
    pub kept_segments: Vec<TimeSegment>,
}

impl TrimResult {
    /// Seconds removed from the original.
    pub fn removed_sec(&self) -> f64 {
        (self.original_duration - self.trimmed_duration).max(0.0)
    }
}
