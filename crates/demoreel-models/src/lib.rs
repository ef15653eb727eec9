//! Shared data models for the demoreel edit-point analysis pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Time segments (silences, activity windows, trim suggestions)
//! - Keyframes and the recorder's action timeline
//! - The persisted analysis artifact and trim results
//!
//! All JSON field names are camelCase so the artifact stays readable by the
//! recorder tooling that produces the action log.

pub mod action;
pub mod analysis;
pub mod frame_diff;
pub mod keyframe;
pub mod segment;
pub mod silence;
pub mod suggestion;

// Re-export common types
pub use action::{ActionLog, ActionTiming};
pub use analysis::{AnalysisSummary, TrimResult, VideoAnalysis, ANALYSIS_FILE_NAME};
pub use frame_diff::{ActivityClass, FrameDiffSegment, Recommendation};
pub use keyframe::KeyframeInfo;
pub use segment::{TimeRange, TimeSegment};
pub use silence::SilenceSegment;
pub use suggestion::{SuggestionType, TrimSuggestion};
