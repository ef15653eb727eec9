//! Edit-point analysis for screen-recorded demo videos.
//!
//! This crate provides:
//! - Silence detection and action-log correlation
//! - Keyframe extraction with an even-sampling fallback
//! - Frame-activity scoring with run-length merging
//! - Suggestion synthesis and segment-based trimming
//! - The `analysis.json` artifact shared by analysis and trim runs

pub mod artifact;
pub mod config;
pub mod correlator;
pub mod error;
pub mod frame_activity;
pub mod keyframes;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod silence;
pub mod suggestions;
pub mod trimmer;

pub use config::AnalysisConfig;
pub use error::{EditorError, EditorResult};
pub use frame_activity::{FrameActivityScorer, FrameDiffer, SizeRatioDiffer};
pub use logging::RunLogger;
pub use pipeline::VideoAnalyzer;
pub use trimmer::{TrimOptions, Trimmer};
