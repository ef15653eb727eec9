//! FFmpeg CLI wrapper for demo video analysis.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with kill-on-timeout
//! - Duration probing through FFprobe
//! - Parsers for `silencedetect` and scene `metadata=print` output
//! - The [`MediaToolAdapter`] seam the analysis pipeline is written against

pub mod adapter;
pub mod command;
pub mod error;
pub mod filter_output;
pub mod fs_utils;
pub mod probe;

pub use adapter::{keyframe_file_name, FfmpegAdapter, MediaToolAdapter, SceneFrame};
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner, ToolOutput};
pub use error::{MediaError, MediaResult};
pub use filter_output::{parse_scene_markers, parse_silence_markers, SceneMarker};
pub use probe::probe_duration;
