//! Analysis configuration.

use std::time::Duration;

/// Tunables for one analysis or trim run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Audio level below which a span counts as silence (dB)
    pub silence_threshold_db: f64,
    /// Shortest silence the detector reports (seconds)
    pub min_silence_sec: f64,
    /// Scene-change score a frame must exceed to become a keyframe (0-1)
    pub scene_threshold: f64,
    /// Width of each frame-activity window (seconds)
    pub segment_duration_sec: f64,
    /// Unexplained pauses shorter than this are kept (seconds)
    pub max_acceptable_pause_sec: f64,
    /// Pause left in place at every cut point (seconds)
    pub min_pause_to_keep_sec: f64,
    /// Concurrent frame extractions while scoring windows; 1 = sequential
    pub frame_workers: usize,
    /// Upper bound for any single external tool invocation
    pub tool_timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            silence_threshold_db: -30.0,
            min_silence_sec: 0.5,
            scene_threshold: 0.3,
            segment_duration_sec: 1.0,
            max_acceptable_pause_sec: 3.0,
            min_pause_to_keep_sec: 1.0,
            frame_workers: 1,
            tool_timeout: Duration::from_secs(1800), // 30 minutes
        }
    }
}

impl AnalysisConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            silence_threshold_db: env_or("DEMOREEL_SILENCE_THRESHOLD_DB", defaults.silence_threshold_db),
            min_silence_sec: env_or("DEMOREEL_MIN_SILENCE_SEC", defaults.min_silence_sec),
            scene_threshold: env_or("DEMOREEL_SCENE_THRESHOLD", defaults.scene_threshold),
            segment_duration_sec: env_or("DEMOREEL_SEGMENT_DURATION_SEC", defaults.segment_duration_sec),
            max_acceptable_pause_sec: env_or(
                "DEMOREEL_MAX_ACCEPTABLE_PAUSE_SEC",
                defaults.max_acceptable_pause_sec,
            ),
            min_pause_to_keep_sec: env_or("DEMOREEL_MIN_PAUSE_TO_KEEP_SEC", defaults.min_pause_to_keep_sec),
            frame_workers: env_or("DEMOREEL_FRAME_WORKERS", defaults.frame_workers).max(1),
            tool_timeout: Duration::from_secs(env_or(
                "DEMOREEL_TOOL_TIMEOUT_SECS",
                defaults.tool_timeout.as_secs(),
            )),
        }
    }

    /// Builder-style setter for the silence threshold.
    pub fn with_silence_threshold_db(mut self, db: f64) -> Self {
        self.silence_threshold_db = db;
        self
    }

    /// Builder-style setter for the activity window width.
    pub fn with_segment_duration_sec(mut self, secs: f64) -> Self {
        self.segment_duration_sec = secs;
        self
    }

    /// Builder-style setter for the longest pause kept without a reason.
    pub fn with_max_acceptable_pause_sec(mut self, secs: f64) -> Self {
        self.max_acceptable_pause_sec = secs;
        self
    }

    /// Builder-style setter for the pause preserved at cut points.
    pub fn with_min_pause_to_keep_sec(mut self, secs: f64) -> Self {
        self.min_pause_to_keep_sec = secs;
        self
    }

    /// Builder-style setter for frame extraction parallelism.
    pub fn with_frame_workers(mut self, workers: usize) -> Self {
        self.frame_workers = workers.max(1);
        self
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
