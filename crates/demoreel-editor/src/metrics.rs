//! Prometheus metrics for analysis and trim runs.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const ANALYSES_TOTAL: &str = "demoreel_analyses_total";
    pub const ANALYSIS_DURATION_SECONDS: &str = "demoreel_analysis_duration_seconds";
    pub const FRAME_EXTRACTION_FAILURES_TOTAL: &str = "demoreel_frame_extraction_failures_total";
    pub const TRIMS_TOTAL: &str = "demoreel_trims_total";
    pub const REMOVED_SECONDS: &str = "demoreel_removed_seconds";
}

/// Record a finished analysis run.
pub fn record_analysis(success: bool, duration_secs: f64) {
    let labels = [("status", status_label(success))];
    counter!(names::ANALYSES_TOTAL, &labels).increment(1);
    histogram!(names::ANALYSIS_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a frame that could not be extracted.
pub fn record_frame_failure(stage: &'static str) {
    counter!(names::FRAME_EXTRACTION_FAILURES_TOTAL, "stage" => stage).increment(1);
}

/// Record a finished trim run.
pub fn record_trim(success: bool, removed_secs: f64) {
    let labels = [("status", status_label(success))];
    counter!(names::TRIMS_TOTAL, &labels).increment(1);
    if success {
        histogram!(names::REMOVED_SECONDS).record(removed_secs);
    }
}

fn status_label(success: bool) -> String {
    if success { "success" } else { "failure" }.to_string()
}
