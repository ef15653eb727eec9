//! Structured run logging utilities.
//!
//! Provides consistent, structured logging for analysis and trim runs with
//! tracing spans and contextual information.

use std::path::Path;

use tracing::{error, info, warn, Span};
use uuid::Uuid;

/// Run logger for structured logging with consistent formatting.
///
/// Every line carries the run ID, the operation and the video being
/// processed so concurrent analyses of different videos stay separable.
#[derive(Debug, Clone)]
pub struct RunLogger {
    run_id: String,
    operation: String,
    video: String,
}

impl RunLogger {
    /// Create a new logger with a fresh run ID.
    ///
    /// # Arguments
    /// * `operation` - The type of operation (e.g., "analyze", "trim")
    /// * `video` - The video being processed
    pub fn new(operation: &str, video: &Path) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            operation: operation.to_string(),
            video: video.display().to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            operation = %self.operation,
            video = %self.video,
            "Run started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            operation = %self.operation,
            "Run progress: {}", message
        );
    }

    /// Something failed but the run continues with a degraded result.
    pub fn log_warning(&self, message: &str) {
        warn!(
            run_id = %self.run_id,
            operation = %self.operation,
            "Run warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            run_id = %self.run_id,
            operation = %self.operation,
            video = %self.video,
            "Run failed: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            operation = %self.operation,
            video = %self.video,
            "Run completed: {}", message
        );
    }

    /// Run ID, also used to name this run's scratch directories.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Create a tracing span for this run.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "run",
            run_id = %self.run_id,
            operation = %self.operation,
            video = %self.video
        )
    }
}
