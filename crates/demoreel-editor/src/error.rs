//! Editor error types.

use std::path::PathBuf;
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("No analysis found at {0} - run analysis on this video first")]
    AnalysisMissing(PathBuf),

    #[error("Invalid action log {path}: {message}")]
    InvalidActionLog { path: PathBuf, message: String },

    #[error("Media error: {0}")]
    Media(#[from] demoreel_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EditorError {
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::PreconditionFailed(msg.into())
    }

    /// Check if the caller must run an earlier step (or fix the input) first.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            EditorError::PreconditionFailed(_) | EditorError::AnalysisMissing(_)
        )
    }

    /// Check if the external toolchain is missing.
    pub fn is_tool_missing(&self) -> bool {
        matches!(self, EditorError::Media(e) if e.is_tool_missing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demoreel_media::MediaError;

    #[test]
    fn test_analysis_missing_tells_user_what_to_run() {
        let err = EditorError::AnalysisMissing(PathBuf::from("/videos/analysis.json"));
        assert!(err.is_precondition());
        assert!(err.to_string().contains("run analysis"));
    }

    #[test]
    fn test_tool_missing_passes_through() {
        let err: EditorError = MediaError::ffmpeg_not_found().into();
        assert!(err.is_tool_missing());
        assert!(!err.is_precondition());
    }
}
