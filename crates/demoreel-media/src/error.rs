//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Bytes of tool stderr kept on failures.
pub const STDERR_TAIL_BYTES: usize = 2048;

/// Errors that can occur during media processing.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{tool} not found in PATH - install {hint}")]
    ToolNotFound {
        tool: &'static str,
        hint: &'static str,
    },

    #[error("{tool} failed running `{command}`: {message}{}", format_tail(.stderr_tail))]
    ToolExecutionFailed {
        tool: &'static str,
        command: String,
        message: String,
        stderr_tail: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("Frame extraction at {at_sec:.3}s failed: {message}")]
    FrameExtractionFailed { at_sec: f64, message: String },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("`{command}` timed out after {secs} seconds")]
    Timeout { command: String, secs: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid video file: {0}")]
    InvalidVideo(String),
}

fn format_tail(tail: &Option<String>) -> String {
    match tail {
        Some(t) if !t.trim().is_empty() => format!("\n--- stderr (tail) ---\n{}", t.trim_end()),
        _ => String::new(),
    }
}

impl MediaError {
    /// FFmpeg is not installed.
    pub fn ffmpeg_not_found() -> Self {
        Self::ToolNotFound {
            tool: "ffmpeg",
            hint: "FFmpeg (e.g. `apt install ffmpeg` or `brew install ffmpeg`)",
        }
    }

    /// FFprobe is not installed.
    pub fn ffprobe_not_found() -> Self {
        Self::ToolNotFound {
            tool: "ffprobe",
            hint: "FFmpeg, which ships ffprobe (e.g. `apt install ffmpeg` or `brew install ffmpeg`)",
        }
    }

    /// Create a tool failure error, keeping only the tail of stderr.
    pub fn tool_failed(
        tool: &'static str,
        command: impl Into<String>,
        message: impl Into<String>,
        stderr: Option<&str>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::ToolExecutionFailed {
            tool,
            command: command.into(),
            message: message.into(),
            stderr_tail: stderr.map(|s| stderr_tail(s, STDERR_TAIL_BYTES)),
            exit_code,
        }
    }

    /// Create a single-frame extraction error.
    pub fn frame_failed(at_sec: f64, message: impl Into<String>) -> Self {
        Self::FrameExtractionFailed {
            at_sec,
            message: message.into(),
        }
    }

    /// True if the external toolchain is missing.
    pub fn is_tool_missing(&self) -> bool {
        matches!(self, Self::ToolNotFound { .. })
    }
}

/// Last `max_bytes` of `s`, cut on a char boundary.
pub fn stderr_tail(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }
    let mut start = s.len() - max_bytes;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    s[start..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_tail_keeps_end() {
        let s = "a".repeat(10) + "END";
        assert_eq!(stderr_tail(&s, 3), "END");
        assert_eq!(stderr_tail("short", 100), "short");
    }

    #[test]
    fn test_stderr_tail_respects_char_boundary() {
        let s = "ééé";
        let tail = stderr_tail(s, 3);
        assert_eq!(tail, "é");
    }

    #[test]
    fn test_tool_failed_message_includes_command_and_tail() {
        let err = MediaError::tool_failed(
            "ffmpeg",
            "ffmpeg -i in.mp4 -f null -",
            "exited with non-zero status",
            Some("line 1\nmoov atom not found\n"),
            Some(1),
        );
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg -i in.mp4"));
        assert!(msg.contains("moov atom not found"));
    }

    #[test]
    fn test_not_found_is_distinct() {
        assert!(MediaError::ffmpeg_not_found().is_tool_missing());
        assert!(MediaError::ffmpeg_not_found().to_string().contains("install"));
        assert!(!MediaError::tool_failed("ffmpeg", "c", "m", None, Some(1)).is_tool_missing());
        assert!(!MediaError::frame_failed(1.0, "no output").is_tool_missing());
    }
}
