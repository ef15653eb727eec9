//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use metrics::histogram;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Histogram of wall-clock seconds spent in external tool invocations.
pub const TOOL_DURATION_SECONDS: &str = "demoreel_ffmpeg_duration_seconds";

/// Output target that discards the encoded stream (filter-only runs).
const NULL_OUTPUT: &str = "-";

/// Builder for FFmpeg commands.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file path
    input: PathBuf,
    /// Output file path, or `-` for the null muxer
    output: PathBuf,
    /// Input arguments (before -i)
    input_args: Vec<String>,
    /// Output arguments (after -i)
    output_args: Vec<String>,
    /// Whether to overwrite output
    overwrite: bool,
    /// Log level
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            input_args: Vec::new(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Create a command that only runs filters and discards the output.
    ///
    /// Filters such as `silencedetect` report through the log, so the
    /// log level is raised to `info`.
    pub fn analysis(input: impl AsRef<Path>) -> Self {
        Self::new(input, NULL_OUTPUT).log_level("info")
    }

    /// Add input arguments (before -i).
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.input_args.push(arg.into());
        self
    }

    /// Add output arguments (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set seek position (before input).
    pub fn seek(self, seconds: f64) -> Self {
        self.input_arg("-ss").input_arg(format!("{:.3}", seconds))
    }

    /// Set seek position after the input (frame accurate, slower).
    pub fn output_seek(self, seconds: f64) -> Self {
        self.output_arg("-ss").output_arg(format!("{:.3}", seconds))
    }

    /// Set duration.
    pub fn duration(self, seconds: f64) -> Self {
        self.output_arg("-t").output_arg(format!("{:.3}", seconds))
    }

    /// Set video filter.
    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    /// Set audio filter.
    pub fn audio_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-af").output_arg(filter)
    }

    /// Set video codec.
    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    /// Set audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    /// Copy all streams without re-encoding.
    pub fn codec_copy(self) -> Self {
        self.output_arg("-c").output_arg("copy")
    }

    /// Set CRF (quality).
    pub fn crf(self, crf: u8) -> Self {
        self.output_arg("-crf").output_arg(crf.to_string())
    }

    /// Set preset.
    pub fn preset(self, preset: impl Into<String>) -> Self {
        self.output_arg("-preset").output_arg(preset)
    }

    /// Set audio bitrate.
    pub fn audio_bitrate(self, bitrate: impl Into<String>) -> Self {
        self.output_arg("-b:a").output_arg(bitrate)
    }

    /// Extract single frame.
    pub fn single_frame(self) -> Self {
        self.output_arg("-frames:v").output_arg("1")
    }

    /// Set log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    fn is_null_output(&self) -> bool {
        self.output.as_os_str() == NULL_OUTPUT
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-hide_banner".to_string());
        args.push("-nostdin".to_string());

        args.push("-v".to_string());
        args.push(self.log_level.clone());

        args.extend(self.input_args.clone());

        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());

        args.extend(self.output_args.clone());

        if self.is_null_output() {
            args.push("-f".to_string());
            args.push("null".to_string());
        }

        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Captured output of a finished tool invocation.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: Vec<u8>,
    pub stderr: String,
}

/// Runner for FFmpeg commands with a kill-on-timeout guard.
#[derive(Debug, Clone, Default)]
pub struct FfmpegRunner {
    /// Timeout in seconds
    timeout_secs: Option<u64>,
}

impl FfmpegRunner {
    /// Create a new runner without a timeout.
    pub fn new() -> Self {
        Self { timeout_secs: None }
    }

    /// Set timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Run an FFmpeg command and capture its log output.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<ToolOutput> {
        check_ffmpeg()?;
        run_tool("ffmpeg", &cmd.build_args(), self.timeout_secs).await
    }
}

/// Spawn `tool` with `args`, wait for it (bounded by `timeout_secs`), and
/// turn a non-zero exit into `ToolExecutionFailed` with the stderr tail.
pub(crate) async fn run_tool(
    tool: &'static str,
    args: &[String],
    timeout_secs: Option<u64>,
) -> MediaResult<ToolOutput> {
    let command_line = format!("{} {}", tool, args.join(" "));
    debug!(command = %command_line, "Running external tool");

    let child = Command::new(tool)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound if tool == "ffprobe" => MediaError::ffprobe_not_found(),
            std::io::ErrorKind::NotFound => MediaError::ffmpeg_not_found(),
            _ => MediaError::Io(e),
        })?;

    let started = Instant::now();
    let output = match timeout_secs {
        Some(secs) => {
            match tokio::time::timeout(Duration::from_secs(secs), child.wait_with_output()).await {
                Ok(result) => result?,
                Err(_) => {
                    // Dropping the wait future drops the child, which kills it.
                    warn!(command = %command_line, timeout_secs = secs, "External tool timed out, killing process");
                    return Err(MediaError::Timeout {
                        command: command_line,
                        secs,
                    });
                }
            }
        }
        None => child.wait_with_output().await?,
    };
    histogram!(TOOL_DURATION_SECONDS, "tool" => tool).record(started.elapsed().as_secs_f64());

    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        return Err(MediaError::tool_failed(
            tool,
            command_line,
            "exited with non-zero status",
            Some(&stderr),
            output.status.code(),
        ));
    }

    Ok(ToolOutput {
        stdout: output.stdout,
        stderr,
    })
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::ffmpeg_not_found())
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::ffprobe_not_found())
}
