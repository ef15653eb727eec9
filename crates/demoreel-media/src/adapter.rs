//! The media tool seam used by the analysis pipeline.
//!
//! Pipeline code only talks to [`MediaToolAdapter`]. [`FfmpegAdapter`] is the
//! production implementation; tests substitute an in-memory fake.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use demoreel_models::TimeSegment;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filter_output::{parse_scene_markers, parse_silence_markers};
use crate::probe::probe_duration;

/// Sub-clip re-encode settings. Re-encoding keeps cuts frame accurate.
pub const SUBCLIP_VIDEO_CODEC: &str = "libx264";
pub const SUBCLIP_PRESET: &str = "veryfast";
pub const SUBCLIP_CRF: u8 = 20;
pub const SUBCLIP_AUDIO_CODEC: &str = "aac";
pub const SUBCLIP_AUDIO_BITRATE: &str = "128k";

/// Seconds of fast (keyframe) seek before the accurate output seek.
const FAST_SEEK_MARGIN_SEC: f64 = 5.0;

/// Pattern of scene keyframe files inside the output directory.
pub const KEYFRAME_PATTERN: &str = "keyframe-%03d.png";

/// File name of the `n`-th keyframe (1-based, like FFmpeg's image2 muxer).
pub fn keyframe_file_name(n: usize) -> String {
    format!("keyframe-{:03}.png", n)
}

/// A frame saved by scene-change detection.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    pub timestamp_sec: f64,
    pub score: Option<f64>,
    pub path: PathBuf,
}

/// Operations the pipeline needs from an external encode/decode toolchain.
#[async_trait]
pub trait MediaToolAdapter: Send + Sync {
    /// Container duration in seconds; `0.0` when it cannot be determined.
    async fn probe_duration(&self, path: &Path) -> MediaResult<f64>;

    /// Write the frame nearest `at_sec` to `out`.
    async fn extract_frame(&self, path: &Path, at_sec: f64, out: &Path) -> MediaResult<()>;

    /// Write `[start_sec, end_sec)` of `path` to `out` with audio and video.
    async fn extract_subclip(&self, path: &Path, start_sec: f64, end_sec: f64, out: &Path) -> MediaResult<()>;

    /// Ranges where audio stays below `threshold_db` for at least `min_duration_sec`.
    ///
    /// `duration_hint` closes a silence that runs to the end of the stream.
    async fn detect_silence(
        &self,
        path: &Path,
        threshold_db: f64,
        min_duration_sec: f64,
        duration_hint: Option<f64>,
    ) -> MediaResult<Vec<TimeSegment>>;

    /// Save frames whose scene-change score exceeds `threshold` into `out_dir`.
    async fn detect_scenes(&self, path: &Path, threshold: f64, out_dir: &Path) -> MediaResult<Vec<SceneFrame>>;

    /// Concatenate `segments` of `path` into one continuous file at `out`.
    async fn concat_segments(&self, path: &Path, segments: &[TimeSegment], out: &Path) -> MediaResult<()>;
}

/// [`MediaToolAdapter`] backed by the `ffmpeg` and `ffprobe` binaries.
#[derive(Debug, Clone, Default)]
pub struct FfmpegAdapter {
    timeout_secs: Option<u64>,
}

impl FfmpegAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound every tool invocation by `secs`.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    fn runner(&self) -> FfmpegRunner {
        match self.timeout_secs {
            Some(secs) => FfmpegRunner::new().with_timeout(secs),
            None => FfmpegRunner::new(),
        }
    }
}

#[async_trait]
impl MediaToolAdapter for FfmpegAdapter {
    async fn probe_duration(&self, path: &Path) -> MediaResult<f64> {
        probe_duration(path, self.timeout_secs).await
    }

    async fn extract_frame(&self, path: &Path, at_sec: f64, out: &Path) -> MediaResult<()> {
        let cmd = FfmpegCommand::new(path, out).seek(at_sec.max(0.0)).single_frame();

        match self.runner().run(&cmd).await {
            Ok(_) => {}
            Err(e @ (MediaError::ToolNotFound { .. } | MediaError::Timeout { .. })) => return Err(e),
            Err(e) => return Err(MediaError::frame_failed(at_sec, e.to_string())),
        }

        // Seeking past the last frame exits 0 without writing anything.
        match tokio::fs::metadata(out).await {
            Ok(meta) if meta.len() > 0 => Ok(()),
            _ => Err(MediaError::frame_failed(at_sec, "no frame written")),
        }
    }

    async fn extract_subclip(&self, path: &Path, start_sec: f64, end_sec: f64, out: &Path) -> MediaResult<()> {
        // Fast input seek to get close, then an accurate output seek from there.
        let fast_seek = (start_sec - FAST_SEEK_MARGIN_SEC).max(0.0);
        let accurate_seek = start_sec - fast_seek;

        debug!(
            start_sec = start_sec,
            end_sec = end_sec,
            output = %out.display(),
            "Extracting sub-clip"
        );

        let cmd = FfmpegCommand::new(path, out)
            .seek(fast_seek)
            .output_seek(accurate_seek)
            .duration(end_sec - start_sec)
            .video_codec(SUBCLIP_VIDEO_CODEC)
            .preset(SUBCLIP_PRESET)
            .crf(SUBCLIP_CRF)
            .audio_codec(SUBCLIP_AUDIO_CODEC)
            .audio_bitrate(SUBCLIP_AUDIO_BITRATE)
            .output_args(["-avoid_negative_ts", "make_zero"]);

        self.runner().run(&cmd).await.map(|_| ())
    }

    async fn detect_silence(
        &self,
        path: &Path,
        threshold_db: f64,
        min_duration_sec: f64,
        duration_hint: Option<f64>,
    ) -> MediaResult<Vec<TimeSegment>> {
        let cmd = silence_command(path, threshold_db, min_duration_sec);
        let output = self.runner().run(&cmd).await?;
        Ok(parse_silence_markers(&output.stderr, duration_hint))
    }

    async fn detect_scenes(&self, path: &Path, threshold: f64, out_dir: &Path) -> MediaResult<Vec<SceneFrame>> {
        tokio::fs::create_dir_all(out_dir).await?;

        let filter = format!("select='gt(scene,{})',metadata=print", threshold);
        let cmd = FfmpegCommand::new(path, out_dir.join(KEYFRAME_PATTERN))
            .log_level("info")
            .video_filter(filter)
            .output_args(["-vsync", "vfr"]);

        let output = self.runner().run(&cmd).await?;

        let mut frames = Vec::new();
        for marker in parse_scene_markers(&output.stderr) {
            let frame_path = out_dir.join(keyframe_file_name(marker.index + 1));
            if tokio::fs::try_exists(&frame_path).await.unwrap_or(false) {
                frames.push(SceneFrame {
                    timestamp_sec: marker.timestamp_sec,
                    score: marker.score,
                    path: frame_path,
                });
            }
        }

        Ok(frames)
    }

    async fn concat_segments(&self, path: &Path, segments: &[TimeSegment], out: &Path) -> MediaResult<()> {
        if segments.is_empty() {
            return Err(MediaError::InvalidVideo("no segments to concatenate".to_string()));
        }

        info!(segments = segments.len(), output = %out.display(), "Concatenating kept segments");

        let temp_dir = tempfile::Builder::new().prefix("demoreel-concat-").tempdir()?;
        let mut segment_paths = Vec::with_capacity(segments.len());

        for (i, seg) in segments.iter().enumerate() {
            let seg_path = temp_dir.path().join(format!("seg_{:04}.mp4", i));
            self.extract_subclip(path, seg.start_sec, seg.end_sec, &seg_path).await?;
            segment_paths.push(seg_path);
        }

        let concat_list = temp_dir.path().join("concat.txt");
        tokio::fs::write(&concat_list, concat_list_contents(&segment_paths)).await?;

        let cmd = FfmpegCommand::new(&concat_list, out)
            .input_arg("-f")
            .input_arg("concat")
            .input_arg("-safe")
            .input_arg("0")
            .codec_copy()
            .output_args(["-movflags", "+faststart"]);

        self.runner().run(&cmd).await?;

        // temp_dir is removed when dropped
        Ok(())
    }
}

/// Body of a concat-demuxer list file.
fn concat_list_contents(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("file '{}'\n", p.display().to_string().replace('\'', r"'\''")))
        .collect()
}

/// Decodes the whole file into the null muxer. Inputs without an audio
/// stream still succeed and report no markers.
fn silence_command(path: &Path, threshold_db: f64, min_duration_sec: f64) -> FfmpegCommand {
    let filter = format!("silencedetect=noise={}dB:d={}", threshold_db, min_duration_sec);
    FfmpegCommand::analysis(path).audio_filter(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyframe_file_name_is_zero_padded() {
        assert_eq!(keyframe_file_name(1), "keyframe-001.png");
        assert_eq!(keyframe_file_name(42), "keyframe-042.png");
    }

    #[test]
    fn test_silence_command_keeps_video_stream_mapped() {
        let args = silence_command(Path::new("/tmp/screen-only.mp4"), -30.0, 2.0).build_args();
        assert!(args.iter().any(|a| a == "silencedetect=noise=-30dB:d=2"));
        assert!(!args.iter().any(|a| a == "-vn"));
    }

    #[test]
    fn test_concat_list_escapes_quotes() {
        let list = concat_list_contents(&[PathBuf::from("/tmp/a.mp4"), PathBuf::from("/tmp/it's.mp4")]);
        assert_eq!(list, "file '/tmp/a.mp4'\nfile '/tmp/it'\\''s.mp4'\n");
    }
}
