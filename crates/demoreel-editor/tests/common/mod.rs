//! Shared fixtures for editor integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use demoreel_media::{keyframe_file_name, MediaError, MediaResult, MediaToolAdapter, SceneFrame};
use demoreel_models::TimeSegment;

type FrameSizeFn = Box<dyn Fn(f64) -> usize + Send + Sync>;

/// In-memory stand-in for the ffmpeg toolchain.
///
/// Frames are written as zero-filled files whose size is chosen by
/// `frame_size`, which is all the size-ratio differ looks at.
pub struct FakeAdapter {
    pub duration: f64,
    pub silences: Vec<TimeSegment>,
    pub scenes: Vec<(f64, Option<f64>)>,
    pub frame_size: FrameSizeFn,
    pub fail_frames_between: Option<(f64, f64)>,
    pub tools_missing: bool,
    pub tools_vanish_after_frames: Option<usize>,
    pub frames_attempted: AtomicUsize,
    pub frame_paths: Mutex<Vec<PathBuf>>,
    pub concat_calls: Mutex<Vec<Vec<TimeSegment>>>,
}

impl FakeAdapter {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            silences: Vec::new(),
            scenes: Vec::new(),
            frame_size: Box::new(|_| 1000),
            fail_frames_between: None,
            tools_missing: false,
            tools_vanish_after_frames: None,
            frames_attempted: AtomicUsize::new(0),
            frame_paths: Mutex::new(Vec::new()),
            concat_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_silences(mut self, silences: &[(f64, f64)]) -> Self {
        self.silences = silences.iter().map(|(s, e)| TimeSegment::new(*s, *e)).collect();
        self
    }

    pub fn with_scenes(mut self, scenes: &[(f64, Option<f64>)]) -> Self {
        self.scenes = scenes.to_vec();
        self
    }

    pub fn with_frame_size(mut self, f: impl Fn(f64) -> usize + Send + Sync + 'static) -> Self {
        self.frame_size = Box::new(f);
        self
    }

    pub fn failing_frames_between(mut self, start: f64, end: f64) -> Self {
        self.fail_frames_between = Some((start, end));
        self
    }

    pub fn without_tools(mut self) -> Self {
        self.tools_missing = true;
        self
    }

    /// The first `frames` frame extractions succeed, every later call
    /// reports a missing toolchain.
    pub fn tools_vanish_after(mut self, frames: usize) -> Self {
        self.tools_vanish_after_frames = Some(frames);
        self
    }

    fn check_tools(&self) -> MediaResult<()> {
        if self.tools_missing {
            Err(MediaError::ffmpeg_not_found())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MediaToolAdapter for FakeAdapter {
    async fn probe_duration(&self, _path: &Path) -> MediaResult<f64> {
        Ok(self.duration)
    }

    async fn extract_frame(&self, _path: &Path, at_sec: f64, out: &Path) -> MediaResult<()> {
        self.check_tools()?;
        let attempt = self.frames_attempted.fetch_add(1, Ordering::SeqCst);
        if self.tools_vanish_after_frames.is_some_and(|limit| attempt >= limit) {
            return Err(MediaError::ffmpeg_not_found());
        }
        if let Some((start, end)) = self.fail_frames_between {
            if at_sec >= start && at_sec < end {
                return Err(MediaError::frame_failed(at_sec, "decoder error"));
            }
        }

        tokio::fs::write(out, vec![0u8; (self.frame_size)(at_sec)]).await?;
        self.frame_paths.lock().unwrap().push(out.to_path_buf());
        Ok(())
    }

    async fn extract_subclip(&self, _path: &Path, _start_sec: f64, _end_sec: f64, out: &Path) -> MediaResult<()> {
        self.check_tools()?;
        tokio::fs::write(out, b"subclip").await?;
        Ok(())
    }

    async fn detect_silence(
        &self,
        _path: &Path,
        _threshold_db: f64,
        _min_duration_sec: f64,
        _duration_hint: Option<f64>,
    ) -> MediaResult<Vec<TimeSegment>> {
        self.check_tools()?;
        Ok(self.silences.clone())
    }

    async fn detect_scenes(&self, _path: &Path, _threshold: f64, out_dir: &Path) -> MediaResult<Vec<SceneFrame>> {
        self.check_tools()?;
        tokio::fs::create_dir_all(out_dir).await?;

        let mut frames = Vec::new();
        for (i, (ts, score)) in self.scenes.iter().enumerate() {
            let path = out_dir.join(keyframe_file_name(i + 1));
            tokio::fs::write(&path, b"png").await?;
            self.frame_paths.lock().unwrap().push(path.clone());
            frames.push(SceneFrame {
                timestamp_sec: *ts,
                score: *score,
                path,
            });
        }
        Ok(frames)
    }

    async fn concat_segments(&self, _path: &Path, segments: &[TimeSegment], out: &Path) -> MediaResult<()> {
        self.check_tools()?;
        if segments.is_empty() {
            return Err(MediaError::InvalidVideo("no segments to concatenate".to_string()));
        }
        self.concat_calls.lock().unwrap().push(segments.to_vec());
        tokio::fs::write(out, b"trimmed").await?;
        Ok(())
    }
}

/// Static for the first `static_until` seconds, busy afterwards.
///
/// Busy windows get a small first frame and a large last frame, so every
/// busy window scores at the cap.
pub fn static_then_busy(static_until: f64) -> impl Fn(f64) -> usize + Send + Sync + 'static {
    move |t| {
        if t < static_until || t.fract() < 0.5 {
            1000
        } else {
            2000
        }
    }
}

/// Parent directories of recorded frames whose name starts with `prefix`.
pub fn frame_dirs_with_prefix(adapter: &FakeAdapter, prefix: &str) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = adapter
        .frame_paths
        .lock()
        .unwrap()
        .iter()
        .filter_map(|p| p.parent().map(|d| d.to_path_buf()))
        .filter(|d| {
            d.file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with(prefix))
        })
        .collect();
    dirs.sort();
    dirs.dedup();
    dirs
}

/// Write a placeholder video file and return its path.
pub async fn write_video(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    tokio::fs::write(&path, b"not really a video").await.unwrap();
    path
}
