//! Frame-activity scoring.
//!
//! The video is cut into fixed-width windows. For each window the first and
//! last frame are extracted and compared; the comparison score (0-100) picks
//! an activity class and an edit recommendation. Adjacent windows with the
//! same recommendation are then merged, so the output is a run-length
//! encoding of the timeline:
//!
//! ```text
//! windows:  [cut][cut][2x][2x][keep][cut]
//! merged:   [  cut   ][  2x  ][keep][cut]
//! ```
//!
//! The default comparison is a cheap proxy: the relative difference in
//! encoded PNG size between the two frames. Static screens compress to
//! near-identical sizes. Other comparisons plug in through [`FrameDiffer`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use demoreel_media::{MediaResult, MediaToolAdapter};
use demoreel_models::{FrameDiffSegment, TimeSegment};

use crate::error::{EditorError, EditorResult};
use crate::logging::RunLogger;
use crate::metrics::record_frame_failure;

/// Size ratio to score multiplier.
pub const SIZE_RATIO_SCALE: f64 = 500.0;
/// Scores are capped here.
pub const MAX_DIFF_SCORE: f64 = 100.0;
/// Score used for a window whose frames could not be extracted.
pub const FALLBACK_DIFF_SCORE: f64 = 50.0;
/// The "last" frame is taken this far before the window end.
const LAST_FRAME_OFFSET_SEC: f64 = 0.05;

/// Compares the first and last frame of a window.
#[async_trait]
pub trait FrameDiffer: Send + Sync {
    /// Visual-change score between two frames, 0 (identical) to 100.
    async fn score_window(&self, first: &Path, last: &Path) -> MediaResult<f64>;
}

/// Scores frames by the relative difference in their encoded file sizes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeRatioDiffer;

#[async_trait]
impl FrameDiffer for SizeRatioDiffer {
    async fn score_window(&self, first: &Path, last: &Path) -> MediaResult<f64> {
        let a = tokio::fs::metadata(first).await?.len();
        let b = tokio::fs::metadata(last).await?.len();
        Ok(size_ratio_score(a, b))
    }
}

/// `min(100, |a - b| / avg(a, b) * 500)`.
pub fn size_ratio_score(a: u64, b: u64) -> f64 {
    let avg = (a as f64 + b as f64) / 2.0;
    if avg <= 0.0 {
        return 0.0;
    }
    let ratio = (a as f64 - b as f64).abs() / avg;
    (ratio * SIZE_RATIO_SCALE).min(MAX_DIFF_SCORE)
}

/// Consecutive `[i*width, (i+1)*width)` windows covering `[0, duration)`.
/// The last window is clipped to `duration`.
pub fn activity_windows(duration: f64, width: f64) -> Vec<TimeSegment> {
    if width.is_nan() || width <= 0.0 || duration.is_nan() || duration <= 0.0 {
        return Vec::new();
    }

    let mut windows = Vec::new();
    let mut i = 0usize;
    loop {
        let start = i as f64 * width;
        if start >= duration {
            break;
        }
        windows.push(TimeSegment::new(start, (start + width).min(duration)));
        i += 1;
    }
    windows
}

/// Coalesce adjacent windows that share a recommendation.
///
/// The merged average is the mean of the merged windows' averages; min and
/// max are running extremes.
pub fn merge_windows(windows: &[FrameDiffSegment]) -> Vec<FrameDiffSegment> {
    let mut merged: Vec<FrameDiffSegment> = Vec::new();
    let mut run_len = 0usize;

    for window in windows {
        match merged.last_mut() {
            Some(current) if current.recommendation == window.recommendation => {
                run_len += 1;
                current.end_sec = window.end_sec;
                current.avg_diff_score += (window.avg_diff_score - current.avg_diff_score) / run_len as f64;
                current.min_diff_score = current.min_diff_score.min(window.min_diff_score);
                current.max_diff_score = current.max_diff_score.max(window.max_diff_score);
            }
            _ => {
                merged.push(window.clone());
                run_len = 1;
            }
        }
    }

    merged
}

/// Scores frame activity across a whole video.
pub struct FrameActivityScorer<'a> {
    adapter: &'a dyn MediaToolAdapter,
    differ: &'a dyn FrameDiffer,
    logger: &'a RunLogger,
    segment_duration_sec: f64,
    workers: usize,
}

impl<'a> FrameActivityScorer<'a> {
    /// Windows that fall back to the mid score are reported through `logger`.
    pub fn new(adapter: &'a dyn MediaToolAdapter, differ: &'a dyn FrameDiffer, logger: &'a RunLogger) -> Self {
        Self {
            adapter,
            differ,
            logger,
            segment_duration_sec: 1.0,
            workers: 1,
        }
    }

    pub fn with_segment_duration(mut self, secs: f64) -> Self {
        self.segment_duration_sec = secs;
        self
    }

    /// Number of windows scored concurrently; output order is unaffected.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Score `video` and return merged activity segments.
    ///
    /// Frames are written to a scratch directory unique to this call, which
    /// is removed before returning on every path.
    pub async fn score(&self, video: &Path, duration: f64) -> EditorResult<Vec<FrameDiffSegment>> {
        if self.segment_duration_sec.is_nan() || self.segment_duration_sec <= 0.0 {
            return Err(EditorError::precondition(format!(
                "activity window width must be positive, got {}",
                self.segment_duration_sec
            )));
        }

        let windows = activity_windows(duration, self.segment_duration_sec);
        let prefix = format!("demoreel-frames-{}-", self.logger.run_id());
        let scratch = tempfile::Builder::new().prefix(&prefix).tempdir()?;

        debug!(
            path = %video.display(),
            windows = windows.len(),
            workers = self.workers,
            scratch = %scratch.path().display(),
            "Scoring frame activity"
        );

        let scored: Vec<FrameDiffSegment> = stream::iter(windows.into_iter().enumerate())
            .map(|(idx, window)| self.score_one(video, scratch.path(), idx, window))
            .buffered(self.workers)
            .try_collect()
            .await?;

        if let Err(e) = scratch.close() {
            self.logger
                .log_warning(&format!("failed to remove frame scratch directory: {}", e));
        }

        let merged = merge_windows(&scored);
        info!(
            windows = scored.len(),
            segments = merged.len(),
            "Frame activity scoring complete"
        );

        Ok(merged)
    }

    async fn score_one(
        &self,
        video: &Path,
        scratch: &Path,
        idx: usize,
        window: TimeSegment,
    ) -> EditorResult<FrameDiffSegment> {
        let first = scratch.join(format!("w{:05}-first.png", idx));
        let last = scratch.join(format!("w{:05}-last.png", idx));
        let last_at = (window.end_sec - LAST_FRAME_OFFSET_SEC).max(window.start_sec);

        let score = match self.extract_pair(video, window.start_sec, &first, last_at, &last).await {
            Ok(()) => match self.differ.score_window(&first, &last).await {
                Ok(score) => score,
                Err(e) => {
                    self.logger.log_warning(&format!(
                        "window {} ({:.1}s): frame comparison failed, using fallback score: {}",
                        idx, window.start_sec, e
                    ));
                    FALLBACK_DIFF_SCORE
                }
            },
            Err(e) if e.is_tool_missing() => return Err(e.into()),
            Err(e) => {
                self.logger.log_warning(&format!(
                    "window {} ({:.1}s): frame extraction failed, using fallback score: {}",
                    idx, window.start_sec, e
                ));
                record_frame_failure("activity");
                FALLBACK_DIFF_SCORE
            }
        };

        remove_quietly(&[first, last]).await;

        Ok(FrameDiffSegment::from_score(window.start_sec, window.end_sec, score))
    }

    async fn extract_pair(
        &self,
        video: &Path,
        first_at: f64,
        first: &Path,
        last_at: f64,
        last: &Path,
    ) -> MediaResult<()> {
        self.adapter.extract_frame(video, first_at, first).await?;
        self.adapter.extract_frame(video, last_at, last).await
    }
}

async fn remove_quietly(paths: &[PathBuf]) {
    for p in paths {
        let _ = tokio::fs::remove_file(p).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demoreel_models::{ActivityClass, Recommendation};

    fn window(start: f64, end: f64, score: f64) -> FrameDiffSegment {
        FrameDiffSegment::from_score(start, end, score)
    }

    #[test]
    fn test_size_ratio_score() {
        assert_eq!(size_ratio_score(1000, 1000), 0.0);
        // 10 / 1005 * 500 ≈ 4.975
        assert!((size_ratio_score(1000, 1010) - 4.975_124).abs() < 1e-3);
        assert_eq!(size_ratio_score(1000, 3000), 100.0);
        assert_eq!(size_ratio_score(0, 0), 0.0);
    }

    #[test]
    fn test_windows_cover_duration() {
        let windows = activity_windows(3.5, 1.0);
        assert_eq!(windows.len(), 4);
        assert_eq!(windows[3], TimeSegment::new(3.0, 3.5));
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end_sec, pair[1].start_sec);
        }
        assert!(activity_windows(0.0, 1.0).is_empty());
        assert!(activity_windows(10.0, 0.0).is_empty());
    }

    #[test]
    fn test_merge_scenario() {
        let merged = merge_windows(&[window(0.0, 1.0, 3.0), window(1.0, 2.0, 4.0), window(2.0, 3.0, 20.0)]);

        assert_eq!(merged.len(), 2);
        assert_eq!((merged[0].start_sec, merged[0].end_sec), (0.0, 2.0));
        assert_eq!(merged[0].recommendation, Recommendation::Cut);
        assert!((merged[0].avg_diff_score - 3.5).abs() < 1e-9);
        assert_eq!(merged[0].min_diff_score, 3.0);
        assert_eq!(merged[0].max_diff_score, 4.0);
        assert_eq!((merged[1].start_sec, merged[1].end_sec), (2.0, 3.0));
        assert_eq!(merged[1].recommendation, Recommendation::Speedup2x);
        assert_eq!(merged[1].classification, ActivityClass::MediumActivity);
    }

    #[test]
    fn test_merge_invariant_holds() {
        let scores = [1.0, 2.0, 50.0, 60.0, 6.0, 7.0, 8.0, 1.0, 20.0, 20.0];
        let windows: Vec<_> = scores
            .iter()
            .enumerate()
            .map(|(i, s)| window(i as f64, i as f64 + 1.0, *s))
            .collect();

        let merged = merge_windows(&windows);
        assert_eq!(merged.len(), 5);
        assert_eq!(merged.first().unwrap().start_sec, 0.0);
        assert_eq!(merged.last().unwrap().end_sec, 10.0);
        for pair in merged.windows(2) {
            assert_ne!(pair[0].recommendation, pair[1].recommendation);
            assert_eq!(pair[0].end_sec, pair[1].start_sec);
        }

        // [6, 7, 8] -> mean 7
        assert!((merged[2].avg_diff_score - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_windows(&[]).is_empty());
    }
}
