//! Segment trimming.
//!
//! Turns the `remove_pause` suggestions of a stored analysis into the
//! complementary list of kept ranges and re-encodes those into one file.
//! Kept and removed ranges always partition `[0, duration)`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use demoreel_media::fs_utils::{copy_file, same_file};
use demoreel_media::MediaToolAdapter;
use demoreel_models::{TimeRange, TimeSegment, TrimResult, VideoAnalysis};

use crate::artifact::{default_trimmed_path, load_analysis};
use crate::error::{EditorError, EditorResult};
use crate::logging::RunLogger;
use crate::metrics::record_trim;
use crate::suggestions::synthesize_suggestions;

/// Options for one trim run.
#[derive(Debug, Clone, Default)]
pub struct TrimOptions {
    /// Where to write the result; `<stem>-trimmed.<ext>` next to the source
    /// when unset.
    pub output: Option<PathBuf>,
    /// Re-derive suggestions from the stored signals with this pause length
    /// instead of using the stored suggestions.
    pub min_pause_to_keep_sec: Option<f64>,
}

/// Clamp removals to `[0, duration]`, drop empty ones, sort, and merge any
/// that overlap or touch.
pub fn normalize_removals(duration: f64, removals: &[TimeSegment]) -> Vec<TimeSegment> {
    let mut clamped: Vec<TimeSegment> = removals
        .iter()
        .map(|r| TimeSegment::new(r.start_sec.max(0.0), r.end_sec.min(duration)))
        .filter(|r| r.end_sec > r.start_sec)
        .collect();
    clamped.sort_by(|a, b| a.start_sec.total_cmp(&b.start_sec));

    let mut merged: Vec<TimeSegment> = Vec::with_capacity(clamped.len());
    for r in clamped {
        match merged.last_mut() {
            Some(last) if r.start_sec <= last.end_sec => last.end_sec = last.end_sec.max(r.end_sec),
            _ => merged.push(r),
        }
    }
    merged
}

/// Ranges of `[0, duration)` not covered by `removals`.
///
/// `removals` must already be normalized.
pub fn compute_kept_segments(duration: f64, removals: &[TimeSegment]) -> Vec<TimeSegment> {
    let mut kept = Vec::with_capacity(removals.len() + 1);
    let mut cursor = 0.0;

    for r in removals {
        if r.start_sec > cursor {
            kept.push(TimeSegment::new(cursor, r.start_sec));
        }
        cursor = r.end_sec.max(cursor);
    }
    if cursor < duration {
        kept.push(TimeSegment::new(cursor, duration));
    }

    kept
}

/// Trims videos using a stored or supplied analysis.
pub struct Trimmer<'a> {
    adapter: &'a dyn MediaToolAdapter,
}

impl<'a> Trimmer<'a> {
    pub fn new(adapter: &'a dyn MediaToolAdapter) -> Self {
        Self { adapter }
    }

    /// Trim `video`.
    ///
    /// When `analysis` is `None` the sidecar artifact is loaded; if there is
    /// none the call fails with [`EditorError::AnalysisMissing`].
    pub async fn trim(
        &self,
        video: &Path,
        analysis: Option<VideoAnalysis>,
        options: TrimOptions,
    ) -> EditorResult<TrimResult> {
        let logger = RunLogger::new("trim", video);
        let started = Instant::now();
        logger.log_start("trimming video");

        let result = self.trim_inner(video, analysis, options, &logger).await;

        match &result {
            Ok(r) => {
                record_trim(true, r.removed_sec());
                logger.log_completion(&format!(
                    "kept {} segments, {:.1}s -> {:.1}s in {:.1}s",
                    r.kept_segments.len(),
                    r.original_duration,
                    r.trimmed_duration,
                    started.elapsed().as_secs_f64()
                ));
            }
            Err(e) => {
                record_trim(false, 0.0);
                logger.log_error(&e.to_string());
            }
        }

        result
    }

    async fn trim_inner(
        &self,
        video: &Path,
        analysis: Option<VideoAnalysis>,
        options: TrimOptions,
        logger: &RunLogger,
    ) -> EditorResult<TrimResult> {
        let analysis = match analysis {
            Some(a) => a,
            None => load_analysis(video).await?,
        };

        if !tokio::fs::try_exists(video).await? {
            return Err(EditorError::precondition(format!(
                "video not found: {}",
                video.display()
            )));
        }

        let output = options.output.unwrap_or_else(|| default_trimmed_path(video));
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        if same_file(video, &output).await? {
            return Err(EditorError::precondition(format!(
                "trim output {} resolves to the source video",
                output.display()
            )));
        }

        let duration = analysis.duration;
        let removal_ranges: Vec<TimeSegment> = match options.min_pause_to_keep_sec {
            Some(min_pause) => {
                logger.log_progress(&format!("re-deriving suggestions with a {:.2}s pause", min_pause));
                synthesize_suggestions(&analysis.frame_diffs, &analysis.silences, min_pause)
                    .iter()
                    .filter(|s| s.is_removal())
                    .map(|s| s.range())
                    .collect()
            }
            None => analysis.removal_suggestions().into_iter().map(|s| s.range()).collect(),
        };

        let removed = normalize_removals(duration, &removal_ranges);
        let kept = compute_kept_segments(duration, &removed);

        debug!(
            removed = removed.len(),
            kept = kept.len(),
            output = %output.display(),
            "Computed trim plan"
        );

        if removed.is_empty() {
            let bytes = copy_file(video, &output).await?;
            info!(bytes = bytes, output = %output.display(), "Nothing to remove, copied source");
        } else if kept.is_empty() {
            return Err(EditorError::precondition(
                "suggestions remove the entire video, nothing left to keep",
            ));
        } else {
            self.adapter.concat_segments(video, &kept, &output).await?;
        }

        let trimmed_duration: f64 = kept.iter().map(|k| k.duration_sec()).sum();

        Ok(TrimResult {
            original_path: video.display().to_string(),
            trimmed_path: output.display().to_string(),
            original_duration: duration,
            trimmed_duration,
            removed_segments: removed,
            kept_segments: kept,
        })
    }
}
