//! Analysis pipeline orchestration.
//!
//! ```text
//!            probe duration
//!                  │
//!     ┌────────────┼─────────────┐
//!  silences    keyframes    frame activity     (concurrent)
//!     │            │             │
//!  correlate   associate         │
//!     └────────────┴──── synthesize suggestions
//!                          │
//!                    analysis.json
//! ```
//!
//! The artifact is written only after every stage succeeded, so a failed run
//! never leaves a partial `analysis.json` behind. Keyframes are staged in a
//! hidden directory next to the video and published at the same point.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, Instrument};

use demoreel_media::{FfmpegAdapter, MediaToolAdapter};
use demoreel_models::{AnalysisSummary, TrimResult, VideoAnalysis};

use crate::artifact::{keyframes_dir, load_action_log, save_analysis, video_dir};
use crate::config::AnalysisConfig;
use crate::correlator::correlate_silences;
use crate::error::{EditorError, EditorResult};
use crate::frame_activity::{FrameActivityScorer, FrameDiffer, SizeRatioDiffer};
use crate::keyframes::{associate_actions, extract_keyframes, publish_keyframes};
use crate::logging::RunLogger;
use crate::metrics::record_analysis;
use crate::silence::detect_silences;
use crate::suggestions::synthesize_suggestions;
use crate::trimmer::{TrimOptions, Trimmer};

/// Runs analysis and trimming against one media toolchain.
#[derive(Clone)]
pub struct VideoAnalyzer {
    adapter: Arc<dyn MediaToolAdapter>,
    differ: Arc<dyn FrameDiffer>,
    config: AnalysisConfig,
}

impl VideoAnalyzer {
    /// Analyzer backed by the system `ffmpeg`/`ffprobe`.
    pub fn new(config: AnalysisConfig) -> Self {
        let adapter = FfmpegAdapter::new().with_timeout(config.tool_timeout.as_secs());
        Self::with_adapter(Arc::new(adapter), config)
    }

    /// Analyzer backed by a custom adapter.
    pub fn with_adapter(adapter: Arc<dyn MediaToolAdapter>, config: AnalysisConfig) -> Self {
        Self {
            adapter,
            differ: Arc::new(SizeRatioDiffer),
            config,
        }
    }

    /// Replace the frame comparison strategy.
    pub fn with_differ(mut self, differ: Arc<dyn FrameDiffer>) -> Self {
        self.differ = differ;
        self
    }

    /// Analyze `video` and persist `analysis.json` next to it.
    pub async fn analyze_video(&self, video: &Path) -> EditorResult<VideoAnalysis> {
        let logger = RunLogger::new("analyze", video);
        let span = logger.create_span();
        let started = Instant::now();

        async {
            logger.log_start("analyzing video");

            let result = self.analyze_inner(video, &logger).await;
            let elapsed = started.elapsed().as_secs_f64();

            match &result {
                Ok(analysis) => {
                    record_analysis(true, elapsed);
                    logger.log_completion(&format!(
                        "{} silences, {} keyframes, {} suggestions in {:.1}s",
                        analysis.summary.silence_count,
                        analysis.summary.keyframe_count,
                        analysis.summary.suggestion_count,
                        elapsed
                    ));
                }
                Err(e) => {
                    record_analysis(false, elapsed);
                    logger.log_error(&e.to_string());
                }
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn analyze_inner(&self, video: &Path, logger: &RunLogger) -> EditorResult<VideoAnalysis> {
        if !tokio::fs::try_exists(video).await? {
            return Err(EditorError::precondition(format!(
                "video not found: {}",
                video.display()
            )));
        }

        let duration = self.adapter.probe_duration(video).await?;
        if duration.is_nan() || duration <= 0.0 {
            return Err(EditorError::precondition(format!(
                "could not determine a positive duration for {}",
                video.display()
            )));
        }
        logger.log_progress(&format!("duration {:.2}s", duration));

        let actions = load_action_log(video).await?;
        if actions.is_none() {
            logger.log_progress("no action log found, correlating by duration only");
        }

        let cfg = &self.config;
        let staging = tempfile::Builder::new()
            .prefix(".keyframes-")
            .tempdir_in(video_dir(video))?;
        let scorer = FrameActivityScorer::new(self.adapter.as_ref(), self.differ.as_ref(), logger)
            .with_segment_duration(cfg.segment_duration_sec)
            .with_workers(cfg.frame_workers);

        let (silences, mut keyframes, frame_diffs) = tokio::try_join!(
            detect_silences(
                self.adapter.as_ref(),
                video,
                cfg.silence_threshold_db,
                cfg.min_silence_sec,
                duration,
            ),
            extract_keyframes(
                self.adapter.as_ref(),
                video,
                staging.path(),
                cfg.scene_threshold,
                duration,
                logger,
            ),
            scorer.score(video, duration),
        )?;
        logger.log_progress("detectors finished");

        let silences = correlate_silences(silences, actions.as_deref(), cfg.max_acceptable_pause_sec);
        if let Some(actions) = &actions {
            associate_actions(&mut keyframes, actions);
        }

        let suggestions = synthesize_suggestions(&frame_diffs, &silences, cfg.min_pause_to_keep_sec);
        let summary = AnalysisSummary::compute(&silences, &keyframes, &suggestions);

        publish_keyframes(&mut keyframes, &keyframes_dir(video)).await?;
        if let Err(e) = staging.close() {
            logger.log_warning(&format!("failed to remove keyframe staging directory: {}", e));
        }

        let analysis = VideoAnalysis {
            video_path: video.display().to_string(),
            duration,
            silences,
            keyframes,
            actions,
            suggestions,
            frame_diffs,
            summary,
            analyzed_at: Utc::now(),
        };

        let path = save_analysis(video, &analysis).await?;
        info!(
            path = %path.display(),
            removable_sec = analysis.summary.removable_sec,
            "Analysis artifact written"
        );

        Ok(analysis)
    }

    /// Trim `video` using its stored analysis.
    ///
    /// `min_pause_to_keep_sec` re-derives suggestions from the stored
    /// signals before trimming.
    pub async fn trim_video(
        &self,
        video: &Path,
        output: Option<PathBuf>,
        min_pause_to_keep_sec: Option<f64>,
    ) -> EditorResult<TrimResult> {
        Trimmer::new(self.adapter.as_ref())
            .trim(
                video,
                None,
                TrimOptions {
                    output,
                    min_pause_to_keep_sec,
                },
            )
            .await
    }

    /// Trim `video` using an analysis the caller already holds.
    pub async fn trim_with_analysis(
        &self,
        video: &Path,
        analysis: VideoAnalysis,
        options: TrimOptions,
    ) -> EditorResult<TrimResult> {
        Trimmer::new(self.adapter.as_ref())
            .trim(video, Some(analysis), options)
            .await
    }
}
