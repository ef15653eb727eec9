//! Silence detection.
//!
//! Runs FFmpeg's `silencedetect` over the whole audio stream. There is no
//! fallback: if the tool fails, the analysis fails.

use std::path::Path;

use tracing::{debug, info};

use demoreel_media::MediaToolAdapter;
use demoreel_models::SilenceSegment;

use crate::error::EditorResult;

/// Detect silences in `video`.
///
/// Segments come back ascending and non-overlapping, with `keep_pause`
/// unset until the correlator runs.
pub async fn detect_silences(
    adapter: &dyn MediaToolAdapter,
    video: &Path,
    threshold_db: f64,
    min_duration_sec: f64,
    duration: f64,
) -> EditorResult<Vec<SilenceSegment>> {
    debug!(
        path = %video.display(),
        threshold_db = threshold_db,
        min_duration_sec = min_duration_sec,
        "Starting silence detection"
    );

    let ranges = adapter
        .detect_silence(video, threshold_db, min_duration_sec, Some(duration))
        .await?;

    let silences: Vec<SilenceSegment> = ranges
        .into_iter()
        .filter(|r| r.is_valid())
        .map(|r| SilenceSegment::new(r.start_sec, r.end_sec.min(duration)))
        .filter(|s| s.duration_sec > 0.0)
        .collect();

    info!(
        silences = silences.len(),
        total_silence_sec = silences.iter().map(|s| s.duration_sec).sum::<f64>(),
        "Silence detection complete"
    );

    Ok(silences)
}
