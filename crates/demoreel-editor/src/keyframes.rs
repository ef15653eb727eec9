//! Scene/keyframe extraction.
//!
//! Scene-change detection picks the frames where the picture changes
//! noticeably. Screen recordings with very little motion can produce no scene
//! changes at all, so in that case frames are sampled evenly instead; the
//! gallery always gets at least one image for a non-empty video.
//!
//! Frames are extracted into a staging directory and only moved into
//! `keyframes/` by [`publish_keyframes`] once the whole analysis succeeded,
//! so a failed re-analysis leaves the previous gallery in place.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use demoreel_media::{keyframe_file_name, MediaToolAdapter};
use demoreel_models::{ActionTiming, KeyframeInfo, TimeRange};

use crate::error::EditorResult;
use crate::logging::RunLogger;
use crate::metrics::record_frame_failure;

/// At most this many sampled frames when scene detection finds nothing.
pub const MAX_SAMPLED_KEYFRAMES: usize = 5;
/// Roughly one sampled frame per this many seconds.
pub const SAMPLE_INTERVAL_SEC: f64 = 10.0;

/// Extract keyframes from `video` into the staging directory `out_dir`.
pub async fn extract_keyframes(
    adapter: &dyn MediaToolAdapter,
    video: &Path,
    out_dir: &Path,
    scene_threshold: f64,
    duration: f64,
    logger: &RunLogger,
) -> EditorResult<Vec<KeyframeInfo>> {
    tokio::fs::create_dir_all(out_dir).await?;

    let scene_frames = match adapter.detect_scenes(video, scene_threshold, out_dir).await {
        Ok(frames) => frames,
        Err(e) if e.is_tool_missing() => return Err(e.into()),
        Err(e) => {
            logger.log_warning(&format!("scene detection failed, sampling frames instead: {}", e));
            Vec::new()
        }
    };

    if !scene_frames.is_empty() {
        let mut keyframes: Vec<KeyframeInfo> = scene_frames
            .into_iter()
            .map(|f| KeyframeInfo::new(f.timestamp_sec, f.path.display().to_string()).with_score(f.score))
            .collect();
        keyframes.sort_by(|a, b| a.timestamp_sec.total_cmp(&b.timestamp_sec));

        info!(keyframes = keyframes.len(), "Scene keyframes extracted");
        return Ok(keyframes);
    }

    let timestamps = sample_timestamps(duration);
    debug!(samples = timestamps.len(), "No scene changes found, sampling evenly");

    let mut keyframes = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.into_iter().enumerate() {
        let out = out_dir.join(keyframe_file_name(i + 1));
        match adapter.extract_frame(video, ts, &out).await {
            Ok(()) => keyframes.push(KeyframeInfo::new(ts, out.display().to_string())),
            Err(e) if e.is_tool_missing() => return Err(e.into()),
            Err(e) => {
                logger.log_warning(&format!("skipping keyframe at {:.1}s: {}", ts, e));
                record_frame_failure("keyframe");
            }
        }
    }

    info!(keyframes = keyframes.len(), "Sampled keyframes extracted");
    Ok(keyframes)
}

/// Evenly spaced sample times: one per ~10 s, between 1 and 5 frames.
pub fn sample_timestamps(duration: f64) -> Vec<f64> {
    if duration.is_nan() || duration <= 0.0 {
        return Vec::new();
    }

    let count = ((duration / SAMPLE_INTERVAL_SEC).ceil() as usize).clamp(1, MAX_SAMPLED_KEYFRAMES);
    let interval = duration / count as f64;

    (0..count).map(|i| i as f64 * interval).collect()
}

/// Attach to each keyframe the first action whose span contains it.
pub fn associate_actions(keyframes: &mut [KeyframeInfo], actions: &[ActionTiming]) {
    for keyframe in keyframes.iter_mut() {
        keyframe.associated_action = actions
            .iter()
            .find(|a| a.contains_time(keyframe.timestamp_sec))
            .cloned();
    }
}

/// Move staged keyframes into `dest` and repoint them there.
///
/// Images from an earlier run are removed first, so `dest` only ever holds
/// the gallery of the latest successful analysis.
pub async fn publish_keyframes(keyframes: &mut [KeyframeInfo], dest: &Path) -> EditorResult<()> {
    tokio::fs::create_dir_all(dest).await?;
    clear_previous_keyframes(dest).await?;

    for keyframe in keyframes.iter_mut() {
        let staged = PathBuf::from(&keyframe.thumbnail_path);
        let Some(name) = staged.file_name() else {
            continue;
        };
        let target = dest.join(name);
        tokio::fs::rename(&staged, &target).await?;
        keyframe.thumbnail_path = target.display().to_string();
    }

    debug!(dest = %dest.display(), keyframes = keyframes.len(), "Keyframes published");
    Ok(())
}

/// Remove keyframes written by an earlier run so stale images never linger.
async fn clear_previous_keyframes(out_dir: &Path) -> EditorResult<()> {
    let mut entries = match tokio::fs::read_dir(out_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with("keyframe-") && name.ends_with(".png") {
            tokio::fs::remove_file(entry.path()).await?;
        }
    }

    Ok(())
}
