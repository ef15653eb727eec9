//! On-disk layout next to the analyzed video.
//!
//! ```text
//! videos/
//!   demo.mp4
//!   demo.metadata.json     action log written by the recorder (optional)
//!   analysis.json          written by analysis, read by trim
//!   keyframes/             keyframe-001.png, keyframe-002.png, ...
//!   demo-trimmed.mp4       default trim output
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use demoreel_media::fs_utils::write_atomic;
use demoreel_models::{ActionLog, ActionTiming, VideoAnalysis, ANALYSIS_FILE_NAME};

use crate::error::{EditorError, EditorResult};

pub const KEYFRAMES_DIR_NAME: &str = "keyframes";
pub const ACTION_LOG_SUFFIX: &str = ".metadata.json";

/// Directory holding `video`; `.` for a bare file name.
pub fn video_dir(video: &Path) -> PathBuf {
    match video.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// `<video-dir>/analysis.json`
pub fn analysis_path(video: &Path) -> PathBuf {
    video_dir(video).join(ANALYSIS_FILE_NAME)
}

/// `<video-dir>/keyframes`
pub fn keyframes_dir(video: &Path) -> PathBuf {
    video_dir(video).join(KEYFRAMES_DIR_NAME)
}

/// `<video-dir>/<stem>-trimmed.<ext>`, keeping the source extension.
pub fn default_trimmed_path(video: &Path) -> PathBuf {
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    let ext = video
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mp4".to_string());
    video_dir(video).join(format!("{}-trimmed.{}", stem, ext))
}

/// Persist the artifact, replacing any earlier one atomically.
pub async fn save_analysis(video: &Path, analysis: &VideoAnalysis) -> EditorResult<PathBuf> {
    let path = analysis_path(video);
    let json = serde_json::to_vec_pretty(analysis)?;
    write_atomic(&path, json).await?;

    info!(path = %path.display(), suggestions = analysis.suggestions.len(), "Analysis saved");
    Ok(path)
}

/// Load the artifact for `video`.
///
/// A missing file is [`EditorError::AnalysisMissing`]; the caller has to
/// run analysis first.
pub async fn load_analysis(video: &Path) -> EditorResult<VideoAnalysis> {
    let path = analysis_path(video);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(EditorError::AnalysisMissing(path));
        }
        Err(e) => return Err(e.into()),
    };

    let analysis: VideoAnalysis = serde_json::from_slice(&bytes)?;
    if !analysis_describes(&analysis, video) {
        warn!(
            path = %path.display(),
            analyzed = %analysis.video_path,
            video = %video.display(),
            "Stored analysis belongs to another video"
        );
        return Err(EditorError::AnalysisMissing(path));
    }

    debug!(path = %path.display(), "Analysis loaded");
    Ok(analysis)
}

/// True if `analysis` was produced for `video`.
///
/// Every video in a directory shares one `analysis.json`, so the stored path
/// is matched by file name.
pub fn analysis_describes(analysis: &VideoAnalysis, video: &Path) -> bool {
    match (Path::new(&analysis.video_path).file_name(), video.file_name()) {
        (Some(stored), Some(requested)) => stored == requested,
        _ => false,
    }
}

/// Find the action log recorded with `video`.
///
/// `<stem>.metadata.json` is preferred. Otherwise the first
/// `*.metadata.json` in the directory by name is used.
pub async fn find_action_log(video: &Path) -> EditorResult<Option<PathBuf>> {
    let dir = video_dir(video);

    if let Some(stem) = video.file_stem() {
        let preferred = dir.join(format!("{}{}", stem.to_string_lossy(), ACTION_LOG_SUFFIX));
        if tokio::fs::try_exists(&preferred).await? {
            return Ok(Some(preferred));
        }
    }

    let mut entries = match tokio::fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut candidates = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        if name.to_string_lossy().ends_with(ACTION_LOG_SUFFIX) && entry.file_type().await?.is_file() {
            candidates.push(entry.path());
        }
    }
    candidates.sort();

    Ok(candidates.into_iter().next())
}

/// Load the action log for `video`, if one was recorded.
pub async fn load_action_log(video: &Path) -> EditorResult<Option<Vec<ActionTiming>>> {
    let Some(path) = find_action_log(video).await? else {
        return Ok(None);
    };

    let bytes = tokio::fs::read(&path).await?;
    let log: ActionLog = serde_json::from_slice(&bytes).map_err(|e| EditorError::InvalidActionLog {
        path: path.clone(),
        message: e.to_string(),
    })?;

    debug!(path = %path.display(), actions = log.actions.len(), "Action log loaded");
    Ok(Some(log.actions))
}
