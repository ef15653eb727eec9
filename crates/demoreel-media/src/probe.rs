//! FFprobe duration probing.

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

use crate::command::{check_ffprobe, run_tool};
use crate::error::{MediaError, MediaResult};

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: Option<FfprobeFormat>,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    duration: Option<String>,
}

/// Probe the container duration in seconds.
///
/// Returns `Ok(0.0)` when ffprobe runs but cannot determine a length;
/// callers must treat zero as "unknown". A missing ffprobe binary or
/// input file is still an error.
pub async fn probe_duration(path: impl AsRef<Path>, timeout_secs: Option<u64>) -> MediaResult<f64> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    check_ffprobe()?;

    let args = vec![
        "-v".to_string(),
        "error".to_string(),
        "-print_format".to_string(),
        "json".to_string(),
        "-show_entries".to_string(),
        "format=duration:stream=duration".to_string(),
        path.to_string_lossy().to_string(),
    ];

    let output = match run_tool("ffprobe", &args, timeout_secs).await {
        Ok(output) => output,
        Err(e @ MediaError::ToolExecutionFailed { .. }) => {
            warn!(path = %path.display(), error = %e, "FFprobe could not read duration");
            return Ok(0.0);
        }
        Err(e) => return Err(e),
    };

    let duration = parse_duration_json(&output.stdout);
    debug!(path = %path.display(), duration_sec = duration, "Probed duration");
    Ok(duration)
}

/// Extract a duration from ffprobe JSON, falling back to the longest stream.
fn parse_duration_json(stdout: &[u8]) -> f64 {
    let Ok(probe) = serde_json::from_slice::<FfprobeOutput>(stdout) else {
        return 0.0;
    };

    let container = probe
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0);

    container
        .or_else(|| {
            probe
                .streams
                .iter()
                .filter_map(|s| s.duration.as_ref()?.parse::<f64>().ok())
                .filter(|d| d.is_finite() && *d > 0.0)
                .reduce(f64::max)
        })
        .unwrap_or(0.0)
}
