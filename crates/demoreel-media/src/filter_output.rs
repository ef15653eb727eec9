//! Parsers for FFmpeg filter log output.
//!
//! `silencedetect` and `metadata=print` report their results on stderr in
//! a line-oriented text format. Everything that depends on that format lives
//! here so it can change without touching the detectors.

use std::sync::LazyLock;

use regex::Regex;

use demoreel_models::TimeSegment;

const NUMBER: &str = r"(-?\d+(?:\.\d+)?(?:[eE][-+]?\d+)?)";

static SILENCE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"silence_start:\s*{NUMBER}")).expect("valid regex"));

static SILENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"silence_end:\s*{NUMBER}")).expect("valid regex"));

static METADATA_FRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"frame:\s*(\d+)\s+pts:\s*\S+\s+pts_time:\s*{NUMBER}")).expect("valid regex")
});

static SCENE_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"lavfi\.scene_score={NUMBER}")).expect("valid regex"));

/// A frame that passed the scene-change `select` filter.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneMarker {
    /// 0-based index among selected frames (matches output file order)
    pub index: usize,
    pub timestamp_sec: f64,
    pub score: Option<f64>,
}

/// Parse `silencedetect` output into time ranges.
///
/// Markers come in `silence_start` / `silence_end` pairs in stream order.
/// A trailing `silence_start` with no end (silence running to EOF) is closed
/// at `stream_end` when known and dropped otherwise. Negative starts, which
/// FFmpeg reports for silence at the very beginning, are clamped to zero.
pub fn parse_silence_markers(stderr: &str, stream_end: Option<f64>) -> Vec<TimeSegment> {
    let mut segments = Vec::new();
    let mut open_start: Option<f64> = None;

    for line in stderr.lines() {
        if let Some(start) = capture_f64(&SILENCE_START, line) {
            if open_start.is_none() {
                open_start = Some(start.max(0.0));
            }
        } else if let Some(end) = capture_f64(&SILENCE_END, line) {
            if let Some(start) = open_start.take() {
                push_if_valid(&mut segments, start, end);
            }
        }
    }

    if let (Some(start), Some(end)) = (open_start, stream_end) {
        push_if_valid(&mut segments, start, end);
    }

    segments
}

fn push_if_valid(segments: &mut Vec<TimeSegment>, start: f64, end: f64) {
    let seg = TimeSegment::new(start, end);
    let after_previous = segments.last().map_or(true, |prev| start >= prev.end_sec);
    if seg.is_valid() && after_previous {
        segments.push(seg);
    }
}

/// Parse `metadata=print` output produced after a scene `select` filter.
///
/// Each selected frame logs a `frame:N pts:… pts_time:T` line followed by
/// its `lavfi.scene_score=S` line.
pub fn parse_scene_markers(stderr: &str) -> Vec<SceneMarker> {
    let mut markers: Vec<SceneMarker> = Vec::new();

    for line in stderr.lines() {
        if let Some(caps) = METADATA_FRAME.captures(line) {
            let index = caps[1].parse::<usize>().ok();
            let ts = caps[2].parse::<f64>().ok();
            if let (Some(index), Some(timestamp_sec)) = (index, ts) {
                markers.push(SceneMarker {
                    index,
                    timestamp_sec: timestamp_sec.max(0.0),
                    score: None,
                });
            }
        } else if let Some(score) = capture_f64(&SCENE_SCORE, line) {
            if let Some(last) = markers.last_mut() {
                if last.score.is_none() {
                    last.score = Some(score);
                }
            }
        }
    }

    markers
}

fn capture_f64(re: &Regex, line: &str) -> Option<f64> {
    re.captures(line)?.get(1)?.as_str().parse().ok()
}
