//! Suggestion synthesis.
//!
//! Combines the two edit signals into one sorted list of `remove_pause`
//! suggestions. Frame-based suggestions come from static stretches of
//! video; silence-based ones from long unexplained pauses. When the two
//! disagree about a region the frame signal wins, and the silence
//! candidate is dropped.

use tracing::debug;

use demoreel_models::{FrameDiffSegment, Recommendation, SilenceSegment, TimeRange, TrimSuggestion};

/// Static stretches shorter than this are not worth a cut.
pub const MIN_FRAME_CUT_SEC: f64 = 1.0;
/// Average score below which a static stretch is a near-certain cut.
const NEAR_IDENTICAL_SCORE: f64 = 2.0;
const FRAME_HIGH_CONFIDENCE: f64 = 0.9;
const FRAME_CONFIDENCE: f64 = 0.7;
const SILENCE_BASE_CONFIDENCE: f64 = 0.5;
const SILENCE_MAX_CONFIDENCE: f64 = 0.9;

/// Build the sorted suggestion list.
pub fn synthesize_suggestions(
    frame_diffs: &[FrameDiffSegment],
    silences: &[SilenceSegment],
    min_pause_to_keep_sec: f64,
) -> Vec<TrimSuggestion> {
    let frame_based = frame_suggestions(frame_diffs);
    let candidates = silence_suggestions(silences, min_pause_to_keep_sec);
    let candidate_count = candidates.len();

    let mut suggestions: Vec<TrimSuggestion> = candidates
        .into_iter()
        .filter(|c| !conflicts_with_any(c, &frame_based))
        .collect();
    let dropped = candidate_count - suggestions.len();

    suggestions.extend(frame_based);
    suggestions.sort_by(|a, b| a.start_sec.total_cmp(&b.start_sec));

    debug!(
        suggestions = suggestions.len(),
        dropped_silence_candidates = dropped,
        "Suggestions synthesized"
    );

    suggestions
}

fn frame_suggestions(frame_diffs: &[FrameDiffSegment]) -> Vec<TrimSuggestion> {
    frame_diffs
        .iter()
        .filter(|d| d.recommendation == Recommendation::Cut && d.duration_sec() >= MIN_FRAME_CUT_SEC)
        .map(|d| {
            let confidence = if d.avg_diff_score < NEAR_IDENTICAL_SCORE {
                FRAME_HIGH_CONFIDENCE
            } else {
                FRAME_CONFIDENCE
            };
            TrimSuggestion::remove_pause(
                d.start_sec,
                d.end_sec,
                confidence,
                format!("Static content for {:.1}s", d.duration_sec()),
            )
        })
        .collect()
}

fn silence_suggestions(silences: &[SilenceSegment], min_pause_to_keep_sec: f64) -> Vec<TrimSuggestion> {
    let margin = min_pause_to_keep_sec / 2.0;

    silences
        .iter()
        .filter(|s| !s.keep_pause && s.duration_sec > min_pause_to_keep_sec)
        .filter_map(|s| {
            let start = s.start_sec + margin;
            let end = s.end_sec - margin;
            if end <= start {
                return None;
            }
            let confidence =
                (SILENCE_BASE_CONFIDENCE + (s.duration_sec - min_pause_to_keep_sec) / 10.0).min(SILENCE_MAX_CONFIDENCE);
            let reason = s
                .reason
                .clone()
                .unwrap_or_else(|| format!("Long pause ({:.1}s) - recommend removal", s.duration_sec));
            Some(TrimSuggestion::remove_pause(start, end, confidence, reason))
        })
        .collect()
}

/// A silence candidate conflicts with a frame suggestion if either endpoint
/// lies inside it or the two ranges overlap at all.
fn conflicts_with_any(candidate: &TrimSuggestion, frame_based: &[TrimSuggestion]) -> bool {
    frame_based.iter().any(|f| {
        f.contains_time(candidate.start_sec) || f.contains_time(candidate.end_sec) || f.overlaps(candidate)
    })
}
