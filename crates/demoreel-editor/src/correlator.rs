//! Action correlation.
//!
//! Decides for every detected silence whether the pause is intentional
//! (keep it) or dead air (candidate for removal). Rules are evaluated in
//! order and the first match wins:
//!
//! 1. overlaps a scripted `wait` action
//! 2. overlaps a long-running operation (hydration, text/enabled waits)
//! 3. shorter than the acceptable pause length
//! 4. otherwise a long pause, recommend removal
//!
//! Without an action log only rules 3 and 4 apply.

use tracing::debug;

use demoreel_models::{ActionTiming, SilenceSegment, TimeRange};

pub const REASON_INTENTIONAL_WAIT: &str = "Intentional wait";
pub const REASON_SHORT_PAUSE: &str = "Short pause within acceptable range";

/// Set `keep_pause` and `reason` on each silence.
pub fn correlate_silences(
    silences: Vec<SilenceSegment>,
    actions: Option<&[ActionTiming]>,
    max_acceptable_pause_sec: f64,
) -> Vec<SilenceSegment> {
    let actions = actions.unwrap_or_default();

    let correlated: Vec<SilenceSegment> = silences
        .into_iter()
        .map(|silence| {
            let (keep, reason) = decide(&silence, actions, max_acceptable_pause_sec);
            silence.with_decision(keep, reason)
        })
        .collect();

    debug!(
        silences = correlated.len(),
        kept = correlated.iter().filter(|s| s.keep_pause).count(),
        with_actions = !actions.is_empty(),
        "Silences correlated"
    );

    correlated
}

fn decide(silence: &SilenceSegment, actions: &[ActionTiming], max_acceptable_pause_sec: f64) -> (bool, String) {
    if actions.iter().any(|a| a.is_wait() && a.overlaps(silence)) {
        return (true, REASON_INTENTIONAL_WAIT.to_string());
    }

    if let Some(action) = actions.iter().find(|a| a.is_long_running() && a.overlaps(silence)) {
        return (true, format!("During {}", action.action));
    }

    if silence.duration_sec < max_acceptable_pause_sec {
        return (true, REASON_SHORT_PAUSE.to_string());
    }

    (
        false,
        format!("Long pause ({:.1}s) - recommend removal", silence.duration_sec),
    )
}
