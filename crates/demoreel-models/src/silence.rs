//! Silence segments detected in the audio track.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::segment::{TimeRange, TimeSegment};

/// A range where audio stays below the silence threshold.
///
/// Created by the silence detector with `keep_pause = false` and no reason;
/// the action correlator fills in both exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SilenceSegment {
    pub start_sec: f64,
    pub end_sec: f64,
    /// `end_sec - start_sec`, stored so the artifact is self-describing
    pub duration_sec: f64,
    /// Whether this pause should survive trimming
    #[serde(default)]
    pub keep_pause: bool,
    /// Why the correlator decided to keep or remove the pause
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SilenceSegment {
    /// Create an uncorrelated silence segment.
    pub fn new(start_sec: f64, end_sec: f64) -> Self {
        Self {
            start_sec,
            end_sec,
            duration_sec: (end_sec - start_sec).max(0.0),
            keep_pause: false,
            reason: None,
        }
    }

    /// Record the correlator's decision.
    pub fn with_decision(mut self, keep_pause: bool, reason: impl Into<String>) -> Self {
        self.keep_pause = keep_pause;
        self.reason = Some(reason.into());
        self
    }

    /// The bare time range.
    pub fn range(&self) -> TimeSegment {
        TimeSegment::new(self.start_sec, self.end_sec)
    }
}

impl TimeRange for SilenceSegment {
    fn start_sec(&self) -> f64 {
        self.start_sec
    }

    fn end_sec(&self) -> f64 {
        self.end_sec
    }
}

impl From<TimeSegment> for SilenceSegment {
    fn from(seg: TimeSegment) -> Self {
        Self::new(seg.start_sec, seg.end_sec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_duration() {
        let s = SilenceSegment::new(40.0, 50.0);
        assert!((s.duration_sec - 10.0).abs() < f64::EPSILON);
        assert!(!s.keep_pause);
        assert!(s.reason.is_none());
    }

    #[test]
    fn test_reason_omitted_until_correlated() {
        let json = serde_json::to_value(SilenceSegment::new(1.0, 2.0)).unwrap();
        assert!(json.get("reason").is_none());
        assert_eq!(json["keepPause"], false);

        let kept = SilenceSegment::new(1.0, 2.0).with_decision(true, "Intentional wait");
        let json = serde_json::to_value(kept).unwrap();
        assert_eq!(json["reason"], "Intentional wait");
    }
}
