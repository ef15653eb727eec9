//! Base time-range types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Anything that occupies a `[start, end)` span of the video timeline.
///
/// Every segment type in the pipeline implements this so overlap and
/// containment checks are written once.
pub trait TimeRange {
    /// Start of the range in seconds.
    fn start_sec(&self) -> f64;

    /// End of the range in seconds.
    fn end_sec(&self) -> f64;

    /// Length of the range in seconds (never negative).
    fn duration_sec(&self) -> f64 {
        (self.end_sec() - self.start_sec()).max(0.0)
    }

    /// True if the two ranges share any interior time.
    fn overlaps<R: TimeRange + ?Sized>(&self, other: &R) -> bool {
        self.start_sec() < other.end_sec() && other.start_sec() < self.end_sec()
    }

    /// True if `t` lies inside the closed range `[start, end]`.
    fn contains_time(&self, t: f64) -> bool {
        t >= self.start_sec() && t <= self.end_sec()
    }
}

/// A plain time range in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeSegment {
    /// Start time in seconds
    pub start_sec: f64,
    /// End time in seconds
    pub end_sec: f64,
}

impl TimeSegment {
    /// Create a new time segment.
    pub fn new(start_sec: f64, end_sec: f64) -> Self {
        Self { start_sec, end_sec }
    }

    /// Returns true if `end > start`.
    pub fn is_valid(&self) -> bool {
        self.end_sec > self.start_sec
    }
}

impl TimeRange for TimeSegment {
    fn start_sec(&self) -> f64 {
        self.start_sec
    }

    fn end_sec(&self) -> f64 {
        self.end_sec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_exclusive_at_edges() {
        let a = TimeSegment::new(0.0, 2.0);
        let b = TimeSegment::new(2.0, 3.0);
        let c = TimeSegment::new(1.5, 2.5);

        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_contains_time_is_inclusive() {
        let seg = TimeSegment::new(1.0, 2.0);
        assert!(seg.contains_time(1.0));
        assert!(seg.contains_time(2.0));
        assert!(!seg.contains_time(2.01));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(TimeSegment::new(1.5, 3.0)).unwrap();
        assert_eq!(json["startSec"], 1.5);
        assert_eq!(json["endSec"], 3.0);
    }
}
