//! Timed UI actions recorded alongside a demo video.
//!
//! The recorder writes these to a `*.metadata.json` sidecar. The analysis
//! pipeline only ever reads them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::segment::TimeRange;

/// Action names the recorder emits for a scripted pause.
const WAIT_ACTION: &str = "wait";

/// Long-running waits, compared after normalizing case and separators.
const LONG_RUNNING_ACTIONS: &[&str] = &[
    "waitforhydration",
    "waitfortext",
    "waitforenabled",
    "waitfortextchange",
];

/// One UI action with its wall-clock span relative to the recording start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionTiming {
    /// Action kind (e.g. "click", "wait", "waitForHydration")
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    pub start_ms: i64,
    pub end_ms: i64,
    #[serde(default = "default_success")]
    pub success: bool,
    /// Recorder-specific fields we carry through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_success() -> bool {
    true
}

impl ActionTiming {
    /// Create an action spanning `[start_ms, end_ms]`.
    pub fn new(action: impl Into<String>, start_ms: i64, end_ms: i64) -> Self {
        Self {
            action: action.into(),
            selector: None,
            start_ms,
            end_ms,
            success: true,
            extra: serde_json::Map::new(),
        }
    }

    /// A scripted, intentional pause.
    pub fn is_wait(&self) -> bool {
        self.action.eq_ignore_ascii_case(WAIT_ACTION)
    }

    /// An operation that legitimately leaves the screen idle while it runs.
    pub fn is_long_running(&self) -> bool {
        let normalized: String = self
            .action
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        LONG_RUNNING_ACTIONS.contains(&normalized.as_str())
    }
}

impl TimeRange for ActionTiming {
    fn start_sec(&self) -> f64 {
        self.start_ms as f64 / 1000.0
    }

    fn end_sec(&self) -> f64 {
        self.end_ms as f64 / 1000.0
    }
}

/// Contents of a recorder `*.metadata.json` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionLog {
    #[serde(default)]
    pub actions: Vec<ActionTiming>,
}
