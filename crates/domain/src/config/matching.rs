use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Matching cycle
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Minimum time the `matching` state stays visible, measured from the
    /// start of the remote call.
    #[serde(default = "d_1500")]
    pub min_visible_ms: u64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_visible_ms: d_1500(),
        }
    }
}

fn d_1500() -> u64 {
    1500
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Widget readiness
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default = "d_120")]
    pub retry_interval_ms: u64,
    #[serde(default = "d_20")]
    pub max_attempts: u32,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            retry_interval_ms: d_120(),
            max_attempts: d_20(),
        }
    }
}

fn d_120() -> u64 {
    120
}
fn d_20() -> u32 {
    20
}
