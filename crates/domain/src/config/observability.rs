use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Logging configuration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// How the CLI installs its `tracing` subscriber.
///
/// `RUST_LOG` always wins over `filter` when it is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Emit one JSON object per log line instead of compact text.
    #[serde(default)]
    pub json_logs: bool,

    #[serde(default = "d_filter")]
    pub filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            json_logs: false,
            filter: d_filter(),
        }
    }
}

fn d_filter() -> String {
    "warn".into()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_compact_warn() {
        let cfg = ObservabilityConfig::default();
        assert!(!cfg.json_logs);
        assert_eq!(cfg.filter, "warn");
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: ObservabilityConfig = toml::from_str("").unwrap();
        assert!(!cfg.json_logs);
        assert_eq!(cfg.filter, "warn");
    }

    #[test]
    fn deserialize_json_logs() {
        let cfg: ObservabilityConfig = toml::from_str(
            r#"
            json_logs = true
            filter = "info,sy_orchestrator=debug"
        "#,
        )
        .unwrap();
        assert!(cfg.json_logs);
        assert_eq!(cfg.filter, "info,sy_orchestrator=debug");
    }
}
