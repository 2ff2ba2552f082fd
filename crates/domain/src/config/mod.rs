mod backend;
mod conversation;
mod matching;
mod observability;

pub use backend::*;
pub use conversation::*;
pub use matching::*;
pub use observability::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Load a TOML config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&raw).map_err(|e| Error::Config(format!("parsing {}: {e}", path.display())))
    }

    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut push = |severity, field: &str, message: &str| {
            errors.push(ConfigError {
                severity,
                field: field.into(),
                message: message.into(),
            });
        };

        let url = self.backend.base_url.trim();
        if url.is_empty() {
            push(
                ConfigSeverity::Error,
                "backend.base_url",
                "base_url must not be empty",
            );
        } else if !(url.starts_with("http://") || url.starts_with("https://")) {
            push(
                ConfigSeverity::Error,
                "backend.base_url",
                "base_url must start with http:// or https://",
            );
        }

        if self.backend.chat_timeout_ms == 0 {
            push(
                ConfigSeverity::Error,
                "backend.chat_timeout_ms",
                "timeout must be greater than 0",
            );
        }
        if self.backend.match_timeout_ms == 0 {
            push(
                ConfigSeverity::Error,
                "backend.match_timeout_ms",
                "timeout must be greater than 0",
            );
        }

        // A floor longer than the request bound means every slow call
        // times out before the floor matters.
        if self.matching.min_visible_ms > self.backend.match_timeout_ms {
            push(
                ConfigSeverity::Warning,
                "matching.min_visible_ms",
                "minimum visible duration exceeds the match timeout",
            );
        }

        if self.widget.max_attempts == 0 {
            push(
                ConfigSeverity::Error,
                "widget.max_attempts",
                "max_attempts must be greater than 0",
            );
        }
        if self.widget.retry_interval_ms == 0 {
            push(
                ConfigSeverity::Warning,
                "widget.retry_interval_ms",
                "a zero retry interval spins without waiting",
            );
        }

        if self.conversation.max_message_chars == 0 {
            push(
                ConfigSeverity::Error,
                "conversation.max_message_chars",
                "max_message_chars must be greater than 0",
            );
        }

        errors
    }
}
