pub mod chat;
pub mod collaborators;
pub mod config;
pub mod health;
pub mod render;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sy_domain::config::Config;

/// Synergy: find collaborators by chatting about what you do.
#[derive(Debug, Parser)]
#[command(name = "synergy", version, about)]
pub struct Cli {
    /// Log one JSON object per line instead of compact text.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive conversation (default when no subcommand is given).
    Chat,
    /// Check that the Synergy backend is up.
    Health,
    /// List collaborators known to the backend.
    Collaborators {
        /// Only show collaborators with this role.
        #[arg(long)]
        role: Option<String>,
        /// Print the list as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Env var naming the config file.
pub const CONFIG_ENV: &str = "SYNERGY_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "synergy.toml";

/// Load the configuration from the path in `SYNERGY_CONFIG` (or
/// `synergy.toml`), then apply `SYNERGY_API_URL`. Returns the parsed
/// [`Config`] and the path that was used.
pub fn load_config() -> anyhow::Result<(Config, String)> {
    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let mut config = load_config_from(Path::new(&config_path))?;
    config.backend.apply_env_override();
    Ok((config, config_path))
}

/// Parse `path`, or fall back to defaults when it does not exist.
pub fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    Config::load(path).with_context(|| format!("loading {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:5001");
        assert_eq!(config.matching.min_visible_ms, 1500);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[backend]
base_url = "http://synergy.internal:8080"

[widget]
max_attempts = 5
"#
        )
        .unwrap();

        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.backend.base_url, "http://synergy.internal:8080");
        assert_eq!(config.backend.chat_timeout_ms, 20_000);
        assert_eq!(config.widget.max_attempts, 5);
        assert_eq!(config.widget.retry_interval_ms, 120);
    }

    #[test]
    fn malformed_file_is_an_error_naming_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[backend\nbase_url = 1").unwrap();

        let err = load_config_from(file.path()).unwrap_err().to_string();
        assert!(err.starts_with("loading "), "{err}");
    }

    #[test]
    fn cli_parses_collaborator_filter() {
        let cli = Cli::parse_from(["synergy", "collaborators", "--role", "Designer"]);
        match cli.command {
            Some(Command::Collaborators { role, json }) => {
                assert_eq!(role.as_deref(), Some("Designer"));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn json_logs_flag_is_global() {
        let cli = Cli::parse_from(["synergy", "health", "--json-logs"]);
        assert!(cli.json_logs);
        assert!(matches!(cli.command, Some(Command::Health)));
    }
}
