use sy_domain::config::{Config, ConfigSeverity};

#[test]
fn default_base_url_is_local_backend() {
    let config = Config::default();
    assert_eq!(config.backend.base_url, "http://localhost:5001");
}

#[test]
fn default_timing_constants() {
    let config = Config::default();
    assert_eq!(config.matching.min_visible_ms, 1500);
    assert_eq!(config.widget.retry_interval_ms, 120);
    assert_eq!(config.widget.max_attempts, 20);
    assert_eq!(config.backend.chat_timeout_ms, 20_000);
    assert_eq!(config.backend.match_timeout_ms, 45_000);
}

#[test]
fn default_config_validates_clean() {
    assert!(Config::default().validate().is_empty());
}

#[test]
fn partial_toml_keeps_other_defaults() {
    let toml_str = r#"
[backend]
base_url = "https://synergy.example.com"

[matching]
min_visible_ms = 2000
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.backend.base_url, "https://synergy.example.com");
    assert_eq!(config.backend.max_retries, 2);
    assert_eq!(config.matching.min_visible_ms, 2000);
    assert_eq!(config.widget.max_attempts, 20);
    assert_eq!(config.conversation.max_message_chars, 1000);
}

#[test]
fn empty_base_url_is_an_error() {
    let toml_str = r#"
[backend]
base_url = ""
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, ConfigSeverity::Error);
    assert_eq!(issues[0].field, "backend.base_url");
}

#[test]
fn non_http_base_url_is_an_error() {
    let mut config = Config::default();
    config.backend.base_url = "localhost:5001".into();
    let issues = config.validate();
    assert!(issues.iter().any(|i| i.field == "backend.base_url"));
}

#[test]
fn floor_longer_than_timeout_warns() {
    let mut config = Config::default();
    config.backend.match_timeout_ms = 1000;
    let issues = config.validate();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, ConfigSeverity::Warning);
    assert_eq!(issues[0].field, "matching.min_visible_ms");
}

#[test]
fn zero_widget_attempts_is_an_error() {
    let mut config = Config::default();
    config.widget.max_attempts = 0;
    let issues = config.validate();
    assert!(issues
        .iter()
        .any(|i| i.field == "widget.max_attempts" && i.severity == ConfigSeverity::Error));
}
