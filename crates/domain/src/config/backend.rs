use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Synergy backend connection
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Environment variable that overrides `backend.base_url`.
pub const API_URL_ENV: &str = "SYNERGY_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "d_base_url")]
    pub base_url: String,
    /// Bound for `POST /chat` and the GET endpoints.
    #[serde(default = "d_20000")]
    pub chat_timeout_ms: u64,
    /// Bound for `POST /find-collaborators`.
    #[serde(default = "d_45000")]
    pub match_timeout_ms: u64,
    /// Retries for idempotent GET calls only. POSTs are never retried
    /// because the backend appends every `/chat` message to its history.
    #[serde(default = "d_2")]
    pub max_retries: u32,
    #[serde(default = "d_client_type")]
    pub client_type: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: d_base_url(),
            chat_timeout_ms: 20_000,
            match_timeout_ms: 45_000,
            max_retries: 2,
            client_type: d_client_type(),
        }
    }
}

impl BackendConfig {
    /// Replace `base_url` with `SYNERGY_API_URL` when that variable is set
    /// and non-empty.
    pub fn apply_env_override(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.base_url = url.trim().to_owned();
            }
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_base_url() -> String {
    "http://localhost:5001".into()
}
fn d_20000() -> u64 {
    20_000
}
fn d_45000() -> u64 {
    45_000
}
fn d_2() -> u32 {
    2
}
fn d_client_type() -> String {
    "synergy-cli".into()
}
