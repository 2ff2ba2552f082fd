use sy_domain::config::Config;

/// Probe `GET /health`. Returns `true` when the backend reports `ok`.
pub async fn run(config: &Config) -> anyhow::Result<bool> {
    let backend = sy_client::create_backend(&config.backend)?;
    let base_url = &config.backend.base_url;

    match backend.health().await {
        Ok(true) => {
            println!("Synergy backend OK ({base_url})");
            Ok(true)
        }
        Ok(false) => {
            println!("Synergy backend is up but not healthy ({base_url})");
            Ok(false)
        }
        Err(e) => {
            println!("Synergy backend unreachable ({base_url}): {e}");
            Ok(false)
        }
    }
}
