use sy_domain::config::Config;

use super::render;

/// `GET /collaborators`, optionally filtered by role.
pub async fn run(config: &Config, role: Option<&str>, json: bool) -> anyhow::Result<()> {
    let backend = sy_client::create_backend(&config.backend)?;
    let list = backend.collaborators(role).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if list.is_empty() {
        match role {
            Some(role) => println!("No collaborators with role \"{role}\"."),
            None => println!("No collaborators yet."),
        }
        return Ok(());
    }

    for (i, candidate) in list.iter().enumerate() {
        println!("{:>3}. {}", i + 1, render::candidate(candidate));
    }
    Ok(())
}
