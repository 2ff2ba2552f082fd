use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sy_cli::cli::{Cli, Command, ConfigCommand};
use sy_domain::config::ObservabilityConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Default to chat when no subcommand is given.
        None | Some(Command::Chat) => {
            let (config, _) = sy_cli::cli::load_config()?;
            init_tracing(&config.observability, cli.json_logs);
            sy_cli::cli::chat::chat(Arc::new(config)).await
        }
        Some(Command::Health) => {
            let (config, _) = sy_cli::cli::load_config()?;
            init_tracing(&config.observability, cli.json_logs);
            if !sy_cli::cli::health::run(&config).await? {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Collaborators { role, json }) => {
            let (config, _) = sy_cli::cli::load_config()?;
            init_tracing(&config.observability, cli.json_logs);
            sy_cli::cli::collaborators::run(&config, role.as_deref(), json).await
        }
        Some(Command::Config(ConfigCommand::Validate)) => {
            let (config, config_path) = sy_cli::cli::load_config()?;
            if !sy_cli::cli::config::validate(&config, &config_path) {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Show)) => {
            let (config, _) = sy_cli::cli::load_config()?;
            sy_cli::cli::config::show(&config)
        }
        Some(Command::Version) => {
            println!("synergy {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Install a stderr-only subscriber so log output never mixes with chat
/// output on stdout.
///
/// `RUST_LOG` wins over the configured filter. JSON lines when requested on
/// the command line or in `[observability]`, compact text otherwise.
fn init_tracing(obs: &ObservabilityConfig, json_flag: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&obs.filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if json_flag || obs.json_logs {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}
