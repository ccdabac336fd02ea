use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use aichatty_settings::config::Config;
use aichatty_settings::domain::{Credential, CredentialKind};
use aichatty_settings::App;

mod cli;
mod command;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::new(cli.data_dir, cli.probe_timeout_secs, cli.product_id)?;
    let app = App::open(&config)?;

    match cli.command {
        Some(Commands::ValidateKey { key }) => {
            command::run_validate(&app, Credential::new(CredentialKind::ApiKey, key)).await?;
        }
        Some(Commands::ValidateHost { host }) => {
            command::run_validate(&app, Credential::new(CredentialKind::ApiHost, host)).await?;
        }
        Some(Commands::ClearKey) => command::run_clear_key(&app)?,
        Some(Commands::ResetHost) => command::run_reset_host(&app)?,
        Some(Commands::Subscribe) => command::run_subscribe(&app).await?,
        Some(Commands::Restore) => command::run_restore(&app).await?,
        Some(Commands::Status) => command::run_status(&app).await?,
        Some(Commands::Shell) => command::run_shell(&app).await?,
        None => {
            // No command specified, show help
            eprintln!("No command specified. Use --help for usage information.");
            eprintln!("Use 'aichatty shell' for an interactive session.");
        }
    }

    Ok(())
}
