use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use portfolio_site::{
    cli::{args::Cli, commands},
    logging::init_tracing,
    settings::{AppConfig, StoreBackend},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::new().context("Configuration error")?;
    if let Some(store) = cli.store.as_deref() {
        config.store = StoreBackend::from_str(store).context("Invalid --store value")?;
    }
    init_tracing(&config);
    tracing::debug!(config = ?config, "configuration loaded");

    let state = AppState::new(&config).context("Could not set up the project store")?;

    match commands::run(cli.command, &state).await {
        Ok(output) => {
            print!("{}", output);
            Ok(())
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}
