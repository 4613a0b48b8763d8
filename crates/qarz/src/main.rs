//! Qarz CLI - notification engine for the Qarz debt ledger

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    output::set_json_mode(cli.json);

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("qarz={0},qarz_notify={0},qarz_db={0},qarz_core={0}", log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Emit { event } => emit::execute(config, &event).await,
        Commands::Send(args) => send::execute(config, args).await,
        Commands::Notifications(args) => notifications::execute(config, args).await,
        Commands::Logs { notification } => logs::execute(config, notification.as_deref()).await,
        Commands::Rules(args) => rules::execute(config, args).await,
        Commands::Settings(args) => settings::execute(config, args).await,
        Commands::Templates(args) => templates::execute(config, args).await,
        Commands::Scheduled(args) => scheduled::execute(config, args).await,
        Commands::Gateway(args) => gateway::execute(config, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
