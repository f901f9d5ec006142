//! `swimtime` - query and maintain a swimming club's race times.

use clap::Parser;
use std::io;
use swimtime_client::backend::Backend;
use swimtime_client::cli::Cli;
use swimtime_client::commands;
use swimtime_client::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "swimtime=info,swimtime_client=info,swimtime_engine=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    let cli = Cli::parse();

    let backend = Backend::connect(&config, cli.snapshot.as_deref())?;
    let mut stdout = io::stdout().lock();
    commands::run(cli.command, &backend, &config, &mut stdout).await?;

    Ok(())
}
