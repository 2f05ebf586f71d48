mod args;
mod commands;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let filter = match cli.verbose {
        0 => "mashup=info",
        1 => "mashup=debug",
        2 => "mashup=trace",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Some(Commands::Doctor) => commands::doctor::run(cli.config.as_deref())
            .await
            .map(|()| ExitCode::SUCCESS),
        Some(Commands::Config) => commands::config::run(cli.config.as_deref())
            .await
            .map(|()| ExitCode::SUCCESS),
        None => commands::run::run(&cli.mashup, cli.config.as_deref()).await,
    }
}
