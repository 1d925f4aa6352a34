mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use pshield_config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout carries the protected text
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    if let cli::Commands::Completions { shell } = cli.command {
        return commands::completions::handle(shell);
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        cli::Commands::Protect(args) => commands::protect::handle(args, &config).await,
        cli::Commands::Reveal(args) => commands::reveal::handle(args),
        cli::Commands::Serve { host, port } => commands::serve::handle(&config, host, port).await,
        cli::Commands::Rules { json } => commands::rules::handle(&config, json),
        cli::Commands::Config => commands::config::handle(&config, cli.config.as_deref()),
        cli::Commands::Completions { .. } => Ok(()),
    }
}
