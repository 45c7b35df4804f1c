mod cli;
mod config;
mod intake;
mod storage;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use is_terminal::IsTerminal;

use cli::Cli;
use config::Config;
use intake::IntakeSession;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(backend) = cli.backend {
        config.storage.backend = backend;
    }
    if let Some(path) = cli.path {
        config.storage.path = Some(path);
    }
    if let Some(url) = cli.url {
        config.storage.url = Some(url);
    }

    init_logging(cli.verbose, config.log_level.as_deref());

    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let backend = storage::open_backend(&config.storage)?;
    let session = IntakeSession::new(backend, config.tables);
    cli::commands::run(cli.command, &session).await
}

/// RUST_LOG wins over everything; otherwise -v, then the configured level
fn init_logging(verbose: u8, configured: Option<&str>) {
    let level = match verbose {
        0 => configured.unwrap_or("warn"),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
