//! Askroute CLI
//!
//! Chat assistant routing questions to a weather lookup or to retrieval
//! over ingested PDF documents.

use anyhow::Result;
use askroute_core::{Config, Store};
use clap::Parser;

mod app;
mod commands;

use app::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .init();

    let config = Config::load()?;

    // One writable handle to the on-disk store for the whole process
    let store = Store::init(config.store.resolved_path())?;

    match cli.command {
        Commands::Chat => commands::chat::run(store, config).await,
        Commands::Ask(args) => commands::ask::run(args, store, &config).await,
        Commands::Ingest(args) => commands::ingest::run(args, store, &config).await,
        Commands::Status => commands::status::run(store, &config).await,
    }
}
