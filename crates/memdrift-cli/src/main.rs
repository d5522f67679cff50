// crates/memdrift-cli/src/main.rs
//
// CLI entrypoint for Memdrift.
//
// Loads configuration, initializes tracing, opens the collection in the
// working directory, and dispatches to ingest, inspection, and scoring
// subcommands.

mod commands;
mod config;
mod output;

use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use commands::ingest::{IngestMementoCmd, IngestTimeMapCmd};
use commands::list::ListCmd;
use commands::score::ScoreCmd;
use commands::show::ShowCmd;
use config::{expand_tilde, CliConfig};
use memdrift_store::CollectionModel;

/// Memdrift: measure how archived captures of a web page drift over time.
#[derive(Parser, Debug)]
#[command(
    name = "memdrift",
    version = "0.1.0",
    about = "Score content drift across the Mementos of web archive TimeMaps"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "~/.memdrift/config.toml")]
    config: String,

    /// Working directory of the collection. Overrides the configuration.
    #[arg(long, global = true)]
    working_directory: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Add a TimeMap to the collection.
    IngestTimemap(IngestTimeMapCmd),

    /// Add a Memento's content to the collection.
    IngestMemento(IngestMementoCmd),

    /// List TimeMaps with memento counts.
    List(ListCmd),

    /// Print one TimeMap as JSON.
    Show(ShowCmd),

    /// Score every Memento against its TimeMap's baseline.
    Score(ScoreCmd),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = expand_tilde(&cli.config);
    let (mut config, load_error) = match CliConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (CliConfig::default(), Some(e.to_string())),
    };
    if let Some(dir) = &cli.working_directory {
        config.working_directory = dir.clone();
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match load_error {
        None => tracing::debug!("Loaded configuration from {}", config_path),
        Some(e) if Path::new(&config_path).exists() => tracing::warn!(
            "Could not load config from {}: {}. Using defaults.",
            config_path,
            e
        ),
        Some(_) => tracing::debug!("No config at {}, using defaults", config_path),
    }

    let working_directory = expand_tilde(&config.working_directory);
    let model = Arc::new(CollectionModel::open(Path::new(&working_directory))?);
    tracing::debug!(path = %working_directory, "opened collection");

    match &cli.command {
        Commands::IngestTimemap(cmd) => commands::ingest::run_timemap(cmd, &model).await?,
        Commands::IngestMemento(cmd) => commands::ingest::run_memento(cmd, &model).await?,
        Commands::List(cmd) => commands::list::run(cmd, &model).await?,
        Commands::Show(cmd) => commands::show::run(cmd, &model).await?,
        Commands::Score(cmd) => commands::score::run(cmd, &config, Arc::clone(&model)).await?,
    }

    Ok(())
}
