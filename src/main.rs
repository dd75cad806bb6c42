//! Tube-Harvest main entry point
//!
//! This is the command-line interface for the Tube-Harvest scraping runner.

use clap::Parser;
use std::path::{Path, PathBuf};
use tube_harvest::config::{load_config_with_hash, Config};
use tube_harvest::credentials::ProcessEnv;
use tube_harvest::crawler::run_actor;
use tube_harvest::input::{load_input, DEFAULT_INPUT_PATH};
use tube_harvest::output::{export_dataset, load_statistics, print_statistics};
use tube_harvest::storage::SqliteStore;
use tracing_subscriber::EnvFilter;

/// Tube-Harvest: a headless-browser scraping task runner
///
/// Reads the actor input (start URLs, optional YouTube credentials, channel),
/// crawls the pages in Chrome and stores the extracted video records.
#[derive(Parser, Debug)]
#[command(name = "tube-harvest")]
#[command(version)]
#[command(about = "A headless-browser scraping task runner", long_about = None)]
struct Cli {
    /// Path to the actor input JSON
    #[arg(short, long, value_name = "INPUT", default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Path to an optional TOML run configuration
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show statistics from the result database and exit
    #[arg(long, conflicts_with = "export")]
    stats: bool,

    /// Write the dataset to this JSON file and exit
    #[arg(long, value_name = "PATH", conflicts_with = "stats")]
    export: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    if cli.stats {
        handle_stats(&config)?;
    } else if let Some(path) = &cli.export {
        handle_export(&config, path)?;
    } else {
        handle_run(&config, &cli.input).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG`, when set, overrides the flags.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("tube_harvest=info,warn"),
                1 => EnvFilter::new("tube_harvest=debug,info"),
                2 => EnvFilter::new("tube_harvest=trace,debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --stats mode
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("Database: {}\n", config.output.database_path);

    let store = SqliteStore::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export mode
fn handle_export(config: &Config, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::new(Path::new(&config.output.database_path))?;

    tracing::info!("Exporting dataset to {}", path.display());
    let written = export_dataset(&store, path)?;

    println!("✓ Exported {} records to: {}", written, path.display());

    Ok(())
}

/// Handles the main scraping run
async fn handle_run(config: &Config, input_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Loading input from: {}", input_path.display());
    let input = match load_input(input_path) {
        Ok(input) => input,
        Err(e) => {
            tracing::error!("Failed to load input: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Start URLs: {}, channel: {}, max videos: {}",
        input.start_urls.len(),
        input.channel_handle().as_deref().unwrap_or("(none)"),
        input.max_videos
    );

    match run_actor(config, &input, &ProcessEnv).await {
        Ok(stats) => {
            tracing::info!(
                "Run completed successfully: {} records pushed",
                stats.records_pushed
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
